use std::collections::BTreeMap;

use crate::columns::{ColumnMapping, MappingError, detect_dimension_columns};
use crate::combination::evaluate_combination_for_group;
use crate::config::PalletConfig;
use crate::orientation::compute_box_metrics;
use crate::parse::{GroupKey, ParseError, RawValue, parse_dimension_mm};
use crate::report::{GroupReport, Report, RowReport, Sheet, combination_label};
use crate::types::{BoxMetrics, Dims, GroupCombination, Pallet};

/// Runs the per-box optimizer and the pair evaluator for one pallet setup.
pub struct Solver {
    config: PalletConfig,
    pallet: Pallet,
}

impl Solver {
    pub fn new(config: PalletConfig) -> Self {
        let pallet = config.pallet();
        Self { config, pallet }
    }

    pub fn box_metrics(&self, dims: Dims) -> BoxMetrics {
        let metrics = compute_box_metrics(dims, &self.pallet, &self.config.height_limits);
        for (limit, best) in metrics.best_by_height.iter() {
            match best {
                Some(s) => tracing::debug!(
                    %dims, limit, orientation = %s.orientation, total = s.total,
                    "best orientation"
                ),
                None => tracing::debug!(%dims, limit, "no orientation fits"),
            }
        }
        metrics
    }

    pub fn group_combination(&self, dims_list: &[Dims]) -> GroupCombination {
        let combination =
            evaluate_combination_for_group(dims_list, &self.pallet, &self.config.height_limits);
        tracing::debug!(
            items = dims_list.len(),
            selected_height = ?combination.selected_height,
            "group combination"
        );
        combination
    }

    /// Evaluates every row of a sheet, then every pallet group.
    ///
    /// Only an unusable column mapping fails the whole sheet. Rows whose
    /// cells cannot be read stay in the report with a note and no metrics.
    pub fn process(&self, sheet: &Sheet) -> Result<Report, MappingError> {
        let id_index = sheet
            .pallet_id_column
            .as_ref()
            .map(|name| {
                sheet
                    .columns
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| MappingError::UnknownColumn(name.clone()))
            })
            .transpose()?;

        let mapping = match &sheet.mapping {
            Some(mapping) => mapping.clone(),
            None => detect_mapping(sheet),
        };
        let indices = mapping.resolve(&sheet.columns)?;

        let mut rows: Vec<RowReport> = sheet
            .rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let pallet_id = id_index
                    .and_then(|idx| cells.get(idx))
                    .and_then(RawValue::as_key);
                let (metrics, note) = match read_dims(cells, indices) {
                    Ok(dims) => (Some(self.box_metrics(dims)), None),
                    Err(err) => {
                        tracing::warn!(row, error = %err, "skipping row");
                        (None, Some(format!("could not parse dimensions: {err}")))
                    }
                };
                RowReport {
                    row,
                    pallet_id,
                    metrics,
                    note,
                    combination: None,
                }
            })
            .collect();

        let groups = if id_index.is_some() {
            self.evaluate_groups(&mut rows)
        } else {
            Vec::new()
        };

        Ok(Report {
            pallet: self.config.clone(),
            rows,
            groups,
        })
    }

    fn evaluate_groups(&self, rows: &mut [RowReport]) -> Vec<GroupReport> {
        let mut members: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            if let Some(id) = &row.pallet_id {
                members.entry(id.clone()).or_default().push(i);
            }
        }

        let mut groups = Vec::new();
        for (pallet_id, indices) in members {
            let dims_list: Vec<Dims> = indices
                .iter()
                .filter_map(|&i| rows[i].metrics.as_ref().map(|m| m.dims_mm))
                .collect();
            if dims_list.is_empty() {
                continue;
            }

            let combination = self.group_combination(&dims_list);
            let label = combination_label(&combination);
            for &i in &indices {
                rows[i].combination = Some(label.clone());
            }
            groups.push(GroupReport {
                pallet_id,
                rows: indices.iter().map(|&i| rows[i].row).collect(),
                combination,
                label,
            });
        }
        groups
    }
}

/// Column detection over everything except the pallet id column.
fn detect_mapping(sheet: &Sheet) -> ColumnMapping {
    let candidates: Vec<String> = sheet
        .columns
        .iter()
        .filter(|c| Some(*c) != sheet.pallet_id_column.as_ref())
        .cloned()
        .collect();
    detect_dimension_columns(&candidates)
}

fn read_dims(cells: &[RawValue], indices: [usize; 3]) -> Result<Dims, ParseError> {
    let mut values = [0u32; 3];
    for (value, idx) in values.iter_mut().zip(indices) {
        *value = parse_dimension_mm(cells.get(idx).unwrap_or(&RawValue::Null))?;
    }
    Ok(Dims::new(values[0], values[1], values[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::MANUAL_CHECK_NOTE;
    use crate::types::Arrangement;

    fn sheet(columns: &[&str], rows: Vec<Vec<RawValue>>) -> Sheet {
        Sheet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            mapping: None,
            pallet_id_column: None,
        }
    }

    #[test]
    fn test_process_rows() {
        let solver = Solver::new(PalletConfig::default());
        let input = sheet(
            &["Length", "Width", "Height"],
            vec![
                vec!["40".into(), 30.into(), "20 cm".into()],
                vec!["".into(), 30.into(), 20.into()],
                vec![200.into(), 200.into(), 200.into()],
            ],
        );
        let report = solver.process(&input).unwrap();
        assert_eq!(report.rows.len(), 3);
        assert!(report.groups.is_empty());

        let first = &report.rows[0];
        assert!(first.note.is_none());
        assert_eq!(first.max_total(1800), Some(72));
        assert_eq!(first.metrics.as_ref().unwrap().dims_mm, Dims::new(400, 300, 200));

        let broken = &report.rows[1];
        assert!(broken.metrics.is_none());
        assert!(broken.note.as_deref().unwrap().starts_with("could not parse dimensions"));
        assert_eq!(broken.max_total(1800), None);
        assert_eq!(broken.scheme(1800), "-");

        let oversized = &report.rows[2];
        assert_eq!(oversized.max_total(1800), Some(0));
        assert_eq!(oversized.scheme(1700), crate::report::NO_ORIENTATION);
    }

    #[test]
    fn test_process_groups() {
        let solver = Solver::new(PalletConfig::default());
        let mut input = sheet(
            &["Pallet", "len", "wid", "hei"],
            vec![
                vec!["P2".into(), 10.into(), 10.into(), 10.into()],
                vec!["P1".into(), 10.into(), 10.into(), 10.into()],
                vec!["P2".into(), 10.into(), 10.into(), 10.into()],
                vec!["P3".into(), 10.into(), 10.into(), 10.into()],
                vec!["P3".into(), 10.into(), 10.into(), 10.into()],
                vec!["P3".into(), 10.into(), 10.into(), 10.into()],
                vec![RawValue::Null, 10.into(), 10.into(), 10.into()],
                vec!["P4".into(), "n/a".into(), 10.into(), 10.into()],
            ],
        );
        input.pallet_id_column = Some("Pallet".to_string());

        let report = solver.process(&input).unwrap();
        let ids: Vec<String> = report.groups.iter().map(|g| g.pallet_id.to_string()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);

        let p1 = &report.groups[0];
        assert!(p1.combination.results.is_empty());
        assert_eq!(p1.label, "no");

        let p2 = &report.groups[1];
        assert_eq!(p2.rows, vec![0, 2]);
        assert_eq!(p2.combination.selected_height, Some(1800));
        assert_eq!(
            p2.combination.selected_detail().unwrap().arrangement,
            Arrangement::Length
        );
        assert_eq!(p2.label, "yes (180 cm)");
        assert_eq!(report.rows[0].combination.as_deref(), Some("yes (180 cm)"));

        let p3 = &report.groups[2];
        assert_eq!(p3.label, "check manually");
        let note = p3.combination.results.get(1700).unwrap().note.as_deref();
        assert_eq!(note, Some(MANUAL_CHECK_NOTE));

        assert_eq!(report.rows[6].combination, None);
        assert_eq!(report.rows[7].combination, None);
    }

    #[test]
    fn test_numeric_pallet_ids_group_by_value() {
        let solver = Solver::new(PalletConfig::default());
        let mut input = sheet(
            &["Pallet", "len", "wid", "hei"],
            vec![
                vec![10.into(), 10.into(), 10.into(), 10.into()],
                vec![2.into(), 10.into(), 10.into(), 10.into()],
                vec!["2".into(), 10.into(), 10.into(), 10.into()],
                vec![2.0.into(), 10.into(), 10.into(), 10.into()],
            ],
        );
        input.pallet_id_column = Some("Pallet".to_string());

        let report = solver.process(&input).unwrap();
        let groups: Vec<(String, Vec<usize>)> = report
            .groups
            .iter()
            .map(|g| (g.pallet_id.to_string(), g.rows.clone()))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("2".to_string(), vec![1, 3]),
                ("10".to_string(), vec![0]),
                ("2".to_string(), vec![2]),
            ]
        );
        assert!(matches!(report.groups[0].pallet_id, GroupKey::Number(_)));
        assert!(matches!(report.groups[2].pallet_id, GroupKey::Text(_)));
    }

    #[test]
    fn test_process_rejects_duplicate_mapping() {
        let solver = Solver::new(PalletConfig::default());
        let mut input = sheet(&["a", "b", "c"], vec![]);
        input.mapping = Some(ColumnMapping {
            length: Some("a".into()),
            width: Some("b".into()),
            height: Some("a".into()),
        });
        assert!(matches!(
            solver.process(&input),
            Err(MappingError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_process_rejects_unknown_pallet_column() {
        let solver = Solver::new(PalletConfig::default());
        let mut input = sheet(&["l", "w", "h"], vec![]);
        input.pallet_id_column = Some("pallet".into());
        assert_eq!(
            solver.process(&input).unwrap_err(),
            MappingError::UnknownColumn("pallet".into())
        );
    }

    #[test]
    fn test_short_row_is_unparseable() {
        let solver = Solver::new(PalletConfig::default());
        let input = sheet(&["l", "w", "h"], vec![vec![10.into(), 10.into()]]);
        let report = solver.process(&input).unwrap();
        assert!(report.rows[0].metrics.is_none());
        assert!(report.rows[0].note.is_some());
    }
}
