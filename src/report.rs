use serde::{Deserialize, Serialize};

use crate::columns::ColumnMapping;
use crate::config::PalletConfig;
use crate::parse::{GroupKey, RawValue, mm_to_cm_string};
use crate::types::{BoxMetrics, GroupCombination, OrientationSummary};

pub const NO_ORIENTATION: &str = "no suitable orientation";

/// Tabular input: header names plus rows of raw cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
    /// Detected from the column names when absent.
    #[serde(default)]
    pub mapping: Option<ColumnMapping>,
    #[serde(default)]
    pub pallet_id_column: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub pallet_id: Option<GroupKey>,
    pub metrics: Option<BoxMetrics>,
    pub note: Option<String>,
    pub combination: Option<String>,
}

impl RowReport {
    /// Box count for a limit; `None` for rows that could not be read.
    pub fn max_total(&self, limit: u32) -> Option<u64> {
        self.metrics.as_ref().map(|m| m.max_total(limit))
    }

    pub fn scheme(&self, limit: u32) -> String {
        match &self.metrics {
            Some(metrics) => describe_orientation(metrics.best(limit)),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub pallet_id: GroupKey,
    pub rows: Vec<usize>,
    pub combination: GroupCombination,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub pallet: PalletConfig,
    pub rows: Vec<RowReport>,
    pub groups: Vec<GroupReport>,
}

/// Whole centimetres, as used in column headers and labels.
pub fn limit_cm_label(limit: u32) -> String {
    format!("{:.0}", limit as f64 / 10.0)
}

pub fn describe_orientation(summary: Option<&OrientationSummary>) -> String {
    let Some(summary) = summary else {
        return NO_ORIENTATION.to_string();
    };
    let o = summary.orientation;
    format!(
        "{}×{}×{} cm; layer: {}×{}, layers: {}, total: {}",
        mm_to_cm_string(o.length),
        mm_to_cm_string(o.width),
        mm_to_cm_string(o.height),
        summary.grid.0,
        summary.grid.1,
        summary.layers,
        summary.total,
    )
}

pub fn combination_label(combination: &GroupCombination) -> String {
    match combination.selected_height {
        Some(limit) => format!("yes ({} cm)", limit_cm_label(limit)),
        None if combination.has_note() => "check manually".to_string(),
        None => "no".to_string(),
    }
}
