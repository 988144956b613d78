use serde::{Deserialize, Serialize};

/// Substrings that identify a dimension column, matched case-insensitively.
const LENGTH_ALIASES: &[&str] = &["len", "length", "длин", "глуб", "depth", "толщ"];
const WIDTH_ALIASES: &[&str] = &["wid", "width", "шир"];
const HEIGHT_ALIASES: &[&str] = &["hei", "height", "выс"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Width,
    Height,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Length, Dimension::Width, Dimension::Height];

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Dimension::Length => LENGTH_ALIASES,
            Dimension::Width => WIDTH_ALIASES,
            Dimension::Height => HEIGHT_ALIASES,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dimension::Length => "length",
            Dimension::Width => "width",
            Dimension::Height => "height",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    Unassigned(Dimension),
    Duplicate {
        column: String,
        first: Dimension,
        second: Dimension,
    },
    UnknownColumn(String),
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::Unassigned(dim) => write!(f, "no column selected for {}", dim),
            MappingError::Duplicate {
                column,
                first,
                second,
            } => write!(
                f,
                "column '{}' is selected for both {} and {}",
                column, first, second
            ),
            MappingError::UnknownColumn(column) => write!(f, "unknown column '{}'", column),
        }
    }
}

impl std::error::Error for MappingError {}

/// Which sheet column holds each logical dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub length: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::Length => self.length.as_deref(),
            Dimension::Width => self.width.as_deref(),
            Dimension::Height => self.height.as_deref(),
        }
    }

    fn slot(&mut self, dim: Dimension) -> &mut Option<String> {
        match dim {
            Dimension::Length => &mut self.length,
            Dimension::Width => &mut self.width,
            Dimension::Height => &mut self.height,
        }
    }

    /// Resolves the mapping to column positions in `columns`, order
    /// length, width, height. Every dimension needs its own existing column.
    pub fn resolve(&self, columns: &[String]) -> Result<[usize; 3], MappingError> {
        let mut indices = [0usize; 3];
        for (i, dim) in Dimension::ALL.into_iter().enumerate() {
            let name = self.get(dim).ok_or(MappingError::Unassigned(dim))?;

            if let Some(first) = Dimension::ALL[..i]
                .iter()
                .copied()
                .find(|&earlier| self.get(earlier) == Some(name))
            {
                return Err(MappingError::Duplicate {
                    column: name.to_string(),
                    first,
                    second: dim,
                });
            }

            indices[i] = columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| MappingError::UnknownColumn(name.to_string()))?;
        }
        Ok(indices)
    }
}

/// Guesses the dimension columns from their names.
///
/// Each dimension takes the first unclaimed column containing one of its
/// aliases. Dimensions still unassigned then take the remaining columns in
/// sheet order.
pub fn detect_dimension_columns(columns: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    let mut taken = vec![false; columns.len()];
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

    for dim in Dimension::ALL {
        let found = lowered.iter().enumerate().find(|(i, name)| {
            !taken[*i] && dim.aliases().iter().any(|alias| name.contains(alias))
        });
        if let Some((i, _)) = found {
            *mapping.slot(dim) = Some(columns[i].clone());
            taken[i] = true;
        }
    }

    for (i, column) in columns.iter().enumerate() {
        if taken[i] {
            continue;
        }
        if let Some(dim) = Dimension::ALL
            .into_iter()
            .find(|&dim| mapping.get(dim).is_none())
        {
            *mapping.slot(dim) = Some(column.clone());
            taken[i] = true;
        }
    }

    mapping
}
