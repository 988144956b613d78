use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize, Serializer};

/// A raw spreadsheet cell, as it comes from the sheet source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Grouping key of a pallet id cell. Null, NaN and blank cells have none.
    pub fn as_key(&self) -> Option<GroupKey> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(GroupKey::Text(b.to_string())),
            RawValue::Number(n) if n.is_nan() => None,
            RawValue::Number(n) => Some(GroupKey::Number(OrderedFloat(*n))),
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| GroupKey::Text(trimmed.to_string()))
            }
            RawValue::Other(v) => Some(GroupKey::Text(v.to_string())),
        }
    }
}

/// Pallet id. Numeric ids order by value and sort before text ids; a number
/// and a text cell with the same digits are different pallets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Number(n) => serializer.serialize_f64(n.into_inner()),
            GroupKey::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Empty,
    Unparseable(String),
    UnsupportedType(&'static str),
    OutOfRange(f64),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty value"),
            ParseError::Unparseable(s) => write!(f, "cannot read '{}' as a number", s),
            ParseError::UnsupportedType(kind) => write!(f, "unsupported cell type: {}", kind),
            ParseError::OutOfRange(cm) => {
                write!(f, "{} cm is out of range for a box dimension", cm)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Reads a measurement in centimetres.
///
/// Text may use a comma as decimal separator and may carry units or other
/// noise; everything except digits, sign and point is dropped before parsing.
pub fn parse_dimension(raw: &RawValue) -> Result<f64, ParseError> {
    match raw {
        RawValue::Null => Err(ParseError::Empty),
        RawValue::Bool(_) => Err(ParseError::UnsupportedType("boolean")),
        RawValue::Number(n) => Ok(*n),
        RawValue::Text(s) => parse_text(s),
        RawValue::Other(_) => Err(ParseError::UnsupportedType("structured value")),
    }
}

fn parse_text(s: &str) -> Result<f64, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let cleaned: String = trimmed
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        .collect();

    if matches!(cleaned.as_str(), "" | "+" | "-" | ".") {
        return Err(ParseError::Unparseable(s.to_string()));
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| ParseError::Unparseable(s.to_string()))
}

/// Centimetres to whole millimetres, rounding exact halves to even.
pub fn cm_to_mm(value_cm: f64) -> Result<u32, ParseError> {
    let mm = (value_cm * 10.0).round_ties_even();
    if !mm.is_finite() || mm < 0.0 || mm > u32::MAX as f64 {
        return Err(ParseError::OutOfRange(value_cm));
    }
    Ok(mm as u32)
}

pub fn mm_to_cm_string(value: u32) -> String {
    format!("{:.1}", value as f64 / 10.0)
}

/// Parses a cell straight to millimetres.
pub fn parse_dimension_mm(raw: &RawValue) -> Result<u32, ParseError> {
    cm_to_mm(parse_dimension(raw)?)
}
