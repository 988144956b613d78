use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Three box dimensions in millimetres. Once a box is oriented the fields
/// take their positional meaning relative to the pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dims {
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn new(length: u32, width: u32, height: u32) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn as_array(&self) -> [u32; 3] {
        [self.length, self.width, self.height]
    }

    /// Same values ordered largest first, the way boxes are listed to people.
    pub fn sorted_desc(&self) -> Self {
        let mut values = self.as_array();
        values.sort_unstable_by(|a, b| b.cmp(a));
        Self::new(values[0], values[1], values[2])
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.length, self.width)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub length: u32,
    pub width: u32,
}

impl Rect {
    pub fn new(length: u32, width: u32) -> Self {
        Self { length, width }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.length, self.width)
    }
}

/// Physical pallet plus the overhang allowed past each footprint edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pallet {
    pub length: u32,
    pub width: u32,
    pub overhang: u32,
}

impl Pallet {
    pub fn new(length: u32, width: u32, overhang: u32) -> Self {
        Self {
            length,
            width,
            overhang,
        }
    }

    /// Usable footprint: the overhang is added once per axis.
    pub fn footprint(&self) -> Rect {
        Rect::new(
            self.length.saturating_add(self.overhang),
            self.width.saturating_add(self.overhang),
        )
    }
}

/// A rectangle placed in a layer, used for drawing layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<char>,
}

/// How one orientation fills the pallet under one height limit.
///
/// Only built for orientations that hold at least one box, so `grid`
/// components, `per_layer` and `layers` are all non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrientationSummary {
    pub orientation: Dims,
    pub grid: (u32, u32),
    pub per_layer: u64,
    pub layers: u32,
    pub total: u64,
}

/// Values keyed by height limit, kept in the configured priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByHeight<T> {
    entries: Vec<(u32, T)>,
}

impl<T> ByHeight<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, limit: u32, value: T) {
        match self.entries.iter_mut().find(|(l, _)| *l == limit) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((limit, value)),
        }
    }

    pub fn get(&self, limit: u32) -> Option<&T> {
        self.entries
            .iter()
            .find(|(l, _)| *l == limit)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries.iter().map(|(l, v)| (*l, v))
    }

    pub fn limits(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(l, _)| *l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for ByHeight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(u32, T)> for ByHeight<T> {
    fn from_iter<I: IntoIterator<Item = (u32, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (limit, value) in iter {
            map.insert(limit, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for ByHeight<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (limit, value) in &self.entries {
            map.serialize_entry(limit, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxMetrics {
    pub dims_mm: Dims,
    pub sorted_dims_mm: Dims,
    /// `None` means no orientation fits under that limit.
    pub best_by_height: ByHeight<Option<OrientationSummary>>,
}

impl BoxMetrics {
    pub fn best(&self, limit: u32) -> Option<&OrientationSummary> {
        self.best_by_height.get(limit).and_then(Option::as_ref)
    }

    /// Box count shown for a limit; zero when nothing fits.
    pub fn max_total(&self, limit: u32) -> u64 {
        self.best(limit).map_or(0, |s| s.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    Length,
    Width,
    Stack,
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Arrangement::Length => "length",
            Arrangement::Width => "width",
            Arrangement::Stack => "stack",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombinationDetail {
    pub orientation_a: Dims,
    pub orientation_b: Dims,
    pub arrangement: Arrangement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationResult {
    pub ok: bool,
    pub detail: Option<CombinationDetail>,
    pub note: Option<String>,
}

impl CombinationResult {
    pub fn feasible(detail: CombinationDetail) -> Self {
        Self {
            ok: true,
            detail: Some(detail),
            note: None,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            ok: false,
            detail: None,
            note: None,
        }
    }

    pub fn with_note(note: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: None,
            note: Some(note.into()),
        }
    }
}

/// Verdicts for one pallet group, one per height limit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GroupCombination {
    pub results: ByHeight<CombinationResult>,
    /// First limit, in priority order, at which the pair fits.
    pub selected_height: Option<u32>,
}

impl GroupCombination {
    pub fn selected_detail(&self) -> Option<&CombinationDetail> {
        self.selected_height
            .and_then(|limit| self.results.get(limit))
            .and_then(|r| r.detail.as_ref())
    }

    pub fn has_note(&self) -> bool {
        self.results.iter().any(|(_, r)| r.note.is_some())
    }
}
