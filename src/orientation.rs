use std::cmp::Reverse;

use crate::types::{BoxMetrics, ByHeight, Dims, OrientationSummary, Pallet, Rect};

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Distinct orientations of a box, ascending by (length, width, height).
///
/// Equal dimensions collapse: one orientation for a cube, three when two
/// sides match, six otherwise. Combination results depend on this order.
pub fn unique_orientations(dims: Dims) -> Vec<Dims> {
    let values = dims.as_array();
    let mut orientations: Vec<Dims> = PERMUTATIONS
        .iter()
        .map(|p| Dims::new(values[p[0]], values[p[1]], values[p[2]]))
        .collect();
    orientations.sort_unstable();
    orientations.dedup();
    orientations
}

/// Fills the footprint with one orientation. `None` when not a single box
/// fits; zero-sized sides count as not fitting.
pub fn evaluate_orientation(
    orientation: Dims,
    footprint: Rect,
    height_limit: u32,
) -> Option<OrientationSummary> {
    if orientation.height > height_limit {
        return None;
    }

    let fit_length = footprint.length.checked_div(orientation.length).unwrap_or(0);
    let fit_width = footprint.width.checked_div(orientation.width).unwrap_or(0);
    if fit_length == 0 || fit_width == 0 {
        return None;
    }

    let layers = height_limit.checked_div(orientation.height).unwrap_or(0);
    if layers == 0 {
        return None;
    }

    let per_layer = fit_length as u64 * fit_width as u64;
    Some(OrientationSummary {
        orientation,
        grid: (fit_length, fit_width),
        per_layer,
        layers,
        total: per_layer * layers as u64,
    })
}

/// Ranking key, higher is better: total, then layers, then per-layer count,
/// then the lowest box height.
fn rank(summary: &OrientationSummary) -> (u64, u32, u64, Reverse<u32>) {
    (
        summary.total,
        summary.layers,
        summary.per_layer,
        Reverse(summary.orientation.height),
    )
}

pub fn find_best_orientation(
    dims: Dims,
    pallet: &Pallet,
    height_limit: u32,
) -> Option<OrientationSummary> {
    let footprint = pallet.footprint();
    let mut best: Option<OrientationSummary> = None;

    for orientation in unique_orientations(dims) {
        let Some(summary) = evaluate_orientation(orientation, footprint, height_limit) else {
            continue;
        };
        // Strictly better only, so the earliest orientation wins full ties.
        if best.is_none_or(|b| rank(&summary) > rank(&b)) {
            best = Some(summary);
        }
    }

    best
}

/// Best orientation for every height limit, each evaluated independently.
pub fn compute_box_metrics(dims: Dims, pallet: &Pallet, height_limits: &[u32]) -> BoxMetrics {
    let best_by_height: ByHeight<Option<OrientationSummary>> = height_limits
        .iter()
        .map(|&limit| (limit, find_best_orientation(dims, pallet, limit)))
        .collect();

    BoxMetrics {
        dims_mm: dims,
        sorted_dims_mm: dims.sorted_desc(),
        best_by_height,
    }
}
