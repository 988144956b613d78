use crate::orientation::unique_orientations;
use crate::types::{
    Arrangement, ByHeight, CombinationDetail, CombinationResult, Dims, GroupCombination, Pallet,
    Rect,
};

pub const MANUAL_CHECK_NOTE: &str = "more than two items in group - requires manual check";

/// Candidate layouts, tried in this order for every orientation pair.
const ARRANGEMENTS: [Arrangement; 3] = [Arrangement::Length, Arrangement::Width, Arrangement::Stack];

fn arrangement_fits(
    arrangement: Arrangement,
    a: Dims,
    b: Dims,
    footprint: Rect,
    height_limit: u32,
) -> bool {
    // Sums are widened so large inputs cannot wrap.
    let max_length = footprint.length as u64;
    let max_width = footprint.width as u64;
    let longer = a.length.max(b.length) as u64;
    let wider = a.width.max(b.width) as u64;

    match arrangement {
        Arrangement::Length => a.length as u64 + b.length as u64 <= max_length && wider <= max_width,
        Arrangement::Width => longer <= max_length && a.width as u64 + b.width as u64 <= max_width,
        Arrangement::Stack => {
            longer <= max_length
                && wider <= max_width
                && a.height as u64 + b.height as u64 <= height_limit as u64
        }
    }
}

/// First feasible layout for two boxes, or `None`.
///
/// Orientation pairs are walked in enumeration order (A outer, B inner) and
/// the first arrangement that fits is returned. No attempt is made to find
/// a better pairing after that.
pub fn evaluate_combination_pair(
    dims_a: Dims,
    dims_b: Dims,
    pallet: &Pallet,
    height_limit: u32,
) -> Option<CombinationDetail> {
    let footprint = pallet.footprint();
    let orientations_b = unique_orientations(dims_b);

    for orientation_a in unique_orientations(dims_a) {
        for &orientation_b in &orientations_b {
            if orientation_a.height > height_limit || orientation_b.height > height_limit {
                continue;
            }
            if let Some(&arrangement) = ARRANGEMENTS.iter().find(|&&arr| {
                arrangement_fits(arr, orientation_a, orientation_b, footprint, height_limit)
            }) {
                return Some(CombinationDetail {
                    orientation_a,
                    orientation_b,
                    arrangement,
                });
            }
        }
    }

    None
}

/// Combination verdict for all boxes sharing one pallet id.
///
/// Fewer than two boxes yields an empty result. More than two are never
/// searched; every limit is marked infeasible with [`MANUAL_CHECK_NOTE`].
pub fn evaluate_combination_for_group(
    dims_list: &[Dims],
    pallet: &Pallet,
    height_limits: &[u32],
) -> GroupCombination {
    let results: ByHeight<CombinationResult> = match dims_list {
        [] | [_] => ByHeight::new(),
        [a, b] => height_limits
            .iter()
            .map(|&limit| {
                let result = match evaluate_combination_pair(*a, *b, pallet, limit) {
                    Some(detail) => CombinationResult::feasible(detail),
                    None => CombinationResult::infeasible(),
                };
                (limit, result)
            })
            .collect(),
        _ => {
            tracing::info!(items = dims_list.len(), "group needs manual check");
            height_limits
                .iter()
                .map(|&limit| (limit, CombinationResult::with_note(MANUAL_CHECK_NOTE)))
                .collect()
        }
    };

    let selected_height = results
        .iter()
        .find(|(_, result)| result.ok)
        .map(|(limit, _)| limit);

    GroupCombination {
        results,
        selected_height,
    }
}
