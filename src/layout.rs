use crate::types::{Arrangement, CombinationDetail, OrientationSummary, Placement};

/// One layer of the grid described by `summary`, column by column.
pub fn layer_placements(summary: &OrientationSummary) -> Vec<Placement> {
    let rect = summary.orientation.footprint();
    let (grid_x, grid_y) = summary.grid;

    let mut placements = Vec::with_capacity(summary.per_layer as usize);
    for ix in 0..grid_x {
        for iy in 0..grid_y {
            placements.push(Placement {
                rect,
                x: ix * rect.length,
                y: iy * rect.width,
                label: None,
            });
        }
    }
    placements
}

/// Box A at the origin, box B next to it, behind it, or on top of it.
///
/// Stacked boxes share the origin, so their footprints coincide.
pub fn combination_placements(detail: &CombinationDetail) -> [Placement; 2] {
    let a = detail.orientation_a.footprint();
    let b = detail.orientation_b.footprint();

    let (bx, by) = match detail.arrangement {
        Arrangement::Length => (a.length, 0),
        Arrangement::Width => (0, a.width),
        Arrangement::Stack => (0, 0),
    };

    [
        Placement {
            rect: a,
            x: 0,
            y: 0,
            label: Some('A'),
        },
        Placement {
            rect: b,
            x: bx,
            y: by,
            label: Some('B'),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::find_best_orientation;
    use crate::types::{Dims, Pallet, Rect};

    #[test]
    fn test_layer_grid_positions() {
        let pallet = Pallet::new(1200, 800, 30);
        let summary = find_best_orientation(Dims::new(400, 300, 200), &pallet, 1800).unwrap();
        let placements = layer_placements(&summary);
        assert_eq!(placements.len() as u64, summary.per_layer);
        assert_eq!(placements[0].x, 0);
        assert_eq!(placements[0].y, 0);
        assert_eq!(placements[1].x, 0);
        assert_eq!(placements[1].y, 400);
        assert_eq!(placements[2].x, 300);

        let footprint = pallet.footprint();
        for p in &placements {
            assert!(p.x + p.rect.length <= footprint.length);
            assert!(p.y + p.rect.width <= footprint.width);
        }
    }

    #[test]
    fn test_combination_offsets() {
        let mut detail = CombinationDetail {
            orientation_a: Dims::new(300, 200, 100),
            orientation_b: Dims::new(150, 250, 100),
            arrangement: Arrangement::Length,
        };
        let [a, b] = combination_placements(&detail);
        assert_eq!((a.x, a.y, a.label), (0, 0, Some('A')));
        assert_eq!((b.x, b.y, b.label), (300, 0, Some('B')));
        assert_eq!(b.rect, Rect::new(150, 250));

        detail.arrangement = Arrangement::Width;
        let [_, b] = combination_placements(&detail);
        assert_eq!((b.x, b.y), (0, 200));

        detail.arrangement = Arrangement::Stack;
        let [_, b] = combination_placements(&detail);
        assert_eq!((b.x, b.y), (0, 0));
    }
}
