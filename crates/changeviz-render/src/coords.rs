//! Grid-to-pixel mapping.
//!
//! Column `c` and row `r` land at `((c + 1) * x_scale, (r + 1) * y_scale)`; the `+ 1` keeps a
//! one-cell margin so no node touches the canvas edge.

use crate::config::LayoutConfig;
use crate::model::{CanvasSize, Point};
use changeviz_core::{GraphSnapshot, GridPos};

pub fn map_grid(pos: GridPos, x_scale: f64, y_scale: f64) -> Point {
    Point {
        x: (f64::from(pos.column) + 1.0) * x_scale,
        y: (f64::from(pos.row) + 1.0) * y_scale,
    }
}

pub fn map_with(pos: GridPos, config: &LayoutConfig) -> Point {
    map_grid(pos, config.x_scale, config.y_scale)
}

/// Pixel y of a grid row. Shared by node placement and the info panel so both stay in lockstep.
pub fn row_y(row: u32, y_scale: f64) -> f64 {
    (f64::from(row) + 1.0) * y_scale
}

/// Canvas covering every node plus a one-cell margin on each side; empty snapshots get a
/// zero-sized canvas.
pub fn canvas_size(snapshot: &GraphSnapshot, config: &LayoutConfig) -> CanvasSize {
    match snapshot.grid_extent() {
        None => CanvasSize {
            width: 0.0,
            height: 0.0,
        },
        Some(max) => CanvasSize {
            width: (f64::from(max.column) + 2.0) * config.x_scale,
            height: (f64::from(max.row) + 2.0) * config.y_scale,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use changeviz_core::Change;

    fn pos(column: u32, row: u32) -> GridPos {
        GridPos { column, row }
    }

    #[test]
    fn origin_gets_one_cell_margin() {
        assert_eq!(map_grid(pos(0, 0), 8.0, 20.0), Point::new(8.0, 20.0));
        assert_eq!(map_grid(pos(0, 1), 8.0, 20.0), Point::new(8.0, 40.0));
        assert_eq!(map_grid(pos(3, 2), 8.0, 20.0), Point::new(32.0, 60.0));
    }

    #[test]
    fn mapping_is_strictly_monotonic_per_axis() {
        for c in 0..16u32 {
            for r in 0..16u32 {
                let p = map_grid(pos(c, r), 7.5, 13.0);
                let right = map_grid(pos(c + 1, r), 7.5, 13.0);
                let below = map_grid(pos(c, r + 1), 7.5, 13.0);
                assert!(right.x > p.x);
                assert_eq!(right.y, p.y);
                assert!(below.y > p.y);
                assert_eq!(below.x, p.x);
            }
        }
    }

    #[test]
    fn row_y_matches_mapped_y() {
        assert_eq!(row_y(4, 20.0), map_grid(pos(9, 4), 8.0, 20.0).y);
    }

    #[test]
    fn canvas_adds_margin_past_the_maxima() {
        let snapshot = GraphSnapshot::new(
            vec![
                Change::new("a", "a", "", 2, 0),
                Change::new("b", "b", "", 0, 5),
            ],
            Vec::new(),
        )
        .unwrap();
        let size = canvas_size(&snapshot, &LayoutConfig::default());
        assert_eq!(
            size,
            CanvasSize {
                width: 32.0,
                height: 140.0,
            }
        );
    }

    #[test]
    fn empty_snapshot_has_zero_canvas() {
        let size = canvas_size(&GraphSnapshot::empty(), &LayoutConfig::default());
        assert_eq!(
            size,
            CanvasSize {
                width: 0.0,
                height: 0.0,
            }
        );
    }
}
