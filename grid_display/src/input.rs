// input.rs - Pointer position to grid cell

use egui::{Pos2, Rect, Vec2};

use crate::config::GridDimensions;

/// Unclamped cell coordinate; may lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row: i64,
    pub col: i64,
}

impl CellCoord {
    /// `(row, col)` if the coordinate names a real cell of `dims`.
    pub fn within(self, dims: GridDimensions) -> Option<(u32, u32)> {
        let row = u32::try_from(self.row).ok()?;
        let col = u32::try_from(self.col).ok()?;
        dims.contains(row, col).then_some((row, col))
    }
}

/// Map a pointer position in screen space to the cell under it.
///
/// `bounds` is where the surface is displayed, `intrinsic` its backing
/// resolution. The two may differ per axis, so each axis is rescaled on its
/// own before dividing by the cell pitch.
pub fn map_to_cell(pointer: Pos2, bounds: Rect, intrinsic: Vec2, cell_size: u32) -> CellCoord {
    let scale_x = axis_scale(intrinsic.x, bounds.width());
    let scale_y = axis_scale(intrinsic.y, bounds.height());
    let pitch = (cell_size + 1) as f32;

    let local_x = (pointer.x - bounds.left()) * scale_x;
    let local_y = (pointer.y - bounds.top()) * scale_y;

    CellCoord {
        row: (local_y / pitch).floor() as i64,
        col: (local_x / pitch).floor() as i64,
    }
}

fn axis_scale(intrinsic: f32, displayed: f32) -> f32 {
    if displayed > 0.0 { intrinsic / displayed } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    const CELL: u32 = 5;

    fn bounds(origin: Pos2, size: Vec2) -> Rect {
        Rect::from_min_size(origin, size)
    }

    #[test]
    fn top_left_is_origin_cell() {
        let rect = bounds(pos2(40.0, 30.0), vec2(61.0, 61.0));
        let cell = map_to_cell(pos2(40.0, 30.0), rect, vec2(61.0, 61.0), CELL);
        assert_eq!(cell, CellCoord { row: 0, col: 0 });
    }

    #[test]
    fn one_pitch_right_is_next_column() {
        let rect = bounds(pos2(0.0, 0.0), vec2(61.0, 61.0));
        let x = (CELL + 2) as f32;
        let cell = map_to_cell(pos2(x, 0.0), rect, vec2(61.0, 61.0), CELL);
        assert_eq!(cell, CellCoord { row: 0, col: 1 });
    }

    #[test]
    fn scale_is_applied_per_axis() {
        // displayed at half the intrinsic width, full height
        let rect = bounds(pos2(10.0, 10.0), vec2(30.5, 61.0));
        let intrinsic = vec2(61.0, 61.0);

        // 4 displayed pixels right is 8 intrinsic pixels: column 1 instead of 0
        let scaled = map_to_cell(pos2(14.0, 14.0), rect, intrinsic, CELL);
        assert_eq!(scaled, CellCoord { row: 0, col: 1 });

        let unscaled = map_to_cell(pos2(14.0, 14.0), bounds(pos2(10.0, 10.0), intrinsic), intrinsic, CELL);
        assert_eq!(unscaled, CellCoord { row: 0, col: 0 });
    }

    #[test]
    fn out_of_range_is_not_clamped() {
        let rect = bounds(pos2(10.0, 10.0), vec2(61.0, 61.0));
        let before = map_to_cell(pos2(2.0, 2.0), rect, vec2(61.0, 61.0), CELL);
        assert_eq!(before, CellCoord { row: -2, col: -2 });
        assert_eq!(before.within(GridDimensions::square(10)), None);

        let past = map_to_cell(pos2(80.0, 20.0), rect, vec2(61.0, 61.0), CELL);
        assert_eq!(past.col, 11);
        assert_eq!(past.within(GridDimensions::square(10)), None);
        assert_eq!(
            CellCoord { row: 9, col: 9 }.within(GridDimensions::square(10)),
            Some((9, 9))
        );
    }
}
