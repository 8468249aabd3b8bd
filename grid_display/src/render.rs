// render.rs - Grid lines and cell fills
//
// Geometry: every cell owns a (cell_size + 1) pixel pitch, one pixel of which
// is grid line. Lines are addressed at i * pitch + 1, cells start at
// i * pitch + 1 and are cell_size wide.

use egui::Color32;

use crate::config::{GridDimensions, Palette};
use crate::decoder::CellStates;
use crate::surface::Surface;

/// Surface resolution needed to show `dims` at `cell_size` pixels per cell.
/// Saturates at `u32::MAX` instead of wrapping for oversized grids.
pub fn surface_size(dims: GridDimensions, cell_size: u32) -> (u32, u32) {
    let pitch = cell_size.saturating_add(1);
    let side = |cells: u32| pitch.saturating_mul(cells).saturating_add(1);
    (side(dims.width), side(dims.height))
}

/// Stroke the lattice: `width + 1` vertical and `height + 1` horizontal lines.
pub fn draw_grid<S: Surface + ?Sized>(surface: &mut S, dims: GridDimensions, cell_size: u32, color: Color32) {
    let pitch = (cell_size + 1) as f32;
    let (right, bottom) = surface_size(dims, cell_size);
    let (right, bottom) = (right as f32, bottom as f32);

    surface.begin_path();
    surface.set_stroke_color(color);

    // Vertical lines
    for i in 0..=dims.width {
        let x = i as f32 * pitch + 1.0;
        surface.move_to(x, 0.0);
        surface.line_to(x, bottom);
    }

    // Horizontal lines
    for j in 0..=dims.height {
        let y = j as f32 * pitch + 1.0;
        surface.move_to(0.0, y);
        surface.line_to(right, y);
    }

    surface.stroke();
}

/// Fill every cell, all alive cells first and then all dead ones, so the
/// fill color changes only twice per pass.
pub fn draw_cells<S: Surface + ?Sized>(surface: &mut S, states: &CellStates, cell_size: u32, palette: &Palette) {
    let pitch = (cell_size + 1) as f32;
    let size = cell_size as f32;

    for (color, wanted) in [(palette.alive, true), (palette.dead, false)] {
        surface.set_fill_color(color);
        for (row, col, alive) in states.iter() {
            if alive != wanted {
                continue;
            }
            surface.fill_rect(col as f32 * pitch + 1.0, row as f32 * pitch + 1.0, size, size);
        }
    }
}
