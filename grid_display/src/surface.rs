// surface.rs - 2-D drawing targets: a software raster and a command recorder

use egui::{Color32, ColorImage};

/// Canvas-style drawing surface with an intrinsic pixel resolution.
///
/// Paths are collected between `begin_path` and `stroke`; strokes are one
/// pixel wide and axis aligned.
pub trait Surface {
    /// Change the backing resolution. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32);
    /// Backing resolution in pixels.
    fn size(&self) -> (u32, u32);
    fn set_stroke_color(&mut self, color: Color32);
    fn set_fill_color(&mut self, color: Color32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// Start and end point of a stroked line.
pub type Segment = ((f32, f32), (f32, f32));

/// In-memory RGBA raster.
///
/// A unit stroke addressed at coordinate `x` lights the pixel column that
/// ends at `x` (column `x - 1`), so lines drawn at `i * (cell + 1) + 1` sit
/// on columns `i * (cell + 1)` and never touch cell interiors.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
    stroke_color: Color32,
    fill_color: Color32,
    cursor: Option<(f32, f32)>,
    path: Vec<Segment>,
    revision: u64,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color32::TRANSPARENT; width as usize * height as usize],
            stroke_color: Color32::BLACK,
            fill_color: Color32::BLACK,
            cursor: None,
            path: Vec::new(),
            revision: 0,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    /// Bumped on every change; lets a presenter skip unchanged uploads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage {
            size: [self.width as usize, self.height as usize],
            pixels: self.pixels.clone(),
        }
    }

    fn fill_span(&mut self, x0: i64, x1: i64, y0: i64, y1: i64, color: Color32) {
        let x0 = x0.clamp(0, self.width as i64) as usize;
        let x1 = x1.clamp(0, self.width as i64) as usize;
        let y0 = y0.clamp(0, self.height as i64) as usize;
        let y1 = y1.clamp(0, self.height as i64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        for y in y0..y1 {
            self.pixels[y * stride + x0..y * stride + x1].fill(color);
        }
    }
}

impl Surface for PixelSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color32::TRANSPARENT; width as usize * height as usize];
        self.path.clear();
        self.cursor = None;
        self.revision += 1;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_stroke_color(&mut self, color: Color32) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color32) {
        self.fill_color = color;
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if let Some(from) = self.cursor {
            self.path.push((from, (x, y)));
        }
        self.cursor = Some((x, y));
    }

    fn stroke(&mut self) {
        let color = self.stroke_color;
        let segments = std::mem::take(&mut self.path);
        for ((x0, y0), (x1, y1)) in segments {
            if x0 == x1 {
                let column = x0.round() as i64 - 1;
                let (top, bottom) = (y0.min(y1).round() as i64, y0.max(y1).round() as i64);
                self.fill_span(column, column + 1, top, bottom, color);
            } else if y0 == y1 {
                let row = y0.round() as i64 - 1;
                let (left, right) = (x0.min(x1).round() as i64, x0.max(x1).round() as i64);
                self.fill_span(left, right, row, row + 1, color);
            } else {
                log::trace!("skipping diagonal segment ({x0},{y0})-({x1},{y1})");
            }
        }
        self.revision += 1;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x0, y0) = (x.round() as i64, y.round() as i64);
        let (x1, y1) = ((x + width).round() as i64, (y + height).round() as i64);
        self.fill_span(x0, x1, y0, y1, self.fill_color);
        self.revision += 1;
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Resize(u32, u32),
    StrokeColor(Color32),
    FillColor(Color32),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Stroke,
    FillRect(f32, f32, f32, f32),
}

/// Headless surface that only remembers what was asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Segments stroked so far as `(from, to)` pairs.
    pub fn segments(&self) -> Vec<Segment> {
        let mut cursor = None;
        let mut segments = Vec::new();
        for command in &self.commands {
            match *command {
                DrawCommand::MoveTo(x, y) => cursor = Some((x, y)),
                DrawCommand::LineTo(x, y) => {
                    if let Some(from) = cursor {
                        segments.push((from, (x, y)));
                    }
                    cursor = Some((x, y));
                }
                _ => {}
            }
        }
        segments
    }

    pub fn fill_rects(&self) -> impl Iterator<Item = (f32, f32, f32, f32)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::FillRect(x, y, w, h) => Some((x, y, w, h)),
            _ => None,
        })
    }

    pub fn count(&self, matches: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| matches(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize(width, height));
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_stroke_color(&mut self, color: Color32) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color32) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::FillRect(x, y, width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_stroke_lights_column_before_coordinate() {
        let mut surface = PixelSurface::new(4, 4);
        surface.set_stroke_color(Color32::RED);
        surface.begin_path();
        surface.move_to(2.0, 0.0);
        surface.line_to(2.0, 4.0);
        surface.stroke();
        for y in 0..4 {
            assert_eq!(surface.pixel(1, y), Some(Color32::RED));
            assert_eq!(surface.pixel(2, y), Some(Color32::TRANSPARENT));
        }
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut surface = PixelSurface::new(3, 3);
        surface.set_fill_color(Color32::GREEN);
        surface.fill_rect(2.0, 2.0, 5.0, 5.0);
        assert_eq!(surface.pixel(2, 2), Some(Color32::GREEN));
        assert_eq!(surface.pixel(1, 1), Some(Color32::TRANSPARENT));
        assert_eq!(surface.pixel(3, 3), None);
    }

    #[test]
    fn resize_clears_and_bumps_revision() {
        let mut surface = PixelSurface::new(2, 2);
        surface.set_fill_color(Color32::GREEN);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        let before = surface.revision();
        surface.resize(3, 1);
        assert!(surface.revision() > before);
        assert_eq!(surface.size(), (3, 1));
        assert!(surface.pixels().iter().all(|&p| p == Color32::TRANSPARENT));
        assert_eq!(surface.to_color_image().size, [3, 1]);
    }
}
