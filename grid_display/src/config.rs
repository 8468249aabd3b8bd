// config.rs - Grid geometry, colors and the two user-tunable rates

use egui::Color32;
use thiserror::Error;

/// Highest renders-per-second a user may ask for.
pub const MAX_RENDERS_PER_SECOND: u32 = 60;

/// Largest grid side, in cells, accepted from outside.
pub const MAX_GRID_SIDE: u32 = 1024;

/// Largest cell, in pixels, accepted from outside.
pub const MAX_CELL_SIZE: u32 = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be at least one pixel")]
    ZeroCellSize,
    #[error("cell size must be at most {max} pixels, got {0}", max = MAX_CELL_SIZE)]
    CellSizeTooLarge(u32),
    #[error("grid sides must be within 1..={max} cells, got {width}x{height}", max = MAX_GRID_SIDE)]
    GridOutOfRange { width: u32, height: u32 },
    #[error("renders per second must be within 0..={max}, got {0}", max = MAX_RENDERS_PER_SECOND)]
    RateOutOfRange(u32),
}

/// Width and height of a grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Like [`GridDimensions::new`], but both sides must be within `1..=MAX_GRID_SIDE`.
    pub fn checked(width: u32, height: u32) -> Result<Self, ConfigError> {
        Self::new(width, height).validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        let sides = 1..=MAX_GRID_SIDE;
        if !sides.contains(&self.width) || !sides.contains(&self.height) {
            return Err(ConfigError::GridOutOfRange { width: self.width, height: self.height });
        }
        Ok(self)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Linear index of `(row, col)`; callers guarantee both are in range.
    pub fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.height && col < self.width
    }
}

/// Pixel size of one cell on the drawing surface, excluding its grid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    cell_size: u32,
}

impl RenderConfig {
    pub fn new(cell_size: u32) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if cell_size > MAX_CELL_SIZE {
            return Err(ConfigError::CellSizeTooLarge(cell_size));
        }
        Ok(Self { cell_size })
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { cell_size: 5 }
    }
}

/// How many engine ticks (and redraws) per second the user wants.
/// Zero means "hold the current generation".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    target_renders_per_second: u32,
}

impl RateConfig {
    pub fn new(target_renders_per_second: u32) -> Result<Self, ConfigError> {
        if target_renders_per_second > MAX_RENDERS_PER_SECOND {
            return Err(ConfigError::RateOutOfRange(target_renders_per_second));
        }
        Ok(Self { target_renders_per_second })
    }

    pub fn target(&self) -> u32 {
        self.target_renders_per_second
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self { target_renders_per_second: 15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub grid: Color32,
    pub alive: Color32,
    pub dead: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            grid: Color32::from_rgb(0xCC, 0xCC, 0xCC),
            alive: Color32::BLACK,
            dead: Color32::WHITE,
        }
    }
}
