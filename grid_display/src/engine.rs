// engine.rs - What the core needs from a simulation engine

use crate::config::GridDimensions;
use crate::decoder::Encoding;

/// A running cellular automaton that owns its cell memory.
///
/// Coordinates follow the engine convention of column first.
pub trait Engine {
    /// Advance one generation.
    fn tick(&mut self);
    fn toggle_cell(&mut self, col: u32, row: u32);
    /// Stamp a five-cell glider whose bounding box starts at `(row, col)`.
    fn set_glider(&mut self, col: u32, row: u32);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Raw view of the cell memory. Valid until the engine is next mutated.
    fn cells(&self) -> &[u8];
    /// Packing used by [`Engine::cells`].
    fn encoding(&self) -> Encoding;

    fn dims(&self) -> GridDimensions {
        GridDimensions::new(self.width(), self.height())
    }
}

/// Arguments for building a fresh engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    /// Start with every cell dead instead of a random soup.
    pub empty: bool,
    /// Grid size; `None` lets the engine pick its default.
    pub size: Option<GridDimensions>,
}

/// Builds engines on demand; resets and resizes throw the old one away.
pub trait EngineFactory {
    type Engine: Engine;
    type Error: std::error::Error + 'static;

    fn create(&mut self, options: EngineOptions) -> Result<Self::Engine, Self::Error>;
}
