// lib.rs - Render, animation and input core for a packed cell grid
//
// The grid itself lives in an engine that owns its memory; this crate only
// borrows that memory once per frame, decodes it and paints it.

pub mod config;
pub mod decoder;
pub mod engine;
pub mod fps;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod surface;

pub use config::{
    ConfigError, GridDimensions, Palette, RateConfig, RenderConfig, MAX_CELL_SIZE, MAX_GRID_SIDE, MAX_RENDERS_PER_SECOND,
};
pub use decoder::{decode, CellStates, DecodeError, Encoding};
pub use engine::{Engine, EngineFactory, EngineOptions};
pub use fps::{FpsMeter, FpsStats};
pub use input::{map_to_cell, CellCoord};
pub use render::{draw_cells, draw_grid, surface_size};
pub use scheduler::{
    skip_count, AnimationScheduler, ClickAction, FrameHandle, FrameHost, FrameOutcome, ResetError, SchedulerConfig,
};
pub use surface::{DrawCommand, PixelSurface, RecordingSurface, Surface};
