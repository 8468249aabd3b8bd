// lib.rs - Game of Life universe driven through the grid_display engine traits

pub mod patterns;
pub mod universe;

pub use patterns::{Pattern, GLIDER, PATTERNS};
pub use universe::{Cell, EngineError, Universe, UniverseFactory, DEFAULT_SIZE};
