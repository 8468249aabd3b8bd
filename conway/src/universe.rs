// universe.rs - Toroidal Game of Life whose cells are readable as raw bytes
//
// Each generation is computed row by row: every row runs as its own task on a
// single-threaded runtime and yields between cells, the rows are then stitched
// back into the next grid.

use std::fmt;
use std::sync::Arc;

use fixedbitset::FixedBitSet;
use grid_display::{ConfigError, Encoding, Engine, EngineFactory, EngineOptions, GridDimensions};
use log::{debug, error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

use crate::patterns::{Pattern, GLIDER};

// Bit storage hands out its u32 blocks as bytes; the packed layout
// (cell i = bit i % 8 of byte i / 8) only holds in little-endian memory.
#[cfg(target_endian = "big")]
compile_error!("bit-per-cell universes need a little-endian target");

/// Side of the grid when no size is requested.
pub const DEFAULT_SIZE: u32 = 64;

/// Cells evaluated between cooperative yields inside a row task.
const CELLS_PER_YIELD: usize = 32;

/// Byte values used by byte-per-cell storage.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cell {
    Dead = 0,
    Alive = 1,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Size(#[from] ConfigError),
    #[error("could not start the tick runtime")]
    Runtime(#[from] std::io::Error),
}

enum Cells {
    Bytes(Vec<u8>),
    Bits(FixedBitSet),
}

impl Cells {
    fn new(encoding: Encoding, len: usize) -> Self {
        match encoding {
            Encoding::BytePerCell => Cells::Bytes(vec![Cell::Dead as u8; len]),
            Encoding::BitPerCell => Cells::Bits(FixedBitSet::with_capacity(len)),
        }
    }

    fn get(&self, index: usize) -> bool {
        match self {
            Cells::Bytes(bytes) => bytes[index] != Cell::Dead as u8,
            Cells::Bits(bits) => bits[index],
        }
    }

    fn set(&mut self, index: usize, alive: bool) {
        match self {
            Cells::Bytes(bytes) => bytes[index] = if alive { Cell::Alive as u8 } else { Cell::Dead as u8 },
            Cells::Bits(bits) => bits.set(index, alive),
        }
    }

    fn clear(&mut self) {
        match self {
            Cells::Bytes(bytes) => bytes.fill(Cell::Dead as u8),
            Cells::Bits(bits) => bits.clear(),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Cells::Bytes(bytes) => bytes.as_slice(),
            Cells::Bits(bits) => bytemuck::cast_slice(bits.as_slice()),
        }
    }

    fn encoding(&self) -> Encoding {
        match self {
            Cells::Bytes(_) => Encoding::BytePerCell,
            Cells::Bits(_) => Encoding::BitPerCell,
        }
    }
}

pub struct Universe {
    width: u32,
    height: u32,
    cells: Cells,
    generation: u64,
    runtime: Runtime,
}

impl Universe {
    /// Random soup (or an empty grid) seeded from the OS.
    pub fn new(options: EngineOptions, encoding: Encoding) -> Result<Self, EngineError> {
        Self::build(options, encoding, StdRng::from_entropy())
    }

    /// Same as [`Universe::new`] with a reproducible soup.
    pub fn with_seed(options: EngineOptions, encoding: Encoding, seed: u64) -> Result<Self, EngineError> {
        Self::build(options, encoding, StdRng::seed_from_u64(seed))
    }

    fn build(options: EngineOptions, encoding: Encoding, mut rng: StdRng) -> Result<Self, EngineError> {
        let GridDimensions { width, height } = options
            .size
            .unwrap_or(GridDimensions::square(DEFAULT_SIZE))
            .validate()?;

        let runtime = Builder::new_current_thread().build()?;
        let size = width as usize * height as usize;
        let mut cells = Cells::new(encoding, size);
        if !options.empty {
            for i in 0..size {
                cells.set(i, rng.gen_bool(0.5));
            }
        }

        debug!("universe {width}x{height} ({encoding}, empty: {})", options.empty);
        Ok(Universe { width, height, cells, generation: 0, runtime })
    }

    fn get_index(&self, row: u32, column: u32) -> usize {
        row as usize * self.width as usize + column as usize
    }

    pub fn is_alive(&self, row: u32, column: u32) -> bool {
        row < self.height && column < self.width && self.cells.get(self.get_index(row, column))
    }

    /// Generations since construction or the last [`Universe::clear`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        (0..self.width as usize * self.height as usize)
            .filter(|&i| self.cells.get(i))
            .count()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.generation = 0;
    }

    /// Bring `pattern` to life with its top-left corner at `(row, column)`,
    /// wrapping around the edges.
    pub fn stamp(&mut self, pattern: &Pattern, row: u32, column: u32) {
        let (height, width) = (self.height as usize, self.width as usize);
        for &(dr, dc) in pattern.cells {
            let r = (row as usize + dr as usize) % height;
            let c = (column as usize + dc as usize) % width;
            self.cells.set(r * width + c, true);
        }
    }

    /// Clear the grid and place `pattern` in the middle.
    pub fn apply_pattern(&mut self, pattern: &Pattern) {
        self.clear();
        let (rows, cols) = pattern.extent();
        let row = self.height.saturating_sub(rows) / 2;
        let column = self.width.saturating_sub(cols) / 2;
        self.stamp(pattern, row, column);
    }

    fn snapshot(&self) -> Arc<[bool]> {
        (0..self.width as usize * self.height as usize)
            .map(|i| self.cells.get(i))
            .collect()
    }
}

/// Row task: next state of every cell in `row_index`.
async fn process_row(row_index: u32, width: u32, height: u32, current: Arc<[bool]>) -> (u32, Vec<bool>) {
    let (row, width, height) = (row_index as usize, width as usize, height as usize);
    let mut next_row = Vec::with_capacity(width);
    for col in 0..width {
        let mut count = 0;
        for delta_row in [height - 1, 0, 1] {
            for delta_col in [width - 1, 0, 1] {
                if delta_row == 0 && delta_col == 0 {
                    continue;
                }
                let neighbor_row = (row + delta_row) % height;
                let neighbor_col = (col + delta_col) % width;
                if current[neighbor_row * width + neighbor_col] {
                    count += 1;
                }
            }
        }

        let alive = current[row * width + col];
        let next_state = match (alive, count) {
            (true, 2) | (true, 3) => true, // Survival
            (false, 3) => true,            // Birth
            _ => false,                    // Death or stays dead
        };
        next_row.push(next_state);

        if (col + 1) % CELLS_PER_YIELD == 0 {
            tokio::task::yield_now().await;
        }
    }
    (row_index, next_row)
}

impl Engine for Universe {
    fn tick(&mut self) {
        let current = self.snapshot();
        let (width, height) = (self.width, self.height);

        let rows = self.runtime.block_on(async move {
            let handles: Vec<_> = (0..height)
                .map(|row| tokio::spawn(process_row(row, width, height, Arc::clone(&current))))
                .collect();
            let mut rows = Vec::with_capacity(handles.len());
            for handle in handles {
                rows.push(handle.await);
            }
            rows
        });

        for result in rows {
            match result {
                Ok((row, next_row)) => {
                    for (col, alive) in next_row.into_iter().enumerate() {
                        let idx = self.get_index(row, col as u32);
                        self.cells.set(idx, alive);
                    }
                }
                Err(err) => error!("row task failed, keeping its previous state: {err}"),
            }
        }
        self.generation += 1;
    }

    fn toggle_cell(&mut self, col: u32, row: u32) {
        if row >= self.height || col >= self.width {
            debug!("toggle outside grid at ({row}, {col})");
            return;
        }
        let idx = self.get_index(row, col);
        let alive = self.cells.get(idx);
        self.cells.set(idx, !alive);
    }

    fn set_glider(&mut self, col: u32, row: u32) {
        if row >= self.height || col >= self.width {
            debug!("glider outside grid at ({row}, {col})");
            return;
        }
        self.stamp(&GLIDER, row, col);
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn cells(&self) -> &[u8] {
        self.cells.as_bytes()
    }

    fn encoding(&self) -> Encoding {
        self.cells.encoding()
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let symbol = if self.is_alive(row, col) { '◼' } else { '◻' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builds [`Universe`]s with a fixed encoding, optionally from a fixed seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniverseFactory {
    pub encoding: Encoding,
    pub seed: Option<u64>,
}

impl UniverseFactory {
    pub fn new(encoding: Encoding, seed: Option<u64>) -> Self {
        Self { encoding, seed }
    }
}

impl EngineFactory for UniverseFactory {
    type Engine = Universe;
    type Error = EngineError;

    fn create(&mut self, options: EngineOptions) -> Result<Universe, EngineError> {
        match self.seed {
            Some(seed) => Universe::with_seed(options, self.encoding, seed),
            None => Universe::new(options, self.encoding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PATTERNS;
    use grid_display::decode;

    const ENCODINGS: [Encoding; 2] = [Encoding::BytePerCell, Encoding::BitPerCell];

    fn empty(width: u32, height: u32, encoding: Encoding) -> Universe {
        let options = EngineOptions { empty: true, size: Some(GridDimensions::new(width, height)) };
        Universe::new(options, encoding).unwrap()
    }

    fn alive_cells(universe: &Universe) -> Vec<(u32, u32)> {
        let states = decode(universe.cells(), universe.dims(), universe.encoding()).unwrap();
        states
            .iter()
            .filter(|&(_, _, alive)| alive)
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    #[test]
    fn blinker_oscillates() {
        for encoding in ENCODINGS {
            let mut universe = empty(5, 5, encoding);
            universe.apply_pattern(&PATTERNS[1]);
            assert_eq!(alive_cells(&universe), vec![(2, 1), (2, 2), (2, 3)]);

            universe.tick();
            assert_eq!(alive_cells(&universe), vec![(1, 2), (2, 2), (3, 2)], "{encoding}");

            universe.tick();
            assert_eq!(alive_cells(&universe), vec![(2, 1), (2, 2), (2, 3)], "{encoding}");
            assert_eq!(universe.generation(), 2);
        }
    }

    #[test]
    fn glider_travels_diagonally() {
        for encoding in ENCODINGS {
            let mut universe = empty(10, 10, encoding);
            universe.set_glider(2, 2);
            let start = alive_cells(&universe);
            for _ in 0..4 {
                universe.tick();
            }
            let moved: Vec<_> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
            assert_eq!(alive_cells(&universe), moved, "{encoding}");
        }
    }

    #[test]
    fn glider_wraps_at_edges() {
        let mut universe = empty(6, 6, Encoding::BitPerCell);
        universe.set_glider(5, 5);
        assert_eq!(universe.population(), 5);
        assert!(universe.is_alive(5, 0));
        assert!(universe.is_alive(1, 5));
    }

    #[test]
    fn toggle_flips_and_ignores_out_of_range() {
        for encoding in ENCODINGS {
            let mut universe = empty(4, 3, encoding);
            universe.toggle_cell(3, 2);
            assert!(universe.is_alive(2, 3));
            universe.toggle_cell(3, 2);
            assert!(!universe.is_alive(2, 3));

            universe.toggle_cell(4, 0);
            universe.toggle_cell(0, 3);
            assert_eq!(universe.population(), 0);
        }
    }

    #[test]
    fn buffer_lengths_match_encoding() {
        let bytes = empty(10, 5, Encoding::BytePerCell);
        assert_eq!(bytes.cells().len(), 50);

        let bits = empty(10, 5, Encoding::BitPerCell);
        assert!(bits.cells().len() >= 7);
        assert_eq!(bits.cells().len() % 4, 0);
    }

    #[test]
    fn bit_storage_is_lsb_first() {
        let mut universe = empty(8, 2, Encoding::BitPerCell);
        universe.toggle_cell(3, 0);
        universe.toggle_cell(1, 1);
        assert_eq!(universe.cells()[0], 1 << 3);
        assert_eq!(universe.cells()[1], 1 << 1);
    }

    #[test]
    fn seeded_soups_repeat() {
        let options = EngineOptions { empty: false, size: Some(GridDimensions::square(16)) };
        let a = Universe::with_seed(options, Encoding::BytePerCell, 7).unwrap();
        let b = Universe::with_seed(options, Encoding::BytePerCell, 7).unwrap();
        assert_eq!(a.cells(), b.cells());
        assert!(a.population() > 0);
    }

    #[test]
    fn default_size_and_empty_grid_error() {
        let universe = Universe::new(EngineOptions::default(), Encoding::BitPerCell).unwrap();
        assert_eq!((universe.width(), universe.height()), (DEFAULT_SIZE, DEFAULT_SIZE));

        let options = EngineOptions { empty: true, size: Some(GridDimensions::new(0, 4)) };
        assert!(matches!(
            Universe::new(options, Encoding::BytePerCell),
            Err(EngineError::Size(ConfigError::GridOutOfRange { width: 0, height: 4 }))
        ));

        let options = EngineOptions { empty: true, size: Some(GridDimensions::new(70_000, 70_000)) };
        assert!(matches!(Universe::new(options, Encoding::BitPerCell), Err(EngineError::Size(_))));
    }

    #[test]
    fn far_corner_of_largest_grid() {
        let side = grid_display::MAX_GRID_SIDE;
        let mut universe = empty(side, side, Encoding::BitPerCell);
        universe.toggle_cell(side - 1, side - 1);
        assert!(universe.is_alive(side - 1, side - 1));
        universe.set_glider(side - 1, side - 1);
        assert_eq!(universe.population(), 6);
    }

    #[test]
    fn display_draws_rows() {
        let mut universe = empty(3, 2, Encoding::BytePerCell);
        universe.toggle_cell(1, 0);
        assert_eq!(universe.to_string(), "◻◼◻\n◻◻◻\n");
    }

    #[test]
    fn factory_uses_its_encoding() {
        let mut factory = UniverseFactory::new(Encoding::BytePerCell, Some(1));
        let universe = factory
            .create(EngineOptions { empty: true, size: Some(GridDimensions::new(3, 3)) })
            .unwrap();
        assert_eq!(universe.encoding(), Encoding::BytePerCell);
        assert_eq!(universe.population(), 0);
    }
}
