// decoder.rs - Reads an engine's raw cell buffer as a grid of alive/dead states

use std::fmt;

use thiserror::Error;

use crate::config::GridDimensions;

/// How an engine packs its cells into bytes.
///
/// A session uses exactly one encoding; the decoder never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// One byte per cell. `0` is dead, anything else is alive.
    BytePerCell,
    /// One bit per cell, eight cells per byte, least significant bit first.
    #[default]
    BitPerCell,
}

impl Encoding {
    /// Smallest buffer that can hold `dims` under this encoding.
    pub fn required_len(self, dims: GridDimensions) -> usize {
        let cells = dims.cell_count();
        match self {
            Encoding::BytePerCell => cells,
            Encoding::BitPerCell => cells.div_ceil(8),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::BytePerCell => write!(f, "byte-per-cell"),
            Encoding::BitPerCell => write!(f, "bit-per-cell"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{encoding} buffer too short: need {required} bytes, got {actual}")]
    BufferTooShort {
        encoding: Encoding,
        required: usize,
        actual: usize,
    },
}

/// Decoded alive/dead flags, row-major, `width * height` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStates {
    dims: GridDimensions,
    alive: Vec<bool>,
}

impl CellStates {
    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    pub fn is_alive(&self, index: usize) -> bool {
        self.alive.get(index).copied().unwrap_or(false)
    }

    pub fn get(&self, row: u32, col: u32) -> Option<bool> {
        if !self.dims.contains(row, col) {
            return None;
        }
        Some(self.alive[self.dims.index(row, col)])
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&alive| alive).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.alive
    }

    /// `(row, col, alive)` for every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, bool)> + '_ {
        let width = self.dims.width.max(1);
        self.alive
            .iter()
            .enumerate()
            .map(move |(i, &alive)| ((i as u32) / width, (i as u32) % width, alive))
    }
}

/// Decode `buffer` into per-cell states for a grid of `dims`.
///
/// The buffer is only borrowed for the duration of the call. Bytes past the
/// required length are ignored.
pub fn decode(buffer: &[u8], dims: GridDimensions, encoding: Encoding) -> Result<CellStates, DecodeError> {
    let required = encoding.required_len(dims);
    if buffer.len() < required {
        return Err(DecodeError::BufferTooShort {
            encoding,
            required,
            actual: buffer.len(),
        });
    }

    let count = dims.cell_count();
    let alive = match encoding {
        Encoding::BytePerCell => buffer[..count].iter().map(|&byte| byte != 0).collect(),
        Encoding::BitPerCell => (0..count).map(|i| (buffer[i >> 3] >> (i & 7)) & 1 == 1).collect(),
    };

    Ok(CellStates { dims, alive })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4x3 pattern used by both round trips:
    // . # . .
    // # . . #
    // . . # #
    const PATTERN: [bool; 12] = [
        false, true, false, false,
        true, false, false, true,
        false, false, true, true,
    ];

    fn dims() -> GridDimensions {
        GridDimensions::new(4, 3)
    }

    fn pack_bits(cells: &[bool]) -> Vec<u8> {
        let mut bytes = vec![0u8; cells.len().div_ceil(8)];
        for (i, &alive) in cells.iter().enumerate() {
            if alive {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        bytes
    }

    #[test]
    fn byte_per_cell_reproduces_pattern() {
        let buffer: Vec<u8> = PATTERN.iter().map(|&alive| alive as u8).collect();
        let states = decode(&buffer, dims(), Encoding::BytePerCell).unwrap();
        assert_eq!(states.as_slice(), &PATTERN);
        assert_eq!(states.alive_count(), 5);
    }

    #[test]
    fn bit_per_cell_reproduces_pattern() {
        let buffer = pack_bits(&PATTERN);
        assert_eq!(buffer.len(), 2);
        let states = decode(&buffer, dims(), Encoding::BitPerCell).unwrap();
        assert_eq!(states.as_slice(), &PATTERN);
    }

    #[test]
    fn any_nonzero_byte_is_alive() {
        let buffer = [0u8, 1, 2, 255];
        let states = decode(&buffer, GridDimensions::new(2, 2), Encoding::BytePerCell).unwrap();
        assert_eq!(states.as_slice(), &[false, true, true, true]);
    }

    #[test]
    fn single_bit_three_of_first_byte() {
        let mut buffer = vec![0u8; 8];
        buffer[0] = 1 << 3;
        let states = decode(&buffer, GridDimensions::new(8, 8), Encoding::BitPerCell).unwrap();
        for i in 0..64 {
            assert_eq!(states.is_alive(i), i == 3, "cell {i}");
        }
        assert_eq!(states.get(0, 3), Some(true));
    }

    #[test]
    fn short_buffers_are_rejected() {
        let err = decode(&[0u8; 11], dims(), Encoding::BytePerCell).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BufferTooShort {
                encoding: Encoding::BytePerCell,
                required: 12,
                actual: 11
            }
        );

        // 12 cells need two bytes when packed
        assert!(decode(&[0xFF], dims(), Encoding::BitPerCell).is_err());
    }

    #[test]
    fn longer_buffers_are_accepted() {
        let mut buffer = pack_bits(&PATTERN);
        buffer.extend_from_slice(&[0xFF; 6]);
        let states = decode(&buffer, dims(), Encoding::BitPerCell).unwrap();
        assert_eq!(states.len(), 12);
        assert_eq!(states.as_slice(), &PATTERN);
    }

    #[test]
    fn packed_length_rounds_up() {
        assert_eq!(Encoding::BitPerCell.required_len(GridDimensions::new(3, 3)), 2);
        assert_eq!(Encoding::BitPerCell.required_len(GridDimensions::new(8, 8)), 8);
        assert_eq!(Encoding::BytePerCell.required_len(GridDimensions::new(3, 3)), 9);
    }

    #[test]
    fn iter_yields_row_and_column() {
        let buffer: Vec<u8> = PATTERN.iter().map(|&alive| alive as u8).collect();
        let states = decode(&buffer, dims(), Encoding::BytePerCell).unwrap();
        let alive: Vec<(u32, u32)> = states
            .iter()
            .filter(|&(_, _, alive)| alive)
            .map(|(row, col, _)| (row, col))
            .collect();
        assert_eq!(alive, vec![(0, 1), (1, 0), (1, 3), (2, 2), (2, 3)]);
    }
}
