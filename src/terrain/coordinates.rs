use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinates, row-major with `y` selecting the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Convert raw (possibly negative) click coordinates, returning None if out of bounds
    pub fn from_signed(x: i64, y: i64, width: u32, height: u32) -> Option<Self> {
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return None;
        }
        Some(Self::new(x as u32, y as u32))
    }

    /// Rebuild a cell from its row-major index
    pub fn from_index(index: usize, width: u32) -> Self {
        let width = width as usize;
        Self::new((index % width) as u32, (index / width) as u32)
    }

    /// Row-major index into a buffer of `width` columns
    pub fn index(&self, width: u32) -> usize {
        self.y as usize * width as usize + self.x as usize
    }

    /// Check if this cell lies inside a `width x height` grid
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }

    /// Calculate Manhattan distance to another cell (heuristic for A*)
    pub fn manhattan_distance(&self, other: &Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Offset by a signed step, returning None when the result leaves the grid
    pub fn offset(&self, dx: i32, dy: i32, width: u32, height: u32) -> Option<Cell> {
        Self::from_signed(
            i64::from(self.x) + i64::from(dx),
            i64::from(self.y) + i64::from(dy),
            width,
            height,
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
