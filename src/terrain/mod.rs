use crate::errors::{MapprError, MapprResult};
use crate::terrain::constants::MAX_GRID_DIMENSION;
use serde::Serialize;

pub mod biomes;
pub mod constants;
pub mod coordinates;

pub use biomes::{HeightBand, Palette, TerrainId};
pub use coordinates::Cell;

/// Per-cell normalized heights for one generation cycle.
///
/// Fields are private so every instance has passed `new`: the buffer matches
/// the extent and every value lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightMap {
    width: u32,
    height: u32,
    values: Vec<f32>, // Flattened 2D array (row-major)
}

/// Terrain categories derived from a height map; read-only once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<TerrainId>, // Flattened 2D array (row-major)
}

/// Reject empty or oversized extents before allocating buffers for them
pub fn validate_dimensions(width: u32, height: u32) -> MapprResult<()> {
    if width == 0 || height == 0 || width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(MapprError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn check_buffer_len(width: u32, height: u32, len: usize) -> MapprResult<()> {
    let expected = width as usize * height as usize;
    if len != expected {
        return Err(MapprError::InvalidTerrainData {
            reason: format!(
                "Buffer size {len} does not match grid dimensions {width}x{height} (expected {expected})"
            ),
        });
    }
    Ok(())
}

impl HeightMap {
    /// Create a height map, checking the buffer size and the `[0, 1]` range
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> MapprResult<Self> {
        validate_dimensions(width, height)?;
        check_buffer_len(width, height, values.len())?;

        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(MapprError::InvalidTerrainData {
                reason: format!(
                    "Height {value} at {} is outside [0, 1]",
                    Cell::from_index(index, width)
                ),
            });
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, cell: Cell) -> Option<f32> {
        if !cell.is_within(self.width, self.height) {
            return None;
        }
        self.values.get(cell.index(self.width)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TerrainGrid {
    pub fn new(width: u32, height: u32, cells: Vec<TerrainId>) -> MapprResult<Self> {
        validate_dimensions(width, height)?;
        check_buffer_len(width, height, cells.len())?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Classify every height; the grid is a pure function of the map
    pub fn from_height_map(height_map: &HeightMap) -> Self {
        Self {
            width: height_map.width,
            height: height_map.height,
            cells: height_map
                .values
                .iter()
                .map(|&h| TerrainId::classify(h))
                .collect(),
        }
    }

    /// Create a grid covered by a single terrain category
    pub fn uniform(width: u32, height: u32, terrain: TerrainId) -> MapprResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![terrain; width as usize * height as usize],
        })
    }

    /// Parse one string per row, one glyph per cell (see `TerrainId::glyph`)
    pub fn from_glyph_rows<S: AsRef<str>>(rows: &[S]) -> MapprResult<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count()) as u32;
        validate_dimensions(width, height)?;

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() as u32 != width {
                return Err(MapprError::InvalidTerrainData {
                    reason: format!("Row {y} has {} cells, expected {width}", row.chars().count()),
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain =
                    TerrainId::from_glyph(glyph).ok_or_else(|| MapprError::InvalidTerrainData {
                        reason: format!("Unknown terrain glyph '{glyph}' at ({x}, {y})"),
                    })?;
                cells.push(terrain);
            }
        }

        Self::new(width, height, cells)
    }

    pub fn to_glyph_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|terrain| terrain.glyph()).collect())
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[TerrainId] {
        &self.cells
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.is_within(self.width, self.height)
    }

    pub fn get(&self, cell: Cell) -> Option<TerrainId> {
        if !self.contains(cell) {
            return None;
        }
        self.cells.get(cell.index(self.width)).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
