//! Constants for terrain synthesis and routing

/// Default values for noise sampling
pub const DEFAULT_ZOOM_FACTOR: f64 = 100.0;
pub const DEFAULT_BASE_FREQUENCY: f64 = 0.7;
pub const DEFAULT_OCTAVES: u32 = 4;
pub const DEFAULT_PERSISTENCE: f64 = 0.5;
pub const DEFAULT_LACUNARITY: f64 = 2.0;
pub const DEFAULT_CONTRAST: f64 = 1.35;

/// Default grid extent in cells
pub const DEFAULT_GRID_WIDTH: u32 = 700;
pub const DEFAULT_GRID_HEIGHT: u32 = 700;
pub const MAX_GRID_DIMENSION: u32 = 4096;

/// Lower edge of the lowest band; anything below still counts as water
pub const WATER_FLOOR: f32 = 0.20;
pub const SAND_MIN_HEIGHT: f32 = 0.36;
pub const GRASS_MIN_HEIGHT: f32 = 0.44;
pub const TREES_MIN_HEIGHT: f32 = 0.58;
pub const MOUNTAIN_MIN_HEIGHT: f32 = 0.72;
pub const SNOW_MIN_HEIGHT: f32 = 0.84;

/// Smoothing defaults
pub const DEFAULT_MAX_VERTICES: usize = 240;
pub const DEFAULT_SMOOTHING_ITERATIONS: u32 = 3;
pub const DEFAULT_SAMPLES_PER_SEGMENT: u32 = 8;
pub const DEFAULT_SPLINE_TENSION: f32 = 0.5;

/// Pace estimation defaults
pub const DEFAULT_CELL_SIZE_KM: f32 = 0.05;
pub const DEFAULT_BASE_MINUTES_PER_KM: f32 = 12.0;
