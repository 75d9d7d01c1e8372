use crate::config::NoiseConfig;
use crate::config::range_types::{BaseFrequency, ContrastGain, ZoomFactor};
use crate::errors::MapprResult;
use crate::terrain::constants::*;
use crate::terrain::{HeightMap, TerrainGrid, TerrainId, validate_dimensions};
use noise::{NoiseFn, Perlin};
use tracing::debug;

/// Fractal noise parameters
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseSettings {
    pub zoom_factor: f64,
    pub base_frequency: f64,
    pub octaves: u32,
    pub persistence: f64, // amplitude multiplier per octave
    pub lacunarity: f64,  // frequency multiplier per octave
    pub contrast: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            base_frequency: DEFAULT_BASE_FREQUENCY,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl From<&NoiseConfig> for NoiseSettings {
    fn from(config: &NoiseConfig) -> Self {
        Self {
            zoom_factor: config.zoom_factor.get(),
            base_frequency: config.base_frequency.get(),
            octaves: config.octaves.max(1),
            persistence: config.persistence,
            lacunarity: config.lacunarity,
            contrast: config.contrast.get(),
        }
    }
}

/// Main terrain generator struct
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    pub seed: u32,
    pub settings: NoiseSettings,
}

impl TerrainGenerator {
    /// Create a new terrain generator
    pub fn new(seed: u32, settings: NoiseSettings) -> Self {
        Self { seed, settings }
    }

    /// Generate a height map; identical (width, height, seed, settings) always give identical output
    pub fn generate(&self, width: u32, height: u32) -> MapprResult<HeightMap> {
        validate_dimensions(width, height)?;

        let perlin = Perlin::new(self.seed);
        let total_points = width as usize * height as usize;
        let mut values = Vec::with_capacity(total_points);

        for y in 0..height {
            for x in 0..width {
                values.push(self.sample(&perlin, x, y));
            }
        }

        debug!(
            "Generated {width}x{height} height map (seed {}, {} octaves)",
            self.seed, self.settings.octaves
        );

        HeightMap::new(width, height, values)
    }

    /// Generate heights and classify them in one step
    pub fn generate_terrain(&self, width: u32, height: u32) -> MapprResult<(HeightMap, TerrainGrid)> {
        let height_map = self.generate(width, height)?;
        let terrain = TerrainGrid::from_height_map(&height_map);
        Ok((height_map, terrain))
    }

    /// Sample the contrast-adjusted fractal sum for one cell
    fn sample(&self, perlin: &Perlin, x: u32, y: u32) -> f32 {
        let settings = &self.settings;
        let scale = settings.base_frequency / settings.zoom_factor;
        let nx = f64::from(x) * scale;
        let ny = f64::from(y) * scale;

        let mut sum = 0.0;
        let mut amplitude_sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..settings.octaves.max(1) {
            sum += unit_noise(perlin, nx * frequency, ny * frequency) * amplitude;
            amplitude_sum += amplitude;
            amplitude *= settings.persistence;
            frequency *= settings.lacunarity;
        }

        let fbm = sum / amplitude_sum;
        (0.5 + (fbm - 0.5) * settings.contrast).clamp(0.0, 1.0) as f32
    }
}

/// Perlin output remapped from roughly [-1, 1] into [0, 1]
fn unit_noise(perlin: &Perlin, x: f64, y: f64) -> f64 {
    (perlin.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Get a predefined terrain preset
pub fn get_terrain_preset(name: &str, seed: Option<u32>) -> Option<TerrainGenerator> {
    let seed = seed.unwrap_or_else(rand::random);

    match name {
        "default" => Some(TerrainGenerator::new(seed, NoiseSettings::default())),
        "archipelago" => Some(TerrainGenerator::new(
            seed,
            NoiseSettings {
                zoom_factor: ZoomFactor::new(60.0).get(),
                contrast: ContrastGain::new(1.6).get(),
                ..NoiseSettings::default()
            },
        )),
        "highlands" => Some(TerrainGenerator::new(
            seed,
            NoiseSettings {
                base_frequency: BaseFrequency::new(1.1).get(),
                octaves: 5,
                contrast: ContrastGain::new(1.2).get(),
                ..NoiseSettings::default()
            },
        )),
        _ => None,
    }
}

/// Share of cells in the grid that are impassable water, in [0, 1]
pub fn water_fraction(terrain: &TerrainGrid) -> f32 {
    if terrain.cells().is_empty() {
        return 0.0;
    }
    let water = terrain
        .cells()
        .iter()
        .filter(|&&t| t == TerrainId::Water)
        .count();
    water as f32 / terrain.cells().len() as f32
}
