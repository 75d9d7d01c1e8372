use crate::errors::{MapprError, MapprResult, describe_validation};
use crate::terrain::constants::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use validator::Validate;

pub mod range_types;

use range_types::*;

#[derive(Serialize, Deserialize, Clone, Debug, Default, Validate)]
#[serde(default)]
// NOTE: When adding new fields, give them a Default so partial config files keep loading
pub struct ExplorerConfig {
    #[validate(nested)]
    pub grid: GridSettings,
    #[validate(nested)]
    pub noise: NoiseConfig,
    #[validate(nested)]
    pub smoothing: SmoothingSettings,
    pub stats: StatsSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
#[serde(default)]
pub struct GridSettings {
    #[validate(range(min = 1, max = 4096))]
    pub width: u32,
    #[validate(range(min = 1, max = 4096))]
    pub height: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
#[serde(default)]
pub struct NoiseConfig {
    pub zoom_factor: ZoomFactor,
    pub base_frequency: BaseFrequency,
    #[validate(range(min = 1, max = 8))]
    pub octaves: u32,
    #[validate(range(min = 0.05, max = 0.95))]
    pub persistence: f64,
    #[validate(range(min = 1.1, max = 4.0))]
    pub lacunarity: f64,
    pub contrast: ContrastGain,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            zoom_factor: ZoomFactor::default(),
            base_frequency: BaseFrequency::default(),
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
            contrast: ContrastGain::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingKind {
    #[default]
    CornerCutting,
    CatmullRom,
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
#[serde(default)]
pub struct SmoothingSettings {
    #[validate(range(min = 2))]
    pub max_vertices: usize,
    pub strategy: SmoothingKind,
    #[validate(range(max = 8))]
    pub iterations: u32,
    #[validate(range(min = 1, max = 64))]
    pub samples_per_segment: u32,
    pub tension: SplineTension,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
            strategy: SmoothingKind::CornerCutting,
            iterations: DEFAULT_SMOOTHING_ITERATIONS,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            tension: SplineTension::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StatsSettings {
    pub cell_size_km: CellSizeKm,
    pub base_minutes_per_km: f32,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            cell_size_km: CellSizeKm::default(),
            base_minutes_per_km: DEFAULT_BASE_MINUTES_PER_KM,
        }
    }
}

impl ExplorerConfig {
    /// Re-apply newtype clamps; deserialized newtypes skip their constructors
    pub fn sanitized(mut self) -> Self {
        self.noise.zoom_factor = ZoomFactor::new(self.noise.zoom_factor.get());
        self.noise.base_frequency = BaseFrequency::new(self.noise.base_frequency.get());
        self.noise.contrast = ContrastGain::new(self.noise.contrast.get());
        self.smoothing.tension = SplineTension::new(self.smoothing.tension.get());
        self.stats.cell_size_km = CellSizeKm::new(self.stats.cell_size_km.get());
        self.stats.base_minutes_per_km = self.stats.base_minutes_per_km.max(0.0);
        self
    }

    /// Run field validation and report every failing field in one error
    pub fn check(&self) -> MapprResult<()> {
        self.check_finite()?;
        self.validate()
            .map_err(|errors| MapprError::ConfigValidationFailed {
                reason: describe_validation(&errors),
            })
    }

    /// Every float field must be finite; range checks and clamps do not catch NaN
    pub fn check_finite(&self) -> MapprResult<()> {
        let fields = [
            ("noise.zoom_factor", self.noise.zoom_factor.get()),
            ("noise.base_frequency", self.noise.base_frequency.get()),
            ("noise.persistence", self.noise.persistence),
            ("noise.lacunarity", self.noise.lacunarity),
            ("noise.contrast", self.noise.contrast.get()),
            ("smoothing.tension", f64::from(self.smoothing.tension.get())),
            ("stats.cell_size_km", f64::from(self.stats.cell_size_km.get())),
            (
                "stats.base_minutes_per_km",
                f64::from(self.stats.base_minutes_per_km),
            ),
        ];

        let bad: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| !value.is_finite())
            .map(|(name, _)| *name)
            .collect();
        if bad.is_empty() {
            return Ok(());
        }
        Err(MapprError::ConfigValidationFailed {
            reason: format!("{} must be finite", bad.join(", ")),
        })
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("bitmappr");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load the user config, falling back to defaults on any problem
pub fn load_config() -> ExplorerConfig {
    let Some(config_path) = get_config_path() else {
        debug!("No config directory available, using defaults");
        return ExplorerConfig::default();
    };

    if !config_path.exists() {
        return ExplorerConfig::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(err) => {
            warn!(
                "Ignoring config at {}: {err}; using defaults",
                config_path.display()
            );
            ExplorerConfig::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> MapprResult<ExplorerConfig> {
    if !path.exists() {
        return Err(MapprError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> MapprResult<ExplorerConfig> {
    let raw = toml::from_str::<ExplorerConfig>(contents)?;
    // Before sanitizing: clamping maps an infinity onto a bound
    raw.check_finite()?;
    let config = raw.sanitized();
    config.check()?;
    Ok(config)
}

pub fn save_config(config: &ExplorerConfig) -> MapprResult<()> {
    let config_path = get_config_path().ok_or(MapprError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)
}

pub fn save_config_to(config: &ExplorerConfig, path: &Path) -> MapprResult<()> {
    config.check()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
