use crate::terrain::constants::*;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Noise zoom factor constrained to [1.0, 10000.0]; larger values give broader features
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct ZoomFactor(f64);

impl ZoomFactor {
    const MIN: f64 = 1.0;
    const MAX: f64 = 10_000.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ZoomFactor {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_FACTOR)
    }
}

/// A base sampling frequency constrained to [0.01, 10.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct BaseFrequency(f64);

impl BaseFrequency {
    const MIN: f64 = 0.01;
    const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for BaseFrequency {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_FREQUENCY)
    }
}

/// Contrast gain applied around 0.5, constrained to [0.1, 4.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct ContrastGain(f64);

impl ContrastGain {
    const MIN: f64 = 0.1;
    const MAX: f64 = 4.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ContrastGain {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRAST)
    }
}

/// Cardinal spline tension constrained to [0.0, 1.0]; 0.5 is Catmull-Rom
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct SplineTension(f32);

impl SplineTension {
    const MIN: f32 = 0.0;
    const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for SplineTension {
    fn default() -> Self {
        Self::new(DEFAULT_SPLINE_TENSION)
    }
}

/// Ground distance covered by one cell, constrained to [0.001, 100.0] km
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct CellSizeKm(f32);

impl CellSizeKm {
    const MIN: f32 = 0.001;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for CellSizeKm {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE_KM)
    }
}
