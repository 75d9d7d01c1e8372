use crate::terrain::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete terrain categories, declared in order of increasing elevation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TerrainId {
    Water,
    Sand,
    Grass,
    Trees,
    Mountain,
    Snow,
}

/// Half-open height interval `[min, max)` owned by one terrain category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    pub min: f32,
    pub max: f32,
}

/// Legend gradient for a terrain category, as `#rrggbb` strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub from: &'static str,
    pub to: &'static str,
}

impl TerrainId {
    pub const ALL: [TerrainId; 6] = [
        TerrainId::Water,
        TerrainId::Sand,
        TerrainId::Grass,
        TerrainId::Trees,
        TerrainId::Mountain,
        TerrainId::Snow,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Map a normalized height to its terrain category.
    ///
    /// Total over `[0, 1]`: heights below the water floor are still water and
    /// the snow band is open-ended upward.
    pub fn classify(height: f32) -> TerrainId {
        if height < SAND_MIN_HEIGHT {
            TerrainId::Water
        } else if height < GRASS_MIN_HEIGHT {
            TerrainId::Sand
        } else if height < TREES_MIN_HEIGHT {
            TerrainId::Grass
        } else if height < MOUNTAIN_MIN_HEIGHT {
            TerrainId::Trees
        } else if height < SNOW_MIN_HEIGHT {
            TerrainId::Mountain
        } else {
            TerrainId::Snow
        }
    }

    /// Position in `ALL`, usable as an array index
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn band(self) -> HeightBand {
        let (min, max) = match self {
            TerrainId::Water => (WATER_FLOOR, SAND_MIN_HEIGHT),
            TerrainId::Sand => (SAND_MIN_HEIGHT, GRASS_MIN_HEIGHT),
            TerrainId::Grass => (GRASS_MIN_HEIGHT, TREES_MIN_HEIGHT),
            TerrainId::Trees => (TREES_MIN_HEIGHT, MOUNTAIN_MIN_HEIGHT),
            TerrainId::Mountain => (MOUNTAIN_MIN_HEIGHT, SNOW_MIN_HEIGHT),
            TerrainId::Snow => (SNOW_MIN_HEIGHT, 1.0),
        };
        HeightBand { min, max }
    }

    /// Cost of stepping onto this terrain; water has none because it is impassable
    pub fn movement_cost(self) -> Option<u32> {
        match self {
            TerrainId::Water => None,
            TerrainId::Sand => Some(2),
            TerrainId::Grass => Some(1),
            TerrainId::Trees => Some(3),
            TerrainId::Mountain => Some(4),
            TerrainId::Snow => Some(5),
        }
    }

    pub fn is_passable(self) -> bool {
        self.movement_cost().is_some()
    }

    /// Relative travel time per kilometre used for pace estimates
    pub fn time_per_km(self) -> f32 {
        self.movement_cost().map_or(0.0, |cost| cost as f32)
    }

    pub fn key(self) -> &'static str {
        match self {
            TerrainId::Water => "water",
            TerrainId::Sand => "sand",
            TerrainId::Grass => "grass",
            TerrainId::Trees => "trees",
            TerrainId::Mountain => "mountain",
            TerrainId::Snow => "snow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TerrainId::Water => "Water",
            TerrainId::Sand => "Sand",
            TerrainId::Grass => "Grass",
            TerrainId::Trees => "Trees",
            TerrainId::Mountain => "Mountain",
            TerrainId::Snow => "Snow",
        }
    }

    pub fn palette(self) -> Palette {
        let (from, to) = match self {
            TerrainId::Water => ("#1eb0fb", "#28ffff"),
            TerrainId::Sand => ("#d7c08c", "#f5e9bb"),
            TerrainId::Grass => ("#41b45a", "#88e277"),
            TerrainId::Trees => ("#0f6e44", "#1f8c50"),
            TerrainId::Mountain => ("#64605c", "#a3988e"),
            TerrainId::Snow => ("#dce8f0", "#ffffff"),
        };
        Palette { from, to }
    }

    /// Single-character map symbol
    pub fn glyph(self) -> char {
        match self {
            TerrainId::Water => '~',
            TerrainId::Sand => '.',
            TerrainId::Grass => ',',
            TerrainId::Trees => 'T',
            TerrainId::Mountain => '^',
            TerrainId::Snow => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<TerrainId> {
        Self::ALL.into_iter().find(|terrain| terrain.glyph() == glyph)
    }
}

impl fmt::Display for TerrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl HeightBand {
    pub fn contains(&self, height: f32) -> bool {
        height >= self.min && height < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(TerrainId::classify(0.0), TerrainId::Water);
        assert_eq!(TerrainId::classify(0.20), TerrainId::Water);
        assert_eq!(TerrainId::classify(0.3599), TerrainId::Water);
        assert_eq!(TerrainId::classify(0.36), TerrainId::Sand);
        assert_eq!(TerrainId::classify(0.44), TerrainId::Grass);
        assert_eq!(TerrainId::classify(0.58), TerrainId::Trees);
        assert_eq!(TerrainId::classify(0.72), TerrainId::Mountain);
        assert_eq!(TerrainId::classify(0.84), TerrainId::Snow);
        assert_eq!(TerrainId::classify(0.95), TerrainId::Snow);
        assert_eq!(TerrainId::classify(1.0), TerrainId::Snow);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let mut previous = TerrainId::classify(0.0);
        for step in 0..=1000 {
            let height = step as f32 / 1000.0;
            let current = TerrainId::classify(height);
            assert!(
                current >= previous,
                "height {height} classified {current:?} after {previous:?}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_bands_are_contiguous() {
        for pair in TerrainId::ALL.windows(2) {
            assert_eq!(pair[0].band().max, pair[1].band().min);
        }
        for terrain in TerrainId::ALL {
            let band = terrain.band();
            assert_eq!(TerrainId::classify(band.min), terrain);
            assert!(band.contains(band.min));
        }
    }

    #[test]
    fn test_movement_costs() {
        assert_eq!(TerrainId::Water.movement_cost(), None);
        assert_eq!(TerrainId::Grass.movement_cost(), Some(1));
        assert_eq!(TerrainId::Sand.movement_cost(), Some(2));
        assert_eq!(TerrainId::Trees.movement_cost(), Some(3));
        assert_eq!(TerrainId::Mountain.movement_cost(), Some(4));
        assert_eq!(TerrainId::Snow.movement_cost(), Some(5));
        assert!(!TerrainId::Water.is_passable());
        assert_eq!(TerrainId::Water.time_per_km(), 0.0);
    }

    #[test]
    fn test_glyphs_are_unique() {
        for terrain in TerrainId::ALL {
            assert_eq!(TerrainId::from_glyph(terrain.glyph()), Some(terrain));
        }
        assert_eq!(TerrainId::from_glyph('x'), None);
    }

    #[test]
    fn test_ordinals_follow_elevation() {
        for (index, terrain) in TerrainId::ALL.iter().enumerate() {
            assert_eq!(terrain.ordinal(), index);
        }
    }
}
