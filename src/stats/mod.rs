use crate::config::StatsSettings;
use crate::pathfinding::{Path, path_cost};
use crate::terrain::{TerrainGrid, TerrainId};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Number of cells per terrain type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiomeCounts([u32; TerrainId::COUNT]);

impl BiomeCounts {
    pub fn tally<I: IntoIterator<Item = TerrainId>>(terrain: I) -> Self {
        let mut counts = Self::default();
        for id in terrain {
            counts.increment(id);
        }
        counts
    }

    pub fn increment(&mut self, terrain: TerrainId) {
        self.0[terrain.ordinal()] += 1;
    }

    pub fn get(&self, terrain: TerrainId) -> u32 {
        self.0[terrain.ordinal()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerrainId, u32)> + '_ {
        TerrainId::ALL.iter().map(|&id| (id, self.get(id)))
    }

    /// Most common terrain; ties go to the lower elevation band
    pub fn dominant(&self) -> Option<TerrainId> {
        self.iter()
            .filter(|&(_, count)| count > 0)
            .fold(None, |best: Option<(TerrainId, u32)>, (id, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((id, count)),
            })
            .map(|(id, _)| id)
    }
}

impl Serialize for BiomeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TerrainId::COUNT))?;
        for (id, count) in self.iter() {
            map.serialize_entry(id.key(), &count)?;
        }
        map.end()
    }
}

/// Share of the whole grid covered by each terrain type, in percent (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiomeMix {
    percents: [f32; TerrainId::COUNT],
}

/// One row of a biome mix, formatted the way the legend shows it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeShare {
    pub terrain: TerrainId,
    pub percent: f32,
}

impl BiomeMix {
    pub fn from_counts(counts: &BiomeCounts) -> Self {
        let total = counts.total();
        let mut percents = [0.0; TerrainId::COUNT];
        if total > 0 {
            for (id, count) in counts.iter() {
                percents[id.ordinal()] = count as f32 * 100.0 / total as f32;
            }
        }
        Self { percents }
    }

    pub fn get(&self, terrain: TerrainId) -> f32 {
        self.percents[terrain.ordinal()]
    }

    pub fn iter(&self) -> impl Iterator<Item = BiomeShare> + '_ {
        TerrainId::ALL.iter().map(|&terrain| BiomeShare {
            terrain,
            percent: self.get(terrain),
        })
    }

    /// Percentage of cells a route could cross
    pub fn land_percent(&self) -> f32 {
        self.iter()
            .filter(|share| share.terrain.is_passable())
            .map(|share| share.percent)
            .sum()
    }
}

impl Serialize for BiomeMix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TerrainId::COUNT))?;
        for share in self.iter() {
            map.serialize_entry(share.terrain.key(), &share.percent)?;
        }
        map.end()
    }
}

impl fmt::Display for BiomeShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.percent < 0.1 {
            write!(f, "<0.1%")
        } else {
            write!(f, "{:.1}%", self.percent)
        }
    }
}

/// Whole-grid terrain composition
pub fn biome_mix(terrain: &TerrainGrid) -> BiomeMix {
    BiomeMix::from_counts(&BiomeCounts::tally(terrain.cells().iter().copied()))
}

/// Travel time derived from the per-terrain pace table
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct PaceEstimate {
    pub distance_km: f32,
    pub minutes: f32,
    pub minutes_per_km: f32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct PathSummary {
    pub has_path: bool,
    /// Number of cells on the path, endpoints included
    pub length: usize,
    pub total_cost: u32,
    pub per_biome_cell_counts: BiomeCounts,
    pub pace: PaceEstimate,
}

impl PathSummary {
    /// The "no path" summary: every metric zeroed
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Summarize a path with the default pace table
pub fn summarize(path: &Path, terrain: &TerrainGrid) -> PathSummary {
    summarize_with(path, terrain, &StatsSettings::default())
}

pub fn summarize_with(path: &Path, terrain: &TerrainGrid, settings: &StatsSettings) -> PathSummary {
    if path.is_empty() {
        return PathSummary::empty();
    }

    let visited = path.cells().iter().filter_map(|&cell| terrain.get(cell));

    PathSummary {
        has_path: true,
        length: path.len(),
        total_cost: path_cost(path, terrain),
        per_biome_cell_counts: BiomeCounts::tally(visited),
        pace: estimate_pace(path, terrain, settings),
    }
}

pub fn estimate_pace(path: &Path, terrain: &TerrainGrid, settings: &StatsSettings) -> PaceEstimate {
    if path.len() < 2 {
        return PaceEstimate::default();
    }

    let cell_km = settings.cell_size_km.get();
    let distance_km = (path.len() - 1) as f32 * cell_km;
    let minutes: f32 = path
        .cells()
        .iter()
        .skip(1)
        .filter_map(|&cell| terrain.get(cell))
        .map(|id| id.time_per_km() * cell_km * settings.base_minutes_per_km)
        .sum();

    PaceEstimate {
        distance_km,
        minutes,
        minutes_per_km: if distance_km > 0.0 {
            minutes / distance_km
        } else {
            0.0
        },
    }
}
