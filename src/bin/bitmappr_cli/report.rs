use bitmappr::pathfinding::Path;
use bitmappr::session::{Advisory, Route, World};
use bitmappr::stats::BiomeMix;
use bitmappr::terrain::TerrainGrid;
use serde::Serialize;
use std::fmt;

const ROUTE_GLYPH: char = 'o';

/// Everything one CLI run reports, in a shape that serializes cleanly to JSON
#[derive(Serialize)]
pub struct Report<'a> {
    pub seed: u32,
    pub width: u32,
    pub height: u32,
    pub biome_mix: &'a BiomeMix,
    pub route: Option<&'a Route>,
    pub advisories: Vec<AdvisoryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct AdvisoryReport {
    pub kind: Advisory,
    pub message: String,
}

impl From<Advisory> for AdvisoryReport {
    fn from(kind: Advisory) -> Self {
        Self {
            kind,
            message: kind.to_string(),
        }
    }
}

impl<'a> Report<'a> {
    pub fn new(world: &'a World, route: Option<&'a Route>, advisories: &[Advisory], with_map: bool) -> Self {
        Self {
            seed: world.seed,
            width: world.width(),
            height: world.height(),
            biome_mix: &world.biome_mix,
            route,
            advisories: advisories.iter().copied().map(AdvisoryReport::from).collect(),
            map: with_map.then(|| render_map(&world.terrain, route.map(|r| &r.path))),
        }
    }
}

/// Glyph rows with the route drawn over the terrain
pub fn render_map(terrain: &TerrainGrid, path: Option<&Path>) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = terrain
        .to_glyph_rows()
        .into_iter()
        .map(|row| row.chars().collect())
        .collect();

    for cell in path.map(Path::cells).unwrap_or_default() {
        if let Some(glyph) = rows
            .get_mut(cell.y as usize)
            .and_then(|row| row.get_mut(cell.x as usize))
        {
            *glyph = ROUTE_GLYPH;
        }
    }

    rows.into_iter().map(String::from_iter).collect()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "World {}x{} (seed {})", self.width, self.height, self.seed)?;
        writeln!(f, "\nBiome mix:")?;
        for share in self.biome_mix.iter() {
            writeln!(f, "  {:<9} {:>6}", share.terrain.label(), share.to_string())?;
        }

        for advisory in &self.advisories {
            writeln!(f, "\n{}", advisory.message)?;
        }

        if let Some(route) = self.route.filter(|route| route.found()) {
            let summary = &route.summary;
            writeln!(f, "\nRoute {} -> {}", route.start, route.goal)?;
            writeln!(f, "  Length: {} cells", summary.length)?;
            writeln!(f, "  Cost: {}", summary.total_cost)?;
            writeln!(
                f,
                "  Distance: {:.2} km, about {:.0} min ({:.1} min/km)",
                summary.pace.distance_km, summary.pace.minutes, summary.pace.minutes_per_km
            )?;
            let crossed: Vec<String> = summary
                .per_biome_cell_counts
                .iter()
                .filter(|&(_, count)| count > 0)
                .map(|(terrain, count)| format!("{} {count}", terrain.key()))
                .collect();
            writeln!(f, "  Terrain crossed: {}", crossed.join(", "))?;
            writeln!(f, "  Smoothed vertices: {}", route.smoothed.len())?;
        }

        if let Some(map) = &self.map {
            writeln!(f)?;
            for row in map {
                writeln!(f, "{row}")?;
            }
        }

        Ok(())
    }
}
