use crate::terrain::{Cell, TerrainGrid, TerrainId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod priority_queue;
pub mod smoothing;

pub use priority_queue::MinHeap;
pub use smoothing::{PathSmoother, Point, SmoothingStrategy};

/// Cardinal neighbour order used for every expansion: +x, -x, +y, -y
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Why a cell cannot be used as a route endpoint
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionError {
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Cell),
    #[error("cell {0} is water")]
    Water(Cell),
}

/// Ordered cells from start to goal inclusive; empty means "no path"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Every consecutive pair is exactly one cardinal step apart
    pub fn is_contiguous(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| pair[0].manhattan_distance(&pair[1]) == 1)
    }
}

/// Full result of one search, including diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Path,
    /// Sum of entry costs along the path, None when no path was found
    pub cost: Option<u32>,
    /// Nodes taken off the open set and expanded
    pub expanded: usize,
    /// Heap entries discarded because a cheaper copy had already been pushed
    pub stale_skipped: usize,
    pub rejected: Option<SelectionError>,
}

impl SearchOutcome {
    fn rejected(reason: SelectionError) -> Self {
        Self {
            rejected: Some(reason),
            ..Self::default()
        }
    }

    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Check that a cell is inside the grid and not water
pub fn check_endpoint(grid: &TerrainGrid, cell: Cell) -> Result<TerrainId, SelectionError> {
    match grid.get(cell) {
        None => Err(SelectionError::OutOfBounds(cell)),
        Some(TerrainId::Water) => Err(SelectionError::Water(cell)),
        Some(terrain) => Ok(terrain),
    }
}

/// Find the cheapest 4-connected route from `start` to `goal`.
///
/// Returns an empty path when either endpoint is water or off the grid, or
/// when no land route connects them.
pub fn find_path(start: Cell, goal: Cell, grid: &TerrainGrid) -> Path {
    find_path_detailed(start, goal, grid).path
}

/// A* with a Manhattan heuristic and a lazily-pruned binary heap.
pub fn find_path_detailed(start: Cell, goal: Cell, grid: &TerrainGrid) -> SearchOutcome {
    if let Err(reason) = check_endpoint(grid, start).and_then(|_| check_endpoint(grid, goal)) {
        debug!("Pathfinding rejected before search: {reason}");
        return SearchOutcome::rejected(reason);
    }

    let width = grid.width();
    let height = grid.height();
    let total_cells = grid.cell_count();

    let mut g_score = vec![u32::MAX; total_cells];
    let mut f_score = vec![u32::MAX; total_cells];
    let mut came_from: Vec<Option<usize>> = vec![None; total_cells];

    let start_index = start.index(width);
    let goal_index = goal.index(width);
    g_score[start_index] = 0;
    f_score[start_index] = start.manhattan_distance(&goal);

    let mut open_set = MinHeap::with_capacity(total_cells.min(1024));
    open_set.push(start_index, f_score[start_index]);

    let mut outcome = SearchOutcome::default();

    while let Some((current, priority)) = open_set.pop() {
        // A cheaper copy of this node was pushed after this one
        if priority > f_score[current] {
            outcome.stale_skipped += 1;
            continue;
        }
        outcome.expanded += 1;

        if current == goal_index {
            outcome.path = reconstruct_path(&came_from, goal_index, width);
            outcome.cost = Some(g_score[goal_index]);
            break;
        }

        let cell = Cell::from_index(current, width);
        let current_g = g_score[current];

        for (dx, dy) in DIRECTIONS {
            let Some(neighbor) = cell.offset(dx, dy, width, height) else {
                continue;
            };
            let Some(step_cost) = grid.get(neighbor).and_then(TerrainId::movement_cost) else {
                continue;
            };
            let neighbor_index = neighbor.index(width);

            let tentative_g = current_g + step_cost;
            if tentative_g < g_score[neighbor_index] {
                came_from[neighbor_index] = Some(current);
                g_score[neighbor_index] = tentative_g;
                f_score[neighbor_index] = tentative_g + neighbor.manhattan_distance(&goal);
                open_set.push(neighbor_index, f_score[neighbor_index]);
            }
        }
    }

    debug!(
        "Pathfinding {start} -> {goal}: {} (expanded={}, stale_skipped={}, cost={:?})",
        if outcome.found() { "found" } else { "unreachable" },
        outcome.expanded,
        outcome.stale_skipped,
        outcome.cost
    );

    outcome
}

fn reconstruct_path(came_from: &[Option<usize>], goal_index: usize, width: u32) -> Path {
    let mut cells = Vec::new();
    let mut current = Some(goal_index);
    while let Some(index) = current {
        cells.push(Cell::from_index(index, width));
        current = came_from[index];
    }
    cells.reverse();
    Path::from_cells(cells)
}

/// Sum of entry costs for every cell after the first
pub fn path_cost(path: &Path, grid: &TerrainGrid) -> u32 {
    path.cells()
        .iter()
        .skip(1)
        .filter_map(|&cell| grid.get(cell).and_then(TerrainId::movement_cost))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain_generation::{NoiseSettings, TerrainGenerator};

    fn grid(rows: &[&str]) -> TerrainGrid {
        TerrainGrid::from_glyph_rows(rows).expect("test grid should parse")
    }

    #[test]
    fn test_straight_grass_path() {
        let terrain = grid(&[",,,,,"]);
        let outcome = find_path_detailed(Cell::new(0, 0), Cell::new(4, 0), &terrain);

        assert_eq!(outcome.path.len(), 5);
        assert_eq!(outcome.cost, Some(4));
        assert_eq!(path_cost(&outcome.path, &terrain), 4);
        assert!(outcome.path.is_contiguous());
    }

    #[test]
    fn test_routes_around_single_water_cell() {
        let terrain = grid(&[",,,,,", ",,,,,", ",,~,,", ",,,,,", ",,,,,"]);
        let start = Cell::new(0, 2);
        let goal = Cell::new(4, 2);
        let path = find_path(start, goal, &terrain);

        assert_eq!(path.start(), Some(start));
        assert_eq!(path.goal(), Some(goal));
        assert!(path.is_contiguous());
        assert!(!path.cells().contains(&Cell::new(2, 2)));
        // Two extra steps are needed to step around the pond
        assert_eq!(path.len(), 7);
        assert_eq!(path_cost(&path, &terrain), 6);
    }

    #[test]
    fn test_start_equals_goal() {
        let terrain = grid(&[",,,", ",,,"]);
        let outcome = find_path_detailed(Cell::new(1, 1), Cell::new(1, 1), &terrain);
        assert_eq!(outcome.path.cells(), &[Cell::new(1, 1)]);
        assert_eq!(outcome.cost, Some(0));
    }

    #[test]
    fn test_water_endpoints_rejected() {
        let terrain = grid(&["~,,", ",,~"]);
        let outcome = find_path_detailed(Cell::new(0, 0), Cell::new(1, 1), &terrain);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.rejected, Some(SelectionError::Water(Cell::new(0, 0))));
        assert_eq!(outcome.expanded, 0);

        assert!(find_path(Cell::new(1, 0), Cell::new(2, 1), &terrain).is_empty());
    }

    #[test]
    fn test_out_of_bounds_endpoints_rejected() {
        let terrain = grid(&[",,,", ",,,"]);
        let outcome = find_path_detailed(Cell::new(0, 0), Cell::new(3, 0), &terrain);
        assert!(outcome.path.is_empty());
        assert_eq!(
            outcome.rejected,
            Some(SelectionError::OutOfBounds(Cell::new(3, 0)))
        );
    }

    #[test]
    fn test_goal_enclosed_by_water_is_unreachable() {
        let terrain = grid(&[",,,,,", ",,~,,", ",~,~,", ",,~,,", ",,,,,"]);
        let outcome = find_path_detailed(Cell::new(0, 0), Cell::new(2, 2), &terrain);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.rejected, None);
        assert_eq!(outcome.cost, None);
        assert!(outcome.expanded > 0);
    }

    #[test]
    fn test_prefers_cheap_detour_over_snow() {
        // Going straight crosses three snow cells (cost 16); the grass detour costs 6
        let terrain = grid(&[",***,", ",,,,,"]);
        let path = find_path(Cell::new(0, 0), Cell::new(4, 0), &terrain);
        assert_eq!(path.len(), 7);
        assert_eq!(path_cost(&path, &terrain), 6);
        assert!(
            path.cells()
                .iter()
                .all(|&c| terrain.get(c) == Some(TerrainId::Grass))
        );
    }

    #[test]
    fn test_takes_snow_when_it_is_the_only_way() {
        let terrain = grid(&[",*,", "~~~"]);
        let path = find_path(Cell::new(0, 0), Cell::new(2, 0), &terrain);
        assert_eq!(path.len(), 3);
        // Entering snow costs 5, then grass costs 1
        assert_eq!(path_cost(&path, &terrain), 6);
        assert!(path_cost(&path, &terrain) > (path.len() as u32 - 1));
    }

    #[test]
    fn test_reported_cost_matches_path_sum() {
        let terrain = grid(&[
            ",,,,,,",
            ",^^^^,",
            ",....,",
            ",,,,,,",
        ]);
        let outcome = find_path_detailed(Cell::new(0, 1), Cell::new(5, 1), &terrain);
        assert!(outcome.found());
        assert!(outcome.path.is_contiguous());
        assert_eq!(outcome.cost, Some(path_cost(&outcome.path, &terrain)));
    }

    #[test]
    fn test_improved_node_discards_its_stale_entry() {
        // (2,1) is first reached over the trees at cost 5, then through the sand at cost 4
        let terrain = grid(&[",T,T", ",.,*"]);
        let outcome = find_path_detailed(Cell::new(0, 0), Cell::new(3, 1), &terrain);

        assert_eq!(outcome.stale_skipped, 1);
        assert_eq!(outcome.cost, Some(9));
        assert_eq!(
            outcome.path.cells(),
            &[
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(3, 1)
            ]
        );
        assert_eq!(path_cost(&outcome.path, &terrain), 9);
    }

    #[test]
    fn test_searches_along_grid_edges() {
        let column = TerrainGrid::new(1, 4, vec![TerrainId::Grass; 4]).unwrap();
        let outcome = find_path_detailed(Cell::new(0, 3), Cell::new(0, 0), &column);
        assert_eq!(outcome.cost, Some(3));
        assert!(outcome.path.is_contiguous());

        let row = TerrainGrid::new(
            3,
            1,
            vec![TerrainId::Sand, TerrainId::Trees, TerrainId::Sand],
        )
        .unwrap();
        assert_eq!(find_path_detailed(Cell::new(2, 0), Cell::new(0, 0), &row).cost, Some(5));
        assert_eq!(
            find_path_detailed(Cell::new(0, 0), Cell::new(0, 1), &row).rejected,
            Some(SelectionError::OutOfBounds(Cell::new(0, 1)))
        );
    }

    #[test]
    fn test_generated_terrain_paths_are_contiguous() {
        let generator = TerrainGenerator::new(2024, NoiseSettings::default());
        let (_, terrain) = generator.generate_terrain(60, 60).unwrap();

        let land: Vec<Cell> = (0..terrain.cell_count())
            .map(|i| Cell::from_index(i, terrain.width()))
            .filter(|&c| terrain.get(c).is_some_and(TerrainId::is_passable))
            .collect();

        for pair in land.chunks(97).filter_map(|chunk| Some((chunk.first()?, chunk.last()?))) {
            let path = find_path(*pair.0, *pair.1, &terrain);
            if path.is_empty() {
                continue;
            }
            assert_eq!(path.start(), Some(*pair.0));
            assert_eq!(path.goal(), Some(*pair.1));
            assert!(path.is_contiguous());
            assert!(
                path.cells()
                    .iter()
                    .all(|&c| terrain.get(c) != Some(TerrainId::Water))
            );
        }
    }
}
