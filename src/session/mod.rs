use crate::config::ExplorerConfig;
use crate::errors::MapprResult;
use crate::pathfinding::{
    Path, PathSmoother, Point, SelectionError, check_endpoint, find_path_detailed,
};
use crate::stats::{BiomeMix, PathSummary, biome_mix, summarize_with};
use crate::terrain::{Cell, HeightMap, TerrainGrid, validate_dimensions};
use crate::terrain_generation::{NoiseSettings, TerrainGenerator, water_fraction};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything derived from one generation cycle. Immutable once built.
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u32,
    pub generation: u64,
    pub height_map: HeightMap,
    pub terrain: TerrainGrid,
    pub biome_mix: BiomeMix,
}

impl World {
    fn build(generator: &TerrainGenerator, width: u32, height: u32, generation: u64) -> MapprResult<Self> {
        let (height_map, terrain) = generator.generate_terrain(width, height)?;
        let biome_mix = biome_mix(&terrain);

        info!(
            "Generated {width}x{height} world (seed {}, generation {generation}, {:.1}% water)",
            generator.seed,
            water_fraction(&terrain) * 100.0
        );

        Ok(Self {
            seed: generator.seed,
            generation,
            height_map,
            terrain,
            biome_mix,
        })
    }

    pub fn width(&self) -> u32 {
        self.terrain.width()
    }

    pub fn height(&self) -> u32 {
        self.terrain.height()
    }
}

/// Short message for an action the session refused or could not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    ClickedWater,
    OutOfBounds,
    Unreachable,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Advisory::ClickedWater => "That's water. Pick a land cell instead.",
            Advisory::OutOfBounds => "That point is outside the map.",
            Advisory::Unreachable => "No land route reaches that destination.",
        };
        f.write_str(message)
    }
}

impl From<SelectionError> for Advisory {
    fn from(error: SelectionError) -> Self {
        match error {
            SelectionError::OutOfBounds(_) => Advisory::OutOfBounds,
            SelectionError::Water(_) => Advisory::ClickedWater,
        }
    }
}

/// A completed start/goal query against one world
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub start: Cell,
    pub goal: Cell,
    pub generation: u64,
    pub path: Path,
    pub smoothed: Vec<Point>,
    pub summary: PathSummary,
}

impl Route {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Rejected(Advisory),
    StartSelected(Cell),
    GoalSelected(Arc<Route>),
    /// The goal was valid land but no route connects it to the start
    Unreachable(Arc<Route>),
    /// Both endpoints were already set; the click became the new start
    Restarted(Cell),
}

impl ClickOutcome {
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            ClickOutcome::Rejected(advisory) => Some(*advisory),
            ClickOutcome::Unreachable(_) => Some(Advisory::Unreachable),
            _ => None,
        }
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.goal == other.goal
            && self.generation == other.generation
            && self.path == other.path
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    WorldGenerated { generation: u64, seed: u32 },
    SelectionCleared,
}

/// Hooks for a host that wants push notifications instead of return values
pub trait SessionObserver {
    fn world_generated(&mut self, _world: &World) {}
    fn route_computed(&mut self, _route: &Route) {}
    fn selection_cleared(&mut self) {}
    fn advisory(&mut self, _advisory: Advisory) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Selection {
    #[default]
    Empty,
    Start(Cell),
    Complete {
        start: Cell,
        goal: Cell,
    },
}

/// Owns the current world, the click selection and the computed route.
///
/// Every rebuild replaces the world wholesale and clears the selection, so a
/// route never refers to a world other than the one it was computed on.
pub struct ExplorerSession {
    config: ExplorerConfig,
    noise: NoiseSettings,
    smoother: PathSmoother,
    rng: Pcg64,
    world: Arc<World>,
    selection: Selection,
    route: Option<Arc<Route>>,
    pending_regeneration: Option<Option<u32>>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl ExplorerSession {
    pub fn new(config: ExplorerConfig, session_seed: u64) -> MapprResult<Self> {
        let noise = NoiseSettings::from(&config.noise);
        Self::with_noise(config, noise, session_seed, None)
    }

    /// Build a session with explicit noise settings, optionally pinning the first world seed
    pub fn with_noise(
        config: ExplorerConfig,
        noise: NoiseSettings,
        session_seed: u64,
        world_seed: Option<u32>,
    ) -> MapprResult<Self> {
        config.check()?;

        let mut rng = Pcg64::seed_from_u64(session_seed);
        let seed = world_seed.unwrap_or_else(|| rng.r#gen());
        let generator = TerrainGenerator::new(seed, noise.clone());
        let world = World::build(&generator, config.grid.width, config.grid.height, 0)?;

        Ok(Self {
            smoother: PathSmoother::from(&config.smoothing),
            config,
            noise,
            rng,
            world: Arc::new(world),
            selection: Selection::Empty,
            route: None,
            pending_regeneration: None,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Shared handle to the current world; stays valid after the session rebuilds
    pub fn snapshot(&self) -> Arc<World> {
        Arc::clone(&self.world)
    }

    pub fn generation(&self) -> u64 {
        self.world.generation
    }

    pub fn start(&self) -> Option<Cell> {
        match self.selection {
            Selection::Empty => None,
            Selection::Start(start) | Selection::Complete { start, .. } => Some(start),
        }
    }

    pub fn goal(&self) -> Option<Cell> {
        match self.selection {
            Selection::Complete { goal, .. } => Some(goal),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_deref()
    }

    /// Summary of the current route, or the zeroed summary when there is none
    pub fn summary(&self) -> PathSummary {
        self.route
            .as_ref()
            .map(|route| route.summary.clone())
            .unwrap_or_else(PathSummary::empty)
    }

    pub fn has_pending_regeneration(&self) -> bool {
        self.pending_regeneration.is_some()
    }

    /// Handle a click at grid coordinates.
    ///
    /// Water and off-grid clicks are rejected without touching the selection.
    pub fn click(&mut self, x: i64, y: i64) -> ClickOutcome {
        let Some(cell) = Cell::from_signed(x, y, self.world.width(), self.world.height()) else {
            return self.reject(Advisory::OutOfBounds);
        };
        if let Err(reason) = check_endpoint(&self.world.terrain, cell) {
            return self.reject(reason.into());
        }

        match self.selection {
            Selection::Empty => {
                self.selection = Selection::Start(cell);
                ClickOutcome::StartSelected(cell)
            }
            Selection::Start(start) => {
                let route = Arc::new(self.compute_route(start, cell));
                self.selection = Selection::Complete { start, goal: cell };
                self.route = Some(Arc::clone(&route));

                for observer in self.observers.iter_mut() {
                    observer.route_computed(&route);
                }
                if route.found() {
                    ClickOutcome::GoalSelected(route)
                } else {
                    self.notify_advisory(Advisory::Unreachable);
                    ClickOutcome::Unreachable(route)
                }
            }
            Selection::Complete { .. } => {
                self.clear_selection();
                self.selection = Selection::Start(cell);
                ClickOutcome::Restarted(cell)
            }
        }
    }

    /// Drop start, goal and route
    pub fn reset_selection(&mut self) -> SessionEvent {
        self.clear_selection();
        SessionEvent::SelectionCleared
    }

    /// Rebuild the world at a new size, keeping the current seed
    pub fn resize(&mut self, width: u32, height: u32) -> MapprResult<SessionEvent> {
        validate_dimensions(width, height)?;
        self.config.grid.width = width;
        self.config.grid.height = height;
        self.rebuild(self.world.seed)
    }

    /// Queue a regeneration; a later request replaces an earlier one.
    ///
    /// Returns true when an unapplied request was superseded.
    pub fn request_regenerate(&mut self, seed: Option<u32>) -> bool {
        let superseded = self.pending_regeneration.replace(seed).is_some();
        if superseded {
            debug!("Pending regeneration superseded by a newer request");
        }
        superseded
    }

    /// Apply the latest queued regeneration, if any
    pub fn apply_pending_regeneration(&mut self) -> MapprResult<Option<SessionEvent>> {
        match self.pending_regeneration.take() {
            Some(seed) => self.regenerate(seed).map(Some),
            None => Ok(None),
        }
    }

    /// Replace the world immediately; draws a fresh seed when none is given
    pub fn regenerate(&mut self, seed: Option<u32>) -> MapprResult<SessionEvent> {
        let seed = seed.unwrap_or_else(|| self.rng.r#gen());
        self.pending_regeneration = None;
        self.rebuild(seed)
    }

    fn rebuild(&mut self, seed: u32) -> MapprResult<SessionEvent> {
        let generator = TerrainGenerator::new(seed, self.noise.clone());
        let generation = self.world.generation + 1;
        // Build fully before swapping so a failed build leaves the old world in place
        let world = Arc::new(World::build(
            &generator,
            self.config.grid.width,
            self.config.grid.height,
            generation,
        )?);

        self.world = Arc::clone(&world);
        self.clear_selection();
        for observer in self.observers.iter_mut() {
            observer.world_generated(&world);
        }

        Ok(SessionEvent::WorldGenerated { generation, seed })
    }

    fn compute_route(&self, start: Cell, goal: Cell) -> Route {
        let world = self.snapshot();
        let outcome = find_path_detailed(start, goal, &world.terrain);
        let smoothed = self.smoother.smooth(&outcome.path);
        let summary = summarize_with(&outcome.path, &world.terrain, &self.config.stats);

        info!(
            "Route {start} -> {goal}: {} cells, cost {}",
            summary.length, summary.total_cost
        );

        Route {
            start,
            goal,
            generation: world.generation,
            path: outcome.path,
            smoothed,
            summary,
        }
    }

    fn clear_selection(&mut self) {
        self.selection = Selection::Empty;
        self.route = None;
        for observer in self.observers.iter_mut() {
            observer.selection_cleared();
        }
    }

    fn reject(&mut self, advisory: Advisory) -> ClickOutcome {
        debug!("Click rejected: {advisory}");
        self.notify_advisory(advisory);
        ClickOutcome::Rejected(advisory)
    }

    fn notify_advisory(&mut self, advisory: Advisory) {
        for observer in self.observers.iter_mut() {
            observer.advisory(advisory);
        }
    }
}

impl fmt::Debug for ExplorerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerSession")
            .field("seed", &self.world.seed)
            .field("generation", &self.world.generation)
            .field("selection", &self.selection)
            .field("has_route", &self.route.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::range_types::ZoomFactor;
    use crate::pathfinding::find_path;
    use crate::terrain::TerrainId;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn small_config(width: u32, height: u32) -> ExplorerConfig {
        let mut config = ExplorerConfig::default();
        config.grid.width = width;
        config.grid.height = height;
        config
    }

    fn session() -> ExplorerSession {
        ExplorerSession::new(small_config(48, 40), 7).expect("session should build")
    }

    fn cell_of(world: &World, wanted: impl Fn(TerrainId) -> bool) -> Option<Cell> {
        (0..world.terrain.cell_count())
            .map(|i| Cell::from_index(i, world.width()))
            .find(|&c| world.terrain.get(c).is_some_and(&wanted))
    }

    /// Two distinct land cells joined by a route, if the world has any
    fn connected_pair(world: &World) -> Option<(Cell, Cell)> {
        let start = cell_of(world, TerrainId::is_passable)?;
        (0..world.terrain.cell_count())
            .rev()
            .map(|i| Cell::from_index(i, world.width()))
            .filter(|&c| c != start && world.terrain.get(c).is_some_and(TerrainId::is_passable))
            .find(|&goal| !find_path(start, goal, &world.terrain).is_empty())
            .map(|goal| (start, goal))
    }

    /// Regenerate until the world offers a usable start/goal pair
    fn session_with_route() -> (ExplorerSession, Cell, Cell) {
        let mut session = session();
        for _ in 0..20 {
            if let Some((start, goal)) = connected_pair(session.world()) {
                return (session, start, goal);
            }
            session.regenerate(None).expect("regenerate should succeed");
        }
        panic!("no connected land pair found in 20 worlds");
    }

    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl SessionObserver for Recorder {
        fn world_generated(&mut self, world: &World) {
            self.log.borrow_mut().push(format!("world {}", world.generation));
        }
        fn route_computed(&mut self, route: &Route) {
            self.log.borrow_mut().push(format!("route {}", route.found()));
        }
        fn selection_cleared(&mut self) {
            self.log.borrow_mut().push("cleared".to_string());
        }
        fn advisory(&mut self, advisory: Advisory) {
            self.log.borrow_mut().push(format!("advisory {advisory:?}"));
        }
    }

    #[test]
    fn test_same_session_seed_same_world() {
        let a = ExplorerSession::new(small_config(32, 32), 99).unwrap();
        let b = ExplorerSession::new(small_config(32, 32), 99).unwrap();
        assert_eq!(a.world().seed, b.world().seed);
        assert_eq!(a.world().terrain, b.world().terrain);
        assert_eq!(a.generation(), 0);
    }

    #[test]
    fn test_click_flow_start_goal_restart() {
        let (mut session, start, goal) = session_with_route();

        assert_eq!(
            session.click(start.x.into(), start.y.into()),
            ClickOutcome::StartSelected(start)
        );
        assert_eq!(session.start(), Some(start));
        assert!(session.route().is_none());

        let outcome = session.click(goal.x.into(), goal.y.into());
        let ClickOutcome::GoalSelected(route) = outcome else {
            panic!("expected a route, got {outcome:?}");
        };
        assert_eq!(route.path.start(), Some(start));
        assert_eq!(route.path.goal(), Some(goal));
        assert!(route.path.is_contiguous());
        assert_eq!(route.smoothed.first(), Some(&Point::cell_center(start)));
        assert_eq!(route.smoothed.last(), Some(&Point::cell_center(goal)));
        assert!(session.summary().has_path);
        assert_eq!(session.goal(), Some(goal));

        // A third click starts over
        assert_eq!(
            session.click(goal.x.into(), goal.y.into()),
            ClickOutcome::Restarted(goal)
        );
        assert_eq!(session.start(), Some(goal));
        assert_eq!(session.goal(), None);
        assert!(!session.summary().has_path);
    }

    #[test]
    fn test_out_of_bounds_click_is_rejected_without_mutation() {
        let mut session = session();
        for (x, y) in [(-1, 0), (0, -3), (48, 0), (0, 40), (i64::MAX, 2)] {
            assert_eq!(
                session.click(x, y),
                ClickOutcome::Rejected(Advisory::OutOfBounds)
            );
        }
        assert_eq!(session.start(), None);
    }

    #[test]
    fn test_water_click_is_rejected_without_mutation() {
        // A short zoom packs many features into the grid, so water shows up quickly
        let mut config = small_config(48, 40);
        config.noise.zoom_factor = ZoomFactor::new(5.0);
        let mut session = ExplorerSession::new(config, 11).unwrap();
        for _ in 0..20 {
            if cell_of(session.world(), |t| t == TerrainId::Water).is_some() {
                break;
            }
            session.regenerate(None).unwrap();
        }
        let water = cell_of(session.world(), |t| t == TerrainId::Water)
            .expect("some world should contain water");

        let outcome = session.click(water.x.into(), water.y.into());
        assert_eq!(outcome, ClickOutcome::Rejected(Advisory::ClickedWater));
        assert_eq!(outcome.advisory(), Some(Advisory::ClickedWater));
        assert_eq!(session.start(), None);
    }

    #[test]
    fn test_regenerate_invalidates_route() {
        let (mut session, start, goal) = session_with_route();
        session.click(start.x.into(), start.y.into());
        session.click(goal.x.into(), goal.y.into());
        assert!(session.summary().has_path);

        let before = session.generation();
        let event = session.regenerate(Some(1234)).unwrap();
        assert_eq!(
            event,
            SessionEvent::WorldGenerated {
                generation: before + 1,
                seed: 1234
            }
        );
        assert!(session.route().is_none());
        assert_eq!(session.summary(), PathSummary::empty());
        assert_eq!(session.start(), None);
    }

    #[test]
    fn test_snapshot_survives_rebuild() {
        let mut session = session();
        let old = session.snapshot();
        session.regenerate(Some(old.seed.wrapping_add(1))).unwrap();
        assert_eq!(old.generation, 0);
        assert_eq!(session.world().generation, 1);
        assert_ne!(old.seed, session.world().seed);
    }

    #[test]
    fn test_latest_regeneration_request_wins() {
        let mut session = session();
        assert!(!session.request_regenerate(Some(1)));
        assert!(session.request_regenerate(Some(2)));
        assert!(session.request_regenerate(Some(3)));
        assert!(session.has_pending_regeneration());

        let event = session.apply_pending_regeneration().unwrap();
        assert_eq!(
            event,
            Some(SessionEvent::WorldGenerated {
                generation: 1,
                seed: 3
            })
        );
        assert!(!session.has_pending_regeneration());
        assert_eq!(session.apply_pending_regeneration().unwrap(), None);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_resize_keeps_seed_and_clears_selection() {
        let (mut session, start, _) = session_with_route();
        session.click(start.x.into(), start.y.into());
        let seed = session.world().seed;

        session.resize(20, 10).unwrap();
        assert_eq!(session.world().seed, seed);
        assert_eq!(session.world().width(), 20);
        assert_eq!(session.world().height(), 10);
        assert_eq!(session.start(), None);
    }

    #[test]
    fn test_invalid_resize_leaves_world_untouched() {
        let mut session = session();
        assert!(session.resize(0, 10).is_err());
        assert_eq!(session.world().width(), 48);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_observers_are_notified() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut session, start, goal) = session_with_route();
        session.add_observer(Box::new(Recorder {
            log: Rc::clone(&log),
        }));

        session.click(-5, 0);
        session.click(start.x.into(), start.y.into());
        session.click(goal.x.into(), goal.y.into());
        session.reset_selection();
        let generation = session.generation();
        session.regenerate(None).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "advisory OutOfBounds".to_string(),
                "route true".to_string(),
                "cleared".to_string(),
                "cleared".to_string(),
                format!("world {}", generation + 1),
            ]
        );
    }

    #[test]
    fn test_advisory_messages() {
        assert_eq!(
            Advisory::ClickedWater.to_string(),
            "That's water. Pick a land cell instead."
        );
        assert_eq!(
            Advisory::from(SelectionError::OutOfBounds(Cell::new(9, 9))),
            Advisory::OutOfBounds
        );
    }
}
