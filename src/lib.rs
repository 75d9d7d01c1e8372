pub mod config;
pub mod errors;
pub mod pathfinding;
pub mod session;
pub mod stats;
pub mod terrain;
pub mod terrain_generation;

// Selective re-exports for external consumers

pub use errors::{MapprError, MapprResult};

pub use config::{ExplorerConfig, SmoothingKind};

pub use terrain::{Cell, HeightMap, TerrainGrid, TerrainId};

pub use terrain_generation::{NoiseSettings, TerrainGenerator, get_terrain_preset};

pub use pathfinding::{Path, PathSmoother, Point, SearchOutcome, find_path, find_path_detailed};

pub use stats::{BiomeMix, PathSummary, biome_mix, summarize};

pub use session::{Advisory, ClickOutcome, ExplorerSession, Route, SessionEvent, SessionObserver, World};
