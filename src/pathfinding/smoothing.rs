use crate::config::{SmoothingKind, SmoothingSettings};
use crate::pathfinding::Path;
use crate::terrain::Cell;
use crate::terrain::constants::{DEFAULT_MAX_VERTICES, DEFAULT_SMOOTHING_ITERATIONS};
use serde::{Deserialize, Serialize};

/// Continuous position in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centre of a grid cell
    pub fn cell_center(cell: Cell) -> Self {
        Self::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5)
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingStrategy {
    /// Replace every edge with points at 25% and 75%, repeated `iterations` times
    CornerCutting { iterations: u32 },
    /// Cardinal spline through every vertex; tension 0.5 is Catmull-Rom
    CatmullRom {
        samples_per_segment: u32,
        tension: f32,
    },
}

/// Turns a cell path into a display polyline. Output is cosmetic only.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSmoother {
    pub max_vertices: usize,
    pub strategy: SmoothingStrategy,
}

impl Default for PathSmoother {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
            strategy: SmoothingStrategy::CornerCutting {
                iterations: DEFAULT_SMOOTHING_ITERATIONS,
            },
        }
    }
}

impl From<&SmoothingSettings> for PathSmoother {
    fn from(settings: &SmoothingSettings) -> Self {
        let strategy = match settings.strategy {
            SmoothingKind::CornerCutting => SmoothingStrategy::CornerCutting {
                iterations: settings.iterations,
            },
            SmoothingKind::CatmullRom => SmoothingStrategy::CatmullRom {
                samples_per_segment: settings.samples_per_segment,
                tension: settings.tension.get(),
            },
        };
        Self::new(settings.max_vertices, strategy)
    }
}

impl PathSmoother {
    pub fn new(max_vertices: usize, strategy: SmoothingStrategy) -> Self {
        Self {
            max_vertices: max_vertices.max(2),
            strategy,
        }
    }

    /// Smooth a path into cell-centre coordinates.
    ///
    /// The first and last output points are exactly the centres of the path's
    /// start and goal cells.
    pub fn smooth(&self, path: &Path) -> Vec<Point> {
        let control: Vec<Point> = downsample(path.cells(), self.max_vertices)
            .into_iter()
            .map(Point::cell_center)
            .collect();

        if control.len() < 2 {
            return control;
        }

        match self.strategy {
            SmoothingStrategy::CornerCutting { iterations } => corner_cut(control, iterations),
            SmoothingStrategy::CatmullRom {
                samples_per_segment,
                tension,
            } => cardinal_spline(&control, samples_per_segment.max(1), tension),
        }
    }
}

/// Uniform stride sampling down to at most `max_vertices`, keeping both ends
pub fn downsample(cells: &[Cell], max_vertices: usize) -> Vec<Cell> {
    let max_vertices = max_vertices.max(2);
    let len = cells.len();
    if len <= max_vertices {
        return cells.to_vec();
    }

    let last = len - 1;
    let steps = max_vertices - 1;
    (0..max_vertices)
        .map(|i| cells[(i * last + steps / 2) / steps])
        .collect()
}

fn corner_cut(mut points: Vec<Point>, iterations: u32) -> Vec<Point> {
    for _ in 0..iterations {
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            break;
        };

        let mut next = Vec::with_capacity(points.len() * 2);
        next.push(first);
        for edge in points.windows(2) {
            next.push(edge[0].lerp(edge[1], 0.25));
            next.push(edge[0].lerp(edge[1], 0.75));
        }
        next.push(last);
        points = next;
    }
    points
}

fn cardinal_spline(points: &[Point], samples_per_segment: u32, tension: f32) -> Vec<Point> {
    let n = points.len();
    let mut out = Vec::with_capacity((n - 1) * samples_per_segment as usize + 1);

    for i in 0..n - 1 {
        // Endpoints are duplicated as their own tangent anchors
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        let m1 = Point::new((p2.x - p0.x) * tension, (p2.y - p0.y) * tension);
        let m2 = Point::new((p3.x - p1.x) * tension, (p3.y - p1.y) * tension);

        for step in 0..samples_per_segment {
            let t = step as f32 / samples_per_segment as f32;
            out.push(hermite(p1, p2, m1, m2, t));
        }
    }

    out.push(points[n - 1]);
    out
}

fn hermite(p1: Point, p2: Point, m1: Point, m2: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    Point::new(
        h00 * p1.x + h10 * m1.x + h01 * p2.x + h11 * m2.x,
        h00 * p1.y + h10 * m1.y + h01 * p2.y + h11 * m2.y,
    )
}
