//! Traversability
//!
//! Decides whether a point is on the drivable surface: inside the stroke
//! corridor of the road center-lines and inside the canvas shrunk by the
//! character's clearance. Both oracles precompute everything at
//! construction so per-move queries stay within a frame budget.

use crate::core::vec2::Point;
use crate::game::road::{distance_squared_to_segment, Canvas, RoadGeometry};

/// Answers "may a character of this clearance stand here?".
pub trait TraversabilityOracle {
    /// True iff `point` is within the road corridor and within the canvas
    /// shrunk by `clearance` on every side.
    fn is_traversable(&self, point: Point, clearance: f64) -> bool;

    /// Width of the road stroke the corridor is built from.
    fn stroke_width(&self) -> f64;
}

impl<T: TraversabilityOracle + ?Sized> TraversabilityOracle for &T {
    fn is_traversable(&self, point: Point, clearance: f64) -> bool {
        (**self).is_traversable(point, clearance)
    }

    fn stroke_width(&self) -> f64 {
        (**self).stroke_width()
    }
}

// =============================================================================
// ANALYTIC CORRIDOR
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct Segment {
    start: Point,
    end: Point,
    // Bounding box grown by the corridor half width
    min: Point,
    max: Point,
}

impl Segment {
    fn new(start: Point, end: Point, half_width: f64) -> Self {
        Self {
            start,
            end,
            min: Point::new(start.x.min(end.x) - half_width, start.y.min(end.y) - half_width),
            max: Point::new(start.x.max(end.x) + half_width, start.y.max(end.y) + half_width),
        }
    }

    #[inline]
    fn contains(&self, point: Point, half_width_sq: f64) -> bool {
        if point.x < self.min.x || point.x > self.max.x || point.y < self.min.y || point.y > self.max.y {
            return false;
        }
        distance_squared_to_segment(point, self.start, self.end) <= half_width_sq
    }
}

/// Point-to-polyline distance check against every road segment.
///
/// Queries are linear in the number of segments.
#[derive(Clone, Debug)]
pub struct CorridorOracle {
    segments: Vec<Segment>,
    canvas: Canvas,
    stroke_width: f64,
    half_width_sq: f64,
}

impl CorridorOracle {
    /// Precompute segments for `roads` drawn with `stroke_width`.
    pub fn new(roads: &RoadGeometry, canvas: Canvas, stroke_width: f64) -> Self {
        let half_width = stroke_width / 2.0;
        let segments = roads
            .segments()
            .map(|(start, end)| Segment::new(start, end, half_width))
            .collect();

        Self {
            segments,
            canvas,
            stroke_width,
            half_width_sq: half_width * half_width,
        }
    }

    /// Whether `point` lies in the road corridor, ignoring canvas bounds.
    pub fn on_road(&self, point: Point) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.contains(point, self.half_width_sq))
    }
}

impl TraversabilityOracle for CorridorOracle {
    fn is_traversable(&self, point: Point, clearance: f64) -> bool {
        self.canvas.contains(point, clearance) && self.on_road(point)
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}

// =============================================================================
// RASTER MASK
// =============================================================================

/// Corridor rasterized once into a one-bit-per-pixel mask.
///
/// A pixel is on the road when its center is within half the stroke width
/// of a segment. Queries are constant time.
#[derive(Clone, Debug)]
pub struct MaskOracle {
    canvas: Canvas,
    stroke_width: f64,
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl MaskOracle {
    /// Rasterize `roads` drawn with `stroke_width` onto the canvas grid.
    pub fn new(roads: &RoadGeometry, canvas: Canvas, stroke_width: f64) -> Self {
        let columns = canvas.width().ceil() as usize;
        let rows = canvas.height().ceil() as usize;
        let mut cells = vec![false; columns * rows];

        let half_width = stroke_width / 2.0;
        let half_width_sq = half_width * half_width;

        for (start, end) in roads.segments() {
            let x0 = pixel_floor(start.x.min(end.x) - half_width, columns);
            let x1 = pixel_floor(start.x.max(end.x) + half_width, columns);
            let y0 = pixel_floor(start.y.min(end.y) - half_width, rows);
            let y1 = pixel_floor(start.y.max(end.y) + half_width, rows);

            for row in y0..=y1 {
                for column in x0..=x1 {
                    let cell = &mut cells[row * columns + column];
                    if *cell {
                        continue;
                    }
                    let center = Point::new(column as f64 + 0.5, row as f64 + 0.5);
                    *cell = distance_squared_to_segment(center, start, end) <= half_width_sq;
                }
            }
        }

        Self {
            canvas,
            stroke_width,
            columns,
            rows,
            cells,
        }
    }

    /// Number of road pixels in the mask.
    pub fn road_pixels(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Whether `point` falls on a road pixel, ignoring canvas bounds.
    pub fn on_road(&self, point: Point) -> bool {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return false;
        }
        let column = (point.x as usize).min(self.columns.saturating_sub(1));
        let row = (point.y as usize).min(self.rows.saturating_sub(1));
        self.cells
            .get(row * self.columns + column)
            .copied()
            .unwrap_or(false)
    }
}

impl TraversabilityOracle for MaskOracle {
    fn is_traversable(&self, point: Point, clearance: f64) -> bool {
        self.canvas.contains(point, clearance) && self.on_road(point)
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}

/// Pixel index containing `coord`, clamped to `[0, limit)`.
fn pixel_floor(coord: f64, limit: usize) -> usize {
    if limit == 0 || coord <= 0.0 {
        return 0;
    }
    (coord.floor() as usize).min(limit - 1)
}
