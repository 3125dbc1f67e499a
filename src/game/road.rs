//! Road Network Geometry
//!
//! Polylines in canvas pixel space, already projected and clipped to the
//! viewport by the map layer. Immutable once a session starts.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::{StateHash, StateHasher};
use crate::core::vec2::Point;

/// Road geometry and canvas errors.
#[derive(Debug, Error)]
pub enum RoadError {
    /// A road point is NaN or infinite.
    #[error("road {road} point {index} is not finite")]
    NonFinitePoint {
        /// Polyline index
        road: usize,
        /// Vertex index within the polyline
        index: usize,
    },

    /// Canvas dimensions must be finite and positive.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },

    /// Road JSON could not be parsed.
    #[error("invalid road JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// CANVAS
// =============================================================================

/// Visible canvas bounds in pixels. Origin is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    /// Create canvas bounds.
    pub fn new(width: f64, height: f64) -> Result<Self, RoadError> {
        let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !valid {
            return Err(RoadError::InvalidCanvas { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether `point` lies inside the canvas shrunk by `margin` on every
    /// side. Bounds are inclusive.
    #[inline]
    pub fn contains(&self, point: Point, margin: f64) -> bool {
        point.x >= margin
            && point.y >= margin
            && point.x <= self.width - margin
            && point.y <= self.height - margin
    }
}

// =============================================================================
// ROAD GEOMETRY
// =============================================================================

/// Ordered collection of road center-line polylines.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoadGeometry {
    polylines: Vec<Vec<Point>>,
}

impl RoadGeometry {
    /// Build geometry, rejecting non-finite points.
    pub fn new(polylines: Vec<Vec<Point>>) -> Result<Self, RoadError> {
        for (road, polyline) in polylines.iter().enumerate() {
            if let Some(index) = polyline.iter().position(|p| !p.is_finite()) {
                return Err(RoadError::NonFinitePoint { road, index });
            }
        }
        Ok(Self { polylines })
    }

    /// Parse `[[{"x":..,"y":..}, ...], ...]`.
    pub fn from_json_str(json: &str) -> Result<Self, RoadError> {
        let polylines: Vec<Vec<Point>> = serde_json::from_str(json)?;
        Self::new(polylines)
    }

    /// Regular street grid covering a canvas, `spacing` pixels apart.
    ///
    /// Streets start half a spacing in from the border.
    pub fn grid(canvas: Canvas, spacing: f64) -> Self {
        let mut polylines = Vec::new();
        if !(spacing.is_finite() && spacing > 0.0) {
            return Self { polylines };
        }

        let mut y = spacing / 2.0;
        while y < canvas.height() {
            polylines.push(vertices_along(Point::new(0.0, y), Point::new(canvas.width(), y), spacing));
            y += spacing;
        }

        let mut x = spacing / 2.0;
        while x < canvas.width() {
            polylines.push(vertices_along(Point::new(x, 0.0), Point::new(x, canvas.height()), spacing));
            x += spacing;
        }

        Self { polylines }
    }

    /// The polylines, in supplied order.
    pub fn polylines(&self) -> &[Vec<Point>] {
        &self.polylines
    }

    /// Number of polylines.
    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    /// Whether there are no polylines at all.
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Total number of vertices across all polylines.
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }

    /// Consecutive vertex pairs of every polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.polylines
            .iter()
            .flat_map(|polyline| polyline.windows(2).map(|pair| (pair[0], pair[1])))
    }

    /// Fingerprint of the geometry, used for seed derivation.
    pub fn digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_road_geometry();
        hasher.update_u32(self.polylines.len() as u32);
        for polyline in &self.polylines {
            hasher.update_u32(polyline.len() as u32);
            for point in polyline {
                hasher.update_point(*point);
            }
        }
        hasher.finalize()
    }
}

impl<'de> Deserialize<'de> for RoadGeometry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let polylines = Vec::<Vec<Point>>::deserialize(deserializer)?;
        RoadGeometry::new(polylines).map_err(serde::de::Error::custom)
    }
}

/// Vertices from `start` to `end` inclusive, about `spacing` apart.
fn vertices_along(start: Point, end: Point, spacing: f64) -> Vec<Point> {
    let length = start.distance(end);
    let steps = (length / spacing).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            start.add(end.sub(start).scale(t))
        })
        .collect()
}

/// Squared distance from `point` to the segment `start`-`end`.
pub fn distance_squared_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let ab = end.sub(start);
    let ab_len_sq = ab.length_squared();
    if ab_len_sq == 0.0 {
        return point.distance_squared(start);
    }

    let ap = point.sub(start);
    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    let closest = start.add(ab.scale(t));
    point.distance_squared(closest)
}
