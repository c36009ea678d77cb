//! Floodplain membership.
//!
//! The floodplain is a set of polygons in map coordinates. Membership is
//! decided once per household, at construction, with an even-odd ray cast.

use floodadapt_types::Point;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A simple polygon given by its vertices (implicitly closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices in order; the last connects back to the first.
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// Create a polygon, rejecting degenerate or non-finite input.
    pub fn new(vertices: Vec<Point>) -> Result<Self, WorldError> {
        let polygon = Self { vertices };
        polygon.validate()?;
        Ok(polygon)
    }

    /// Check vertex count and coordinates.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.vertices.len() < 3 {
            return Err(WorldError::InvalidPolygon {
                reason: format!("need at least 3 vertices, got {}", self.vertices.len()),
            });
        }
        if self
            .vertices
            .iter()
            .any(|v| !(v.x.is_finite() && v.y.is_finite()))
        {
            return Err(WorldError::InvalidPolygon {
                reason: "vertex coordinates must be finite".to_owned(),
            });
        }
        Ok(())
    }

    /// Even-odd test: does a ray cast east from `point` cross the boundary
    /// an odd number of times?
    pub fn contains(&self, point: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let Some(mut previous) = self.vertices.last() else {
            return false;
        };
        let mut inside = false;
        for current in &self.vertices {
            let straddles = (current.y > point.y) != (previous.y > point.y);
            if straddles {
                let crossing_x = (previous.x - current.x) * (point.y - current.y)
                    / (previous.y - current.y)
                    + current.x;
                if point.x < crossing_x {
                    inside = !inside;
                }
            }
            previous = current;
        }
        inside
    }
}

/// Union of floodplain polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Floodplain {
    /// Disjoint parts of the floodplain.
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

impl Floodplain {
    /// A floodplain made of the given polygons.
    pub const fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Check every polygon.
    pub fn validate(&self) -> Result<(), WorldError> {
        self.polygons.iter().try_for_each(Polygon::validate)
    }

    /// Whether `point` lies inside any part of the floodplain.
    pub fn contains(&self, point: Point) -> bool {
        self.polygons.iter().any(|polygon| polygon.contains(point))
    }
}
