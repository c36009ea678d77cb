//! Map domain: the bounding box households are placed in.

use floodadapt_types::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Axis-aligned bounding box of the study area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapDomain {
    /// South-west corner.
    pub min: Point,
    /// North-east corner.
    pub max: Point,
}

impl Default for MapDomain {
    fn default() -> Self {
        Self {
            min: Point::new(0.0, 0.0),
            max: Point::new(10_000.0, 10_000.0),
        }
    }
}

impl MapDomain {
    /// Check that the box is finite and has positive area.
    pub fn validate(&self) -> Result<(), WorldError> {
        let corners = [self.min.x, self.min.y, self.max.x, self.max.y];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(WorldError::InvalidDomain {
                reason: "corners must be finite".to_owned(),
            });
        }
        if self.min.x >= self.max.x || self.min.y >= self.max.y {
            return Err(WorldError::InvalidDomain {
                reason: "min corner must lie strictly south-west of max corner".to_owned(),
            });
        }
        let (width, height) = (self.max.x - self.min.x, self.max.y - self.min.y);
        if !(width.is_finite() && height.is_finite()) {
            return Err(WorldError::InvalidDomain {
                reason: format!("extent overflows: {width} x {height}"),
            });
        }
        Ok(())
    }

    /// Whether `point` lies inside the box (edges included).
    pub fn contains(&self, point: Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// A uniformly random point inside the box.
    ///
    /// The domain must have passed [`validate`](Self::validate).
    pub fn random_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }
}
