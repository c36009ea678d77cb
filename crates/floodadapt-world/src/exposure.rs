//! Exposure model: what a household should expect from a flood.
//!
//! Evaluated exactly once per household, at construction. The estimate is
//! static for the rest of the run; only an external flood shock changes
//! the household's *actual* depth.

use floodadapt_types::Point;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::damage::{DepthDamageCurve, clamp_depth};
use crate::error::WorldError;
use crate::flood_map::FloodMap;

/// Estimated flood exposure at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureEstimate {
    /// Estimated depth in metres, never negative.
    pub depth: f64,
    /// Estimated damage factor in `[0, 1]`.
    pub damage: f64,
}

/// Turns flood-map depths into household exposure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureModel {
    /// Depth-damage curve used for both estimated and actual damage.
    #[serde(default)]
    curve: DepthDamageCurve,
}

impl ExposureModel {
    /// Create an exposure model from a validated curve.
    pub fn new(curve: DepthDamageCurve) -> Result<Self, WorldError> {
        curve.validate()?;
        Ok(Self { curve })
    }

    /// The depth-damage curve in use.
    pub const fn curve(&self) -> &DepthDamageCurve {
        &self.curve
    }

    /// Check the configured curve.
    pub fn validate(&self) -> Result<(), WorldError> {
        self.curve.validate()
    }

    /// Estimate depth and damage at `location` from the flood map.
    ///
    /// Negative raw depths are clamped to 0 before the damage lookup.
    pub fn estimate(&self, location: Point, flood_map: &dyn FloodMap) -> ExposureEstimate {
        let raw = flood_map.depth_at(location);
        let depth = clamp_depth(raw);
        if raw < 0.0 {
            trace!(x = location.x, y = location.y, raw, "Location above flood level");
        }
        ExposureEstimate {
            depth,
            damage: self.damage_from_depth(depth),
        }
    }

    /// Damage factor in `[0, 1]` for a depth; negative depths count as 0.
    pub fn damage_from_depth(&self, depth: f64) -> f64 {
        self.curve.damage_from_depth(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::CurvePoint;

    const EPS: f64 = 1e-9;

    #[test]
    fn estimate_clamps_high_ground() {
        let model = ExposureModel::default();
        let high_ground = |_: Point| -3.5;
        let estimate = model.estimate(Point::new(1.0, 1.0), &high_ground);
        assert!(estimate.depth.abs() < EPS);
        assert!(estimate.damage.abs() < EPS);
    }

    #[test]
    fn estimate_uses_map_depth() {
        let model = ExposureModel::default();
        let deep = |p: Point| if p.x > 0.0 { 2.0 } else { 0.0 };
        let estimate = model.estimate(Point::new(5.0, 0.0), &deep);
        assert!((estimate.depth - 2.0).abs() < EPS);
        assert!((estimate.damage - model.damage_from_depth(2.0)).abs() < EPS);
        assert!(estimate.damage > 0.0);
    }

    #[test]
    fn new_rejects_invalid_curve() {
        let curve = DepthDamageCurve::PiecewiseLinear {
            points: vec![CurvePoint {
                depth: 0.0,
                damage: 1.5,
            }],
        };
        assert!(ExposureModel::new(curve).is_err());
    }
}
