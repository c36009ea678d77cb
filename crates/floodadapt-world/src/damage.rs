//! Depth-damage curves for household flood damage estimation.
//!
//! A curve maps a flood depth (metres) to a damage factor in `[0, 1]`,
//! where 0 is no damage and 1 is total loss. Every curve here is
//! non-decreasing in depth and saturates: beyond some depth the damage
//! factor no longer grows.
//!
//! Negative depths show up whenever the terrain sits above the modelled
//! water level. They are an expected input, not an error: the depth is
//! clamped to 0 before the curve is evaluated, so high ground always gets
//! the zero-depth damage.
//!
//! # Default curve
//!
//! ```text
//! damage(d) = 0                              if d < 0.025
//!           = 1                              if d >= 6
//!           = clamp(0.1746 * ln(d) + 0.6132) otherwise
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// One breakpoint of a piecewise-linear curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Flood depth in metres.
    pub depth: f64,
    /// Damage factor at that depth.
    pub damage: f64,
}

/// A saturating, non-decreasing mapping from flood depth to damage factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepthDamageCurve {
    /// `scale * ln(depth) + offset`, zero below `min_depth`, one at and
    /// above `saturation_depth`, clamped to `[0, 1]` in between.
    Logarithmic {
        /// Multiplier on `ln(depth)`. Must be non-negative.
        scale: f64,
        /// Constant term.
        offset: f64,
        /// Depths below this produce no damage. Must be positive.
        min_depth: f64,
        /// Depths at or above this produce total damage.
        saturation_depth: f64,
    },
    /// Linear interpolation between breakpoints sorted by depth. Depths
    /// below the first breakpoint take its damage; depths beyond the last
    /// take the last damage.
    PiecewiseLinear {
        /// Breakpoints with strictly increasing depth and non-decreasing damage.
        points: Vec<CurvePoint>,
    },
}

impl Default for DepthDamageCurve {
    fn default() -> Self {
        Self::Logarithmic {
            scale: 0.1746,
            offset: 0.6132,
            min_depth: 0.025,
            saturation_depth: 6.0,
        }
    }
}

/// Clamp a raw flood depth to the physically meaningful range.
///
/// Negative depths (elevation above flood level) and NaN become 0.
pub fn clamp_depth(raw: f64) -> f64 {
    if raw.is_nan() || raw < 0.0 { 0.0 } else { raw }
}

impl DepthDamageCurve {
    /// Damage factor for the given depth, always in `[0, 1]`.
    ///
    /// `depth` is clamped with [`clamp_depth`] first, so for every
    /// negative `d`, `damage_from_depth(d) == damage_from_depth(0.0)`.
    pub fn damage_from_depth(&self, depth: f64) -> f64 {
        let depth = clamp_depth(depth);
        let raw = match self {
            Self::Logarithmic {
                scale,
                offset,
                min_depth,
                saturation_depth,
            } => {
                if depth >= *saturation_depth {
                    1.0
                } else if depth < *min_depth {
                    0.0
                } else {
                    scale.mul_add(depth.ln(), *offset)
                }
            }
            Self::PiecewiseLinear { points } => interpolate(points, depth),
        };
        raw.clamp(0.0, 1.0)
    }

    /// Check that the curve is well-formed and non-decreasing.
    pub fn validate(&self) -> Result<(), WorldError> {
        match self {
            Self::Logarithmic {
                scale,
                offset,
                min_depth,
                saturation_depth,
            } => {
                if !(scale.is_finite()
                    && offset.is_finite()
                    && min_depth.is_finite()
                    && saturation_depth.is_finite())
                {
                    return Err(invalid("logarithmic parameters must be finite"));
                }
                if *scale < 0.0 {
                    return Err(invalid("scale must be non-negative"));
                }
                if *min_depth <= 0.0 {
                    return Err(invalid("min_depth must be positive"));
                }
                if saturation_depth < min_depth {
                    return Err(invalid("saturation_depth must not be below min_depth"));
                }
                Ok(())
            }
            Self::PiecewiseLinear { points } => {
                if points.is_empty() {
                    return Err(invalid("piecewise curve needs at least one point"));
                }
                for point in points {
                    if !(point.depth.is_finite() && point.damage.is_finite()) {
                        return Err(invalid("breakpoints must be finite"));
                    }
                    if point.depth < 0.0 {
                        return Err(invalid("breakpoint depths must be non-negative"));
                    }
                    if !(0.0..=1.0).contains(&point.damage) {
                        return Err(invalid("breakpoint damages must lie in [0, 1]"));
                    }
                }
                for pair in points.windows(2) {
                    if let [lower, upper] = pair {
                        if upper.depth <= lower.depth {
                            return Err(invalid("breakpoint depths must strictly increase"));
                        }
                        if upper.damage < lower.damage {
                            return Err(invalid("breakpoint damages must not decrease"));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

fn interpolate(points: &[CurvePoint], depth: f64) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    if depth <= first.depth {
        return first.damage;
    }
    for pair in points.windows(2) {
        if let [lower, upper] = pair
            && depth <= upper.depth
        {
            let span = upper.depth - lower.depth;
            let t = (depth - lower.depth) / span;
            return t.mul_add(upper.damage - lower.damage, lower.damage);
        }
    }
    points.last().map_or(0.0, |last| last.damage)
}

fn invalid(reason: &str) -> WorldError {
    WorldError::InvalidDamageCurve {
        reason: reason.to_owned(),
    }
}
