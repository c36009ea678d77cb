//! Core value structs shared across crates.

use serde::{Deserialize, Serialize};

use crate::enums::AdaptationAction;
use crate::ids::HouseholdId;

/// A point in the map's projected coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Read-only view of a household's state at the end of a tick.
///
/// Produced by the household itself; used in tick summaries and for the
/// engine's JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    /// The household.
    pub id: HouseholdId,
    /// Where the household lives.
    pub location: Point,
    /// Whether the household lies inside the floodplain.
    pub in_floodplain: bool,
    /// Estimated flood depth from the flood map (never negative).
    pub flood_depth_estimated: f64,
    /// Estimated damage factor in `[0, 1]`.
    pub flood_damage_estimated: f64,
    /// Actual flood depth (0 until a flood shock).
    pub flood_depth_actual: f64,
    /// Actual damage factor after any adopted protection.
    pub flood_damage_actual: f64,
    /// Current worry level.
    pub worry: f64,
    /// Current adoption cost.
    pub cost: f64,
    /// Current investment contributed to neighbors.
    pub investment: f64,
    /// Running total of investment read from neighbors.
    pub cumulative_neighbor_investment: f64,
    /// Whether the household has adapted.
    pub is_adapted: bool,
    /// The measure taken, or `NoAction`.
    pub adaptation_action: AdaptationAction,
}
