//! Flood exposure, geography, and the social network for the flood
//! adaptation simulation.
//!
//! This crate holds everything a household is *given* rather than
//! something it decides: how deep the water is expected to be at its
//! location, how that depth translates into damage, whether it sits in the
//! floodplain, and who its social neighbors are.
//!
//! # Modules
//!
//! - [`damage`] -- Depth-damage curves ([`DepthDamageCurve`]) and depth clamping.
//! - [`domain`] -- Map bounding box and random location sampling.
//! - [`error`] -- Error types for world operations ([`WorldError`]).
//! - [`exposure`] -- The [`ExposureModel`]: estimated depth and damage per location.
//! - [`flood_map`] -- The [`FloodMap`] lookup service and in-memory maps.
//! - [`floodplain`] -- Floodplain polygons with point containment.
//! - [`network`] -- [`SocialNetwork`] generation and the [`NeighborQuery`] service.

pub mod damage;
pub mod domain;
pub mod error;
pub mod exposure;
pub mod flood_map;
pub mod floodplain;
pub mod network;

// Re-export primary types at crate root.
pub use damage::{CurvePoint, DepthDamageCurve, clamp_depth};
pub use domain::MapDomain;
pub use error::WorldError;
pub use exposure::{ExposureEstimate, ExposureModel};
pub use flood_map::{FloodMap, FloodMapConfig, RasterFloodMap, UniformFloodMap};
pub use floodplain::{Floodplain, Polygon};
pub use network::{NeighborQuery, NetworkKind, SocialNetwork};
