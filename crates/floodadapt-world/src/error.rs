//! Error types for the `floodadapt-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use floodadapt_types::HouseholdId;

/// Errors that can occur while building or querying world structures.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A depth-damage curve failed validation.
    #[error("invalid depth-damage curve: {reason}")]
    InvalidDamageCurve {
        /// Why the curve was rejected.
        reason: String,
    },

    /// A raster flood map failed validation.
    #[error("invalid flood map raster: {reason}")]
    InvalidRaster {
        /// Why the raster was rejected.
        reason: String,
    },

    /// A floodplain polygon failed validation.
    #[error("invalid floodplain polygon: {reason}")]
    InvalidPolygon {
        /// Why the polygon was rejected.
        reason: String,
    },

    /// The map domain is empty or not finite.
    #[error("invalid map domain: {reason}")]
    InvalidDomain {
        /// Why the domain was rejected.
        reason: String,
    },

    /// Network generation parameters are out of range for the population.
    #[error("invalid network parameters: {reason}")]
    InvalidNetwork {
        /// Why the parameters were rejected.
        reason: String,
    },

    /// A household is not a node of the social network.
    #[error("household not in network: {0}")]
    UnknownHousehold(HouseholdId),
}
