//! Error types for the floodadapt-agents crate.
//!
//! Configuration problems are caught once, when the configuration is
//! loaded, and reported as [`ConfigurationError`]. Everything that can go
//! wrong while households step is an [`AgentError`].

use floodadapt_types::HouseholdId;

/// An out-of-range or inconsistent configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// A parameter that must not be negative was negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Name of the offending parameter.
        field: String,
        /// The rejected value, formatted.
        value: String,
    },

    /// A parameter that must be finite was NaN or infinite.
    #[error("{field} must be finite")]
    NotFinite {
        /// Name of the offending parameter.
        field: String,
    },

    /// A parameter fell outside its allowed range.
    #[error("{field} out of range: {reason}")]
    OutOfRange {
        /// Name of the offending parameter.
        field: String,
        /// What the allowed range is.
        reason: String,
    },

    /// A distribution could not be built from its parameters.
    #[error("invalid distribution for {field}: {reason}")]
    InvalidDistribution {
        /// Name of the parameter the distribution belongs to.
        field: String,
        /// Why the distribution is invalid.
        reason: String,
    },
}

/// Errors from the distribution sampler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplerError {
    /// The distribution parameters were rejected.
    #[error("invalid distribution: {reason}")]
    InvalidDistribution {
        /// Why the distribution could not be constructed.
        reason: String,
    },

    /// A scripted sampler ran out of values.
    #[error("scripted sampler exhausted")]
    Exhausted,
}

/// Errors that can occur while managing or stepping households.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A household with the given ID was not found.
    #[error("household not found: {0}")]
    HouseholdNotFound(HouseholdId),

    /// A household with the given ID already exists.
    #[error("duplicate household: {0}")]
    DuplicateHousehold(HouseholdId),

    /// Drawing a random value failed.
    #[error("sampling failed: {source}")]
    Sampler {
        /// The underlying sampler error.
        #[from]
        source: SamplerError,
    },

    /// The behaviour configuration is invalid.
    #[error("invalid configuration: {source}")]
    Configuration {
        /// The underlying configuration error.
        #[from]
        source: ConfigurationError,
    },
}
