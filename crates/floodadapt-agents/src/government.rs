//! The government agent.
//!
//! One per run. It holds the policy multiplier every household's coping
//! appraisal is scaled by, and takes a turn each tick without doing
//! anything yet. New policy levers (subsidies, mandatory insurance) hang
//! off [`Government::step`].

use floodadapt_types::GovernmentId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::check_non_negative;
use crate::error::ConfigurationError;

/// The `government` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentConfig {
    /// Multiplier on coping appraisal.
    #[serde(default = "default_policy")]
    pub policy: f64,
}

impl Default for GovernmentConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
        }
    }
}

impl GovernmentConfig {
    /// The policy multiplier must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_non_negative("government.policy", self.policy)
    }
}

const fn default_policy() -> f64 {
    1.0
}

/// Passive policy holder.
#[derive(Debug, Clone, PartialEq)]
pub struct Government {
    id: GovernmentId,
    policy: f64,
}

impl Government {
    /// Create a government from its configuration.
    pub fn new(config: &GovernmentConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            id: GovernmentId::new(),
            policy: config.policy,
        })
    }

    /// The government's identifier.
    pub const fn id(&self) -> GovernmentId {
        self.id
    }

    /// The shared coping multiplier.
    pub const fn policy(&self) -> f64 {
        self.policy
    }

    /// Take this tick's turn. Currently a no-op.
    pub fn step(&mut self, tick: u64) {
        trace!(government = %self.id, tick, policy = self.policy, "Government step");
    }
}

impl Default for Government {
    fn default() -> Self {
        Self {
            id: GovernmentId::new(),
            policy: default_policy(),
        }
    }
}
