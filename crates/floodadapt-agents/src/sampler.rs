//! Distribution sampling service.
//!
//! Households never touch an RNG directly. Every random draw (initial
//! worry, perceived flood probability, worry escalation factors) goes
//! through a [`Sampler`], so tests can substitute a [`ScriptedSampler`]
//! and get fully deterministic ticks.
//!
//! [`DistributionSpec::Constant`] always yields its value without consuming
//! anything from the sampler.

use std::collections::VecDeque;

use rand::Rng;
use rand::distr::Uniform;
use rand_distr::{Beta, Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, SamplerError};

/// A configurable univariate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionSpec {
    /// Always the same value.
    Constant {
        /// The value.
        value: f64,
    },
    /// Uniform on `[low, high]`.
    Uniform {
        /// Lower bound (inclusive).
        low: f64,
        /// Upper bound (inclusive).
        high: f64,
    },
    /// Normal distribution.
    Gaussian {
        /// Mean.
        mean: f64,
        /// Standard deviation, non-negative.
        std_dev: f64,
    },
    /// Beta distribution on `[0, 1]`.
    Beta {
        /// First shape parameter, positive.
        alpha: f64,
        /// Second shape parameter, positive.
        beta: f64,
    },
}

impl DistributionSpec {
    /// Check the parameters, naming `field` in the error.
    pub fn validate(&self, field: &str) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidDistribution {
            field: field.to_owned(),
            reason: reason.to_owned(),
        };
        match *self {
            Self::Constant { value } => {
                if !value.is_finite() {
                    return Err(invalid("constant must be finite"));
                }
            }
            Self::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite()) {
                    return Err(invalid("bounds must be finite"));
                }
                if low > high {
                    return Err(invalid("low must not exceed high"));
                }
            }
            Self::Gaussian { mean, std_dev } => {
                if !(mean.is_finite() && std_dev.is_finite()) || std_dev < 0.0 {
                    return Err(invalid("mean must be finite and std_dev non-negative"));
                }
            }
            Self::Beta { alpha, beta } => {
                if !(alpha.is_finite() && beta.is_finite()) || alpha <= 0.0 || beta <= 0.0 {
                    return Err(invalid("shape parameters must be positive"));
                }
            }
        }
        self.check_constructible().map_err(|reason| invalid(&reason))
    }

    /// Build the underlying distribution once, so ranges the sampler would
    /// reject (a span that overflows, for one) fail here and not mid-run.
    fn check_constructible(&self) -> Result<(), String> {
        match *self {
            Self::Constant { .. } => Ok(()),
            Self::Uniform { low, high } => Uniform::new_inclusive(low, high)
                .map(drop)
                .map_err(|e| e.to_string()),
            Self::Gaussian { mean, std_dev } => Normal::new(mean, std_dev)
                .map(drop)
                .map_err(|e| e.to_string()),
            Self::Beta { alpha, beta } => Beta::new(alpha, beta)
                .map(drop)
                .map_err(|e| e.to_string()),
        }
    }

    /// Draw one value using `rng`.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SamplerError> {
        match *self {
            Self::Constant { value } => Ok(value),
            Self::Uniform { low, high } => {
                let dist = Uniform::new_inclusive(low, high).map_err(|e| {
                    SamplerError::InvalidDistribution {
                        reason: e.to_string(),
                    }
                })?;
                Ok(dist.sample(rng))
            }
            Self::Gaussian { mean, std_dev } => {
                let dist =
                    Normal::new(mean, std_dev).map_err(|e| SamplerError::InvalidDistribution {
                        reason: e.to_string(),
                    })?;
                Ok(dist.sample(rng))
            }
            Self::Beta { alpha, beta } => {
                let dist = Beta::new(alpha, beta).map_err(|e| SamplerError::InvalidDistribution {
                    reason: e.to_string(),
                })?;
                Ok(dist.sample(rng))
            }
        }
    }
}

/// Source of random draws for households.
pub trait Sampler {
    /// Draw one value from `spec`.
    fn sample(&mut self, spec: &DistributionSpec) -> Result<f64, SamplerError>;
}

/// [`Sampler`] backed by a `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    /// Wrap an RNG.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// The wrapped RNG, for draws that are not distribution samples
    /// (shuffles, network generation).
    pub const fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    fn sample(&mut self, spec: &DistributionSpec) -> Result<f64, SamplerError> {
        spec.sample_with(&mut self.rng)
    }
}

/// [`Sampler`] that replays a fixed sequence of values.
///
/// Non-constant specs consume the next queued value regardless of which
/// distribution is asked for. Once the queue is empty every non-constant
/// draw fails with [`SamplerError::Exhausted`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    values: VecDeque<f64>,
}

impl ScriptedSampler {
    /// Replay `values` in order.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Number of values still queued.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl Sampler for ScriptedSampler {
    fn sample(&mut self, spec: &DistributionSpec) -> Result<f64, SamplerError> {
        if let DistributionSpec::Constant { value } = *spec {
            return Ok(value);
        }
        self.values.pop_front().ok_or(SamplerError::Exhausted)
    }
}
