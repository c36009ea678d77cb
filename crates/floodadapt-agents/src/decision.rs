//! Decision policy: whether to act, which measure, and what it does.
//!
//! ```text
//!                w2p > threshold
//!  Unadapted ─────────────────────▶ {FloodBarrier, StructuralMeasures,
//!     │  ▲                           AdaptiveBuildingUse, FloodInsurance}
//!     └──┘ w2p <= threshold:                       (terminal)
//!          worry escalates
//! ```
//!
//! The measure comes from a 2x2 table on income and age:
//!
//! | income > I | age < A | measure |
//! |---|---|---|
//! | yes | yes | `FloodBarrier` |
//! | yes | no | `StructuralMeasures` |
//! | no | yes | `AdaptiveBuildingUse` |
//! | no | no | `FloodInsurance` |

use floodadapt_types::AdaptationAction;

use crate::appraisal::Appraisal;
use crate::config::{BehaviourConfig, WorryEscalation};
use crate::error::SamplerError;
use crate::household::Household;
use crate::sampler::Sampler;

/// Outcome of the threshold test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Adopt a measure now.
    Act,
    /// Stay unadapted for this tick.
    Wait,
}

/// Thresholds an appraisal and applies the chosen measure.
#[derive(Debug, Clone, Copy)]
pub struct DecisionPolicy<'a> {
    config: &'a BehaviourConfig,
}

impl<'a> DecisionPolicy<'a> {
    /// Create a policy over the behaviour configuration.
    pub const fn new(config: &'a BehaviourConfig) -> Self {
        Self { config }
    }

    /// Act only when `w2p` strictly exceeds the threshold.
    pub fn decide(&self, appraisal: &Appraisal) -> Decision {
        if appraisal.w2p > self.config.w2p_threshold {
            Decision::Act
        } else {
            Decision::Wait
        }
    }

    /// Pick the measure for a household's income and age.
    pub fn select_measure(&self, income: f64, age: f64) -> AdaptationAction {
        let wealthy = income > self.config.income_threshold;
        let young = age < self.config.age_threshold;
        match (wealthy, young) {
            (true, true) => AdaptationAction::FloodBarrier,
            (true, false) => AdaptationAction::StructuralMeasures,
            (false, true) => AdaptationAction::AdaptiveBuildingUse,
            (false, false) => AdaptationAction::FloodInsurance,
        }
    }

    /// Worry after a tick without action.
    pub fn escalate_worry(&self, worry: f64, sampler: &mut dyn Sampler) -> Result<f64, SamplerError> {
        match self.config.worry_escalation {
            WorryEscalation::Increment { amount } => Ok(worry + amount),
            WorryEscalation::Multiplicative { factor } => Ok(worry * sampler.sample(&factor)?),
        }
    }

    /// Apply `action` to `household` using the configured measure table.
    ///
    /// Returns `false` (and leaves the household untouched) when the
    /// household has already adapted or `action` is `NoAction`.
    pub fn apply(&self, household: &mut Household, action: AdaptationAction) -> bool {
        let Some(effect) = self.config.measures.effect(action) else {
            return false;
        };
        household.adopt(action, effect, self.config)
    }
}
