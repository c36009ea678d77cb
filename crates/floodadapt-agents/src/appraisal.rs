//! Protection-motivation appraisal.
//!
//! Each tick an unadapted household weighs how threatened it feels against
//! how able it feels to respond:
//!
//! ```text
//! threat  = worry + perceived_damage + perceived_probability
//! coping  = (response_efficacy + self_efficacy - cost) * policy
//! w2p     = threat + coping
//! ```
//!
//! `perceived_damage` is the estimated damage times
//! `perceived_damage_scale`; `perceived_probability` is drawn fresh every
//! tick. Coping may go negative when cost exceeds efficacy, and `w2p` is
//! not normalized. Nothing here mutates the household.

use serde::{Deserialize, Serialize};

use crate::config::BehaviourConfig;
use crate::error::SamplerError;
use crate::sampler::Sampler;

/// The household state appraisal reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppraisalInputs {
    /// Current worry.
    pub worry: f64,
    /// Estimated damage factor.
    pub flood_damage_estimated: f64,
    /// Current adoption cost.
    pub cost: f64,
    /// Perceived effectiveness of measures.
    pub response_efficacy: f64,
    /// Perceived ability to carry out measures.
    pub self_efficacy: f64,
}

/// Result of one appraisal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appraisal {
    /// The perceived probability drawn for this appraisal.
    pub perceived_probability: f64,
    /// Threat appraisal.
    pub threat: f64,
    /// Coping appraisal.
    pub coping: f64,
    /// Willingness to adapt.
    pub w2p: f64,
}

/// Scores households against the behaviour configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppraisalEngine<'a> {
    config: &'a BehaviourConfig,
    policy: f64,
}

impl<'a> AppraisalEngine<'a> {
    /// Create an engine using the shared government policy multiplier.
    ///
    /// The multiplier is ignored when `apply_government_policy` is off.
    pub const fn new(config: &'a BehaviourConfig, government_policy: f64) -> Self {
        let policy = if config.apply_government_policy {
            government_policy
        } else {
            1.0
        };
        Self { config, policy }
    }

    /// The coping multiplier in effect.
    pub const fn policy(&self) -> f64 {
        self.policy
    }

    /// Appraise, drawing the perceived probability from `sampler`.
    pub fn appraise(
        &self,
        inputs: &AppraisalInputs,
        sampler: &mut dyn Sampler,
    ) -> Result<Appraisal, SamplerError> {
        let probability = sampler.sample(&self.config.perceived_probability)?;
        Ok(self.appraise_with_probability(inputs, probability))
    }

    /// Appraise with a given perceived probability.
    pub fn appraise_with_probability(
        &self,
        inputs: &AppraisalInputs,
        perceived_probability: f64,
    ) -> Appraisal {
        let perceived_damage = inputs.flood_damage_estimated * self.config.perceived_damage_scale;
        let threat = threat_appraisal(inputs.worry, perceived_damage, perceived_probability);
        let coping = coping_appraisal(
            inputs.response_efficacy,
            inputs.self_efficacy,
            inputs.cost,
            self.policy,
        );
        Appraisal {
            perceived_probability,
            threat,
            coping,
            w2p: willingness_to_adapt(threat, coping),
        }
    }
}

/// Perceived severity and likelihood of harm.
pub fn threat_appraisal(worry: f64, perceived_damage: f64, perceived_probability: f64) -> f64 {
    worry + perceived_damage + perceived_probability
}

/// Perceived capacity to respond, net of cost. Not clamped.
pub fn coping_appraisal(
    response_efficacy: f64,
    self_efficacy: f64,
    cost: f64,
    policy: f64,
) -> f64 {
    (response_efficacy + self_efficacy - cost) * policy
}

/// Combined willingness-to-adapt score.
pub fn willingness_to_adapt(threat: f64, coping: f64) -> f64 {
    threat + coping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ScriptedSampler;

    const EPS: f64 = 1e-12;

    fn inputs() -> AppraisalInputs {
        AppraisalInputs {
            worry: 0.6,
            flood_damage_estimated: 0.3,
            cost: 1.0,
            response_efficacy: 0.5,
            self_efficacy: 0.5,
        }
    }

    #[test]
    fn reference_household_scores() {
        let config = BehaviourConfig::default();
        let engine = AppraisalEngine::new(&config, 1.0);
        let mut sampler = ScriptedSampler::new([0.2]);
        let result = engine.appraise(&inputs(), &mut sampler);
        assert!(result.is_ok_and(|a| (a.threat - 1.1).abs() < EPS
            && a.coping.abs() < EPS
            && (a.w2p - 1.1).abs() < EPS
            && (a.perceived_probability - 0.2).abs() < EPS));
    }

    #[test]
    fn coping_can_go_negative() {
        let config = BehaviourConfig::default();
        let engine = AppraisalEngine::new(&config, 1.0);
        let expensive = AppraisalInputs {
            cost: 3.0,
            ..inputs()
        };
        let result = engine.appraise_with_probability(&expensive, 0.0);
        assert!((result.coping + 2.0).abs() < EPS);
    }

    #[test]
    fn policy_scales_coping_only_when_enabled() {
        let cheap = AppraisalInputs {
            cost: 0.0,
            ..inputs()
        };
        let config = BehaviourConfig::default();
        let scaled = AppraisalEngine::new(&config, 2.0).appraise_with_probability(&cheap, 0.0);
        assert!((scaled.coping - 2.0).abs() < EPS);

        let config = BehaviourConfig {
            apply_government_policy: false,
            ..BehaviourConfig::default()
        };
        let unscaled = AppraisalEngine::new(&config, 2.0).appraise_with_probability(&cheap, 0.0);
        assert!((unscaled.coping - 1.0).abs() < EPS);
    }

    #[test]
    fn perceived_damage_is_discounted() {
        let config = BehaviourConfig {
            perceived_damage_scale: 0.5,
            ..BehaviourConfig::default()
        };
        let engine = AppraisalEngine::new(&config, 1.0);
        let result = engine.appraise_with_probability(&inputs(), 0.2);
        assert!((result.threat - 0.95).abs() < EPS);
    }

    #[test]
    fn same_inputs_same_scores() {
        let config = BehaviourConfig::default();
        let engine = AppraisalEngine::new(&config, 1.0);
        let a = engine.appraise_with_probability(&inputs(), 0.33);
        let b = engine.appraise_with_probability(&inputs(), 0.33);
        assert_eq!(a, b);
    }

    #[test]
    fn sampler_failure_propagates() {
        let config = BehaviourConfig::default();
        let engine = AppraisalEngine::new(&config, 1.0);
        let mut empty = ScriptedSampler::default();
        assert_eq!(
            engine.appraise(&inputs(), &mut empty),
            Err(SamplerError::Exhausted)
        );
    }
}
