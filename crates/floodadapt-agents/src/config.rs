//! Behaviour and household-profile configuration.
//!
//! These structs mirror the `behaviour` and `households` sections of
//! `floodadapt-config.yaml`. Every field has a default, so an empty
//! section yields the reference model. Call `validate()` once at load
//! time; households assume a validated configuration while stepping.
//!
//! The behaviour section also carries the variant switches that select
//! between the model's alternative update rules (how worry escalates,
//! whether investment accumulates, and so on). The defaults reproduce the
//! reference dynamics.

use floodadapt_types::AdaptationAction;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::sampler::DistributionSpec;

/// What adopting one measure does to a household.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureEffect {
    /// Multiplier applied to actual flood damage, in `(0, 1]`.
    pub damage_multiplier: f64,
    /// Worry after adoption (when worry is reset).
    pub worry_reset: f64,
    /// Investment contributed to neighbors.
    pub investment: f64,
}

/// Effects of the four adaptation measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureTable {
    /// High income, young household.
    #[serde(default = "default_flood_barrier")]
    pub flood_barrier: MeasureEffect,
    /// High income, older household.
    #[serde(default = "default_structural_measures")]
    pub structural_measures: MeasureEffect,
    /// Low income, young household.
    #[serde(default = "default_adaptive_building_use")]
    pub adaptive_building_use: MeasureEffect,
    /// Low income, older household.
    #[serde(default = "default_flood_insurance")]
    pub flood_insurance: MeasureEffect,
}

impl Default for MeasureTable {
    fn default() -> Self {
        Self {
            flood_barrier: default_flood_barrier(),
            structural_measures: default_structural_measures(),
            adaptive_building_use: default_adaptive_building_use(),
            flood_insurance: default_flood_insurance(),
        }
    }
}

impl MeasureTable {
    /// Effect of `action`, or `None` for [`AdaptationAction::NoAction`].
    pub const fn effect(&self, action: AdaptationAction) -> Option<&MeasureEffect> {
        match action {
            AdaptationAction::NoAction => None,
            AdaptationAction::FloodBarrier => Some(&self.flood_barrier),
            AdaptationAction::StructuralMeasures => Some(&self.structural_measures),
            AdaptationAction::AdaptiveBuildingUse => Some(&self.adaptive_building_use),
            AdaptationAction::FloodInsurance => Some(&self.flood_insurance),
        }
    }

    /// Check every row.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for action in AdaptationAction::MEASURES {
            let Some(effect) = self.effect(action) else {
                continue;
            };
            let prefix = format!("measures.{action}");
            let multiplier = effect.damage_multiplier;
            check_finite(&format!("{prefix}.damage_multiplier"), multiplier)?;
            if multiplier <= 0.0 || multiplier > 1.0 {
                return Err(ConfigurationError::OutOfRange {
                    field: format!("{prefix}.damage_multiplier"),
                    reason: format!("must lie in (0, 1], got {multiplier}"),
                });
            }
            check_non_negative(&format!("{prefix}.worry_reset"), effect.worry_reset)?;
            check_non_negative(&format!("{prefix}.investment"), effect.investment)?;
        }
        Ok(())
    }
}

/// How worry grows when a household decides not to act.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum WorryEscalation {
    /// `worry += amount`.
    Increment {
        /// Fixed increase per tick, positive.
        amount: f64,
    },
    /// `worry *= factor`, with `factor` drawn fresh each time.
    Multiplicative {
        /// Distribution of the factor.
        factor: DistributionSpec,
    },
}

impl Default for WorryEscalation {
    fn default() -> Self {
        Self::Increment { amount: 0.1 }
    }
}

/// What happens to worry when a household adapts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorryOnAdapt {
    /// Worry becomes the measure's `worry_reset` value.
    #[default]
    Reset,
    /// Worry is multiplied by the measure's damage multiplier.
    Scale,
}

/// How a measure's investment combines with the current investment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentRule {
    /// Investment becomes the measure's value.
    #[default]
    Overwrite,
    /// The measure's value is added.
    Accumulate,
}

/// How neighbor investments are folded into the running total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborAggregation {
    /// Add the sum of neighbor investments.
    #[default]
    Sum,
    /// Add the mean neighbor investment (0 with no neighbors).
    Average,
}

/// What an adapted household does on later ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptedReentry {
    /// Nothing at all.
    #[default]
    Skip,
    /// Recompute the appraisal for logging, then discard it.
    Reappraise,
}

/// Parameters of the household decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Income above which a household counts as high income.
    #[serde(default = "default_income_threshold")]
    pub income_threshold: f64,

    /// Age below which a household counts as young.
    #[serde(default = "default_age_threshold")]
    pub age_threshold: f64,

    /// Willingness-to-adapt score a household must exceed to act.
    #[serde(default = "default_w2p_threshold")]
    pub w2p_threshold: f64,

    /// Cost reduction per unit of accumulated neighbor investment.
    #[serde(default = "default_diffusion_coefficient")]
    pub diffusion_coefficient: f64,

    /// Adoption cost before any neighbor influence.
    #[serde(default = "default_base_cost")]
    pub base_cost: f64,

    /// Lower bound on the derived cost; `None` leaves it unbounded.
    #[serde(default)]
    pub cost_floor: Option<f64>,

    /// Per-measure effects.
    #[serde(default)]
    pub measures: MeasureTable,

    /// Multiplier on estimated damage when perceiving threat.
    #[serde(default = "default_perceived_damage_scale")]
    pub perceived_damage_scale: f64,

    /// Distribution of the per-tick perceived flood probability.
    #[serde(default = "default_perceived_probability")]
    pub perceived_probability: DistributionSpec,

    /// Whether coping appraisal is scaled by the government policy.
    #[serde(default = "default_true")]
    pub apply_government_policy: bool,

    /// Hops in the social network that count as neighbors.
    #[serde(default = "default_neighbor_radius")]
    pub neighbor_radius: u32,

    /// How worry grows after inaction.
    #[serde(default)]
    pub worry_escalation: WorryEscalation,

    /// What adoption does to worry.
    #[serde(default)]
    pub worry_on_adapt: WorryOnAdapt,

    /// How measure investment combines with existing investment.
    #[serde(default)]
    pub investment_rule: InvestmentRule,

    /// How neighbor investments are aggregated.
    #[serde(default)]
    pub neighbor_aggregation: NeighborAggregation,

    /// Behaviour of already adapted households.
    #[serde(default)]
    pub adapted_reentry: AdaptedReentry,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            income_threshold: default_income_threshold(),
            age_threshold: default_age_threshold(),
            w2p_threshold: default_w2p_threshold(),
            diffusion_coefficient: default_diffusion_coefficient(),
            base_cost: default_base_cost(),
            cost_floor: None,
            measures: MeasureTable::default(),
            perceived_damage_scale: default_perceived_damage_scale(),
            perceived_probability: default_perceived_probability(),
            apply_government_policy: true,
            neighbor_radius: default_neighbor_radius(),
            worry_escalation: WorryEscalation::default(),
            worry_on_adapt: WorryOnAdapt::default(),
            investment_rule: InvestmentRule::default(),
            neighbor_aggregation: NeighborAggregation::default(),
            adapted_reentry: AdaptedReentry::default(),
        }
    }
}

impl BehaviourConfig {
    /// Reject negative thresholds and other out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_non_negative("behaviour.income_threshold", self.income_threshold)?;
        check_non_negative("behaviour.age_threshold", self.age_threshold)?;
        check_non_negative("behaviour.w2p_threshold", self.w2p_threshold)?;
        check_non_negative("behaviour.diffusion_coefficient", self.diffusion_coefficient)?;
        check_non_negative("behaviour.base_cost", self.base_cost)?;
        check_non_negative("behaviour.perceived_damage_scale", self.perceived_damage_scale)?;
        if let Some(floor) = self.cost_floor {
            check_finite("behaviour.cost_floor", floor)?;
            if floor > self.base_cost {
                return Err(ConfigurationError::OutOfRange {
                    field: "behaviour.cost_floor".to_owned(),
                    reason: format!("must not exceed base_cost ({})", self.base_cost),
                });
            }
        }
        self.perceived_probability
            .validate("behaviour.perceived_probability")?;
        match self.worry_escalation {
            WorryEscalation::Increment { amount } => {
                check_finite("behaviour.worry_escalation.amount", amount)?;
                if amount <= 0.0 {
                    return Err(ConfigurationError::OutOfRange {
                        field: "behaviour.worry_escalation.amount".to_owned(),
                        reason: format!("must be positive, got {amount}"),
                    });
                }
            }
            WorryEscalation::Multiplicative { factor } => {
                factor.validate("behaviour.worry_escalation.factor")?;
            }
        }
        self.measures.validate()
    }
}

/// Distributions of the per-household profile drawn at spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdProfileConfig {
    /// Initial worry.
    #[serde(default = "default_worry")]
    pub worry: DistributionSpec,

    /// Fixed initial worry for every household; overrides `worry`.
    #[serde(default)]
    pub initial_worry: Option<f64>,

    /// Clamp sampled initial worry at zero.
    #[serde(default)]
    pub clamp_initial_worry: bool,

    /// Annual income.
    #[serde(default = "default_income")]
    pub income: DistributionSpec,

    /// Age of the head of household, in years.
    #[serde(default = "default_age")]
    pub age: DistributionSpec,

    /// Perceived effectiveness of measures.
    #[serde(default = "default_efficacy")]
    pub response_efficacy: DistributionSpec,

    /// Perceived ability to carry out measures.
    #[serde(default = "default_efficacy")]
    pub self_efficacy: DistributionSpec,
}

impl Default for HouseholdProfileConfig {
    fn default() -> Self {
        Self {
            worry: default_worry(),
            initial_worry: None,
            clamp_initial_worry: false,
            income: default_income(),
            age: default_age(),
            response_efficacy: default_efficacy(),
            self_efficacy: default_efficacy(),
        }
    }
}

impl HouseholdProfileConfig {
    /// Check every distribution and the worry override.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.worry.validate("households.worry")?;
        self.income.validate("households.income")?;
        self.age.validate("households.age")?;
        self.response_efficacy
            .validate("households.response_efficacy")?;
        self.self_efficacy.validate("households.self_efficacy")?;
        if let Some(worry) = self.initial_worry {
            check_non_negative("households.initial_worry", worry)?;
        }
        Ok(())
    }
}

/// Fail unless `value` is finite.
pub fn check_finite(field: &str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NotFinite {
            field: field.to_owned(),
        })
    }
}

/// Fail unless `value` is finite and not negative.
pub fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigurationError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigurationError::Negative {
            field: field.to_owned(),
            value: value.to_string(),
        });
    }
    Ok(())
}

const fn default_flood_barrier() -> MeasureEffect {
    MeasureEffect {
        damage_multiplier: 0.2,
        worry_reset: 0.1,
        investment: 0.8,
    }
}

const fn default_structural_measures() -> MeasureEffect {
    MeasureEffect {
        damage_multiplier: 0.4,
        worry_reset: 0.2,
        investment: 0.6,
    }
}

const fn default_adaptive_building_use() -> MeasureEffect {
    MeasureEffect {
        damage_multiplier: 0.6,
        worry_reset: 0.3,
        investment: 0.4,
    }
}

const fn default_flood_insurance() -> MeasureEffect {
    MeasureEffect {
        damage_multiplier: 0.8,
        worry_reset: 0.4,
        investment: 0.2,
    }
}

const fn default_income_threshold() -> f64 {
    50_000.0
}

const fn default_age_threshold() -> f64 {
    50.0
}

const fn default_w2p_threshold() -> f64 {
    0.5
}

const fn default_diffusion_coefficient() -> f64 {
    0.3
}

const fn default_base_cost() -> f64 {
    1.0
}

const fn default_perceived_damage_scale() -> f64 {
    1.0
}

const fn default_perceived_probability() -> DistributionSpec {
    DistributionSpec::Beta {
        alpha: 2.0,
        beta: 5.0,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_neighbor_radius() -> u32 {
    1
}

const fn default_worry() -> DistributionSpec {
    DistributionSpec::Gaussian {
        mean: 0.2,
        std_dev: 1.0,
    }
}

const fn default_income() -> DistributionSpec {
    DistributionSpec::Uniform {
        low: 20_000.0,
        high: 100_000.0,
    }
}

const fn default_age() -> DistributionSpec {
    DistributionSpec::Uniform {
        low: 18.0,
        high: 90.0,
    }
}

const fn default_efficacy() -> DistributionSpec {
    DistributionSpec::Uniform {
        low: 0.0,
        high: 1.0,
    }
}
