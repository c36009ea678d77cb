//! Household decision engine for the flood adaptation simulation.
//!
//! Everything a household *decides* lives here: how threatened and how
//! capable it feels, whether that is enough to act, which measure it
//! adopts, and how its neighbors' investment changes its cost. The crate
//! does no I/O; geography and the social network come from
//! `floodadapt-world`, randomness from a [`Sampler`].
//!
//! # Modules
//!
//! - [`appraisal`] -- Threat, coping, and willingness-to-adapt scoring ([`AppraisalEngine`])
//! - [`config`] -- Behaviour parameters and household profile distributions ([`BehaviourConfig`])
//! - [`decision`] -- Threshold test, measure selection, and measure effects ([`DecisionPolicy`])
//! - [`error`] -- Error types ([`AgentError`], [`ConfigurationError`], [`SamplerError`])
//! - [`government`] -- The passive [`Government`] agent
//! - [`household`] -- [`Household`] state and its per-tick step
//! - [`population`] -- The [`Population`] container
//! - [`sampler`] -- Distribution sampling ([`Sampler`], [`RngSampler`], [`ScriptedSampler`])
//! - [`social`] -- Neighbor investment and cost ([`SocialInfluenceLedger`])

pub mod appraisal;
pub mod config;
pub mod decision;
pub mod error;
pub mod government;
pub mod household;
pub mod population;
pub mod sampler;
pub mod social;

// Re-export primary types at crate root for convenience.
pub use appraisal::{
    Appraisal, AppraisalEngine, AppraisalInputs, coping_appraisal, threat_appraisal,
    willingness_to_adapt,
};
pub use config::{
    AdaptedReentry, BehaviourConfig, HouseholdProfileConfig, InvestmentRule, MeasureEffect,
    MeasureTable, NeighborAggregation, WorryEscalation, WorryOnAdapt,
};
pub use decision::{Decision, DecisionPolicy};
pub use error::{AgentError, ConfigurationError, SamplerError};
pub use government::{Government, GovernmentConfig};
pub use household::{Household, HouseholdProfile, StepContext, StepOutcome};
pub use population::Population;
pub use sampler::{DistributionSpec, RngSampler, Sampler, ScriptedSampler};
pub use social::{InvestmentLookup, SocialInfluenceLedger};
