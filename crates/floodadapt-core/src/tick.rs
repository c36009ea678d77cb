//! The per-tick cycle.
//!
//! Every tick runs the same phases in order:
//!
//! 1. Advance the clock.
//! 2. Flood shock, if this is the configured tick: every household's
//!    actual depth becomes `factor * estimated depth`, with `factor`
//!    drawn per household.
//! 3. Government step.
//! 4. Every household steps once, in activation order.
//! 5. Summarize.

use std::collections::BTreeMap;

use floodadapt_agents::{
    AgentError, BehaviourConfig, Government, Population, Sampler, SamplerError, StepOutcome,
};
use floodadapt_types::{AdaptationAction, HouseholdId};
use floodadapt_world::{ExposureModel, SocialNetwork};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{ClockError, SimulationClock};
use crate::config::FloodShockConfig;
use crate::scheduler::{self, ActivationOrder};

/// Errors that can occur during a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A household step failed.
    #[error("household error for {household_id}: {source}")]
    Household {
        /// The household that caused the error.
        household_id: HouseholdId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// Drawing a flood-shock depth factor failed.
    #[error("flood shock sampling failed: {source}")]
    FloodShock {
        /// The underlying sampler error.
        #[from]
        source: SamplerError,
    },
}

/// Summary of a completed tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Whether the flood shock hit this tick.
    pub flood_shock: bool,
    /// Number of households.
    pub households: u32,
    /// Households adapted at the end of the tick.
    pub adapted_total: u32,
    /// Households that adapted during this tick, with their measure.
    pub adopted_this_tick: BTreeMap<HouseholdId, AdaptationAction>,
    /// Adapted households per measure.
    pub measure_counts: BTreeMap<AdaptationAction, u32>,
    /// Mean worry across households.
    pub mean_worry: f64,
    /// Mean adoption cost across households.
    pub mean_cost: f64,
    /// Mean actual damage factor across households.
    pub mean_damage_actual: f64,
}

/// Complete simulation state.
pub struct SimulationState {
    /// The simulation clock.
    pub clock: SimulationClock,
    /// Every household.
    pub population: Population,
    /// Social network between households.
    pub network: SocialNetwork,
    /// The government.
    pub government: Government,
    /// Depth-damage model, used again by the flood shock.
    pub exposure: ExposureModel,
    /// Decision engine parameters.
    pub behaviour: BehaviourConfig,
    /// The flood event, if any.
    pub flood_shock: Option<FloodShockConfig>,
    /// Household activation order.
    pub activation: ActivationOrder,
    /// Distribution draws for households and the flood shock.
    pub sampler: Box<dyn Sampler + Send>,
    /// RNG for activation shuffles.
    pub rng: StdRng,
}

/// Execute one complete tick of the simulation.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    info!(tick, households = state.population.len(), "Tick started");

    let flood_shock = apply_flood_shock(state, tick)?;

    state.government.step(tick);

    let order = scheduler::activation_order(
        state.activation,
        &state.population.ids(),
        &mut state.rng,
    );
    let mut adopted_this_tick = BTreeMap::new();
    for household_id in order {
        let outcome = state
            .population
            .step_household(
                household_id,
                &state.behaviour,
                &state.government,
                state.sampler.as_mut(),
                &state.network,
            )
            .map_err(|source| TickError::Household {
                household_id,
                source,
            })?;
        if let StepOutcome::Adapted { action, .. } = outcome {
            adopted_this_tick.insert(household_id, action);
        }
    }

    let summary = summarize(tick, flood_shock, adopted_this_tick, &state.population);
    info!(
        tick,
        flood_shock,
        adopted = summary.adopted_this_tick.len(),
        adapted_total = summary.adapted_total,
        mean_worry = summary.mean_worry,
        mean_cost = summary.mean_cost,
        "Tick completed"
    );
    Ok(summary)
}

/// Flood every household if the shock is due this tick.
fn apply_flood_shock(state: &mut SimulationState, tick: u64) -> Result<bool, TickError> {
    let Some(shock) = state.flood_shock.as_ref().filter(|s| s.tick == tick) else {
        return Ok(false);
    };
    for household in state.population.iter_mut() {
        let factor = state.sampler.sample(&shock.depth_factor)?;
        let depth = factor * household.flood_depth_estimated();
        household.apply_flood_shock(depth, &state.exposure);
        debug!(
            household = %household.id(),
            depth,
            damage = household.flood_damage_actual(),
            "Flood shock applied"
        );
    }
    info!(tick, households = state.population.len(), "Flood shock");
    Ok(true)
}

fn summarize(
    tick: u64,
    flood_shock: bool,
    adopted_this_tick: BTreeMap<HouseholdId, AdaptationAction>,
    population: &Population,
) -> TickSummary {
    let mut measure_counts: BTreeMap<AdaptationAction, u32> = BTreeMap::new();
    let mut worry = 0.0;
    let mut cost = 0.0;
    let mut damage = 0.0;
    for household in population.iter() {
        if household.is_adapted() {
            let count = measure_counts.entry(household.adaptation_action()).or_insert(0);
            *count = count.saturating_add(1);
        }
        worry += household.worry();
        cost += household.cost();
        damage += household.flood_damage_actual();
    }
    let households = u32::try_from(population.len()).unwrap_or(u32::MAX);
    let adapted_total = measure_counts
        .values()
        .fold(0_u32, |total, &n| total.saturating_add(n));
    TickSummary {
        tick,
        flood_shock,
        households,
        adapted_total,
        adopted_this_tick,
        measure_counts,
        mean_worry: mean(worry, households),
        mean_cost: mean(cost, households),
        mean_damage_actual: mean(damage, households),
    }
}

fn mean(total: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use floodadapt_agents::{GovernmentConfig, Household, HouseholdProfile, ScriptedSampler};
    use floodadapt_types::Point;
    use floodadapt_world::ExposureEstimate;
    use rand::SeedableRng;

    use super::*;

    const EPS: f64 = 1e-9;

    fn household(worry: f64, depth: f64) -> Household {
        let exposure = ExposureModel::default();
        Household::new(
            HouseholdId::new(),
            Point::new(0.0, 0.0),
            true,
            ExposureEstimate {
                depth,
                damage: exposure.damage_from_depth(depth),
            },
            HouseholdProfile {
                worry,
                income: 70_000.0,
                age: 25.0,
                response_efficacy: 0.5,
                self_efficacy: 0.5,
                cost: 1.0,
            },
        )
    }

    fn state(households: Vec<Household>, draws: Vec<f64>, shock_tick: Option<u64>) -> SimulationState {
        let mut population = Population::new();
        let ids: Vec<HouseholdId> = households.iter().map(Household::id).collect();
        for h in households {
            let _ = population.insert(h);
        }
        SimulationState {
            clock: SimulationClock::new(),
            population,
            network: SocialNetwork::new(&ids),
            government: Government::new(&GovernmentConfig::default()).unwrap_or_default(),
            exposure: ExposureModel::default(),
            behaviour: BehaviourConfig::default(),
            flood_shock: shock_tick.map(|tick| FloodShockConfig {
                tick,
                ..FloodShockConfig::default()
            }),
            activation: ActivationOrder::Sequential,
            sampler: Box::new(ScriptedSampler::new(draws)),
            rng: StdRng::seed_from_u64(0),
        }
    }

    #[test]
    fn tick_advances_clock_and_counts_adoptions() {
        // First household adapts (w2p well above threshold), second does not.
        let mut s = state(
            vec![household(5.0, 1.0), household(-2.0, 0.0)],
            vec![0.2, 0.2],
            None,
        );
        let summary = run_tick(&mut s);
        assert!(summary.is_ok());
        if let Ok(summary) = summary {
            assert_eq!(summary.tick, 1);
            assert!(!summary.flood_shock);
            assert_eq!(summary.households, 2);
            assert_eq!(summary.adapted_total, 1);
            assert_eq!(summary.adopted_this_tick.len(), 1);
            assert_eq!(
                summary.measure_counts.get(&AdaptationAction::FloodBarrier),
                Some(&1)
            );
        }
        assert_eq!(s.clock.tick(), 1);
    }

    #[test]
    fn flood_shock_sets_actual_depth_before_households_act() {
        // Shock draws one factor per household, then each household draws a
        // perceived probability.
        let mut s = state(vec![household(-5.0, 2.0)], vec![0.5, 0.2], Some(1));
        let summary = run_tick(&mut s);
        assert!(summary.is_ok_and(|t| t.flood_shock));
        let h = s.population.iter().next();
        let expected = ExposureModel::default().damage_from_depth(1.0);
        assert!(h.is_some_and(|h| (h.flood_depth_actual() - 1.0).abs() < EPS
            && (h.flood_damage_actual() - expected).abs() < EPS));
    }

    #[test]
    fn shock_only_fires_on_its_tick() {
        let mut s = state(vec![household(-5.0, 2.0)], vec![0.2, 0.5, 0.2], Some(2));
        assert!(run_tick(&mut s).is_ok_and(|t| !t.flood_shock));
        assert!(run_tick(&mut s).is_ok_and(|t| t.flood_shock));
    }

    #[test]
    fn household_failure_names_the_household() {
        let h = household(0.0, 0.0);
        let id = h.id();
        let mut s = state(vec![h], Vec::new(), None);
        let result = run_tick(&mut s);
        assert!(matches!(
            result,
            Err(TickError::Household { household_id, .. }) if household_id == id
        ));
    }

    #[test]
    fn empty_population_summarizes_to_zero() {
        let mut s = state(Vec::new(), Vec::new(), None);
        let summary = run_tick(&mut s);
        assert!(summary.is_ok_and(|t| t.households == 0
            && t.adapted_total == 0
            && t.mean_worry.abs() < EPS));
    }
}
