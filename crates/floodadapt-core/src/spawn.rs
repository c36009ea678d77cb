//! Household spawner.
//!
//! Builds a ready-to-run [`SimulationState`] from a validated
//! configuration. All randomness flows from `world.seed`: one RNG drives
//! household IDs, locations, profiles and network generation, and a second,
//! derived from the first, drives activation shuffles. The government's ID
//! is the one exception and never reaches the report.

use floodadapt_agents::{
    AgentError, ConfigurationError, Government, Household, HouseholdProfile, Population,
    RngSampler, SamplerError,
};
use floodadapt_types::HouseholdId;
use floodadapt_world::{FloodMap, SocialNetwork, WorldError};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::info;

use crate::clock::SimulationClock;
use crate::config::{ConfigError, SimulationConfig};
use crate::tick::SimulationState;

/// Errors that can occur while spawning the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The flood map or network could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A household could not be added.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A profile draw failed.
    #[error("sampler error: {source}")]
    Sampler {
        /// The underlying sampler error.
        #[from]
        source: SamplerError,
    },

    /// The government configuration is invalid.
    #[error("government error: {source}")]
    Government {
        /// The underlying configuration error.
        #[from]
        source: ConfigurationError,
    },
}

/// Spawn households using the configured flood map.
pub fn spawn(config: &SimulationConfig) -> Result<SimulationState, SpawnError> {
    config.validate()?;
    let flood_map = config.flood_map.build()?;
    spawn_with_flood_map(config, flood_map.as_ref())
}

/// Spawn households using a caller-supplied flood map.
///
/// The configured `flood_map` section is ignored.
pub fn spawn_with_flood_map(
    config: &SimulationConfig,
    flood_map: &dyn FloodMap,
) -> Result<SimulationState, SpawnError> {
    config.validate()?;
    let mut sampler = RngSampler::new(StdRng::seed_from_u64(config.world.seed));

    let mut population = Population::new();
    let mut in_floodplain_count: u32 = 0;
    for _ in 0..config.world.household_count {
        let id = HouseholdId::from_random_bytes(sampler.rng_mut().random());
        let location = config.domain.random_location(sampler.rng_mut());
        let in_floodplain = config.floodplain.contains(location);
        if in_floodplain {
            in_floodplain_count = in_floodplain_count.saturating_add(1);
        }
        let estimate = config.exposure.estimate(location, flood_map);
        let profile = HouseholdProfile::sample(
            &config.households,
            config.behaviour.base_cost,
            &mut sampler,
        )?;
        population.insert(Household::new(
            id,
            location,
            in_floodplain,
            estimate,
            profile,
        ))?;
    }

    let ids = population.ids();
    let network = SocialNetwork::generate(&config.network, &ids, sampler.rng_mut())?;
    let government = Government::new(&config.government)?;
    let rng = StdRng::from_rng(sampler.rng_mut());

    info!(
        households = population.len(),
        in_floodplain = in_floodplain_count,
        network_edges = network.edge_count(),
        seed = config.world.seed,
        "Households spawned"
    );

    Ok(SimulationState {
        clock: SimulationClock::new(),
        population,
        network,
        government,
        exposure: config.exposure.clone(),
        behaviour: config.behaviour.clone(),
        flood_shock: config.flood_shock.clone(),
        activation: config.world.activation,
        sampler: Box::new(sampler),
        rng,
    })
}
