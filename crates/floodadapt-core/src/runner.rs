//! Bounded simulation loop.
//!
//! [`run_simulation`] wraps [`run_tick`] and stops after `max_ticks`
//! ticks. A [`TickCallback`] sees every summary as it is produced.
//!
//! [`run_tick`]: crate::tick::run_tick

use tracing::info;

use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run `max_ticks` ticks.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails; ticks already run stay applied.
pub fn run_simulation(
    state: &mut SimulationState,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut final_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks,
        households = state.population.len(),
        activation = ?state.activation,
        "Simulation starting"
    );

    while total_ticks < max_ticks {
        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, state);
        final_summary = Some(summary);
    }

    Ok(SimulationResult {
        final_summary,
        total_ticks,
    })
}

/// Log the simulation end.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        adapted_total = result.final_summary.as_ref().map(|s| s.adapted_total),
        households = result.final_summary.as_ref().map(|s| s.households),
        "Simulation ended"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::spawn::spawn;

    struct Counting {
        ticks: Vec<u64>,
    }

    impl TickCallback for Counting {
        fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
            self.ticks.push(summary.tick);
        }
    }

    fn config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.household_count = 8;
        config.network = floodadapt_world::NetworkKind::NoNetwork;
        config
    }

    #[test]
    fn runs_exactly_max_ticks() {
        let state = spawn(&config());
        assert!(state.is_ok());
        if let Ok(mut state) = state {
            let mut callback = Counting { ticks: Vec::new() };
            let result = run_simulation(&mut state, 4, &mut callback);
            assert!(result.is_ok_and(|r| r.total_ticks == 4
                && r.final_summary.is_some_and(|s| s.tick == 4)));
            assert_eq!(callback.ticks, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn zero_ticks_runs_nothing() {
        let state = spawn(&config());
        assert!(state.is_ok());
        if let Ok(mut state) = state {
            let result = run_simulation(&mut state, 0, &mut NoOpCallback);
            assert!(result.is_ok_and(|r| r.total_ticks == 0 && r.final_summary.is_none()));
            assert_eq!(state.clock.tick(), 0);
        }
    }
}
