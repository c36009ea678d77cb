//! Tick callback that records the adoption curve and builds the final
//! JSON report.

use std::collections::BTreeMap;

use floodadapt_core::runner::{SimulationResult, TickCallback};
use floodadapt_core::tick::{SimulationState, TickSummary};
use floodadapt_types::{AdaptationAction, HouseholdSnapshot};
use serde::Serialize;
use tracing::debug;

/// One point of the adoption curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    /// The tick.
    pub tick: u64,
    /// Whether the flood shock hit.
    pub flood_shock: bool,
    /// Households adapted at the end of the tick.
    pub adapted_total: u32,
    /// Households that adapted during the tick.
    pub adopted: u32,
    /// Mean worry.
    pub mean_worry: f64,
    /// Mean adoption cost.
    pub mean_cost: f64,
}

impl From<&TickSummary> for TickRecord {
    fn from(summary: &TickSummary) -> Self {
        Self {
            tick: summary.tick,
            flood_shock: summary.flood_shock,
            adapted_total: summary.adapted_total,
            adopted: u32::try_from(summary.adopted_this_tick.len()).unwrap_or(u32::MAX),
            mean_worry: summary.mean_worry,
            mean_cost: summary.mean_cost,
        }
    }
}

/// The document printed to stdout after a run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Seed the run used.
    pub seed: u64,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Adapted households per measure at the end of the run.
    pub measure_counts: BTreeMap<AdaptationAction, u32>,
    /// Adoption curve.
    pub ticks: Vec<TickRecord>,
    /// Final state of every household.
    pub households: Vec<HouseholdSnapshot>,
}

/// Collects a [`TickRecord`] per tick.
#[derive(Debug, Default)]
pub struct ReportCallback {
    ticks: Vec<TickRecord>,
}

impl ReportCallback {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self { ticks: Vec::new() }
    }

    /// Assemble the report from the recorded curve and the final state.
    pub fn into_report(
        self,
        seed: u64,
        result: &SimulationResult,
        state: &SimulationState,
    ) -> RunReport {
        RunReport {
            seed,
            total_ticks: result.total_ticks,
            measure_counts: result
                .final_summary
                .as_ref()
                .map(|s| s.measure_counts.clone())
                .unwrap_or_default(),
            ticks: self.ticks,
            households: state.population.snapshots(),
        }
    }
}

impl TickCallback for ReportCallback {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        for (household, action) in &summary.adopted_this_tick {
            debug!(tick = summary.tick, %household, %action, "Household adopted measure");
        }
        self.ticks.push(TickRecord::from(summary));
    }
}
