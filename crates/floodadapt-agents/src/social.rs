//! Social influence: neighbor investment lowers a household's cost.
//!
//! When a household adapts it reads the current investment of every
//! neighbor (never itself) and folds it into its running
//! `cumulative_neighbor_investment`. Its cost is then
//!
//! ```text
//! cost = base_cost - k * cumulative_neighbor_investment
//! ```
//!
//! optionally bounded below by `cost_floor`. The running total only ever
//! grows; with no floor the cost may go below zero.

use std::collections::BTreeMap;

use floodadapt_types::HouseholdId;
use floodadapt_world::NeighborQuery;
use tracing::trace;

use crate::config::{BehaviourConfig, NeighborAggregation};
use crate::household::Household;

/// Read access to other households' current investment.
pub trait InvestmentLookup {
    /// Current investment of `household`, or `None` if it is unknown.
    fn self_investment(&self, household: HouseholdId) -> Option<f64>;
}

impl InvestmentLookup for BTreeMap<HouseholdId, f64> {
    fn self_investment(&self, household: HouseholdId) -> Option<f64> {
        self.get(&household).copied()
    }
}

/// Applies neighbor investment to a household's cost.
#[derive(Debug, Clone, Copy)]
pub struct SocialInfluenceLedger<'a> {
    config: &'a BehaviourConfig,
}

impl<'a> SocialInfluenceLedger<'a> {
    /// Create a ledger over the behaviour configuration.
    pub const fn new(config: &'a BehaviourConfig) -> Self {
        Self { config }
    }

    /// Add the neighbors' investment to `household`'s running total.
    ///
    /// Returns the amount added. Neighbors missing from `peers` are
    /// skipped. With [`NeighborAggregation::Average`] and no known
    /// neighbors the amount is 0.
    pub fn collect_neighbor_investment(
        &self,
        household: &mut Household,
        neighbors: &dyn NeighborQuery,
        peers: &dyn InvestmentLookup,
    ) -> f64 {
        let id = household.id();
        let investments: Vec<f64> = neighbors
            .neighbors(id, self.config.neighbor_radius)
            .into_iter()
            .filter(|&neighbor| neighbor != id)
            .filter_map(|neighbor| peers.self_investment(neighbor))
            .collect();
        let amount = aggregate(&investments, self.config.neighbor_aggregation);
        household.add_neighbor_investment(amount);
        trace!(
            household = %id,
            neighbors = investments.len(),
            amount,
            cumulative = household.cumulative_neighbor_investment(),
            "Collected neighbor investment"
        );
        amount
    }

    /// Recompute and store `household`'s cost. Returns the new cost.
    pub fn derive_cost(&self, household: &mut Household) -> f64 {
        let cost = self.cost_for(household.cumulative_neighbor_investment());
        household.set_cost(cost);
        cost
    }

    /// Cost for a given cumulative neighbor investment.
    pub fn cost_for(&self, cumulative_neighbor_investment: f64) -> f64 {
        let cost = self
            .config
            .diffusion_coefficient
            .mul_add(-cumulative_neighbor_investment, self.config.base_cost);
        match self.config.cost_floor {
            Some(floor) => cost.max(floor),
            None => cost,
        }
    }
}

fn aggregate(investments: &[f64], rule: NeighborAggregation) -> f64 {
    let total: f64 = investments.iter().sum();
    match rule {
        NeighborAggregation::Sum => total,
        NeighborAggregation::Average => match u32::try_from(investments.len()) {
            Ok(0) | Err(_) => 0.0,
            Ok(count) => total / f64::from(count),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use floodadapt_types::Point;
    use floodadapt_world::{ExposureEstimate, SocialNetwork};

    use super::*;
    use crate::household::HouseholdProfile;

    const EPS: f64 = 1e-12;

    fn household(id: HouseholdId) -> Household {
        Household::new(
            id,
            Point::new(0.0, 0.0),
            false,
            ExposureEstimate {
                depth: 0.0,
                damage: 0.0,
            },
            HouseholdProfile {
                worry: 0.0,
                income: 0.0,
                age: 0.0,
                response_efficacy: 0.0,
                self_efficacy: 0.0,
                cost: 1.0,
            },
        )
    }

    struct Nobody;

    impl NeighborQuery for Nobody {
        fn neighbors(&self, _household: HouseholdId, _radius: u32) -> BTreeSet<HouseholdId> {
            BTreeSet::new()
        }
    }

    /// A query that wrongly reports the household as its own neighbor.
    struct Mirror;

    impl NeighborQuery for Mirror {
        fn neighbors(&self, household: HouseholdId, _radius: u32) -> BTreeSet<HouseholdId> {
            BTreeSet::from([household])
        }
    }

    #[test]
    fn neighbor_cost_coupling() {
        let a = HouseholdId::new();
        let b = HouseholdId::new();
        let mut network = SocialNetwork::new(&[a, b]);
        assert!(network.link(a, b).is_ok());
        let peers = BTreeMap::from([(a, 0.8)]);

        let config = BehaviourConfig::default();
        let ledger = SocialInfluenceLedger::new(&config);
        let mut hb = household(b);
        let added = ledger.collect_neighbor_investment(&mut hb, &network, &peers);
        let cost = ledger.derive_cost(&mut hb);
        assert!((added - 0.8).abs() < EPS);
        assert!((cost - (1.0 - 0.3 * 0.8)).abs() < EPS);
        assert!((hb.cost() - cost).abs() < EPS);
    }

    #[test]
    fn zero_neighbors_leave_cost_at_base() {
        let config = BehaviourConfig::default();
        let ledger = SocialInfluenceLedger::new(&config);
        let mut h = household(HouseholdId::new());
        let peers = BTreeMap::new();
        ledger.collect_neighbor_investment(&mut h, &Nobody, &peers);
        ledger.derive_cost(&mut h);
        assert!(h.cumulative_neighbor_investment().abs() < EPS);
        assert!((h.cost() - 1.0).abs() < EPS);
    }

    #[test]
    fn average_with_no_neighbors_is_zero() {
        let config = BehaviourConfig {
            neighbor_aggregation: NeighborAggregation::Average,
            ..BehaviourConfig::default()
        };
        let ledger = SocialInfluenceLedger::new(&config);
        let mut h = household(HouseholdId::new());
        let added = ledger.collect_neighbor_investment(&mut h, &Nobody, &BTreeMap::new());
        assert!(added.abs() < EPS);
        assert!(h.cumulative_neighbor_investment().is_finite());
    }

    #[test]
    fn average_divides_by_known_neighbors() {
        assert!((aggregate(&[0.8, 0.4], NeighborAggregation::Average) - 0.6).abs() < EPS);
        assert!((aggregate(&[0.8, 0.4], NeighborAggregation::Sum) - 1.2).abs() < EPS);
    }

    #[test]
    fn self_is_never_counted() {
        let config = BehaviourConfig::default();
        let ledger = SocialInfluenceLedger::new(&config);
        let id = HouseholdId::new();
        let mut h = household(id);
        let peers = BTreeMap::from([(id, 0.8)]);
        let added = ledger.collect_neighbor_investment(&mut h, &Mirror, &peers);
        assert!(added.abs() < EPS);
    }

    #[test]
    fn cumulative_total_only_grows() {
        let a = HouseholdId::new();
        let b = HouseholdId::new();
        let mut network = SocialNetwork::new(&[a, b]);
        assert!(network.link(a, b).is_ok());
        let peers = BTreeMap::from([(a, 0.8)]);
        let config = BehaviourConfig::default();
        let ledger = SocialInfluenceLedger::new(&config);
        let mut hb = household(b);
        for _ in 0..5 {
            ledger.collect_neighbor_investment(&mut hb, &network, &peers);
        }
        assert!((hb.cumulative_neighbor_investment() - 4.0).abs() < 1e-9);
        // Unbounded by default: 1 - 0.3 * 4 < 0.
        assert!(ledger.derive_cost(&mut hb) < 0.0);
    }

    #[test]
    fn cost_floor_bounds_cost() {
        let config = BehaviourConfig {
            cost_floor: Some(0.0),
            ..BehaviourConfig::default()
        };
        let ledger = SocialInfluenceLedger::new(&config);
        assert!(ledger.cost_for(100.0).abs() < EPS);
        assert!((ledger.cost_for(1.0) - 0.7).abs() < EPS);
    }
}
