//! The set of households in a run.
//!
//! Households live in a `Vec` in insertion order with an ID index beside
//! it. To step one household while its neighbors stay readable, the vector
//! is split around it: the acting household is borrowed mutably and the
//! slices before and after it serve as the [`InvestmentLookup`] for
//! neighbor collection.

use std::collections::BTreeMap;

use floodadapt_types::{HouseholdId, HouseholdSnapshot};
use floodadapt_world::NeighborQuery;

use crate::config::BehaviourConfig;
use crate::error::AgentError;
use crate::government::Government;
use crate::household::{Household, StepContext, StepOutcome};
use crate::sampler::Sampler;
use crate::social::InvestmentLookup;

/// All households, addressable by ID.
#[derive(Debug, Clone, Default)]
pub struct Population {
    households: Vec<Household>,
    index: BTreeMap<HouseholdId, usize>,
}

impl Population {
    /// An empty population.
    pub const fn new() -> Self {
        Self {
            households: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Add a household. IDs must be unique.
    pub fn insert(&mut self, household: Household) -> Result<(), AgentError> {
        let id = household.id();
        if self.index.contains_key(&id) {
            return Err(AgentError::DuplicateHousehold(id));
        }
        self.index.insert(id, self.households.len());
        self.households.push(household);
        Ok(())
    }

    /// Number of households.
    pub fn len(&self) -> usize {
        self.households.len()
    }

    /// Whether there are no households.
    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }

    /// Look a household up by ID.
    pub fn get(&self, id: HouseholdId) -> Option<&Household> {
        self.index.get(&id).and_then(|&i| self.households.get(i))
    }

    /// Look a household up by ID for mutation.
    pub fn get_mut(&mut self, id: HouseholdId) -> Option<&mut Household> {
        self.index.get(&id).and_then(|&i| self.households.get_mut(i))
    }

    /// Households in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Household> {
        self.households.iter()
    }

    /// Households in insertion order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Household> {
        self.households.iter_mut()
    }

    /// IDs in insertion order.
    pub fn ids(&self) -> Vec<HouseholdId> {
        self.households.iter().map(Household::id).collect()
    }

    /// Snapshots of every household in insertion order.
    pub fn snapshots(&self) -> Vec<HouseholdSnapshot> {
        self.households.iter().map(Household::snapshot).collect()
    }

    /// Step one household, letting it read every other household's
    /// current investment.
    pub fn step_household(
        &mut self,
        id: HouseholdId,
        config: &BehaviourConfig,
        government: &Government,
        sampler: &mut dyn Sampler,
        neighbors: &dyn NeighborQuery,
    ) -> Result<StepOutcome, AgentError> {
        let position = *self
            .index
            .get(&id)
            .ok_or(AgentError::HouseholdNotFound(id))?;
        let (before, rest) = self.households.split_at_mut(position);
        let (household, after) = rest
            .split_first_mut()
            .ok_or(AgentError::HouseholdNotFound(id))?;
        let peers = Peers {
            before,
            after,
            index: &self.index,
            position,
        };
        let mut ctx = StepContext {
            config,
            government,
            sampler,
            neighbors,
            peers: &peers,
        };
        household.step(&mut ctx)
    }
}

impl InvestmentLookup for Population {
    fn self_investment(&self, household: HouseholdId) -> Option<f64> {
        self.get(household).map(Household::get_self_investment)
    }
}

/// Every household except the one currently stepping.
struct Peers<'a> {
    before: &'a [Household],
    after: &'a [Household],
    index: &'a BTreeMap<HouseholdId, usize>,
    position: usize,
}

impl InvestmentLookup for Peers<'_> {
    fn self_investment(&self, household: HouseholdId) -> Option<f64> {
        let &i = self.index.get(&household)?;
        let peer = if i < self.position {
            self.before.get(i)
        } else {
            let offset = i.checked_sub(self.position)?.checked_sub(1)?;
            self.after.get(offset)
        };
        peer.map(Household::get_self_investment)
    }
}

#[cfg(test)]
mod tests {
    use floodadapt_types::{AdaptationAction, Point};
    use floodadapt_world::{ExposureEstimate, SocialNetwork};

    use super::*;
    use crate::household::HouseholdProfile;
    use crate::sampler::ScriptedSampler;

    const EPS: f64 = 1e-9;

    fn household(income: f64, age: f64, worry: f64) -> Household {
        Household::new(
            HouseholdId::new(),
            Point::new(0.0, 0.0),
            true,
            ExposureEstimate {
                depth: 1.0,
                damage: 0.3,
            },
            HouseholdProfile {
                worry,
                income,
                age,
                response_efficacy: 0.5,
                self_efficacy: 0.5,
                cost: 1.0,
            },
        )
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut population = Population::new();
        let h = household(1.0, 1.0, 0.0);
        assert!(population.insert(h.clone()).is_ok());
        assert!(matches!(
            population.insert(h),
            Err(AgentError::DuplicateHousehold(_))
        ));
        assert_eq!(population.len(), 1);
    }

    #[test]
    fn unknown_household_cannot_step() {
        let mut population = Population::new();
        let network = SocialNetwork::new(&[]);
        let mut sampler = ScriptedSampler::new([0.2]);
        let result = population.step_household(
            HouseholdId::new(),
            &BehaviourConfig::default(),
            &Government::default(),
            &mut sampler,
            &network,
        );
        assert!(matches!(result, Err(AgentError::HouseholdNotFound(_))));
    }

    #[test]
    fn adapting_household_reads_neighbor_on_either_side() {
        // Middle household adapts; its neighbors are one adapted household
        // before it and one after it.
        let left = household(70_000.0, 25.0, 5.0);
        let middle = household(30_000.0, 70.0, 5.0);
        let right = household(60_000.0, 70.0, 5.0);
        let ids = [left.id(), middle.id(), right.id()];
        let mut population = Population::new();
        for h in [left, middle, right] {
            assert!(population.insert(h).is_ok());
        }
        let mut network = SocialNetwork::new(&ids);
        let [l, m, r] = ids;
        assert!(network.link(l, m).is_ok());
        assert!(network.link(m, r).is_ok());

        let config = BehaviourConfig::default();
        let government = Government::default();
        let mut sampler = ScriptedSampler::new([0.2, 0.2, 0.2]);
        for id in [l, r, m] {
            let outcome =
                population.step_household(id, &config, &government, &mut sampler, &network);
            assert!(matches!(outcome, Ok(StepOutcome::Adapted { .. })));
        }

        // Left invested 0.8 (flood barrier), right 0.6 (structural).
        let stepped = population.get(m);
        assert!(stepped.is_some_and(|h| (h.cumulative_neighbor_investment() - 1.4).abs() < EPS
            && (h.cost() - (1.0 - 0.3 * 1.4)).abs() < EPS
            && h.adaptation_action() == AdaptationAction::FloodInsurance));
    }

    #[test]
    fn activation_order_changes_what_is_read() {
        let a = household(70_000.0, 25.0, 5.0);
        let b = household(70_000.0, 25.0, 5.0);
        let (ia, ib) = (a.id(), b.id());
        let mut population = Population::new();
        assert!(population.insert(a).is_ok());
        assert!(population.insert(b).is_ok());
        let mut network = SocialNetwork::new(&[ia, ib]);
        assert!(network.link(ia, ib).is_ok());
        let config = BehaviourConfig::default();
        let government = Government::default();
        let mut sampler = ScriptedSampler::new([0.2, 0.2]);

        for id in [ia, ib] {
            assert!(
                population
                    .step_household(id, &config, &government, &mut sampler, &network)
                    .is_ok()
            );
        }
        // `a` stepped first and saw b's pre-tick investment of 0; `b` saw 0.8.
        assert!(
            population
                .get(ia)
                .is_some_and(|h| h.cumulative_neighbor_investment().abs() < EPS)
        );
        assert!(
            population
                .get(ib)
                .is_some_and(|h| (h.cumulative_neighbor_investment() - 0.8).abs() < EPS)
        );
    }

    #[test]
    fn population_serves_investment_lookup() {
        let mut population = Population::new();
        let h = household(1.0, 1.0, 0.0);
        let id = h.id();
        assert!(population.insert(h).is_ok());
        assert_eq!(population.self_investment(id).map(f64::to_bits), Some(0.0_f64.to_bits()));
        assert!(population.self_investment(HouseholdId::new()).is_none());
    }
}
