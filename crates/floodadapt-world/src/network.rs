//! Social network between households and the neighbor query service.
//!
//! Households are nodes; an undirected edge means two households talk to
//! each other about flood protection. The network is generated once at
//! setup and never changes during a run. Agents never hold on to it: they
//! ask [`NeighborQuery::neighbors`] for the current neighbor set whenever
//! they need it and drop the answer afterwards.
//!
//! # Generators
//!
//! | kind | parameters |
//! |------|------------|
//! | Erdős–Rényi | each pair linked with probability `probability` |
//! | Barabási–Albert | each new node attaches to `edges_per_node` existing nodes, preferentially by degree |
//! | Watts–Strogatz | ring lattice of `nearest_neighbours`, each edge rewired with `rewiring_probability` |
//! | none | isolated households |

use std::collections::{BTreeMap, BTreeSet};

use floodadapt_types::HouseholdId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;

/// Graph query service supplying neighbor sets.
pub trait NeighborQuery {
    /// Households within `radius` hops of `household`, never including
    /// `household` itself. Unknown households have no neighbors.
    fn neighbors(&self, household: HouseholdId, radius: u32) -> BTreeSet<HouseholdId>;
}

/// Which random graph model to build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkKind {
    /// Every pair linked independently.
    ErdosRenyi {
        /// Probability that a given pair is linked.
        probability: f64,
    },
    /// Preferential attachment.
    BarabasiAlbert {
        /// Edges each arriving node adds.
        edges_per_node: usize,
    },
    /// Small-world ring lattice.
    WattsStrogatz {
        /// Each node starts linked to its `nearest_neighbours / 2` ring
        /// neighbours on either side.
        nearest_neighbours: usize,
        /// Probability of rewiring each lattice edge.
        rewiring_probability: f64,
    },
    /// No edges at all.
    NoNetwork,
}

impl Default for NetworkKind {
    fn default() -> Self {
        Self::WattsStrogatz {
            nearest_neighbours: 5,
            rewiring_probability: 0.2,
        }
    }
}

impl NetworkKind {
    /// Check the parameters against the number of households.
    pub fn validate(&self, household_count: usize) -> Result<(), WorldError> {
        match *self {
            Self::ErdosRenyi { probability } => check_probability("probability", probability),
            Self::BarabasiAlbert { edges_per_node } => {
                if edges_per_node == 0 {
                    return Err(invalid_network("edges_per_node must be at least 1".to_owned()));
                }
                if household_count > 0 && edges_per_node >= household_count {
                    return Err(invalid_network(format!(
                        "edges_per_node ({edges_per_node}) must be below the household count ({household_count})"
                    )));
                }
                Ok(())
            }
            Self::WattsStrogatz {
                nearest_neighbours,
                rewiring_probability,
            } => {
                check_probability("rewiring_probability", rewiring_probability)?;
                if household_count > 0 && nearest_neighbours >= household_count {
                    return Err(invalid_network(format!(
                        "nearest_neighbours ({nearest_neighbours}) must be below the household count ({household_count})"
                    )));
                }
                Ok(())
            }
            Self::NoNetwork => Ok(()),
        }
    }
}

/// Undirected social network over households.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialNetwork {
    adjacency: BTreeMap<HouseholdId, BTreeSet<HouseholdId>>,
}

impl SocialNetwork {
    /// A network of isolated households.
    pub fn new(households: &[HouseholdId]) -> Self {
        Self {
            adjacency: households.iter().map(|&id| (id, BTreeSet::new())).collect(),
        }
    }

    /// Generate a network of the given kind over `households`.
    ///
    /// The node order of `households` matters for ring-based generators and
    /// for reproducibility: the same order and RNG state yield the same graph.
    pub fn generate<R: Rng + ?Sized>(
        kind: &NetworkKind,
        households: &[HouseholdId],
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        kind.validate(households.len())?;
        let mut network = Self::new(households);
        match *kind {
            NetworkKind::ErdosRenyi { probability } => {
                network.link_erdos_renyi(households, probability, rng);
            }
            NetworkKind::BarabasiAlbert { edges_per_node } => {
                network.link_barabasi_albert(households, edges_per_node, rng)?;
            }
            NetworkKind::WattsStrogatz {
                nearest_neighbours,
                rewiring_probability,
            } => {
                network.link_watts_strogatz(households, nearest_neighbours, rewiring_probability, rng);
            }
            NetworkKind::NoNetwork => {}
        }
        debug!(
            kind = ?kind,
            households = network.household_count(),
            edges = network.edge_count(),
            "Social network generated"
        );
        Ok(network)
    }

    /// Link two households. Self-links are ignored.
    pub fn link(&mut self, a: HouseholdId, b: HouseholdId) -> Result<(), WorldError> {
        if !self.adjacency.contains_key(&a) {
            return Err(WorldError::UnknownHousehold(a));
        }
        if !self.adjacency.contains_key(&b) {
            return Err(WorldError::UnknownHousehold(b));
        }
        if a != b {
            self.insert_edge(a, b);
        }
        Ok(())
    }

    /// Remove the link between two households, if present.
    pub fn unlink(&mut self, a: HouseholdId, b: HouseholdId) {
        if let Some(edges) = self.adjacency.get_mut(&a) {
            edges.remove(&b);
        }
        if let Some(edges) = self.adjacency.get_mut(&b) {
            edges.remove(&a);
        }
    }

    /// Whether two households are directly linked.
    pub fn are_linked(&self, a: HouseholdId, b: HouseholdId) -> bool {
        self.adjacency.get(&a).is_some_and(|edges| edges.contains(&b))
    }

    /// Number of direct links of a household (0 if unknown).
    pub fn degree(&self, household: HouseholdId) -> usize {
        self.adjacency.get(&household).map_or(0, BTreeSet::len)
    }

    /// Number of households in the network.
    pub fn household_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Insert an undirected edge between two known, distinct households.
    fn insert_edge(&mut self, a: HouseholdId, b: HouseholdId) {
        if let Some(edges) = self.adjacency.get_mut(&a) {
            edges.insert(b);
        }
        if let Some(edges) = self.adjacency.get_mut(&b) {
            edges.insert(a);
        }
    }

    fn link_erdos_renyi<R: Rng + ?Sized>(
        &mut self,
        households: &[HouseholdId],
        probability: f64,
        rng: &mut R,
    ) {
        let mut rest = households;
        while let Some((&a, tail)) = rest.split_first() {
            for &b in tail {
                if rng.random_bool(probability) {
                    self.insert_edge(a, b);
                }
            }
            rest = tail;
        }
    }

    fn link_barabasi_albert<R: Rng + ?Sized>(
        &mut self,
        households: &[HouseholdId],
        edges_per_node: usize,
        rng: &mut R,
    ) -> Result<(), WorldError> {
        if households.is_empty() {
            return Ok(());
        }
        let (initial, arriving) = households.split_at_checked(edges_per_node).ok_or_else(|| {
            invalid_network("edges_per_node exceeds the household count".to_owned())
        })?;
        let mut targets: Vec<HouseholdId> = initial.to_vec();
        // Every endpoint of every edge, so a uniform pick is degree-weighted.
        let mut repeated: Vec<HouseholdId> = Vec::new();
        for &source in arriving {
            for &target in &targets {
                self.insert_edge(source, target);
            }
            repeated.extend(targets.iter().copied());
            repeated.extend(std::iter::repeat_n(source, edges_per_node));
            targets = distinct_sample(&repeated, edges_per_node, rng);
        }
        Ok(())
    }

    fn link_watts_strogatz<R: Rng + ?Sized>(
        &mut self,
        households: &[HouseholdId],
        nearest_neighbours: usize,
        rewiring_probability: f64,
        rng: &mut R,
    ) {
        let n = households.len();
        let half = nearest_neighbours / 2;
        for offset in 1..=half {
            for (i, &a) in households.iter().enumerate() {
                if let Some(&b) = ring_neighbour(households, i, offset) {
                    self.insert_edge(a, b);
                }
            }
        }
        let max_degree = n.saturating_sub(1);
        for offset in 1..=half {
            for (i, &a) in households.iter().enumerate() {
                let Some(&b) = ring_neighbour(households, i, offset) else {
                    continue;
                };
                if !self.are_linked(a, b) || !rng.random_bool(rewiring_probability) {
                    continue;
                }
                if self.degree(a) >= max_degree {
                    continue;
                }
                let replacement = loop {
                    let index = rng.random_range(0..n);
                    if let Some(&candidate) = households.get(index)
                        && candidate != a
                        && !self.are_linked(a, candidate)
                    {
                        break candidate;
                    }
                };
                self.unlink(a, b);
                self.insert_edge(a, replacement);
            }
        }
    }
}

impl NeighborQuery for SocialNetwork {
    fn neighbors(&self, household: HouseholdId, radius: u32) -> BTreeSet<HouseholdId> {
        let mut visited = BTreeSet::from([household]);
        let mut frontier = vec![household];
        for _ in 0..radius {
            let mut next = Vec::new();
            for node in &frontier {
                let Some(edges) = self.adjacency.get(node) else {
                    continue;
                };
                for &neighbor in edges {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        visited.remove(&household);
        visited
    }
}

/// The household `offset` places further round the ring from index `i`.
fn ring_neighbour(households: &[HouseholdId], i: usize, offset: usize) -> Option<&HouseholdId> {
    let index = i.checked_add(offset)?.checked_rem(households.len())?;
    households.get(index)
}

/// Pick `count` distinct households uniformly from `pool` (with duplicates
/// in `pool` acting as weights). `pool` must hold at least `count` distinct
/// values.
fn distinct_sample<R: Rng + ?Sized>(
    pool: &[HouseholdId],
    count: usize,
    rng: &mut R,
) -> Vec<HouseholdId> {
    let distinct = pool.iter().collect::<BTreeSet<_>>().len();
    let wanted = count.min(distinct);
    let mut chosen = BTreeSet::new();
    while chosen.len() < wanted {
        if let Some(&pick) = pool.get(rng.random_range(0..pool.len())) {
            chosen.insert(pick);
        }
    }
    chosen.into_iter().collect()
}

fn check_probability(name: &str, value: f64) -> Result<(), WorldError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid_network(format!("{name} must lie in [0, 1], got {value}")))
    }
}

const fn invalid_network(reason: String) -> WorldError {
    WorldError::InvalidNetwork { reason }
}
