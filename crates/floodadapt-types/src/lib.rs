//! Shared type definitions for the flood adaptation simulation.
//!
//! Every crate in the workspace speaks in these types: identifiers for the
//! agents, the 2D point a household lives on, the adaptation action a
//! household has taken, and the serializable snapshot used in tick
//! summaries.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agent identifiers
//! - [`enums`] -- [`AdaptationAction`] and its measure ordering
//! - [`structs`] -- [`Point`] and [`HouseholdSnapshot`]

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::AdaptationAction;
pub use ids::{GovernmentId, HouseholdId};
pub use structs::{HouseholdSnapshot, Point};
