//! Configuration, clock, tick cycle, and orchestration for the flood
//! adaptation simulation.
//!
//! This crate turns a `floodadapt-config.yaml` into a running model:
//! it spawns households, generates their social network, and drives the
//! per-tick cycle (clock, flood shock, government, households, summary).
//!
//! # Modules
//!
//! - [`clock`] -- Checked tick counter ([`SimulationClock`]).
//! - [`config`] -- YAML configuration loading and validation.
//! - [`runner`] -- Bounded simulation loop with a per-tick callback.
//! - [`scheduler`] -- Household activation order.
//! - [`spawn`] -- Builds the [`SimulationState`] from configuration.
//! - [`tick`] -- The per-tick cycle.
//!
//! [`SimulationClock`]: clock::SimulationClock
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod runner;
pub mod scheduler;
pub mod spawn;
pub mod tick;
