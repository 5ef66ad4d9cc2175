//! Discrete reference building for Hoist.
//!
//! [`Building`] is the ground truth a dispatch scheduler reads and commands:
//! cars move one floor per tick, passengers queue per floor and direction,
//! and boarding respects capacity. [`Simulation`] owns a building and a
//! [`hoist_dispatch::DispatchScheduler`] and delivers every event in tick
//! order, recording trips along the way.

/// Ground-truth cars and floor queues.
pub mod building;
/// Simulation clock.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Error types for the simulation crate.
pub mod error;
/// Trace of delivered events.
pub mod event;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Seeded random passenger arrivals.
pub mod traffic;
/// Per-passenger trip records and run statistics.
pub mod trips;

/// Re-export of [`building::Building`].
pub use building::Building;
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`] and [`event::SimEvent`].
pub use event::{EventLog, SimEvent};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`traffic::TrafficGenerator`].
pub use traffic::TrafficGenerator;
/// Re-exports of [`trips::TripLog`], [`trips::TripRecord`], and [`trips::TripSummary`].
pub use trips::{TripLog, TripRecord, TripSummary};
