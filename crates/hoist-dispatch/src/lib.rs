//! LOOK-based dispatch scheduler for Hoist elevator fleets.
//!
//! A [`DispatchScheduler`] owns the scheduling state of every car and the
//! registry of outstanding hall calls. The building drives it by delivering
//! [`DispatchEvent`]s one at a time and answers through the [`Simulator`]
//! port: read-only car and floor views, plus a single motion command.
//!
//! Cars follow LOOK: they keep sweeping in one direction while work remains
//! ahead, picking up same-direction callers they pass, then reverse toward
//! the furthest remaining demand.

/// Per-car scheduling state and the LOOK state machine.
pub mod car;
/// Dispatch policy configuration.
pub mod config;
/// Assignment cost model.
pub mod cost;
/// Error types for the dispatch crate.
pub mod error;
/// Inbound building events.
pub mod event;
/// Decision log.
pub mod log;
/// The port between the scheduler and the building it drives.
pub mod port;
/// Hall call registry.
pub mod registry;
/// The event-driven scheduler.
pub mod scheduler;

/// Re-exports of [`car::CarState`], [`car::Demand`], and [`car::Plan`].
pub use car::{CarState, Demand, Plan};
/// Re-export of [`config::DispatchConfig`].
pub use config::DispatchConfig;
/// Re-export of [`cost::CostModel`].
pub use cost::CostModel;
/// Re-exports of [`error::DispatchError`] and [`error::DispatchResult`].
pub use error::{DispatchError, DispatchResult};
/// Re-export of [`event::DispatchEvent`].
pub use event::DispatchEvent;
/// Re-exports of [`log::DecisionLog`], [`log::Decision`], and [`log::DecisionKind`].
pub use log::{Decision, DecisionKind, DecisionLog};
/// Re-exports of [`port::Simulator`] and [`port::CommandRejected`].
pub use port::{CommandRejected, Simulator};
/// Re-exports of [`registry::HallCallRegistry`] and [`registry::HallCall`].
pub use registry::{HallCall, HallCallRegistry};
/// Re-export of [`scheduler::DispatchScheduler`].
pub use scheduler::DispatchScheduler;
