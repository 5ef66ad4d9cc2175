//! Core types for Hoist: floors, travel directions, passengers, and the
//! read-only views of cars and floors that a building exposes.
//!
//! This crate is the shared vocabulary between the dispatch scheduler and
//! whatever drives it. It holds no scheduling logic of its own.

/// Building dimensions and the read-only car and floor views.
pub mod building;
/// Travel directions for hall calls and cars.
pub mod direction;
/// Error types used throughout the crate.
pub mod error;
/// Passenger identifiers and trip requests.
pub mod passenger;

/// Re-export building types.
pub use building::{BuildingSpec, CarId, CarView, FloorView};
/// Re-export direction types.
pub use direction::{CarDirection, Direction, Floor};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export passenger types.
pub use passenger::{Passenger, PassengerId};
