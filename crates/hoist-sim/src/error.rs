use hoist_core::{CarId, CoreError, Floor};
use hoist_dispatch::DispatchError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A request named a car the building does not have.
    #[error("{0} is not in this building")]
    UnknownCar(CarId),

    /// A passenger was spawned outside the building.
    #[error("floor {floor} is outside the building (max floor {max_floor})")]
    FloorOutOfRange {
        /// The offending floor.
        floor: Floor,
        /// The highest valid floor.
        max_floor: Floor,
    },

    /// The spawn probability is not in `0.0..=1.0`.
    #[error("spawn rate {0} must be between 0 and 1")]
    InvalidSpawnRate(f64),

    /// Invalid building or passenger.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The scheduler refused an event.
    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),
}
