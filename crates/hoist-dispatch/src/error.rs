use std::path::PathBuf;

use hoist_core::{CarId, CoreError, Floor};

/// Alias for `Result<T, DispatchError>`.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced by the dispatch scheduler.
///
/// None of these leave the scheduler in an inconsistent state; an event that
/// fails validation is simply not applied.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// An event named a car the fleet does not have.
    #[error("{0} is not part of the fleet")]
    UnknownCar(CarId),

    /// An event named a floor outside the building.
    #[error("floor {floor} is outside the building (max floor {max_floor})")]
    FloorOutOfRange {
        /// The offending floor.
        floor: Floor,
        /// The highest valid floor.
        max_floor: Floor,
    },

    /// The building description is unusable.
    #[error("invalid building: {0}")]
    InvalidBuilding(#[from] CoreError),

    /// A configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::DispatchConfig`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
