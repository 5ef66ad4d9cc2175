use crate::direction::Floor;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when building descriptions or requests are malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A building needs at least two floors to have anywhere to go.
    #[error("building must have at least 2 floors, got {0}")]
    TooFewFloors(u32),

    /// A building without cars cannot serve anyone.
    #[error("building must have at least one car")]
    NoCars,

    /// Car capacity must allow at least one passenger.
    #[error("car capacity must be at least 1")]
    ZeroCapacity,

    /// A floor index lies outside `[0, max_floor]`.
    #[error("floor {floor} is outside the building (max floor {max_floor})")]
    FloorOutOfRange {
        /// The offending floor.
        floor: Floor,
        /// The highest valid floor.
        max_floor: Floor,
    },

    /// A trip whose origin equals its destination.
    #[error("passenger origin and destination are both floor {0}")]
    EmptyTrip(Floor),

    /// A direction string that is neither "up" nor "down".
    #[error("unknown direction: \"{0}\"")]
    UnknownDirection(String),
}
