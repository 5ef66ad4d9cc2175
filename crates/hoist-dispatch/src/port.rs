use hoist_core::{CarId, CarView, Floor, FloorView};

/// Why a building refused a `go_to_floor` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandRejected {
    /// The car does not exist.
    #[error("unknown car")]
    UnknownCar,
    /// The target floor does not exist.
    #[error("floor out of range")]
    FloorOutOfRange,
    /// The car is mid-transit and the command was not marked immediate.
    #[error("car is in transit")]
    InTransit,
}

/// The building the scheduler drives.
///
/// Views are ground truth and are only read; the one mutation is the
/// outbound motion command.
pub trait Simulator {
    /// Current snapshot of a car.
    fn car_view(&self, car: CarId) -> Option<CarView>;

    /// Current snapshot of the queues at a floor.
    fn floor_view(&self, floor: Floor) -> Option<FloorView>;

    /// Send a car to a floor. `immediate` replaces the current leg; otherwise the
    /// command only applies to a car at rest.
    fn go_to_floor(&mut self, car: CarId, floor: Floor, immediate: bool) -> Result<(), CommandRejected>;
}
