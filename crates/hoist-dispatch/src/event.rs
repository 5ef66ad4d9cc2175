use hoist_core::{CarId, Direction, Floor, Passenger};

/// An inbound event from the building, delivered one at a time.
///
/// Within a tick the building delivers `TickStarted`, then passenger calls,
/// then per-car motion, stop, board and alight events, then `TickEnded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// The building is ready; car positions may be read.
    Init,
    /// A new tick begins.
    TickStarted {
        /// The tick number.
        tick: u64,
    },
    /// A passenger pressed a hall button.
    PassengerCall {
        /// The caller.
        passenger: Passenger,
        /// Floor of the call.
        floor: Floor,
        /// Requested direction.
        direction: Direction,
    },
    /// A car has nothing left to do.
    ElevatorIdle {
        /// The car.
        car: CarId,
    },
    /// A car arrived and its doors opened.
    ElevatorStopped {
        /// The car.
        car: CarId,
        /// The floor it stopped at.
        floor: Floor,
    },
    /// A passenger entered a car.
    PassengerBoard {
        /// The car.
        car: CarId,
        /// The passenger, including their destination.
        passenger: Passenger,
    },
    /// A passenger left a car.
    PassengerAlight {
        /// The car.
        car: CarId,
        /// The passenger.
        passenger: Passenger,
        /// Floor where they left.
        floor: Floor,
    },
    /// A car is about to pass a floor it was not going to stop at.
    ElevatorPassingFloor {
        /// The car.
        car: CarId,
        /// The floor being passed.
        floor: Floor,
        /// Direction of travel.
        direction: Direction,
    },
    /// A car is about to arrive at its target floor.
    ElevatorApproaching {
        /// The car.
        car: CarId,
        /// The floor about to be reached.
        floor: Floor,
        /// Direction of travel.
        direction: Direction,
    },
    /// Every event of the tick has been delivered.
    TickEnded {
        /// The tick number.
        tick: u64,
    },
}

impl DispatchEvent {
    /// The car this event concerns, if any.
    pub fn car(&self) -> Option<CarId> {
        match self {
            Self::Init
            | Self::TickStarted { .. }
            | Self::TickEnded { .. }
            | Self::PassengerCall { .. } => None,
            Self::ElevatorIdle { car }
            | Self::ElevatorStopped { car, .. }
            | Self::PassengerBoard { car, .. }
            | Self::PassengerAlight { car, .. }
            | Self::ElevatorPassingFloor { car, .. }
            | Self::ElevatorApproaching { car, .. } => Some(*car),
        }
    }
}
