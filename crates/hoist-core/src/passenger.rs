use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, Floor};
use crate::error::{CoreError, CoreResult};

/// Identifier of a passenger, unique within one building run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassengerId(pub u64);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A passenger's trip request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Unique identifier.
    pub id: PassengerId,
    /// Floor where the passenger calls a car.
    pub origin: Floor,
    /// Floor the passenger wants to reach.
    pub destination: Floor,
    /// Tick at which the passenger arrived at the origin floor.
    pub arrive_tick: u64,
}

impl Passenger {
    /// Create a trip request. Origin and destination must differ.
    pub fn new(id: PassengerId, origin: Floor, destination: Floor, arrive_tick: u64) -> CoreResult<Self> {
        if origin == destination {
            return Err(CoreError::EmptyTrip(origin));
        }
        Ok(Self {
            id,
            origin,
            destination,
            arrive_tick,
        })
    }

    /// The hall call direction this passenger presses.
    pub fn direction(&self) -> Direction {
        if self.destination > self.origin {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_destination() {
        let up = Passenger::new(PassengerId(1), 0, 4, 0).unwrap();
        let down = Passenger::new(PassengerId(2), 4, 1, 0).unwrap();
        assert_eq!(up.direction(), Direction::Up);
        assert_eq!(down.direction(), Direction::Down);
    }

    #[test]
    fn same_floor_trip_rejected() {
        assert_eq!(
            Passenger::new(PassengerId(1), 3, 3, 0),
            Err(CoreError::EmptyTrip(3))
        );
    }

    #[test]
    fn id_display() {
        assert_eq!(PassengerId(17).to_string(), "P17");
    }
}
