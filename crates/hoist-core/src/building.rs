use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, Floor};
use crate::error::{CoreError, CoreResult};
use crate::passenger::PassengerId;

/// Stable index of a car within the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CarId(pub usize);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "car {}", self.0)
    }
}

/// Building dimensions handed to the scheduler at init time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    /// Number of floors; floors are numbered `0..floors`.
    pub floors: u32,
    /// Number of cars in the fleet.
    pub cars: usize,
    /// Maximum passengers per car.
    pub capacity: usize,
}

impl Default for BuildingSpec {
    fn default() -> Self {
        Self {
            floors: 10,
            cars: 2,
            capacity: 8,
        }
    }
}

impl BuildingSpec {
    /// Create a building description.
    pub fn new(floors: u32, cars: usize, capacity: usize) -> Self {
        Self {
            floors,
            cars,
            capacity,
        }
    }

    /// The highest floor index.
    pub fn max_floor(&self) -> Floor {
        self.floors.saturating_sub(1)
    }

    /// Returns true if `floor` exists in this building.
    pub fn contains(&self, floor: Floor) -> bool {
        floor < self.floors
    }

    /// Check that `floor` exists, producing a descriptive error if not.
    pub fn check_floor(&self, floor: Floor) -> CoreResult<()> {
        if self.contains(floor) {
            Ok(())
        } else {
            Err(CoreError::FloorOutOfRange {
                floor,
                max_floor: self.max_floor(),
            })
        }
    }

    /// Validate the dimensions.
    pub fn validate(&self) -> CoreResult<()> {
        if self.floors < 2 {
            return Err(CoreError::TooFewFloors(self.floors));
        }
        if self.cars == 0 {
            return Err(CoreError::NoCars);
        }
        if self.capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(())
    }

    /// Iterate over every car id in the fleet.
    pub fn car_ids(&self) -> impl Iterator<Item = CarId> {
        (0..self.cars).map(CarId)
    }
}

/// Read-only snapshot of a car, as reported by the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarView {
    /// The car.
    pub id: CarId,
    /// Last floor the car stopped at or passed.
    pub floor: Floor,
    /// Continuous position for display; never used for scheduling.
    pub position: f64,
    /// Direction of the current or last movement.
    pub heading: Option<Direction>,
    /// Floor the car is currently travelling to, if any.
    pub target: Option<Floor>,
    /// Maximum passengers.
    pub capacity: usize,
    /// Passengers on board and their destinations.
    pub passengers: BTreeMap<PassengerId, Floor>,
}

impl CarView {
    /// Returns true if the car has nowhere to go.
    pub fn is_idle(&self) -> bool {
        self.target.is_none()
    }

    /// Returns true if the car is travelling towards a different floor.
    pub fn is_moving(&self) -> bool {
        self.target.is_some_and(|t| t != self.floor)
    }

    /// Number of passengers on board.
    pub fn load(&self) -> usize {
        self.passengers.len()
    }

    /// Returns true if no one else can board.
    pub fn is_full(&self) -> bool {
        self.load() >= self.capacity
    }
}

/// Read-only snapshot of the queues waiting at a floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorView {
    /// The floor.
    pub floor: Floor,
    /// Passengers waiting to go up, in arrival order.
    pub up_queue: Vec<PassengerId>,
    /// Passengers waiting to go down, in arrival order.
    pub down_queue: Vec<PassengerId>,
}

impl FloorView {
    /// An empty floor.
    pub fn new(floor: Floor) -> Self {
        Self {
            floor,
            ..Self::default()
        }
    }

    /// The queue for one direction.
    pub fn queue(&self, direction: Direction) -> &[PassengerId] {
        match direction {
            Direction::Up => &self.up_queue,
            Direction::Down => &self.down_queue,
        }
    }

    /// Number of passengers waiting in one direction.
    pub fn waiting(&self, direction: Direction) -> usize {
        self.queue(direction).len()
    }

    /// Returns true if nobody is waiting in either direction.
    pub fn is_empty(&self) -> bool {
        self.up_queue.is_empty() && self.down_queue.is_empty()
    }
}
