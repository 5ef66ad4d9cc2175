use std::collections::{BTreeMap, VecDeque};

use hoist_core::{BuildingSpec, CarId, CarView, Direction, Floor, FloorView, Passenger, PassengerId};
use hoist_dispatch::{CommandRejected, Simulator};

use crate::error::{SimError, SimResult};

/// One car as the building sees it.
#[derive(Debug, Clone)]
struct Car {
    floor: Floor,
    heading: Option<Direction>,
    target: Option<Floor>,
    riders: BTreeMap<PassengerId, Passenger>,
}

impl Car {
    fn is_moving(&self) -> bool {
        self.target.is_some_and(|t| t != self.floor)
    }
}

#[derive(Debug, Clone, Default)]
struct Landing {
    up: VecDeque<Passenger>,
    down: VecDeque<Passenger>,
}

impl Landing {
    fn queue_mut(&mut self, direction: Direction) -> &mut VecDeque<Passenger> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }
}

/// Ground truth for a building: where each car is, who rides it, and who
/// waits at each floor.
///
/// Cars move one floor per tick. A car whose target equals its floor is at
/// the landing with doors open and will run an arrival cycle.
#[derive(Debug, Clone)]
pub struct Building {
    spec: BuildingSpec,
    cars: Vec<Car>,
    landings: Vec<Landing>,
    opposite_boarding: bool,
}

impl Building {
    /// An empty building with every car at rest on floor 0.
    pub fn new(spec: BuildingSpec) -> SimResult<Self> {
        spec.validate()?;
        let cars = spec
            .car_ids()
            .map(|_| Car {
                floor: 0,
                heading: None,
                target: None,
                riders: BTreeMap::new(),
            })
            .collect();
        let landings = (0..spec.floors).map(|_| Landing::default()).collect();
        Ok(Self {
            spec,
            cars,
            landings,
            opposite_boarding: false,
        })
    }

    /// Let passengers waiting to travel against the car's heading board
    /// once its own direction's queue is exhausted.
    pub fn with_opposite_boarding(mut self, allow: bool) -> Self {
        self.opposite_boarding = allow;
        self
    }

    /// The building's dimensions.
    pub fn spec(&self) -> &BuildingSpec {
        &self.spec
    }

    fn car(&self, id: CarId) -> SimResult<&Car> {
        self.cars.get(id.0).ok_or(SimError::UnknownCar(id))
    }

    fn car_mut(&mut self, id: CarId) -> SimResult<&mut Car> {
        self.cars.get_mut(id.0).ok_or(SimError::UnknownCar(id))
    }

    fn check_floor(&self, floor: Floor) -> SimResult<()> {
        if self.spec.contains(floor) {
            Ok(())
        } else {
            Err(SimError::FloorOutOfRange {
                floor,
                max_floor: self.spec.max_floor(),
            })
        }
    }

    /// Move a resting car to `floor` without any events. Used to set up a run.
    pub fn place_car(&mut self, id: CarId, floor: Floor) -> SimResult<()> {
        self.check_floor(floor)?;
        let car = self.car_mut(id)?;
        car.floor = floor;
        car.target = None;
        Ok(())
    }

    /// Put a passenger in the queue at their origin.
    pub fn add_waiting(&mut self, passenger: Passenger) -> SimResult<()> {
        self.check_floor(passenger.origin)?;
        self.check_floor(passenger.destination)?;
        let direction = passenger.direction();
        self.landings[passenger.origin as usize]
            .queue_mut(direction)
            .push_back(passenger);
        Ok(())
    }

    /// The car's commanded target, if any.
    pub fn target(&self, id: CarId) -> SimResult<Option<Floor>> {
        Ok(self.car(id)?.target)
    }

    /// The floor a moving car will reach next and its direction of travel.
    pub fn next_floor(&self, id: CarId) -> SimResult<Option<(Floor, Direction)>> {
        let car = self.car(id)?;
        let next = car
            .target
            .and_then(|target| Direction::toward(car.floor, target))
            .map(|direction| match direction {
                Direction::Up => (car.floor + 1, direction),
                Direction::Down => (car.floor - 1, direction),
            });
        Ok(next)
    }

    /// Move one floor toward the current target.
    pub fn advance(&mut self, id: CarId) -> SimResult<()> {
        let car = self.car_mut(id)?;
        if let Some(direction) = car.target.and_then(|t| Direction::toward(car.floor, t)) {
            car.floor = match direction {
                Direction::Up => car.floor + 1,
                Direction::Down => car.floor - 1,
            };
            car.heading = Some(direction);
        }
        Ok(())
    }

    /// Returns true if the car is at its target with doors about to open.
    pub fn has_arrived(&self, id: CarId) -> SimResult<bool> {
        let car = self.car(id)?;
        Ok(car.target == Some(car.floor))
    }

    /// Open the doors: the car is now at rest and accepts new commands.
    pub fn open_doors(&mut self, id: CarId) -> SimResult<Floor> {
        let car = self.car_mut(id)?;
        car.target = None;
        Ok(car.floor)
    }

    /// Let out everyone whose destination is the current floor.
    pub fn alight(&mut self, id: CarId) -> SimResult<Vec<Passenger>> {
        let car = self.car_mut(id)?;
        let floor = car.floor;
        let leaving: Vec<PassengerId> = car
            .riders
            .values()
            .filter(|p| p.destination == floor)
            .map(|p| p.id)
            .collect();
        Ok(leaving
            .into_iter()
            .filter_map(|pid| car.riders.remove(&pid))
            .collect())
    }

    /// Let in waiting passengers, first come first served, up to capacity.
    ///
    /// A car with riders takes its heading's queue. An empty car takes its
    /// heading's queue if anyone is in it, otherwise the other one. With
    /// opposite boarding the remaining queue fills any room left.
    pub fn board(&mut self, id: CarId) -> SimResult<Vec<Passenger>> {
        let capacity = self.spec.capacity;
        let car = self.cars.get_mut(id.0).ok_or(SimError::UnknownCar(id))?;
        let landing = &mut self.landings[car.floor as usize];
        let heading = car.heading.unwrap_or(Direction::Up);
        let first = if car.riders.is_empty() && landing.queue_mut(heading).is_empty() {
            heading.opposite()
        } else {
            heading
        };
        let mut order = vec![first];
        if self.opposite_boarding {
            order.push(first.opposite());
        }

        let mut boarded = Vec::new();
        for direction in order {
            let queue = landing.queue_mut(direction);
            while car.riders.len() < capacity {
                let Some(passenger) = queue.pop_front() else {
                    break;
                };
                car.riders.insert(passenger.id, passenger.clone());
                boarded.push(passenger);
            }
        }
        Ok(boarded)
    }

    /// Passengers waiting on every floor.
    pub fn waiting_count(&self) -> usize {
        self.landings.iter().map(|l| l.up.len() + l.down.len()).sum()
    }

    /// Passengers in every car.
    pub fn riding_count(&self) -> usize {
        self.cars.iter().map(|c| c.riders.len()).sum()
    }

    /// Ids of every car.
    pub fn car_ids(&self) -> impl Iterator<Item = CarId> {
        (0..self.cars.len()).map(CarId)
    }
}

impl Simulator for Building {
    fn car_view(&self, id: CarId) -> Option<CarView> {
        let car = self.cars.get(id.0)?;
        Some(CarView {
            id,
            floor: car.floor,
            position: f64::from(car.floor),
            heading: car.heading,
            target: car.target,
            capacity: self.spec.capacity,
            passengers: car
                .riders
                .values()
                .map(|p| (p.id, p.destination))
                .collect(),
        })
    }

    fn floor_view(&self, floor: Floor) -> Option<FloorView> {
        let landing = self.landings.get(floor as usize)?;
        Some(FloorView {
            floor,
            up_queue: landing.up.iter().map(|p| p.id).collect(),
            down_queue: landing.down.iter().map(|p| p.id).collect(),
        })
    }

    fn go_to_floor(&mut self, id: CarId, floor: Floor, immediate: bool) -> Result<(), CommandRejected> {
        if !self.spec.contains(floor) {
            return Err(CommandRejected::FloorOutOfRange);
        }
        let car = self.cars.get_mut(id.0).ok_or(CommandRejected::UnknownCar)?;
        if car.is_moving() && !immediate {
            return Err(CommandRejected::InTransit);
        }
        car.target = Some(floor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn building() -> Building {
        Building::new(BuildingSpec::new(6, 2, 2)).unwrap()
    }

    fn passenger(id: u64, origin: Floor, destination: Floor) -> Passenger {
        Passenger::new(PassengerId(id), origin, destination, 0).unwrap()
    }

    #[test]
    fn commands_are_validated() {
        let mut b = building();
        assert_eq!(b.go_to_floor(CarId(5), 1, false), Err(CommandRejected::UnknownCar));
        assert_eq!(b.go_to_floor(CarId(0), 6, false), Err(CommandRejected::FloorOutOfRange));
        assert_eq!(b.go_to_floor(CarId(0), 4, false), Ok(()));
        assert_eq!(b.go_to_floor(CarId(0), 2, false), Err(CommandRejected::InTransit));
        assert_eq!(b.go_to_floor(CarId(0), 2, true), Ok(()));
        assert_eq!(b.target(CarId(0)).unwrap(), Some(2));
    }

    #[test]
    fn car_moves_one_floor_per_advance() {
        let mut b = building();
        b.go_to_floor(CarId(0), 2, false).unwrap();
        assert_eq!(b.next_floor(CarId(0)).unwrap(), Some((1, Direction::Up)));
        b.advance(CarId(0)).unwrap();
        assert!(!b.has_arrived(CarId(0)).unwrap());
        b.advance(CarId(0)).unwrap();
        assert!(b.has_arrived(CarId(0)).unwrap());
        assert_eq!(b.next_floor(CarId(0)).unwrap(), None);
        assert_eq!(b.open_doors(CarId(0)).unwrap(), 2);
        let view = b.car_view(CarId(0)).unwrap();
        assert_eq!(view.heading, Some(Direction::Up));
        assert!(view.is_idle());
    }

    #[test]
    fn command_to_current_floor_reopens() {
        let mut b = building();
        b.go_to_floor(CarId(1), 0, false).unwrap();
        assert!(b.has_arrived(CarId(1)).unwrap());
        assert!(!b.car_view(CarId(1)).unwrap().is_moving());
    }

    #[test]
    fn boarding_respects_capacity_and_order() {
        let mut b = building();
        for id in 1..=3 {
            b.add_waiting(passenger(id, 0, 4)).unwrap();
        }
        let boarded = b.board(CarId(0)).unwrap();
        assert_eq!(boarded.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(b.floor_view(0).unwrap().up_queue, vec![PassengerId(3)]);
        assert_eq!(b.riding_count(), 2);
        assert_eq!(b.waiting_count(), 1);
    }

    #[test]
    fn empty_car_takes_other_queue() {
        let mut b = building();
        b.place_car(CarId(0), 3).unwrap();
        b.add_waiting(passenger(1, 3, 1)).unwrap();
        let boarded = b.board(CarId(0)).unwrap();
        assert_eq!(boarded.len(), 1);
    }

    #[test]
    fn loaded_car_keeps_heading() {
        let mut b = building();
        b.add_waiting(passenger(1, 0, 5)).unwrap();
        b.board(CarId(0)).unwrap();
        b.go_to_floor(CarId(0), 3, false).unwrap();
        for _ in 0..3 {
            b.advance(CarId(0)).unwrap();
        }
        b.add_waiting(passenger(2, 3, 0)).unwrap();
        assert!(b.board(CarId(0)).unwrap().is_empty());
        assert!(b.alight(CarId(0)).unwrap().is_empty());
    }

    #[test]
    fn opposite_boarding_fills_remaining_room() {
        let mut b = Building::new(BuildingSpec::new(6, 1, 3))
            .unwrap()
            .with_opposite_boarding(true);
        b.add_waiting(passenger(1, 0, 5)).unwrap();
        b.board(CarId(0)).unwrap();
        b.go_to_floor(CarId(0), 3, false).unwrap();
        for _ in 0..3 {
            b.advance(CarId(0)).unwrap();
        }
        b.add_waiting(passenger(2, 3, 4)).unwrap();
        b.add_waiting(passenger(3, 3, 0)).unwrap();
        let ids: Vec<u64> = b.board(CarId(0)).unwrap().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn alight_at_destination() {
        let mut b = building();
        b.add_waiting(passenger(1, 0, 2)).unwrap();
        b.board(CarId(0)).unwrap();
        b.place_car(CarId(0), 2).unwrap();
        let out = b.alight(CarId(0)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(b.riding_count(), 0);
    }

    #[test]
    fn rejects_out_of_range_passenger() {
        let mut b = building();
        let err = b.add_waiting(passenger(1, 0, 9));
        assert!(matches!(err, Err(SimError::FloorOutOfRange { floor: 9, .. })));
    }
}
