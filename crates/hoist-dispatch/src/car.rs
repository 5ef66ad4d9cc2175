use std::collections::{BTreeMap, BTreeSet};

use hoist_core::{CarDirection, CarId, CarView, Direction, Floor, PassengerId};

/// Hall call floors not already covered by another car, split by call direction.
///
/// This is the pending-call half of the work a car's sweep considers; the
/// other half is the car's own committed stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demand {
    /// Floors with an uncovered up call.
    pub up: BTreeSet<Floor>,
    /// Floors with an uncovered down call.
    pub down: BTreeSet<Floor>,
}

impl Demand {
    /// Floors with an uncovered call in `direction`.
    pub fn floors(&self, direction: Direction) -> &BTreeSet<Floor> {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Add an uncovered call.
    pub fn insert(&mut self, floor: Floor, direction: Direction) {
        match direction {
            Direction::Up => self.up.insert(floor),
            Direction::Down => self.down.insert(floor),
        };
    }

    /// Returns true if there is no uncovered call.
    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    fn all(&self) -> impl Iterator<Item = Floor> + '_ {
        self.up.iter().chain(self.down.iter()).copied()
    }
}

/// Outcome of running the sweep state machine for a car at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Travel to `target`, sweeping in `direction`.
    Go {
        /// The next floor to travel to.
        target: Floor,
        /// The sweep direction after this decision.
        direction: Direction,
    },
    /// Nothing left to do anywhere.
    Idle,
}

/// Scheduler-side state of one car.
///
/// Only the dispatch scheduler mutates this; everything outside sees it
/// through shared references.
#[derive(Debug, Clone)]
pub struct CarState {
    pub(crate) id: CarId,
    pub(crate) floor: Floor,
    pub(crate) direction: CarDirection,
    pub(crate) capacity: usize,
    pub(crate) onboard: BTreeMap<PassengerId, Floor>,
    pub(crate) committed_stops: BTreeSet<Floor>,
    pub(crate) assigned_calls: BTreeSet<(Floor, Direction)>,
    pub(crate) last_target: Option<Floor>,
    pub(crate) needs_replan: bool,
    pub(crate) in_transit: bool,
}

impl CarState {
    /// An idle, empty car resting at `floor`.
    pub fn new(id: CarId, floor: Floor, capacity: usize) -> Self {
        Self {
            id,
            floor,
            direction: CarDirection::Idle,
            capacity,
            onboard: BTreeMap::new(),
            committed_stops: BTreeSet::new(),
            assigned_calls: BTreeSet::new(),
            last_target: None,
            needs_replan: false,
            in_transit: false,
        }
    }

    /// The car's fleet index.
    pub fn id(&self) -> CarId {
        self.id
    }

    /// Last floor the car stopped at or passed.
    pub fn floor(&self) -> Floor {
        self.floor
    }

    /// Current sweep state.
    pub fn direction(&self) -> CarDirection {
        self.direction
    }

    /// Maximum passengers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Passengers on board and their destinations.
    pub fn onboard(&self) -> &BTreeMap<PassengerId, Floor> {
        &self.onboard
    }

    /// Floors the car has decided to stop at.
    pub fn committed_stops(&self) -> &BTreeSet<Floor> {
        &self.committed_stops
    }

    /// Hall calls this car has been handed and not yet visited.
    pub fn assigned_calls(&self) -> &BTreeSet<(Floor, Direction)> {
        &self.assigned_calls
    }

    /// The last floor commanded to the building.
    pub fn last_target(&self) -> Option<Floor> {
        self.last_target
    }

    /// Returns true if the last motion command was refused and must be recomputed.
    pub fn needs_replan(&self) -> bool {
        self.needs_replan
    }

    /// Returns true if the car has left `floor()` and not yet stopped.
    pub fn is_in_transit(&self) -> bool {
        self.in_transit
    }

    /// Returns true if the car has no sweep direction.
    pub fn is_idle(&self) -> bool {
        self.direction.is_idle()
    }

    /// Number of passengers on board.
    pub fn load(&self) -> usize {
        self.onboard.len()
    }

    /// Returns true if no one else can board.
    pub fn is_full(&self) -> bool {
        self.load() >= self.capacity
    }

    /// Free places.
    pub fn spare_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.load())
    }

    /// Add a stop. Returns true if it was not already committed.
    pub fn commit(&mut self, floor: Floor) -> bool {
        self.committed_stops.insert(floor)
    }

    /// Take responsibility for a hall call and commit its floor.
    pub fn assign(&mut self, floor: Floor, direction: Direction) {
        self.committed_stops.insert(floor);
        self.assigned_calls.insert((floor, direction));
    }

    /// Drop a stop and any call assignment at that floor. Returns true if it was committed.
    pub fn release(&mut self, floor: Floor) -> bool {
        self.assigned_calls.retain(|&(f, _)| f != floor);
        self.committed_stops.remove(&floor)
    }

    /// Record a boarding passenger and commit their destination.
    pub fn board(&mut self, passenger: PassengerId, destination: Floor) {
        self.onboard.insert(passenger, destination);
        if destination != self.floor {
            self.committed_stops.insert(destination);
        }
    }

    /// Remove an alighting passenger, returning their destination.
    pub fn alight(&mut self, passenger: PassengerId) -> Option<Floor> {
        self.onboard.remove(&passenger)
    }

    /// Returns true if some passenger on board is going to `floor`.
    pub fn drops_off_at(&self, floor: Floor) -> bool {
        self.onboard.values().any(|&d| d == floor)
    }

    /// Returns true if the car is already beyond `floor` when travelling in `direction`.
    ///
    /// A car in transit has left its last floor, so that floor counts as
    /// passed unless the car is committed to stop there.
    pub fn has_passed(&self, floor: Floor, direction: Direction) -> bool {
        direction.is_ahead(floor, self.floor)
            || (self.in_transit && floor == self.floor && !self.committed_stops.contains(&floor))
    }

    /// Returns true if this car is committed to `floor` and either was
    /// assigned the call or will reach it travelling in `direction` without
    /// reversing first.
    pub fn serves(&self, floor: Floor, direction: Direction) -> bool {
        if !self.committed_stops.contains(&floor) {
            return false;
        }
        if self.assigned_calls.contains(&(floor, direction)) {
            return true;
        }
        match self.direction.travel() {
            None => true,
            Some(sweep) => sweep == direction && !self.has_passed(floor, direction),
        }
    }

    /// Overwrite onboard bookkeeping from ground truth. Every destination
    /// other than the current floor is re-committed.
    pub fn sync_onboard(&mut self, view: &CarView) {
        self.floor = view.floor;
        self.onboard = view.passengers.clone();
        let floor = self.floor;
        self.committed_stops
            .extend(self.onboard.values().copied().filter(|&d| d != floor));
    }

    /// Drop the sweep direction, every call assignment, and every stop not
    /// backed by an onboard passenger.
    pub fn go_idle(&mut self) {
        self.direction = CarDirection::Idle;
        self.assigned_calls.clear();
        let floor = self.floor;
        self.committed_stops = self
            .onboard
            .values()
            .copied()
            .filter(|&d| d != floor)
            .collect();
    }

    /// Committed stops strictly ahead of the car in `direction`.
    pub fn stops_ahead(&self, direction: Direction) -> impl Iterator<Item = Floor> + '_ {
        let floor = self.floor;
        self.committed_stops
            .iter()
            .copied()
            .filter(move |&f| direction.is_ahead(floor, f))
    }

    /// Committed stops strictly behind the car when travelling in `direction`.
    pub fn stops_behind(&self, direction: Direction) -> impl Iterator<Item = Floor> + '_ {
        self.stops_ahead(direction.opposite())
    }

    /// Run the LOOK state machine for a car at rest.
    ///
    /// Work is the car's committed stops plus `demand`. Demand at the car's
    /// own floor is ignored: the stop that just happened already offered it.
    pub fn plan(&self, demand: &Demand) -> Plan {
        let Some(sweep) = self.direction.travel() else {
            return self.plan_from_rest(demand);
        };
        if let Some(target) = self.continue_sweep(self.floor, sweep, demand) {
            return Plan::Go {
                target,
                direction: sweep,
            };
        }
        let reverse = sweep.opposite();
        if let Some(target) = self.furthest_behind(sweep, demand) {
            return Plan::Go {
                target,
                direction: reverse,
            };
        }
        Plan::Idle
    }

    /// Returns true if the only reason to stop at `floor` is a call the car
    /// can only pick up after turning around from `sweep`.
    pub fn is_turnaround_stop(&self, floor: Floor, sweep: Direction) -> bool {
        self.assigned_calls.contains(&(floor, sweep.opposite()))
            && !self.assigned_calls.contains(&(floor, sweep))
            && !self.drops_off_at(floor)
    }

    /// Nearest committed stop or same-direction call beyond `floor`; failing
    /// that, the furthest turnaround stop or opposite-direction call beyond it
    /// (the end of the sweep).
    pub fn continue_sweep(&self, floor: Floor, sweep: Direction, demand: &Demand) -> Option<Floor> {
        let (turnaround, through): (Vec<Floor>, Vec<Floor>) = self
            .committed_stops
            .iter()
            .copied()
            .filter(|&f| sweep.is_ahead(floor, f))
            .partition(|&f| self.is_turnaround_stop(f, sweep));
        let nearest = through
            .into_iter()
            .chain(
                demand
                    .floors(sweep)
                    .iter()
                    .copied()
                    .filter(|&f| sweep.is_ahead(floor, f)),
            )
            .min_by_key(|&f| f.abs_diff(floor));
        nearest.or_else(|| {
            turnaround
                .into_iter()
                .chain(
                    demand
                        .floors(sweep.opposite())
                        .iter()
                        .copied()
                        .filter(|&f| sweep.is_ahead(floor, f)),
                )
                .max_by_key(|&f| f.abs_diff(floor))
        })
    }

    /// Furthest committed stop or call behind the car when sweeping `sweep`:
    /// the target after a reversal.
    fn furthest_behind(&self, sweep: Direction, demand: &Demand) -> Option<Floor> {
        let floor = self.floor;
        let reverse = sweep.opposite();
        self.stops_behind(sweep)
            .chain(demand.all().filter(|&f| reverse.is_ahead(floor, f)))
            .max_by_key(|&f| f.abs_diff(floor))
    }

    fn plan_from_rest(&self, demand: &Demand) -> Plan {
        let floor = self.floor;
        self.committed_stops
            .iter()
            .copied()
            .chain(demand.all())
            .filter(|&f| f != floor)
            .min_by_key(|&f| (f.abs_diff(floor), f))
            .and_then(|target| {
                Direction::toward(floor, target).map(|direction| Plan::Go { target, direction })
            })
            .unwrap_or(Plan::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car_at(floor: Floor, direction: CarDirection) -> CarState {
        let mut car = CarState::new(CarId(0), floor, 4);
        car.direction = direction;
        car
    }

    fn demand(up: &[Floor], down: &[Floor]) -> Demand {
        Demand {
            up: up.iter().copied().collect(),
            down: down.iter().copied().collect(),
        }
    }

    #[test]
    fn stops_split_around_the_car() {
        let mut car = car_at(4, CarDirection::Up);
        for floor in [1, 3, 6, 8] {
            car.commit(floor);
        }
        assert_eq!(car.stops_ahead(Direction::Up).collect::<Vec<_>>(), vec![6, 8]);
        assert_eq!(car.stops_behind(Direction::Up).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn idle_car_without_work_stays_idle() {
        let car = car_at(3, CarDirection::Idle);
        assert_eq!(car.plan(&Demand::default()), Plan::Idle);
    }

    #[test]
    fn idle_car_heads_for_nearest_work() {
        let mut car = car_at(3, CarDirection::Idle);
        car.commit(7);
        let plan = car.plan(&demand(&[1], &[]));
        assert_eq!(
            plan,
            Plan::Go {
                target: 1,
                direction: Direction::Down
            }
        );
    }

    #[test]
    fn idle_tie_prefers_lower_floor() {
        let car = car_at(3, CarDirection::Idle);
        let plan = car.plan(&demand(&[5], &[1]));
        assert_eq!(
            plan,
            Plan::Go {
                target: 1,
                direction: Direction::Down
            }
        );
    }

    #[test]
    fn sweep_continues_to_nearest_stop_ahead() {
        let mut car = car_at(2, CarDirection::Up);
        car.commit(5);
        car.commit(0);
        let plan = car.plan(&demand(&[4], &[]));
        assert_eq!(
            plan,
            Plan::Go {
                target: 4,
                direction: Direction::Up
            }
        );
    }

    #[test]
    fn sweep_runs_to_extreme_opposite_call_ahead() {
        let car = car_at(2, CarDirection::Up);
        let plan = car.plan(&demand(&[], &[5, 8]));
        assert_eq!(
            plan,
            Plan::Go {
                target: 8,
                direction: Direction::Up
            }
        );
    }

    #[test]
    fn opposite_assignment_waits_for_end_of_sweep() {
        let mut car = car_at(1, CarDirection::Up);
        car.board(PassengerId(1), 8);
        car.assign(4, Direction::Down);
        assert!(car.is_turnaround_stop(4, Direction::Up));
        assert_eq!(
            car.plan(&Demand::default()),
            Plan::Go {
                target: 8,
                direction: Direction::Up
            }
        );
        car.alight(PassengerId(1));
        car.release(8);
        assert_eq!(
            car.plan(&Demand::default()),
            Plan::Go {
                target: 4,
                direction: Direction::Up
            }
        );
    }

    #[test]
    fn reversal_targets_furthest_demand() {
        let car = car_at(5, CarDirection::Up);
        let plan = car.plan(&demand(&[], &[3, 1]));
        assert_eq!(
            plan,
            Plan::Go {
                target: 1,
                direction: Direction::Down
            }
        );
    }

    #[test]
    fn reversal_reaches_furthest_stop_behind() {
        let mut car = car_at(5, CarDirection::Up);
        car.commit(4);
        car.commit(2);
        let plan = car.plan(&demand(&[], &[3]));
        assert_eq!(
            plan,
            Plan::Go {
                target: 2,
                direction: Direction::Down
            }
        );
    }

    #[test]
    fn demand_at_own_floor_is_ignored() {
        let car = car_at(4, CarDirection::Down);
        assert_eq!(car.plan(&demand(&[4], &[4])), Plan::Idle);
    }

    #[test]
    fn serves_requires_approach_in_call_direction() {
        let mut car = car_at(2, CarDirection::Up);
        car.commit(5);
        assert!(car.serves(5, Direction::Up));
        assert!(!car.serves(5, Direction::Down));
        assert!(!car.serves(1, Direction::Up));
        car.commit(1);
        assert!(!car.serves(1, Direction::Up), "already passed floor 1");
        car.direction = CarDirection::Idle;
        assert!(car.serves(1, Direction::Down));
    }

    #[test]
    fn assignment_serves_until_floor_released() {
        let mut car = car_at(2, CarDirection::Up);
        car.assign(6, Direction::Down);
        assert!(car.serves(6, Direction::Down));
        car.release(6);
        assert!(!car.serves(6, Direction::Down));
        assert!(car.assigned_calls().is_empty());
    }

    #[test]
    fn board_commits_destination_and_go_idle_keeps_it() {
        let mut car = car_at(2, CarDirection::Up);
        car.commit(6);
        car.board(PassengerId(1), 4);
        assert_eq!(car.load(), 1);
        assert!(car.committed_stops().contains(&4));
        car.go_idle();
        assert!(car.is_idle());
        assert_eq!(car.committed_stops().iter().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(car.alight(PassengerId(1)), Some(4));
        assert_eq!(car.spare_capacity(), 4);
    }

    #[test]
    fn sync_onboard_overwrites_from_view() {
        let mut car = car_at(0, CarDirection::Up);
        car.board(PassengerId(9), 3);
        let view = CarView {
            id: CarId(0),
            floor: 1,
            position: 1.0,
            heading: Some(Direction::Up),
            target: Some(6),
            capacity: 4,
            passengers: [(PassengerId(2), 6)].into_iter().collect(),
        };
        car.sync_onboard(&view);
        assert_eq!(car.floor(), 1);
        assert_eq!(car.load(), 1);
        assert!(!car.onboard().contains_key(&PassengerId(9)));
        assert!(car.committed_stops().contains(&6));
    }
}
