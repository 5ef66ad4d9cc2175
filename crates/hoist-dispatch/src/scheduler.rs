use hoist_core::{BuildingSpec, CarDirection, CarId, Direction, Floor, Passenger};
use tracing::{debug, info, warn};

use crate::car::{CarState, Demand, Plan};
use crate::config::DispatchConfig;
use crate::cost::idle_score;
use crate::error::{DispatchError, DispatchResult};
use crate::event::DispatchEvent;
use crate::log::{Decision, DecisionKind, DecisionLog};
use crate::port::Simulator;
use crate::registry::HallCallRegistry;

/// The fleet dispatcher.
///
/// Owns every car's scheduling state and the hall call registry, and reacts
/// to building events one at a time. Ground truth (floor queues, who is on
/// board) is re-read from the [`Simulator`] on every stop and at the end of
/// each tick; local bookkeeping is overwritten where it disagrees.
#[derive(Debug)]
pub struct DispatchScheduler {
    building: BuildingSpec,
    config: DispatchConfig,
    cars: Vec<CarState>,
    registry: HallCallRegistry,
    log: DecisionLog,
    tick: u64,
}

impl DispatchScheduler {
    /// Create a scheduler for `building`. All cars start idle at floor 0
    /// until [`DispatchEvent::Init`] reads their real positions.
    pub fn new(building: BuildingSpec, config: DispatchConfig) -> DispatchResult<Self> {
        building.validate()?;
        let cars = building
            .car_ids()
            .map(|id| CarState::new(id, 0, building.capacity))
            .collect();
        let log = DecisionLog::new(config.max_log_entries);
        Ok(Self {
            building,
            config,
            cars,
            registry: HallCallRegistry::new(),
            log,
            tick: 0,
        })
    }

    /// Process one inbound event to completion.
    pub fn handle(&mut self, event: DispatchEvent, sim: &mut dyn Simulator) -> DispatchResult<()> {
        match event {
            DispatchEvent::Init => self.on_init(sim),
            DispatchEvent::TickStarted { tick } => {
                self.on_tick_started(tick);
                Ok(())
            }
            DispatchEvent::PassengerCall {
                passenger,
                floor,
                direction,
            } => self.on_passenger_call(&passenger, floor, direction, sim),
            DispatchEvent::ElevatorIdle { car } => self.on_elevator_idle(car, sim),
            DispatchEvent::ElevatorStopped { car, floor } => self.on_elevator_stopped(car, floor, sim),
            DispatchEvent::PassengerBoard { car, passenger } => {
                self.on_passenger_board(car, &passenger, sim)
            }
            DispatchEvent::PassengerAlight {
                car,
                passenger,
                floor,
            } => self.on_passenger_alight(car, &passenger, floor),
            DispatchEvent::ElevatorPassingFloor {
                car,
                floor,
                direction,
            } => self.on_elevator_passing_floor(car, floor, direction, sim),
            DispatchEvent::ElevatorApproaching {
                car,
                floor,
                direction,
            } => self.on_elevator_approaching(car, floor, direction, sim),
            DispatchEvent::TickEnded { tick } => self.on_tick_ended(tick, sim),
        }
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    /// Read every car's position and load. Optionally spread the fleet out.
    pub fn on_init(&mut self, sim: &mut dyn Simulator) -> DispatchResult<()> {
        for car in &mut self.cars {
            if let Some(view) = sim.car_view(car.id) {
                car.sync_onboard(&view);
            }
        }
        info!(
            cars = self.cars.len(),
            floors = self.building.floors,
            capacity = self.building.capacity,
            "dispatch initialised"
        );
        if self.config.disperse_on_init {
            let max_floor = self.building.max_floor() as usize;
            let count = self.cars.len();
            for idx in 0..count {
                let target = (idx * max_floor / count) as Floor;
                if let Some(direction) = Direction::toward(self.cars[idx].floor, target) {
                    self.set_direction(idx, direction.into());
                    self.command(idx, target, true, sim);
                }
            }
        }
        Ok(())
    }

    /// Record the tick used to stamp decisions and new calls.
    pub fn on_tick_started(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Register a hall call and try to hand it to the best car right away.
    pub fn on_passenger_call(
        &mut self,
        passenger: &Passenger,
        floor: Floor,
        direction: Direction,
        sim: &mut dyn Simulator,
    ) -> DispatchResult<()> {
        self.check_floor(floor)?;
        if self
            .registry
            .register_call(floor, direction, Some(passenger.id), self.tick)
        {
            self.record(
                DecisionKind::CallRegistered { floor, direction },
                format!("{} calls at floor {floor} going {direction}", passenger.id),
            );
        }
        self.assign_call(floor, direction, sim);
        Ok(())
    }

    /// The building reports a car with nothing to do.
    pub fn on_elevator_idle(&mut self, car: CarId, sim: &mut dyn Simulator) -> DispatchResult<()> {
        let idx = self.index(car)?;
        if let Some(view) = sim.car_view(car) {
            self.cars[idx].sync_onboard(&view);
        }
        self.cars[idx].in_transit = false;
        self.idle_car(idx);
        if self.cars[idx].committed_stops.is_empty() {
            self.assign_idle_car(idx, sim);
        } else {
            self.settle(idx, sim);
        }
        Ok(())
    }

    /// A car arrived at `floor`: reconcile, then pick its next stop.
    pub fn on_elevator_stopped(
        &mut self,
        car: CarId,
        floor: Floor,
        sim: &mut dyn Simulator,
    ) -> DispatchResult<()> {
        let idx = self.index(car)?;
        self.check_floor(floor)?;
        let state = &mut self.cars[idx];
        state.floor = floor;
        state.in_transit = false;
        state.release(floor);
        if let Some(view) = sim.car_view(car) {
            state.sync_onboard(&view);
        }
        self.reconcile_floor(floor, &*sim);
        self.settle(idx, sim);
        Ok(())
    }

    /// A passenger entered a car; their destination becomes a committed stop.
    pub fn on_passenger_board(
        &mut self,
        car: CarId,
        passenger: &Passenger,
        sim: &mut dyn Simulator,
    ) -> DispatchResult<()> {
        let idx = self.index(car)?;
        self.check_floor(passenger.destination)?;
        let state = &mut self.cars[idx];
        let was_empty = state.onboard.is_empty();
        state.floor = passenger.origin;
        state.board(passenger.id, passenger.destination);
        debug!(%car, passenger = %passenger.id, destination = passenger.destination, "boarded");
        let Some(direction) = Direction::toward(passenger.origin, passenger.destination) else {
            return Ok(());
        };
        if state.is_idle() {
            self.set_direction(idx, direction.into());
            self.command(idx, passenger.destination, false, sim);
        } else if was_empty {
            // The first rider sets the sweep for the rest of the stop.
            self.set_direction(idx, direction.into());
        }
        Ok(())
    }

    /// A passenger left a car.
    pub fn on_passenger_alight(
        &mut self,
        car: CarId,
        passenger: &Passenger,
        floor: Floor,
    ) -> DispatchResult<()> {
        let idx = self.index(car)?;
        self.check_floor(floor)?;
        let state = &mut self.cars[idx];
        state.floor = floor;
        state.alight(passenger.id);
        debug!(%car, passenger = %passenger.id, floor, "alighted");
        Ok(())
    }

    /// A car is about to pass `floor` without stopping. Stop anyway if
    /// someone aboard gets off here or someone waiting can get on; drop the
    /// stop if it was committed and nobody is left to serve.
    pub fn on_elevator_passing_floor(
        &mut self,
        car: CarId,
        floor: Floor,
        direction: Direction,
        sim: &mut dyn Simulator,
    ) -> DispatchResult<()> {
        let idx = self.index(car)?;
        self.check_floor(floor)?;
        let (same_way, other_way) = sim.floor_view(floor).map_or((0, 0), |v| {
            (v.waiting(direction), v.waiting(direction.opposite()))
        });
        let allow_opposite = self.config.allow_opposite_direction_pickup;
        let state = &mut self.cars[idx];
        state.floor = floor;
        state.in_transit = true;

        let committed = state.committed_stops.contains(&floor);
        let has_room = !state.is_full();
        let stop = state.drops_off_at(floor)
            || (has_room && same_way > 0)
            || (has_room && allow_opposite && other_way > 0);
        if stop {
            if !committed {
                state.commit(floor);
                self.record(
                    DecisionKind::OpportunisticStop { car, floor },
                    format!("{car} picks up at floor {floor} on the way {direction}"),
                );
            }
            self.command(idx, floor, true, sim);
        } else if committed && same_way + other_way == 0 {
            state.release(floor);
            self.record(
                DecisionKind::StaleStopDropped { car, floor },
                format!("{car} skips floor {floor}: nobody left to serve"),
            );
        }
        Ok(())
    }

    /// A car is about to reach its target. If the stop has gone stale (nobody
    /// to drop off, nobody waiting), drop it and carry on to the next stop.
    pub fn on_elevator_approaching(
        &mut self,
        car: CarId,
        floor: Floor,
        direction: Direction,
        sim: &mut dyn Simulator,
    ) -> DispatchResult<()> {
        let idx = self.index(car)?;
        self.check_floor(floor)?;
        let state = &self.cars[idx];
        if !state.committed_stops.contains(&floor) || state.drops_off_at(floor) {
            return Ok(());
        }
        if sim.floor_view(floor).is_some_and(|v| !v.is_empty()) {
            return Ok(());
        }

        self.cars[idx].release(floor);
        self.record(
            DecisionKind::StaleStopDropped { car, floor },
            format!("{car} no longer needs floor {floor}"),
        );
        let demand = self.demand_for(idx, &*sim);
        if let Some(next) = self.cars[idx].continue_sweep(floor, direction, &demand) {
            self.cars[idx].commit(next);
            self.command(idx, next, true, sim);
        }
        Ok(())
    }

    /// End-of-tick sweep: reconcile every floor, recover cars whose commands
    /// were refused, put idle cars to work, and re-offer uncovered calls.
    pub fn on_tick_ended(&mut self, tick: u64, sim: &mut dyn Simulator) -> DispatchResult<()> {
        self.tick = tick;
        for floor in 0..self.building.floors {
            self.reconcile_floor(floor, &*sim);
        }

        for idx in 0..self.cars.len() {
            let Some(view) = sim.car_view(self.cars[idx].id) else {
                continue;
            };
            if view.is_moving() {
                continue;
            }
            let state = &self.cars[idx];
            if state.needs_replan || (view.is_idle() && !state.is_idle()) {
                self.cars[idx].in_transit = false;
                self.settle(idx, sim);
            } else if state.is_idle() && view.is_idle() {
                self.assign_idle_car(idx, sim);
            }
        }

        let calls: Vec<(Floor, Direction)> = self
            .registry
            .iter()
            .map(|call| (call.floor, call.direction))
            .collect();
        for (floor, direction) in calls {
            self.assign_call(floor, direction, sim);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Assignment
    // -----------------------------------------------------------------------

    /// Hand `(floor, direction)` to the lowest-cost car, unless the cars
    /// already serving it have room for everyone waiting there. A call no
    /// car can take stays pending in the registry.
    pub fn assign_call(&mut self, floor: Floor, direction: Direction, sim: &mut dyn Simulator) {
        if self.is_covered(floor, direction, None, &*sim) {
            return;
        }
        let cost = &self.config.cost;
        let best = self
            .cars
            .iter()
            .enumerate()
            .filter(|(_, car)| !car.serves(floor, direction))
            .filter_map(|(idx, car)| cost.score(car, floor, direction).map(|score| (score, idx)))
            .min();
        let Some((score, idx)) = best else {
            debug!(floor, %direction, "no car can take call yet");
            return;
        };
        let car = self.cars[idx].id;
        self.record(
            DecisionKind::CarAssigned {
                car,
                floor,
                direction,
                score: i64::from(score),
            },
            format!("{car} assigned to floor {floor} going {direction} (score {score})"),
        );
        self.dispatch_to(idx, floor, direction, sim);
    }

    /// Give an idle car the nearest uncovered call. Ties go to the lowest floor.
    fn assign_idle_car(&mut self, idx: usize, sim: &mut dyn Simulator) {
        if !self.registry.any_pending() {
            return;
        }
        let from = self.cars[idx].floor;
        let weight = self.config.waiting_weight;
        let best = {
            let view: &dyn Simulator = &*sim;
            self.registry
                .iter()
                .filter(|call| !self.is_covered(call.floor, call.direction, Some(idx), view))
                .map(|call| {
                    let waiting = self.waiting_at(call.floor, call.direction, view);
                    (idle_score(from, call.floor, waiting, weight), call.floor, call.direction)
                })
                .min()
        };
        let Some((score, floor, direction)) = best else {
            return;
        };
        let car = self.cars[idx].id;
        self.record(
            DecisionKind::CarAssigned {
                car,
                floor,
                direction,
                score,
            },
            format!("idle {car} takes floor {floor} going {direction}"),
        );
        self.dispatch_to(idx, floor, direction, sim);
    }

    /// Commit a call floor to a car. A moving car picks it up on its sweep;
    /// an idle car is sent there now.
    fn dispatch_to(&mut self, idx: usize, floor: Floor, call: Direction, sim: &mut dyn Simulator) {
        let state = &mut self.cars[idx];
        state.assign(floor, call);
        if !state.is_idle() {
            return;
        }
        let direction = Direction::toward(state.floor, floor).unwrap_or(call);
        self.set_direction(idx, direction.into());
        self.command(idx, floor, false, sim);
    }

    /// Returns true if the cars serving `(floor, direction)`, other than
    /// `exclude`, have room for everyone waiting there.
    fn is_covered(
        &self,
        floor: Floor,
        direction: Direction,
        exclude: Option<usize>,
        sim: &dyn Simulator,
    ) -> bool {
        let (serving, spare) = self
            .cars
            .iter()
            .enumerate()
            .filter(|(idx, car)| Some(*idx) != exclude && car.serves(floor, direction))
            .fold((0usize, 0usize), |(n, spare), (_, car)| {
                (n + 1, spare + car.spare_capacity())
            });
        serving > 0 && spare >= self.waiting_at(floor, direction, sim)
    }

    /// Waiting passengers at a call, from ground truth when available.
    fn waiting_at(&self, floor: Floor, direction: Direction, sim: &dyn Simulator) -> usize {
        sim.floor_view(floor)
            .map(|v| v.waiting(direction))
            .unwrap_or_else(|| self.registry.waiting(floor, direction))
    }

    /// Pending calls this car may claim: not at its own floor and not
    /// covered by another car.
    fn demand_for(&self, idx: usize, sim: &dyn Simulator) -> Demand {
        let own_floor = self.cars[idx].floor;
        let mut demand = Demand::default();
        for direction in [Direction::Up, Direction::Down] {
            for floor in self.registry.pending_floors(direction) {
                if floor != own_floor && !self.is_covered(floor, direction, Some(idx), sim) {
                    demand.insert(floor, direction);
                }
            }
        }
        demand
    }

    // -----------------------------------------------------------------------
    // Sweep state machine
    // -----------------------------------------------------------------------

    /// Decide the next move for a car at rest, or idle it and look for work.
    fn settle(&mut self, idx: usize, sim: &mut dyn Simulator) {
        let demand = self.demand_for(idx, &*sim);
        match self.cars[idx].plan(&demand) {
            Plan::Go { target, direction } => {
                self.cars[idx].commit(target);
                self.set_direction(idx, direction.into());
                self.command(idx, target, false, sim);
            }
            Plan::Idle => {
                self.idle_car(idx);
                self.assign_idle_car(idx, sim);
            }
        }
    }

    fn idle_car(&mut self, idx: usize) {
        if !self.cars[idx].is_idle() {
            let car = self.cars[idx].id;
            self.set_direction(idx, CarDirection::Idle);
            self.record(DecisionKind::CarIdled { car }, format!("{car} is idle"));
        }
        self.cars[idx].go_idle();
    }

    fn set_direction(&mut self, idx: usize, to: CarDirection) {
        let from = self.cars[idx].direction;
        if from == to {
            return;
        }
        self.cars[idx].direction = to;
        let car = self.cars[idx].id;
        self.record(
            DecisionKind::DirectionChanged { car, from, to },
            format!("{car} now {to} (was {from})"),
        );
    }

    /// Send a motion command and check the answer. A refusal marks the car
    /// for re-planning at its next event or at the end of the tick.
    fn command(&mut self, idx: usize, floor: Floor, immediate: bool, sim: &mut dyn Simulator) {
        let car = self.cars[idx].id;
        match sim.go_to_floor(car, floor, immediate) {
            Ok(()) => {
                let state = &mut self.cars[idx];
                state.last_target = Some(floor);
                state.needs_replan = false;
                if floor != state.floor {
                    state.in_transit = true;
                }
                self.record(
                    DecisionKind::TargetIssued {
                        car,
                        floor,
                        immediate,
                    },
                    format!("{car} -> floor {floor}"),
                );
            }
            Err(reason) => {
                self.cars[idx].needs_replan = true;
                warn!(%car, floor, immediate, %reason, "motion command rejected");
                self.record(
                    DecisionKind::CommandRejected { car, floor, reason },
                    format!("{car} refused floor {floor}: {reason}"),
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Bookkeeping
    // -----------------------------------------------------------------------

    fn reconcile_floor(&mut self, floor: Floor, sim: &dyn Simulator) {
        let Some(view) = sim.floor_view(floor) else {
            return;
        };
        for direction in self.registry.reconcile(&view, self.tick) {
            self.record(
                DecisionKind::CallCleared { floor, direction },
                format!("floor {floor} {direction} call cleared"),
            );
        }
    }

    fn record(&mut self, kind: DecisionKind, description: String) {
        debug!(tick = self.tick, "{description}");
        self.log.push(Decision::new(self.tick, kind, description));
    }

    fn index(&self, car: CarId) -> DispatchResult<usize> {
        if car.0 < self.cars.len() {
            Ok(car.0)
        } else {
            Err(DispatchError::UnknownCar(car))
        }
    }

    fn check_floor(&self, floor: Floor) -> DispatchResult<()> {
        if self.building.contains(floor) {
            Ok(())
        } else {
            Err(DispatchError::FloorOutOfRange {
                floor,
                max_floor: self.building.max_floor(),
            })
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The building this scheduler was created for.
    pub fn building(&self) -> &BuildingSpec {
        &self.building
    }

    /// The active policy.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Every car, indexed by `CarId`.
    pub fn cars(&self) -> &[CarState] {
        &self.cars
    }

    /// One car's state.
    pub fn car(&self, id: CarId) -> Option<&CarState> {
        self.cars.get(id.0)
    }

    /// Outstanding hall calls.
    pub fn registry(&self) -> &HallCallRegistry {
        &self.registry
    }

    /// Decisions made so far.
    pub fn log(&self) -> &DecisionLog {
        &self.log
    }

    /// The current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
