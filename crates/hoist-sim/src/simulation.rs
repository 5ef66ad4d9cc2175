use hoist_core::{CarId, Floor, Passenger, PassengerId};
use hoist_dispatch::{DispatchConfig, DispatchEvent, DispatchScheduler};
use tracing::{debug, info};

use crate::building::Building;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent};
use crate::traffic::TrafficGenerator;
use crate::trips::{TripLog, TripSummary};

/// The top-level simulation orchestrator.
///
/// Owns the building, the scheduler that drives it, the clock, traffic,
/// trip records and the event trace. Each tick delivers events to the
/// scheduler in a fixed order: `TickStarted`, new passenger calls, per-car
/// motion and arrival events, then `TickEnded`.
#[derive(Debug)]
pub struct Simulation {
    building: Building,
    scheduler: DispatchScheduler,
    clock: SimClock,
    traffic: TrafficGenerator,
    trips: TripLog,
    events: EventLog,
    pending: Vec<Passenger>,
    next_passenger: u64,
    initialized: bool,
}

impl Simulation {
    /// Create a new simulation from a run configuration and a dispatch policy.
    pub fn new(config: SimConfig, dispatch: DispatchConfig) -> SimResult<Self> {
        let building = Building::new(config.building.clone())?
            .with_opposite_boarding(dispatch.allow_opposite_direction_pickup);
        let scheduler = DispatchScheduler::new(config.building.clone(), dispatch)?;
        let traffic = TrafficGenerator::new(config.seed, config.building.floors, config.spawn_rate)?;
        Ok(Self {
            building,
            scheduler,
            clock: SimClock::new(),
            traffic,
            trips: TripLog::new(),
            events: EventLog::new(config.max_events),
            pending: Vec::new(),
            next_passenger: 0,
            initialized: false,
        })
    }

    /// Move a car before the run starts.
    pub fn place_car(&mut self, car: CarId, floor: Floor) -> SimResult<()> {
        self.building.place_car(car, floor)
    }

    /// Queue a passenger who will appear at the start of the next tick.
    pub fn spawn_passenger(&mut self, origin: Floor, destination: Floor) -> SimResult<PassengerId> {
        let id = PassengerId(self.next_passenger);
        let passenger = Passenger::new(id, origin, destination, self.clock.tick() + 1)?;
        for floor in [origin, destination] {
            self.building.spec().check_floor(floor).map_err(|_| SimError::FloorOutOfRange {
                floor,
                max_floor: self.building.spec().max_floor(),
            })?;
        }
        self.next_passenger += 1;
        self.pending.push(passenger);
        Ok(id)
    }

    /// Stop generating random passengers.
    pub fn stop_traffic(&mut self) {
        self.traffic.stop();
    }

    /// Hand the building to the scheduler.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.deliver(DispatchEvent::Init)?;
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        let tick = self.clock.advance();
        self.deliver(DispatchEvent::TickStarted { tick })?;

        if let Some((origin, destination)) = self.traffic.next_trip() {
            self.spawn_passenger(origin, destination)?;
        }
        for passenger in std::mem::take(&mut self.pending) {
            self.arrive_at_landing(passenger, tick)?;
        }

        let cars: Vec<CarId> = self.building.car_ids().collect();
        for car in cars {
            self.step_car(car)?;
        }

        self.deliver(DispatchEvent::TickEnded { tick })?;
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Tick until nobody is waiting or riding, for at most `max_ticks` ticks.
    /// Returns true if the building drained. Random traffic keeps arriving
    /// unless [`Simulation::stop_traffic`] was called.
    pub fn run_until_drained(&mut self, max_ticks: u64) -> SimResult<bool> {
        for _ in 0..max_ticks {
            if self.is_drained() {
                break;
            }
            self.tick()?;
        }
        let drained = self.is_drained();
        info!(tick = self.clock.tick(), drained, "run finished");
        Ok(drained)
    }

    /// Returns true if no passenger is queued, waiting or riding.
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.building.waiting_count() == 0 && self.building.riding_count() == 0
    }

    fn arrive_at_landing(&mut self, passenger: Passenger, tick: u64) -> SimResult<()> {
        let passenger = Passenger {
            arrive_tick: tick,
            ..passenger
        };
        debug!(
            passenger = %passenger.id,
            origin = passenger.origin,
            destination = passenger.destination,
            "passenger arrives"
        );
        self.building.add_waiting(passenger.clone())?;
        self.trips.record_spawn(&passenger);
        let floor = passenger.origin;
        let direction = passenger.direction();
        self.deliver(DispatchEvent::PassengerCall {
            passenger,
            floor,
            direction,
        })
    }

    fn step_car(&mut self, car: CarId) -> SimResult<()> {
        if let Some((next, direction)) = self.building.next_floor(car)? {
            if self.building.target(car)? != Some(next) {
                self.deliver(DispatchEvent::ElevatorPassingFloor {
                    car,
                    floor: next,
                    direction,
                })?;
            }
            if self.building.target(car)? == Some(next) {
                self.deliver(DispatchEvent::ElevatorApproaching {
                    car,
                    floor: next,
                    direction,
                })?;
            }
            self.building.advance(car)?;
        }
        if self.building.has_arrived(car)? {
            self.arrive(car)?;
        }
        Ok(())
    }

    fn arrive(&mut self, car: CarId) -> SimResult<()> {
        let tick = self.clock.tick();
        let floor = self.building.open_doors(car)?;
        for passenger in self.building.alight(car)? {
            self.trips.record_arrival(passenger.id, tick);
            self.deliver(DispatchEvent::PassengerAlight {
                car,
                passenger,
                floor,
            })?;
        }
        for passenger in self.building.board(car)? {
            self.trips.record_board(passenger.id, car, tick);
            self.deliver(DispatchEvent::PassengerBoard { car, passenger })?;
        }
        self.deliver(DispatchEvent::ElevatorStopped { car, floor })?;
        if self.building.target(car)?.is_none() {
            self.deliver(DispatchEvent::ElevatorIdle { car })?;
        }
        Ok(())
    }

    fn deliver(&mut self, event: DispatchEvent) -> SimResult<()> {
        self.events.push(SimEvent::new(self.clock.tick(), event.clone()));
        self.scheduler.handle(event, &mut self.building)?;
        Ok(())
    }

    /// The building's ground truth.
    pub fn building(&self) -> &Building {
        &self.building
    }

    /// The scheduler driving the building.
    pub fn scheduler(&self) -> &DispatchScheduler {
        &self.scheduler
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Per-passenger trip records.
    pub fn trips(&self) -> &TripLog {
        &self.trips
    }

    /// Aggregate trip statistics so far.
    pub fn summary(&self) -> TripSummary {
        self.trips.summary()
    }

    /// Every event delivered to the scheduler.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The current tick.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}
