use std::collections::BTreeMap;

use hoist_core::{CarId, Passenger, PassengerId};

/// One passenger's journey through the building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    /// The passenger and their request.
    pub passenger: Passenger,
    /// The car that picked them up.
    pub car: Option<CarId>,
    /// Tick at which they boarded.
    pub board_tick: Option<u64>,
    /// Tick at which they reached their destination.
    pub arrive_tick: Option<u64>,
}

impl TripRecord {
    /// Ticks spent waiting at the origin, once boarded.
    pub fn wait_ticks(&self) -> Option<u64> {
        self.board_tick
            .map(|t| t.saturating_sub(self.passenger.arrive_tick))
    }

    /// Ticks from arrival at the origin to arrival at the destination.
    pub fn journey_ticks(&self) -> Option<u64> {
        self.arrive_tick
            .map(|t| t.saturating_sub(self.passenger.arrive_tick))
    }

    /// Returns true once the passenger has reached their destination.
    pub fn is_complete(&self) -> bool {
        self.arrive_tick.is_some()
    }
}

/// Aggregate statistics over a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripSummary {
    /// Passengers that appeared.
    pub spawned: usize,
    /// Passengers delivered to their destination.
    pub served: usize,
    /// Passengers still waiting at a floor.
    pub waiting: usize,
    /// Passengers currently in a car.
    pub riding: usize,
    /// Mean ticks between arrival and boarding, over everyone who boarded.
    pub mean_wait: f64,
    /// Longest wait of anyone who boarded.
    pub max_wait: u64,
    /// Mean ticks from arrival to destination, over everyone served.
    pub mean_journey: f64,
}

/// Per-passenger trip records, keyed by passenger id.
#[derive(Debug, Clone, Default)]
pub struct TripLog {
    trips: BTreeMap<PassengerId, TripRecord>,
}

impl TripLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a passenger that just arrived at their origin.
    pub fn record_spawn(&mut self, passenger: &Passenger) {
        self.trips.insert(
            passenger.id,
            TripRecord {
                passenger: passenger.clone(),
                car: None,
                board_tick: None,
                arrive_tick: None,
            },
        );
    }

    /// Mark a passenger as boarded.
    pub fn record_board(&mut self, id: PassengerId, car: CarId, tick: u64) {
        if let Some(trip) = self.trips.get_mut(&id) {
            trip.car = Some(car);
            trip.board_tick = Some(tick);
        }
    }

    /// Mark a passenger as delivered.
    pub fn record_arrival(&mut self, id: PassengerId, tick: u64) {
        if let Some(trip) = self.trips.get_mut(&id) {
            trip.arrive_tick = Some(tick);
        }
    }

    /// The record for one passenger.
    pub fn get(&self, id: PassengerId) -> Option<&TripRecord> {
        self.trips.get(&id)
    }

    /// All records in passenger id order.
    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> {
        self.trips.values()
    }

    /// Number of tracked passengers.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Returns true if nobody has been tracked.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Compute aggregate statistics.
    pub fn summary(&self) -> TripSummary {
        let waits: Vec<u64> = self.iter().filter_map(TripRecord::wait_ticks).collect();
        let journeys: Vec<u64> = self.iter().filter_map(TripRecord::journey_ticks).collect();
        let boarded = waits.len();
        let served = journeys.len();
        TripSummary {
            spawned: self.len(),
            served,
            waiting: self.len() - boarded,
            riding: boarded - served,
            mean_wait: mean(&waits),
            max_wait: waits.iter().copied().max().unwrap_or(0),
            mean_journey: mean(&journeys),
        }
    }
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<u64>() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(id: u64, arrive_tick: u64) -> Passenger {
        Passenger::new(PassengerId(id), 0, 3, arrive_tick).unwrap()
    }

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(TripLog::new().summary(), TripSummary::default());
    }

    #[test]
    fn summary_counts_each_stage() {
        let mut log = TripLog::new();
        for (id, tick) in [(1, 0), (2, 2), (3, 4)] {
            log.record_spawn(&passenger(id, tick));
        }
        log.record_board(PassengerId(1), CarId(0), 3);
        log.record_arrival(PassengerId(1), 6);
        log.record_board(PassengerId(2), CarId(1), 9);

        let summary = log.summary();
        assert_eq!(summary.spawned, 3);
        assert_eq!(summary.served, 1);
        assert_eq!(summary.riding, 1);
        assert_eq!(summary.waiting, 1);
        assert_eq!(summary.max_wait, 7);
        assert!((summary.mean_wait - 5.0).abs() < f64::EPSILON);
        assert!((summary.mean_journey - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut log = TripLog::new();
        log.record_board(PassengerId(9), CarId(0), 1);
        log.record_arrival(PassengerId(9), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn record_tracks_car() {
        let mut log = TripLog::new();
        log.record_spawn(&passenger(1, 0));
        log.record_board(PassengerId(1), CarId(2), 1);
        let trip = log.get(PassengerId(1)).unwrap();
        assert_eq!(trip.car, Some(CarId(2)));
        assert!(!trip.is_complete());
    }
}
