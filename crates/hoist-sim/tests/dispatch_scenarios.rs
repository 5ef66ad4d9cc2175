//! End-to-end dispatch scenarios driven through the reference building.

use hoist_core::{BuildingSpec, CarDirection, CarId, CarView, Direction};
use hoist_dispatch::{DecisionKind, DispatchConfig, DispatchEvent, Simulator};
use hoist_sim::{SimConfig, Simulation};
use proptest::prelude::*;

fn quiet(floors: u32, cars: usize, capacity: usize) -> Simulation {
    let config = SimConfig::default()
        .with_building(BuildingSpec::new(floors, cars, capacity))
        .with_spawn_rate(0.0);
    Simulation::new(config, DispatchConfig::default()).unwrap()
}

fn views(sim: &Simulation) -> Vec<CarView> {
    sim.building()
        .car_ids()
        .filter_map(|car| sim.building().car_view(car))
        .collect()
}

fn stops(sim: &Simulation, car: CarId) -> Vec<u32> {
    sim.events()
        .events_for_car(car)
        .into_iter()
        .filter_map(|e| match e.event {
            DispatchEvent::ElevatorStopped { floor, .. } => Some(floor),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn down_call_goes_to_car_already_there() {
    let mut sim = quiet(4, 2, 4);
    sim.place_car(CarId(1), 3).unwrap();
    let id = sim.spawn_passenger(3, 0).unwrap();
    sim.tick().unwrap();

    let assigned = sim
        .scheduler()
        .log()
        .entries()
        .iter()
        .find_map(|d| match d.kind {
            DecisionKind::CarAssigned { car, floor: 3, .. } => Some(car),
            _ => None,
        });
    assert_eq!(assigned, Some(CarId(1)));
    assert_eq!(sim.trips().get(id).unwrap().car, Some(CarId(1)));
    assert_eq!(views(&sim)[0].floor, 0);
}

#[test]
fn car_going_up_stops_for_passed_up_call() {
    let mut sim = quiet(10, 1, 4);
    let far = sim.spawn_passenger(5, 8).unwrap();
    sim.run(1).unwrap();
    let near = sim.spawn_passenger(3, 6).unwrap();
    sim.run(2).unwrap();

    assert_eq!(stops(&sim, CarId(0)).first(), Some(&3));
    let near_board = sim.trips().get(near).unwrap().board_tick;
    assert_eq!(near_board, Some(3));

    assert!(sim.run_until_drained(30).unwrap());
    let far_board = sim.trips().get(far).unwrap().board_tick;
    assert!(far_board.unwrap() > near_board.unwrap());
    assert_eq!(stops(&sim, CarId(0)), vec![3, 5, 6, 8]);
}

#[test]
fn sweep_reverses_toward_down_call() {
    let mut sim = quiet(10, 1, 4);
    sim.spawn_passenger(0, 5).unwrap();
    sim.run(3).unwrap();
    sim.spawn_passenger(1, 0).unwrap();
    sim.run(3).unwrap();

    assert_eq!(stops(&sim, CarId(0)).last(), Some(&5));
    let car = sim.scheduler().car(CarId(0)).unwrap();
    assert_eq!(car.direction(), CarDirection::Down);
    assert_eq!(car.last_target(), Some(1));
    assert!(sim.scheduler().log().entries().iter().any(|d| matches!(
        d.kind,
        DecisionKind::DirectionChanged {
            from: CarDirection::Up,
            to: CarDirection::Down,
            ..
        }
    )));

    assert!(sim.run_until_drained(20).unwrap());
}

#[test]
fn oversubscribed_floor_brings_second_car() {
    let mut sim = quiet(10, 2, 2);
    sim.place_car(CarId(1), 9).unwrap();
    for _ in 0..4 {
        sim.spawn_passenger(6, 8).unwrap();
    }
    sim.tick().unwrap();

    let cars: Vec<CarId> = sim
        .scheduler()
        .cars()
        .iter()
        .filter(|c| c.serves(6, Direction::Up))
        .map(|c| c.id())
        .collect();
    assert_eq!(cars, vec![CarId(0), CarId(1)]);
    assert!(sim.run_until_drained(40).unwrap());
}

#[test]
fn calls_clear_only_when_floor_empties() {
    let mut sim = quiet(6, 1, 1);
    sim.spawn_passenger(2, 4).unwrap();
    sim.spawn_passenger(2, 5).unwrap();
    sim.run(3).unwrap();

    // One boarded, one left behind by a full car.
    assert_eq!(sim.building().waiting_count(), 1);
    assert!(sim.scheduler().registry().contains(2, Direction::Up));

    assert!(sim.run_until_drained(40).unwrap());
    assert!(sim.scheduler().registry().is_empty());
}

#[test]
fn opposite_pickup_flag_changes_policy() {
    let run = |allow: bool| {
        let config = SimConfig::default()
            .with_building(BuildingSpec::new(10, 1, 4))
            .with_spawn_rate(0.0);
        let dispatch = DispatchConfig::default().with_opposite_direction_pickup(allow);
        let mut sim = Simulation::new(config, dispatch).unwrap();
        sim.spawn_passenger(0, 9).unwrap();
        sim.run(3).unwrap();
        sim.spawn_passenger(5, 4).unwrap();
        assert!(sim.run_until_drained(60).unwrap());
        stops(&sim, CarId(0))
    };
    assert_eq!(run(false), vec![0, 9, 5, 4]);
    assert_eq!(run(true), vec![0, 5, 9, 4]);
}

#[test]
fn dispersal_spreads_idle_fleet() {
    let config = SimConfig::default()
        .with_building(BuildingSpec::new(10, 3, 4))
        .with_spawn_rate(0.0);
    let dispatch = DispatchConfig::default().with_disperse_on_init(true);
    let mut sim = Simulation::new(config, dispatch).unwrap();
    sim.run(10).unwrap();
    let floors: Vec<u32> = views(&sim).iter().map(|v| v.floor).collect();
    assert_eq!(floors, vec![0, 3, 6]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn busy_building_drains_after_traffic_stops() {
    let config = SimConfig::default()
        .with_seed(2024)
        .with_building(BuildingSpec::new(12, 3, 6))
        .with_spawn_rate(0.4);
    let mut sim = Simulation::new(config, DispatchConfig::default()).unwrap();
    sim.run(300).unwrap();
    sim.stop_traffic();
    assert!(sim.run_until_drained(1_000).unwrap());
    let summary = sim.summary();
    assert_eq!(summary.served, summary.spawned);
    assert!(summary.spawned > 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn fleet_never_overflows_and_always_drains(
        seed in any::<u64>(),
        floors in 3u32..14,
        cars in 1usize..4,
        capacity in 1usize..6,
        rate in 0.05f64..0.6,
        opposite in any::<bool>(),
    ) {
        let config = SimConfig::default()
            .with_seed(seed)
            .with_building(BuildingSpec::new(floors, cars, capacity))
            .with_spawn_rate(rate);
        let dispatch = DispatchConfig::default().with_opposite_direction_pickup(opposite);
        let mut sim = Simulation::new(config, dispatch).unwrap();

        let mut before = views(&sim);
        for _ in 0..150 {
            sim.tick().unwrap();
            let after = views(&sim);
            for (prev, now) in before.iter().zip(&after) {
                prop_assert!(now.load() <= now.capacity);
                // A car only turns around once nobody aboard wants to go further.
                if let (Some(was), Some(is)) = (prev.heading, now.heading) {
                    if was != is {
                        prop_assert!(
                            prev.passengers.values().all(|&d| !was.is_ahead(prev.floor, d)),
                            "{} reversed at floor {} with riders ahead", now.id, prev.floor
                        );
                    }
                }
            }
            before = after;
        }

        sim.stop_traffic();
        prop_assert!(sim.run_until_drained(2_000).unwrap());
        prop_assert!(sim.scheduler().registry().is_empty());
    }
}
