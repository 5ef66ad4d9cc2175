use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use hoist_core::{BuildingSpec, CarDirection};
use hoist_dispatch::DecisionKind;
use hoist_sim::{SimConfig, Simulation};

/// Upper bound on the extra ticks spent draining after traffic stops.
const DRAIN_LIMIT: u64 = 10_000;

pub struct Options {
    pub floors: u32,
    pub cars: usize,
    pub capacity: usize,
    pub ticks: u64,
    pub seed: u64,
    pub rate: f64,
    pub config: Option<PathBuf>,
    pub opposite_pickup: bool,
    pub disperse: bool,
    pub drain: bool,
    pub verbose: bool,
}

pub fn run(opts: &Options) -> Result<(), String> {
    let mut dispatch = super::load_config(opts.config.as_deref())?;
    if opts.opposite_pickup {
        dispatch = dispatch.with_opposite_direction_pickup(true);
    }
    if opts.disperse {
        dispatch = dispatch.with_disperse_on_init(true);
    }

    let config = SimConfig::default()
        .with_seed(opts.seed)
        .with_building(BuildingSpec::new(opts.floors, opts.cars, opts.capacity))
        .with_spawn_rate(opts.rate);
    let mut sim = Simulation::new(config, dispatch).map_err(|e| format!("cannot start simulation: {e}"))?;

    sim.run(opts.ticks)
        .map_err(|e| format!("simulation error: {e}"))?;
    let drained = if opts.drain {
        sim.stop_traffic();
        Some(
            sim.run_until_drained(DRAIN_LIMIT)
                .map_err(|e| format!("simulation error: {e}"))?,
        )
    } else {
        None
    };

    // Header
    println!(
        "  {} {} floors, {} cars of {} {}",
        "Simulation".bold(),
        opts.floors,
        opts.cars,
        opts.capacity,
        format!("({} ticks, seed={}, rate={})", opts.ticks, opts.seed, opts.rate).dimmed()
    );
    println!(
        "  {} ticks run, {} events, {} decisions",
        sim.current_tick(),
        sim.events().len(),
        sim.scheduler().log().len()
    );
    match drained {
        Some(true) => println!("  {}", "Building drained".green()),
        Some(false) => println!("  {}", format!("Not drained after {DRAIN_LIMIT} extra ticks").red()),
        None => {}
    }
    println!();

    if opts.verbose {
        println!("  {}", "Decision Log".bold().underline());
        println!();
        for decision in sim.scheduler().log().entries() {
            let tick_label = format!("[tick {:>4}]", decision.tick).dimmed();
            let desc = colorize_decision(&decision.kind, &decision.description);
            println!("  {tick_label} {desc}");
        }
        if sim.scheduler().log().is_empty() {
            println!("  {}", "(no decisions)".dimmed());
        }
        println!();
    }

    // Fleet
    println!("  {}", "Fleet".bold().underline());
    println!();
    let mut fleet = Table::new();
    fleet.set_content_arrangement(ContentArrangement::Dynamic);
    fleet.set_header(vec!["Car", "Floor", "Sweep", "Load", "Stops"]);
    for car in sim.scheduler().cars() {
        let stops: Vec<String> = car.committed_stops().iter().map(u32::to_string).collect();
        fleet.add_row(vec![
            car.id().to_string(),
            car.floor().to_string(),
            format_sweep(car.direction()),
            format!("{}/{}", car.load(), car.capacity()),
            if stops.is_empty() {
                "--".to_string()
            } else {
                stops.join(" ")
            },
        ]);
    }
    println!("{fleet}");
    println!();

    // Trips
    let summary = sim.summary();
    println!("  {}", "Trips".bold().underline());
    println!();
    let mut trips = Table::new();
    trips.set_content_arrangement(ContentArrangement::Dynamic);
    trips.set_header(vec!["Spawned", "Served", "Waiting", "Riding", "Mean wait", "Max wait", "Mean journey"]);
    trips.add_row(vec![
        summary.spawned.to_string(),
        summary.served.to_string(),
        summary.waiting.to_string(),
        summary.riding.to_string(),
        format!("{:.1}", summary.mean_wait),
        summary.max_wait.to_string(),
        format!("{:.1}", summary.mean_journey),
    ]);
    println!("{trips}");
    println!();

    Ok(())
}

fn format_sweep(direction: CarDirection) -> String {
    match direction {
        CarDirection::Up => "up".green().to_string(),
        CarDirection::Down => "down".blue().to_string(),
        CarDirection::Idle => "idle".dimmed().to_string(),
    }
}

fn colorize_decision(kind: &DecisionKind, description: &str) -> colored::ColoredString {
    match kind {
        DecisionKind::CallRegistered { .. } => description.cyan(),
        DecisionKind::CallCleared { .. } => description.green(),
        DecisionKind::CarAssigned { .. } => description.bold(),
        DecisionKind::TargetIssued { .. } => description.normal(),
        DecisionKind::DirectionChanged { .. } => description.blue(),
        DecisionKind::CarIdled { .. } => description.dimmed(),
        DecisionKind::OpportunisticStop { .. } => description.yellow(),
        DecisionKind::StaleStopDropped { .. } => description.magenta(),
        DecisionKind::CommandRejected { .. } => description.red().bold(),
    }
}
