//! CLI frontend for the Hoist elevator dispatcher.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hoist",
    about = "Hoist: LOOK dispatch for elevator fleets",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a seeded building simulation and print a summary
    Simulate {
        /// Number of floors in the building
        #[arg(short, long, default_value = "10")]
        floors: u32,

        /// Number of cars in the fleet
        #[arg(short, long, default_value = "2")]
        cars: usize,

        /// Passengers each car can carry
        #[arg(long, default_value = "8")]
        capacity: usize,

        /// Number of ticks with traffic
        #[arg(short, long, default_value = "200")]
        ticks: u64,

        /// RNG seed for deterministic traffic
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Probability of a new passenger each tick
        #[arg(short, long, default_value = "0.3")]
        rate: f64,

        /// Dispatch policy as a JSON file (see `hoist config`)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop for opposite-direction waiters while passing floors
        #[arg(long)]
        opposite_pickup: bool,

        /// Spread the idle fleet over the building at start
        #[arg(long)]
        disperse: bool,

        /// After the traffic window, keep running until everyone is delivered
        #[arg(long)]
        drain: bool,

        /// Print every dispatch decision
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the default dispatch policy as JSON
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            floors,
            cars,
            capacity,
            ticks,
            seed,
            rate,
            config,
            opposite_pickup,
            disperse,
            drain,
            verbose,
        } => commands::simulate::run(&commands::simulate::Options {
            floors,
            cars,
            capacity,
            ticks,
            seed,
            rate,
            config,
            opposite_pickup,
            disperse,
            drain,
            verbose,
        }),
        Commands::Config => commands::config::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
