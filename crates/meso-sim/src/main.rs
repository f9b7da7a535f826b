use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    charging::{self, ChargingArgs},
    ordering::{self, OrderingArgs},
    prepare::{self, PrepareArgs},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "meso-sim", about = "Initial-state preparation for mesoscopic device quenches")]
struct Cli {
    /// Default log level when RUST_LOG is unset.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the basis, compose the initial state and write report artefacts.
    Prepare(PrepareArgs),
    /// Print the best even and odd charge of the charging model.
    Charging(ChargingArgs),
    /// Print the orbital table of the finalised global ordering.
    Ordering(OrderingArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    match cli.command {
        Command::Prepare(args) => prepare::run(&args),
        Command::Charging(args) => charging::run(&args),
        Command::Ordering(args) => ordering::run(&args),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
