use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    amplify::{self, AmplifyArgs},
    profile::{self, ProfileArgs},
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "hyperamp",
    about = "Profile a seed hypergraph and amplify it into a synthetic dataset"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log debug events (per-replenishment pool activity).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Measure the three distributions of a seed dataset and write a report.
    Profile(ProfileArgs),
    /// Generate rotated hyperedge files, name indexes and a run manifest.
    Amplify(AmplifyArgs),
}

fn setup_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;
    match cli.command {
        Command::Profile(args) => profile::run(&args),
        Command::Amplify(args) => amplify::run(&args),
    }
}
