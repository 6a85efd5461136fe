use crate::commands::{run_event, run_score, run_standards, EventArgs, ScoreArgs, StandardsArgs};
use crate::server;
use acft_score::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ACFT Score Calculator",
    about = "Score Army Combat Fitness Test results from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score all six events and print the scorecard
    Score(ScoreArgs),
    /// Score a single event
    Event(EventArgs),
    /// Print the standards for one event, sex and age
    Standards(StandardsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Read standards tables from this directory instead of the built-in set
    #[arg(long)]
    pub(crate) tables_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Event(args) => run_event(args),
        Command::Standards(args) => run_standards(args),
    }
}
