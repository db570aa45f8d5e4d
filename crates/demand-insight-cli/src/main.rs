mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::build_master::BuildMasterArgs;
use commands::run::RunArgs;

/// Sales forecast and inventory strategy pipeline
#[derive(Parser)]
#[command(
    name = "dmi",
    version,
    about = "Sales forecast and inventory strategy pipeline",
    long_about = "Ingests monthly sales extracts, a client unit forecast, and an \
                  inventory snapshot; produces a seasonal-naive revenue forecast, \
                  a top-N inventory valuation with DIO classification and reorder \
                  strategy, a markdown executive report, and a CSV export."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for the stdout summary
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest raw sales extracts and the client forecast into canonical tables
    BuildMaster(BuildMasterArgs),
    /// Run the forecast/inventory analysis over the canonical tables
    Analyze(AnalyzeArgs),
    /// Both stages chained in memory
    Run(RunArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<output::CommandReport, Box<dyn std::error::Error>> = match cli.command {
        Commands::BuildMaster(args) => commands::build_master::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Version => {
            println!("dmi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(report) => {
            output::render(&cli.output, &report);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr so `--output json` stays pipeable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
