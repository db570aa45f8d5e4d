//! Both stages chained in memory: the analysis consumes the tables the
//! build stage just produced instead of re-reading them from disk.

use std::path::PathBuf;

use clap::Args;

use crate::commands::{analyze, build_master};
use crate::input;
use crate::output::CommandReport;

/// Arguments for the full pipeline run
#[derive(Args)]
pub struct RunArgs {
    /// Path to a JSON or YAML pipeline configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Directory of raw inputs (overrides config)
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Directory for canonical outputs (overrides config)
    #[arg(long)]
    pub processed_dir: Option<PathBuf>,

    /// Directory for the markdown report (overrides config)
    #[arg(long)]
    pub reports_dir: Option<PathBuf>,

    /// Number of top SKUs by inventory value (overrides config)
    #[arg(long)]
    pub top_n: Option<usize>,
}

pub fn run(args: RunArgs) -> Result<CommandReport, Box<dyn std::error::Error>> {
    let mut config = input::config_file::load_config(args.config.as_deref())?;
    super::apply_overrides(
        &mut config,
        args.raw_dir,
        args.processed_dir,
        args.reports_dir,
        args.top_n,
    );

    let (tables, _summary) = build_master::execute(&config)?;
    analyze::execute(&config, tables)
}
