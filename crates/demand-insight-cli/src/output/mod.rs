pub mod files;
pub mod term;

use crate::OutputFormat;

/// Everything a command hands back for the stdout summary.
pub struct CommandReport {
    /// Full machine-readable summary (the computation envelope or a
    /// build summary)
    pub value: serde_json::Value,
    /// Key figures for the two-column table view
    pub figures: Vec<(String, String)>,
    /// Strategy rows for the table view; empty for build-master
    pub strategy: Vec<term::StrategyLine>,
    pub warnings: Vec<String>,
    /// Single headline figure for minimal mode
    pub minimal: String,
}

/// Dispatch output to the appropriate formatter.
pub fn render(format: &OutputFormat, report: &CommandReport) {
    match format {
        OutputFormat::Json => term::print_json(&report.value),
        OutputFormat::Table => term::print_table(report),
        OutputFormat::Minimal => println!("{}", report.minimal),
    }
}
