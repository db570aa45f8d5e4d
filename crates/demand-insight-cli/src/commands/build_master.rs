//! Stage one: raw sales extracts and the client forecast sheet become the
//! canonical processed tables.

use std::fs::{self, File};
use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use demand_insight_core::forecast::client::impute_client_revenue;
use demand_insight_core::ingest::{forecast, sales};
use demand_insight_core::{DataQuality, PipelineConfig};

use crate::commands::MasterTables;
use crate::input;
use crate::output::{files, term, CommandReport};

/// Arguments for the build-master stage
#[derive(Args)]
pub struct BuildMasterArgs {
    /// Path to a JSON or YAML pipeline configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Directory of raw inputs (overrides config)
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Directory for canonical outputs (overrides config)
    #[arg(long)]
    pub processed_dir: Option<PathBuf>,
}

#[derive(Serialize)]
pub struct BuildSummary {
    sales_files: usize,
    raw_rows: u64,
    monthly_rows: usize,
    forecast_skus: usize,
    ingresos_cliente: Decimal,
    missing_price_rate: Decimal,
    quality: DataQuality,
}

pub fn run(args: BuildMasterArgs) -> Result<CommandReport, Box<dyn std::error::Error>> {
    let mut config = input::config_file::load_config(args.config.as_deref())?;
    super::apply_overrides(&mut config, args.raw_dir, args.processed_dir, None, None);

    let (_tables, summary) = execute(&config)?;

    report(&config, summary)
}

/// Ingest, impute, and persist the canonical tables. Returns them for the
/// chained `run` command alongside the build summary.
pub fn execute(
    config: &PipelineConfig,
) -> Result<(MasterTables, BuildSummary), Box<dyn std::error::Error>> {
    let sources = sales_sources(config)?;
    let sales_files = sources.len();
    info!("loading {} sales extracts from '{}'", sales_files, config.raw_dir.display());

    let sales_ingest = sales::load_sales(sources)?;
    for w in sales_ingest.quality.warnings() {
        warn!("{w}");
    }
    info!(
        "{} raw rows aggregated into {} SKU-month records",
        sales_ingest.raw_rows,
        sales_ingest.monthly.len()
    );

    let forecast_path = config.forecast_path();
    let fc_file = File::open(&forecast_path)
        .map_err(|e| format!("Failed to read '{}': {}", forecast_path.display(), e))?;
    let fc_ingest = forecast::load_client_forecast(fc_file, config)?;
    for w in fc_ingest.quality.warnings() {
        warn!("{w}");
    }

    let client = impute_client_revenue(&fc_ingest.annual, &sales_ingest.monthly);

    files::ensure_dir(&config.processed_dir)?;

    let monthly_path = config.sales_monthly_path();
    let monthly_out = File::create(&monthly_path)
        .map_err(|e| format!("Failed to write '{}': {}", monthly_path.display(), e))?;
    sales::write_monthly(monthly_out, &sales_ingest.monthly)?;

    files::write_csv_rows(
        &config.forecast_annual_path(),
        &fc_ingest.annual,
        &["item", "unidades_2026"],
    )?;
    files::write_csv_rows(
        &config.client_revenue_path(),
        &client.rows,
        &[
            "item",
            "unidades_2026",
            "precio_prom_2025",
            "ingresos_2026_cliente",
        ],
    )?;
    info!("canonical tables written to '{}'", config.processed_dir.display());

    let mut quality = sales_ingest.quality;
    quality.merge(fc_ingest.quality);

    let summary = BuildSummary {
        sales_files,
        raw_rows: sales_ingest.raw_rows,
        monthly_rows: sales_ingest.monthly.len(),
        forecast_skus: client.rows.len(),
        ingresos_cliente: client.total_ingresos,
        missing_price_rate: client.missing_price_rate,
        quality,
    };

    let tables = MasterTables {
        sales_monthly: sales_ingest.monthly,
        client,
        quality,
    };

    Ok((tables, summary))
}

fn report(
    config: &PipelineConfig,
    summary: BuildSummary,
) -> Result<CommandReport, Box<dyn std::error::Error>> {
    let year = config.forecast_target_year;
    let figures = vec![
        ("Archivos de ventas".to_string(), summary.sales_files.to_string()),
        ("Renglones crudos".to_string(), summary.raw_rows.to_string()),
        ("SKU-mes canónicos".to_string(), summary.monthly_rows.to_string()),
        (
            format!("Ingresos {year} (cliente)"),
            format!("${} MXN", term::fmt_money(summary.ingresos_cliente)),
        ),
        (
            "SKUs sin precio".to_string(),
            term::fmt_pct(summary.missing_price_rate),
        ),
    ];
    let minimal = term::fmt_money(summary.ingresos_cliente);
    let warnings = summary.quality.warnings();
    let value = serde_json::to_value(&summary)?;

    Ok(CommandReport {
        value,
        figures,
        strategy: Vec::new(),
        warnings,
        minimal,
    })
}

/// Period-labeled sales extracts under the raw directory, in name order.
fn sales_sources(
    config: &PipelineConfig,
) -> Result<Vec<(String, File)>, Box<dyn std::error::Error>> {
    let dir = &config.raw_dir;
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory '{}': {}", dir.display(), e))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&config.sales_file_prefix) && name.ends_with(".csv"))
        .collect();
    names.sort();

    if names.is_empty() {
        return Err(format!(
            "No sales extracts matching '{}*.csv' in '{}'",
            config.sales_file_prefix,
            dir.display()
        )
        .into());
    }

    names
        .into_iter()
        .map(|name| -> Result<(String, File), Box<dyn std::error::Error>> {
            let path = dir.join(&name);
            let file = File::open(&path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
            Ok((name, file))
        })
        .collect()
}
