//! Stage two: the canonical tables plus the inventory sheet become the
//! strategy export and the executive report.

use std::fs::File;
use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use demand_insight_core::forecast::client::{summarize, ClientForecastRevenue};
use demand_insight_core::ingest::{inventory, sales};
use demand_insight_core::pipeline;
use demand_insight_core::{DataQuality, PipelineConfig};

use crate::commands::MasterTables;
use crate::input;
use crate::output::{files, term, CommandReport};

/// Arguments for the analysis stage
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML pipeline configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Directory of raw inputs (overrides config)
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Directory of canonical tables (overrides config)
    #[arg(long)]
    pub processed_dir: Option<PathBuf>,

    /// Directory for the markdown report (overrides config)
    #[arg(long)]
    pub reports_dir: Option<PathBuf>,

    /// Number of top SKUs by inventory value (overrides config)
    #[arg(long)]
    pub top_n: Option<usize>,
}

pub fn run(args: AnalyzeArgs) -> Result<CommandReport, Box<dyn std::error::Error>> {
    let mut config = input::config_file::load_config(args.config.as_deref())?;
    super::apply_overrides(
        &mut config,
        args.raw_dir,
        args.processed_dir,
        args.reports_dir,
        args.top_n,
    );

    let tables = load_tables(&config)?;
    execute(&config, tables)
}

/// Reload the canonical tables the build stage persisted.
pub fn load_tables(config: &PipelineConfig) -> Result<MasterTables, Box<dyn std::error::Error>> {
    let monthly_path = config.sales_monthly_path();
    let monthly_file = File::open(&monthly_path)
        .map_err(|e| format!("Failed to read '{}': {}", monthly_path.display(), e))?;
    let sales_monthly = sales::read_monthly(monthly_file)?;

    let revenue_path = config.client_revenue_path();
    let mut rdr = csv::Reader::from_path(&revenue_path)
        .map_err(|e| format!("Failed to read '{}': {}", revenue_path.display(), e))?;
    let mut rows: Vec<ClientForecastRevenue> = Vec::new();
    for rec in rdr.deserialize() {
        rows.push(rec.map_err(|e| format!("Failed to parse '{}': {}", revenue_path.display(), e))?);
    }

    Ok(MasterTables {
        sales_monthly,
        client: summarize(rows),
        quality: DataQuality::default(),
    })
}

/// Run the analysis pipeline and write the export and report.
pub fn execute(
    config: &PipelineConfig,
    tables: MasterTables,
) -> Result<CommandReport, Box<dyn std::error::Error>> {
    let build_quality = tables.quality;

    let inventory_path = config.inventory_path();
    let inv_file = File::open(&inventory_path)
        .map_err(|e| format!("Failed to read '{}': {}", inventory_path.display(), e))?;
    let inv_ingest = inventory::load_inventory(inv_file)?;
    for w in inv_ingest.quality.warnings() {
        warn!("{w}");
    }
    info!(
        "{} inventory positions, {} SKU-month sales records",
        inv_ingest.snapshots.len(),
        tables.sales_monthly.len()
    );

    let envelope = pipeline::analyze(
        config,
        &tables.sales_monthly,
        tables.client.rows,
        &inv_ingest.snapshots,
    )?;
    for w in &envelope.warnings {
        warn!("{w}");
    }

    let strategy_path = config.strategy_csv_path();
    files::ensure_dir(&config.processed_dir)?;
    files::write_csv_rows(
        &strategy_path,
        &envelope.result.strategy,
        &[
            "item",
            "mes",
            "existencia",
            "costo_uni_proxy",
            "inventario_mxn",
            "unidades_prom_mes",
            "ingresos_prom_mes",
            "consumo_dia",
            "dio_days",
            "dio_cluster",
            "meta_dio",
            "lead_time_dias",
            "accion_inmediata",
            "dias_hasta_resurtir",
        ],
    )?;

    let report_path = config.report_path();
    files::ensure_dir(&config.reports_dir)?;
    files::write_text(&report_path, &envelope.result.report_markdown)?;

    info!("analysis written to '{}'", strategy_path.display());
    info!("report written to '{}'", report_path.display());

    let year = config.forecast_target_year;
    let figures = vec![
        (
            format!("Ingresos {year} (cliente)"),
            format!("${} MXN", term::fmt_money(envelope.result.client.total_ingresos)),
        ),
        (
            "SKUs sin precio".to_string(),
            term::fmt_pct(envelope.result.client.missing_price_rate),
        ),
        (
            format!("Ingresos {year} (modelo)"),
            format!("${} MXN", term::fmt_money(envelope.result.model_total_ingresos)),
        ),
        (
            "SKUs analizados".to_string(),
            envelope.result.strategy.len().to_string(),
        ),
        (
            "Export CSV".to_string(),
            strategy_path.display().to_string(),
        ),
        ("Reporte".to_string(), report_path.display().to_string()),
    ];

    let strategy_lines = envelope.result.strategy.iter().map(Into::into).collect();
    let minimal = term::fmt_money(envelope.result.model_total_ingresos);
    let mut warnings = envelope.warnings.clone();
    warnings.extend(build_quality.warnings());
    warnings.extend(inv_ingest.quality.warnings());
    let value = serde_json::to_value(&envelope)?;

    Ok(CommandReport {
        value,
        figures,
        strategy: strategy_lines,
        warnings,
        minimal,
    })
}
