//! The analysis pipeline: projection, valuation, classification, strategy,
//! and report assembly over the three canonical tables.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::forecast::client::{summarize, ClientForecastRevenue, ClientRevenueSummary};
use crate::forecast::seasonal::{seasonal_naive, ModelForecast};
use crate::inventory::dio::{classify_dio, DioCluster};
use crate::inventory::reorder::{reorder_strategy, StrategyRow};
use crate::inventory::valuation::{cost_proxies, rank_inventory};
use crate::report::{build_markdown_report, cluster_summary, ClusterSummary, ReportContext};
use crate::types::{with_metadata, ComputationOutput, InventorySnapshot, Money, SalesRecord};
use crate::DemandInsightResult;

/// Full output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub client: ClientRevenueSummary,
    pub model_forecast: ModelForecast,
    /// Sum of the model's annual revenue across SKUs
    pub model_total_ingresos: Money,
    pub strategy: Vec<StrategyRow>,
    pub clusters: Vec<ClusterSummary>,
    pub report_markdown: String,
}

/// Run the full analysis over the canonical tables.
///
/// Stateless and single-pass; empty inputs produce an empty-but-valid result
/// with warnings rather than an error.
pub fn analyze(
    config: &PipelineConfig,
    sales_monthly: &[SalesRecord],
    client_rows: Vec<ClientForecastRevenue>,
    snapshots: &[InventorySnapshot],
) -> DemandInsightResult<ComputationOutput<AnalysisResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if sales_monthly.is_empty() {
        warnings.push("Sales history is empty; projections and DIO will have no data.".into());
    }
    if snapshots.is_empty() {
        warnings.push("Inventory snapshot is empty; no positions to value.".into());
    }

    let client = summarize(client_rows);
    if client.rows.is_empty() {
        warnings.push("Client forecast is empty.".into());
    } else if client.missing_price_rate > rust_decimal::Decimal::ZERO {
        warnings.push(format!(
            "{} of {} forecast SKUs have no historical price; their revenue is undefined.",
            client
                .rows
                .iter()
                .filter(|r| r.precio_prom_2025.is_none())
                .count(),
            client.rows.len()
        ));
    }

    let model_forecast = seasonal_naive(sales_monthly, config.forecast_target_year);
    let model_total_ingresos: Money = model_forecast
        .annual
        .iter()
        .map(|a| a.ingresos_2026_modelo)
        .sum();

    let proxies = cost_proxies(sales_monthly);
    let top = rank_inventory(snapshots, &proxies, config.top_n);
    let classified = classify_dio(&top, sales_monthly, &config.dio_thresholds);
    let strategy = reorder_strategy(&classified, config);

    let no_data = strategy
        .iter()
        .filter(|r| r.dio_cluster == DioCluster::NoData)
        .count();
    if no_data > 0 {
        warnings.push(format!(
            "{no_data} of the top {} SKUs have no measurable consumption (DIO undefined).",
            strategy.len()
        ));
    }

    let clusters = cluster_summary(&strategy);
    let report_markdown = build_markdown_report(&ReportContext {
        client: &client,
        model_annual: &model_forecast.annual,
        strategy: &strategy,
        clusters: &clusters,
        config,
    });

    let result = AnalysisResult {
        client,
        model_forecast,
        model_total_ingresos,
        strategy,
        clusters,
        report_markdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Seasonal-Naive Forecast & Inventory DIO Strategy",
        config,
        warnings,
        elapsed,
        result,
    ))
}
