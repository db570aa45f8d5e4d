//! Executive markdown report: six fixed sections, client-facing wording.
//!
//! Rendering never fails on empty tables; a table with no rows still gets
//! its header and separator lines.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::forecast::client::ClientRevenueSummary;
use crate::forecast::seasonal::ModelForecastAnnual;
use crate::inventory::dio::DioCluster;
use crate::inventory::reorder::StrategyRow;
use crate::types::{Money, Rate};

/// Per-cluster rollup for the DIO section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub dio_cluster: DioCluster,
    /// Distinct SKUs in the cluster
    pub skus: u64,
    /// Total inventory value of rows with a defined value
    pub inventario_mxn: Money,
}

/// Roll the strategy rows up by cluster, sorted by cluster label.
pub fn cluster_summary(strategy: &[StrategyRow]) -> Vec<ClusterSummary> {
    let mut acc: BTreeMap<DioCluster, (BTreeSet<&str>, Money)> = BTreeMap::new();
    for row in strategy {
        let entry = acc.entry(row.dio_cluster).or_default();
        entry.0.insert(row.item.as_str());
        if let Some(v) = row.inventario_mxn {
            entry.1 += v;
        }
    }
    acc.into_iter()
        .map(|(dio_cluster, (items, inventario_mxn))| ClusterSummary {
            dio_cluster,
            skus: items.len() as u64,
            inventario_mxn,
        })
        .collect()
}

/// Everything the report needs, already computed by the pipeline.
pub struct ReportContext<'a> {
    pub client: &'a ClientRevenueSummary,
    pub model_annual: &'a [ModelForecastAnnual],
    pub strategy: &'a [StrategyRow],
    pub clusters: &'a [ClusterSummary],
    pub config: &'a PipelineConfig,
}

pub fn build_markdown_report(ctx: &ReportContext<'_>) -> String {
    let cfg = ctx.config;
    let target = cfg.forecast_target_year;
    let history = target - 1;

    let model_total: Money = ctx
        .model_annual
        .iter()
        .map(|a| a.ingresos_2026_modelo)
        .sum();

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Resumen ejecutivo de forecast e inventario\n".to_string());

    lines.push(format!(
        "## 1) Ingresos {target} proyectados por forecast del cliente"
    ));
    lines.push(format!(
        "- Ingresos totales: **${} MXN**",
        format_money(ctx.client.total_ingresos)
    ));
    lines.push(format!(
        "- SKUs sin precio promedio {history}: **{}**\n",
        format_pct(ctx.client.missing_price_rate)
    ));

    lines.push(format!(
        "## 2) Nuevo forecast {target} (seasonal-naive con histórico {history})"
    ));
    lines.push(format!(
        "- Ingresos totales del modelo: **${} MXN**",
        format_money(model_total)
    ));
    lines.push(format!(
        "- Criterio: con un solo año de histórico, se replica estacionalidad mensual de {history} en {target}.\n"
    ));

    lines.push(format!(
        "## 3) Top {} SKUs por monto de inventario",
        cfg.top_n
    ));
    lines.push(markdown_table(
        &["item", "existencia", "inventario_mxn"],
        &ctx.strategy
            .iter()
            .map(|r| {
                vec![
                    r.item.clone(),
                    format_qty(r.existencia),
                    format_opt_money(r.inventario_mxn),
                ]
            })
            .collect::<Vec<_>>(),
    ));
    lines.push(String::new());

    lines.push("## 4) Clasificación por días de inventario (DIO)".to_string());
    lines.push(markdown_table(
        &["dio_cluster", "skus", "inventario_mxn"],
        &ctx.clusters
            .iter()
            .map(|c| {
                vec![
                    c.dio_cluster.to_string(),
                    c.skus.to_string(),
                    format_money(c.inventario_mxn),
                ]
            })
            .collect::<Vec<_>>(),
    ));
    lines.push(String::new());

    lines.push(format!(
        "## 5) Estrategia inmediata (lead time {} días, meta {} días)",
        format_qty(cfg.lead_time_days),
        format_qty(cfg.target_dio_days)
    ));
    let mut by_dio: Vec<&StrategyRow> = ctx.strategy.iter().collect();
    by_dio.sort_by(|a, b| match (b.dio_days, a.dio_days) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
    lines.push(markdown_table(
        &["item", "dio_days", "accion_inmediata", "dias_hasta_resurtir"],
        &by_dio
            .iter()
            .map(|r| {
                vec![
                    r.item.clone(),
                    format_opt_days(r.dio_days),
                    r.accion_inmediata.to_string(),
                    format_days(r.dias_hasta_resurtir),
                ]
            })
            .collect::<Vec<_>>(),
    ));
    lines.push(String::new());

    lines.push("## 6) Inconsistencias y tratamiento propuesto".to_string());
    lines.push(format!(
        "- Si faltan precios {history} para SKUs del forecast, usar mediana por familia/categoría o último precio válido."
    ));
    lines.push(
        "- Si inventario no trae mes, asumir snapshot de corte y documentar la fecha de extracción."
            .to_string(),
    );
    lines.push(
        "- Si hay SKUs con cero consumo, marcar como inventario inmovilizado y excluir de DIO estándar."
            .to_string(),
    );

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Pipe table with a header and separator; zero rows is a valid table.
fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", headers.join(" | ")));
    out.push_str(&format!(
        "|{}|",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));
    for row in rows {
        out.push_str(&format!("\n| {} |", row.join(" | ")));
    }
    out
}

/// "1234567.89" style amount with thousands separators: "1,234,567.89".
fn format_money(amount: Money) -> String {
    group_thousands(&format!("{:.2}", amount))
}

fn format_opt_money(amount: Option<Money>) -> String {
    amount.map(format_money).unwrap_or_default()
}

fn format_pct(rate: Rate) -> String {
    format!("{:.2}%", rate * Decimal::from(100))
}

fn format_days(days: Decimal) -> String {
    format!("{:.1}", days)
}

fn format_opt_days(days: Option<Decimal>) -> String {
    days.map(format_days).unwrap_or_else(|| "s/d".to_string())
}

/// Integer-looking quantities print bare; fractional ones keep their scale.
fn format_qty(qty: Decimal) -> String {
    qty.normalize().to_string()
}

fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
