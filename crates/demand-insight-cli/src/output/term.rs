use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::Value;
use tabled::{builder::Builder, Table, Tabled};

use demand_insight_core::inventory::reorder::StrategyRow;

use super::CommandReport;

/// One strategy row shaped for the terminal table.
#[derive(Tabled)]
pub struct StrategyLine {
    pub item: String,
    pub existencia: String,
    pub inventario_mxn: String,
    pub dio_days: String,
    pub dio_cluster: String,
    pub accion: String,
}

impl From<&StrategyRow> for StrategyLine {
    fn from(row: &StrategyRow) -> Self {
        StrategyLine {
            item: row.item.clone(),
            existencia: fmt_qty(row.existencia),
            inventario_mxn: fmt_opt(row.inventario_mxn),
            dio_days: row
                .dio_days
                .map(|d| format!("{:.1}", d))
                .unwrap_or_else(|| "s/d".to_string()),
            dio_cluster: row.dio_cluster.to_string(),
            accion: row.accion_inmediata.to_string(),
        }
    }
}

pub fn fmt_money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub fn fmt_opt(amount: Option<Decimal>) -> String {
    amount.map(fmt_money).unwrap_or_default()
}

pub fn fmt_qty(qty: Decimal) -> String {
    qty.normalize().to_string()
}

pub fn fmt_pct(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::from(100))
}

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Two-column key figures, then the strategy table, then warnings.
pub fn print_table(report: &CommandReport) {
    if !report.figures.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, value) in &report.figures {
            builder.push_record([key.as_str(), value.as_str()]);
        }
        println!("{}", Table::from(builder));
    }

    if !report.strategy.is_empty() {
        println!("\n{}", "Estrategia por SKU".bold());
        println!("{}", Table::new(&report.strategy));
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }
}
