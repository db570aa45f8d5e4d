//! Reorder strategy labels for the classified positions.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::inventory::dio::{DioCluster, DioRow};
use crate::types::{Days, Money, Qty};

/// Immediate purchasing action. Display strings are the client-facing
/// labels carried into the export and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReorderAction {
    #[serde(rename = "Congelar compras (6 meses)")]
    FreezePurchases,
    #[serde(rename = "Monitorear y no comprar ahora")]
    Monitor,
    #[serde(rename = "Plan de resurtido inmediato")]
    ImmediateReorder,
}

impl fmt::Display for ReorderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReorderAction::FreezePurchases => "Congelar compras (6 meses)",
            ReorderAction::Monitor => "Monitorear y no comprar ahora",
            ReorderAction::ImmediateReorder => "Plan de resurtido inmediato",
        };
        f.write_str(label)
    }
}

/// One fully-labelled strategy row. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRow {
    pub item: String,
    pub mes: Option<chrono::NaiveDate>,
    pub existencia: Qty,
    pub costo_uni_proxy: Option<Money>,
    pub inventario_mxn: Option<Money>,
    pub unidades_prom_mes: Option<Qty>,
    pub ingresos_prom_mes: Option<Money>,
    pub consumo_dia: Option<Qty>,
    pub dio_days: Option<Days>,
    pub dio_cluster: DioCluster,
    pub meta_dio: Days,
    pub lead_time_dias: Days,
    pub accion_inmediata: ReorderAction,
    pub dias_hasta_resurtir: Days,
}

/// Decide the action for a DIO figure. First match wins; an undefined DIO
/// fails both threshold checks and falls through to an immediate reorder,
/// mirroring how the thresholds behave on missing data upstream.
pub fn reorder_action(dio_days: Option<Days>, config: &PipelineConfig) -> ReorderAction {
    match dio_days {
        Some(d) if d >= config.freeze_threshold_days => ReorderAction::FreezePurchases,
        Some(d) if d >= config.target_dio_days => ReorderAction::Monitor,
        _ => ReorderAction::ImmediateReorder,
    }
}

/// Days of consumption to burn before stock is back at the target DIO.
/// Never negative; zero when the reorder is already due.
pub fn days_until_reorder(dio_days: Option<Days>, config: &PipelineConfig) -> Days {
    match dio_days {
        Some(d) => (d - config.target_dio_days).max(Decimal::ZERO),
        None => Decimal::ZERO,
    }
}

/// Attach the policy constants and action labels to the classified rows.
pub fn reorder_strategy(rows: &[DioRow], config: &PipelineConfig) -> Vec<StrategyRow> {
    rows.iter()
        .map(|row| StrategyRow {
            item: row.item.clone(),
            mes: row.mes,
            existencia: row.existencia,
            costo_uni_proxy: row.costo_uni_proxy,
            inventario_mxn: row.inventario_mxn,
            unidades_prom_mes: row.unidades_prom_mes,
            ingresos_prom_mes: row.ingresos_prom_mes,
            consumo_dia: row.consumo_dia,
            dio_days: row.dio_days,
            dio_cluster: row.dio_cluster,
            meta_dio: config.target_dio_days,
            lead_time_dias: config.lead_time_days,
            accion_inmediata: reorder_action(row.dio_days, config),
            dias_hasta_resurtir: days_until_reorder(row.dio_days, config),
        })
        .collect()
}
