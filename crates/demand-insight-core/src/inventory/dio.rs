//! Days-of-inventory-outstanding classification for the ranked SKUs.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::DioThresholds;
use crate::inventory::valuation::InventoryValuation;
use crate::types::{Days, Money, Qty, SalesRecord};

/// Divisor turning mean monthly consumption into daily consumption.
const DAYS_PER_MONTH: Decimal = dec!(30);

/// DIO cluster. Items with no measurable consumption land in `NoData`,
/// never in a numeric bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DioCluster {
    #[serde(rename = "A (<180)")]
    A,
    #[serde(rename = "B (180-399)")]
    B,
    #[serde(rename = "C (400-699)")]
    C,
    #[serde(rename = "D (>=700)")]
    D,
    #[serde(rename = "Sin dato")]
    NoData,
}

impl fmt::Display for DioCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DioCluster::A => "A (<180)",
            DioCluster::B => "B (180-399)",
            DioCluster::C => "C (400-699)",
            DioCluster::D => "D (>=700)",
            DioCluster::NoData => "Sin dato",
        };
        f.write_str(label)
    }
}

/// Bucket a DIO figure against the configured thresholds.
pub fn dio_bucket(days: Option<Days>, thresholds: &DioThresholds) -> DioCluster {
    match days {
        None => DioCluster::NoData,
        Some(d) if d < thresholds.a_max => DioCluster::A,
        Some(d) if d < thresholds.b_max => DioCluster::B,
        Some(d) if d < thresholds.c_max => DioCluster::C,
        Some(_) => DioCluster::D,
    }
}

/// A ranked inventory position with its consumption and DIO figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DioRow {
    pub item: String,
    pub mes: Option<chrono::NaiveDate>,
    pub existencia: Qty,
    pub costo_uni_proxy: Option<Money>,
    pub inventario_mxn: Option<Money>,
    /// Mean units sold per observed month
    pub unidades_prom_mes: Option<Qty>,
    /// Mean revenue per observed month
    pub ingresos_prom_mes: Option<Money>,
    /// `unidades_prom_mes / 30`
    pub consumo_dia: Option<Qty>,
    /// `existencia / consumo_dia`; undefined when consumption is not positive
    pub dio_days: Option<Days>,
    pub dio_cluster: DioCluster,
}

/// Join the ranked positions with monthly consumption means and classify.
pub fn classify_dio(
    top: &[InventoryValuation],
    sales_monthly: &[SalesRecord],
    thresholds: &DioThresholds,
) -> Vec<DioRow> {
    let mut acc: BTreeMap<&str, (Qty, Money, u32)> = BTreeMap::new();
    for rec in sales_monthly {
        let entry = acc.entry(rec.item.as_str()).or_insert((
            Decimal::ZERO,
            Decimal::ZERO,
            0,
        ));
        entry.0 += rec.piezas;
        entry.1 += rec.dinero;
        entry.2 += 1;
    }

    top.iter()
        .map(|val| {
            let means = acc.get(val.item.as_str()).map(|(piezas, dinero, n)| {
                let n = Decimal::from(*n);
                (*piezas / n, *dinero / n)
            });
            let unidades_prom_mes = means.map(|(u, _)| u);
            let ingresos_prom_mes = means.map(|(_, i)| i);

            let consumo_dia = unidades_prom_mes.map(|u| u / DAYS_PER_MONTH);
            let dio_days = match consumo_dia {
                Some(c) if c > Decimal::ZERO => Some(val.existencia / c),
                _ => None,
            };

            DioRow {
                item: val.item.clone(),
                mes: val.mes,
                existencia: val.existencia,
                costo_uni_proxy: val.costo_uni_proxy,
                inventario_mxn: val.inventario_mxn,
                unidades_prom_mes,
                ingresos_prom_mes,
                consumo_dia,
                dio_days,
                dio_cluster: dio_bucket(dio_days, thresholds),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn thresholds() -> DioThresholds {
        DioThresholds::default()
    }

    #[test]
    fn test_bucket_boundaries() {
        let t = thresholds();
        assert_eq!(dio_bucket(Some(dec!(179.999)), &t), DioCluster::A);
        assert_eq!(dio_bucket(Some(dec!(180)), &t), DioCluster::B);
        assert_eq!(dio_bucket(Some(dec!(399.999)), &t), DioCluster::B);
        assert_eq!(dio_bucket(Some(dec!(400)), &t), DioCluster::C);
        assert_eq!(dio_bucket(Some(dec!(699.999)), &t), DioCluster::C);
        assert_eq!(dio_bucket(Some(dec!(700)), &t), DioCluster::D);
        assert_eq!(dio_bucket(None, &t), DioCluster::NoData);
    }

    #[test]
    fn test_cluster_labels() {
        assert_eq!(DioCluster::A.to_string(), "A (<180)");
        assert_eq!(DioCluster::NoData.to_string(), "Sin dato");
    }

    fn sale(item: &str, month: u32, piezas: Decimal) -> SalesRecord {
        SalesRecord {
            item: item.to_string(),
            mes: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            piezas,
            dinero: piezas * dec!(10),
            precio_prom: None,
        }
    }

    fn position(item: &str, existencia: Decimal) -> InventoryValuation {
        InventoryValuation {
            item: item.to_string(),
            mes: None,
            existencia,
            costo_uni_proxy: Some(dec!(10)),
            inventario_mxn: Some(existencia * dec!(10)),
        }
    }

    #[test]
    fn test_dio_from_mean_monthly_consumption() {
        // Mean monthly units = (30 + 60) / 2 = 45; consumo_dia = 1.5
        let sales = vec![sale("1", 1, dec!(30)), sale("1", 2, dec!(60))];
        let rows = classify_dio(&[position("1", dec!(300))], &sales, &thresholds());

        let row = &rows[0];
        assert_eq!(row.unidades_prom_mes, Some(dec!(45)));
        assert_eq!(row.consumo_dia, Some(dec!(1.5)));
        assert_eq!(row.dio_days, Some(dec!(200)));
        assert_eq!(row.dio_cluster, DioCluster::B);
    }

    #[test]
    fn test_zero_consumption_is_no_data_not_an_error() {
        let sales = vec![sale("1", 1, dec!(0))];
        let rows = classify_dio(&[position("1", dec!(100))], &sales, &thresholds());
        assert_eq!(rows[0].consumo_dia, Some(dec!(0)));
        assert_eq!(rows[0].dio_days, None);
        assert_eq!(rows[0].dio_cluster, DioCluster::NoData);
    }

    #[test]
    fn test_item_without_sales_history_is_no_data() {
        let rows = classify_dio(&[position("ghost", dec!(100))], &[], &thresholds());
        assert_eq!(rows[0].unidades_prom_mes, None);
        assert_eq!(rows[0].dio_days, None);
        assert_eq!(rows[0].dio_cluster, DioCluster::NoData);
    }
}
