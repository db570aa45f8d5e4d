//! Seasonal-naive projection: with a single year of history, each month of
//! the target year repeats the same calendar month of the historical year.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{Money, Qty, SalesRecord};

/// One projected SKU-month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelForecastMonthly {
    pub item: String,
    pub mes: NaiveDate,
    pub unidades_modelo: Qty,
    pub ingresos_modelo: Money,
}

/// Annual model forecast per SKU: the sum of the twelve projected months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelForecastAnnual {
    pub item: String,
    pub unidades_2026_modelo: Qty,
    pub ingresos_2026_modelo: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelForecast {
    pub monthly: Vec<ModelForecastMonthly>,
    pub annual: Vec<ModelForecastAnnual>,
}

/// Project the historical SKU-month table one year forward (12-month lag).
/// Deterministic and stateless: same input, same output.
pub fn seasonal_naive(sales_monthly: &[SalesRecord], target_year: i32) -> ModelForecast {
    let monthly: Vec<ModelForecastMonthly> = sales_monthly
        .iter()
        .filter_map(|rec| {
            // First-of-month dates shift years without day-of-month trouble.
            NaiveDate::from_ymd_opt(target_year, rec.mes.month(), 1).map(|mes| {
                ModelForecastMonthly {
                    item: rec.item.clone(),
                    mes,
                    unidades_modelo: rec.piezas,
                    ingresos_modelo: rec.dinero,
                }
            })
        })
        .collect();

    let mut totals: BTreeMap<String, (Qty, Money)> = BTreeMap::new();
    for rec in &monthly {
        let entry = totals.entry(rec.item.clone()).or_default();
        entry.0 += rec.unidades_modelo;
        entry.1 += rec.ingresos_modelo;
    }

    let annual = totals
        .into_iter()
        .map(
            |(item, (unidades_2026_modelo, ingresos_2026_modelo))| ModelForecastAnnual {
                item,
                unidades_2026_modelo,
                ingresos_2026_modelo,
            },
        )
        .collect();

    ModelForecast { monthly, annual }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sale(item: &str, month: u32, piezas: Decimal, dinero: Decimal) -> SalesRecord {
        SalesRecord {
            item: item.to_string(),
            mes: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            piezas,
            dinero,
            precio_prom: None,
        }
    }

    #[test]
    fn test_month_m_repeats_last_years_month_m() {
        let history: Vec<SalesRecord> = (1..=12)
            .map(|m| sale("1", m, Decimal::from(m), Decimal::from(m * 10)))
            .collect();
        let fc = seasonal_naive(&history, 2026);

        assert_eq!(fc.monthly.len(), 12);
        for (rec, hist) in fc.monthly.iter().zip(&history) {
            assert_eq!(rec.mes.year(), 2026);
            assert_eq!(rec.mes.month(), hist.mes.month());
            assert_eq!(rec.mes.day(), 1);
            assert_eq!(rec.unidades_modelo, hist.piezas);
            assert_eq!(rec.ingresos_modelo, hist.dinero);
        }
    }

    #[test]
    fn test_annual_total_is_sum_of_twelve_months() {
        let history: Vec<SalesRecord> = (1..=12)
            .map(|m| sale("1", m, Decimal::from(m), Decimal::from(m * 10)))
            .collect();
        let fc = seasonal_naive(&history, 2026);

        // 1 + 2 + ... + 12 = 78
        assert_eq!(fc.annual.len(), 1);
        assert_eq!(fc.annual[0].unidades_2026_modelo, dec!(78));
        assert_eq!(fc.annual[0].ingresos_2026_modelo, dec!(780));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let history = vec![sale("1", 3, dec!(5), dec!(50)), sale("2", 3, dec!(7), dec!(70))];
        assert_eq!(
            seasonal_naive(&history, 2026),
            seasonal_naive(&history, 2026)
        );
    }

    #[test]
    fn test_empty_history_projects_nothing() {
        let fc = seasonal_naive(&[], 2026);
        assert!(fc.monthly.is_empty());
        assert!(fc.annual.is_empty());
    }
}
