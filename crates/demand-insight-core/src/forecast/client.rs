//! Client forecast revenue: annual units joined with the historical average
//! price to impute next-year revenue.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ClientForecastAnnual, Money, Qty, Rate, SalesRecord};

/// Annual client forecast with imputed revenue. Missing price means the
/// revenue is undefined, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientForecastRevenue {
    pub item: String,
    pub unidades_2026: Qty,
    /// Mean of the SKU's monthly average prices over the trailing year
    pub precio_prom_2025: Option<Money>,
    /// `unidades_2026 * precio_prom_2025`; None when the price is missing
    pub ingresos_2026_cliente: Option<Money>,
}

/// Imputed revenue rows plus the headline figures the report needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRevenueSummary {
    pub rows: Vec<ClientForecastRevenue>,
    /// Sum over rows with a defined revenue
    pub total_ingresos: Money,
    /// Fraction of forecast SKUs with no historical price
    pub missing_price_rate: Rate,
}

/// Mean of each SKU's monthly average prices. Months without a parsed price
/// stay out of the mean.
pub fn average_prices(sales_monthly: &[SalesRecord]) -> BTreeMap<String, Money> {
    let mut acc: BTreeMap<String, (Money, u32)> = BTreeMap::new();
    for rec in sales_monthly {
        if let Some(p) = rec.precio_prom {
            let entry = acc.entry(rec.item.clone()).or_insert((Decimal::ZERO, 0));
            entry.0 += p;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(item, (sum, count))| (item, sum / Decimal::from(count)))
        .collect()
}

/// Join the annual client units with the trailing-year average price and
/// impute revenue. SKUs the sales history never priced keep an undefined
/// revenue and are counted into `missing_price_rate`.
pub fn impute_client_revenue(
    annual: &[ClientForecastAnnual],
    sales_monthly: &[SalesRecord],
) -> ClientRevenueSummary {
    let prices = average_prices(sales_monthly);

    let rows: Vec<ClientForecastRevenue> = annual
        .iter()
        .map(|fc| {
            let precio = prices.get(&fc.item).copied();
            ClientForecastRevenue {
                item: fc.item.clone(),
                unidades_2026: fc.unidades_2026,
                precio_prom_2025: precio,
                ingresos_2026_cliente: precio.map(|p| fc.unidades_2026 * p),
            }
        })
        .collect();

    summarize(rows)
}

/// Recompute the headline figures from already-imputed rows (the analyze
/// stage reloads them from the canonical CSV).
pub fn summarize(rows: Vec<ClientForecastRevenue>) -> ClientRevenueSummary {
    let total_ingresos: Money = rows.iter().filter_map(|r| r.ingresos_2026_cliente).sum();

    let missing = rows
        .iter()
        .filter(|r| r.precio_prom_2025.is_none())
        .count();
    let missing_price_rate = if rows.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(missing as u64) / Decimal::from(rows.len() as u64)
    };

    ClientRevenueSummary {
        rows,
        total_ingresos,
        missing_price_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sale(item: &str, month: u32, precio: Option<Decimal>) -> SalesRecord {
        SalesRecord {
            item: item.to_string(),
            mes: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            piezas: dec!(10),
            dinero: dec!(100),
            precio_prom: precio,
        }
    }

    fn annual(item: &str, unidades: Decimal) -> ClientForecastAnnual {
        ClientForecastAnnual {
            item: item.to_string(),
            unidades_2026: unidades,
        }
    }

    #[test]
    fn test_price_is_mean_of_monthly_means() {
        let sales = vec![
            sale("1", 1, Some(dec!(10))),
            sale("1", 2, Some(dec!(14))),
            sale("1", 3, None),
        ];
        let prices = average_prices(&sales);
        assert_eq!(prices.get("1"), Some(&dec!(12)));
    }

    #[test]
    fn test_revenue_imputed_from_units_and_price() {
        let sales = vec![sale("1", 1, Some(dec!(10)))];
        let out = impute_client_revenue(&[annual("1", dec!(120))], &sales);
        assert_eq!(out.rows[0].ingresos_2026_cliente, Some(dec!(1200)));
        assert_eq!(out.total_ingresos, dec!(1200));
        assert_eq!(out.missing_price_rate, Decimal::ZERO);
    }

    #[test]
    fn test_missing_price_is_none_not_zero() {
        let sales = vec![sale("1", 1, Some(dec!(10)))];
        let out = impute_client_revenue(
            &[annual("1", dec!(100)), annual("2", dec!(50))],
            &sales,
        );
        let unknown = &out.rows[1];
        assert_eq!(unknown.precio_prom_2025, None);
        assert_eq!(unknown.ingresos_2026_cliente, None);
        // Half the forecast SKUs have no price
        assert_eq!(out.missing_price_rate, dec!(0.5));
        // The undefined revenue stays out of the total
        assert_eq!(out.total_ingresos, dec!(1000));
    }

    #[test]
    fn test_empty_forecast_has_zero_rate() {
        let out = impute_client_revenue(&[], &[]);
        assert!(out.rows.is_empty());
        assert_eq!(out.missing_price_rate, Decimal::ZERO);
        assert_eq!(out.total_ingresos, Decimal::ZERO);
    }
}
