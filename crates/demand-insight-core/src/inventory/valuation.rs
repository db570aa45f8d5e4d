//! Inventory valuation: a unit-cost proxy from trailing-year sales, applied
//! to current stock, ranked to the top N SKUs by value.

use std::collections::BTreeMap;
use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{InventorySnapshot, Money, Qty, SalesRecord};

/// Trailing-year totals and the derived unit-cost proxy for one SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostProxy {
    pub item: String,
    pub piezas_2025: Qty,
    pub dinero_2025: Money,
    /// Revenue / units; undefined when the year sold zero units
    pub costo_uni_proxy: Option<Money>,
}

/// One ranked inventory position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryValuation {
    pub item: String,
    pub mes: Option<NaiveDate>,
    pub existencia: Qty,
    pub costo_uni_proxy: Option<Money>,
    /// `existencia * costo_uni_proxy`; undefined when the proxy is missing
    pub inventario_mxn: Option<Money>,
}

/// Per-SKU cost proxy from the trailing year. Zero units sold leaves the
/// proxy undefined instead of dividing by zero.
pub fn cost_proxies(sales_monthly: &[SalesRecord]) -> Vec<CostProxy> {
    let mut totals: BTreeMap<String, (Qty, Money)> = BTreeMap::new();
    for rec in sales_monthly {
        let entry = totals.entry(rec.item.clone()).or_default();
        entry.0 += rec.piezas;
        entry.1 += rec.dinero;
    }

    totals
        .into_iter()
        .map(|(item, (piezas_2025, dinero_2025))| CostProxy {
            item,
            piezas_2025,
            dinero_2025,
            costo_uni_proxy: if piezas_2025 > Decimal::ZERO {
                Some(dinero_2025 / piezas_2025)
            } else {
                None
            },
        })
        .collect()
}

/// Value every snapshot against the cost proxies and keep the top N by
/// inventory value.
///
/// Ordering is deterministic: descending value, undefined values below every
/// defined one, ties broken by ascending canonical item id.
pub fn rank_inventory(
    snapshots: &[InventorySnapshot],
    proxies: &[CostProxy],
    top_n: usize,
) -> Vec<InventoryValuation> {
    let proxy_by_item: BTreeMap<&str, Option<Money>> = proxies
        .iter()
        .map(|p| (p.item.as_str(), p.costo_uni_proxy))
        .collect();

    let mut valued: Vec<InventoryValuation> = snapshots
        .iter()
        .map(|snap| {
            let costo_uni_proxy = proxy_by_item
                .get(snap.item.as_str())
                .copied()
                .flatten();
            InventoryValuation {
                item: snap.item.clone(),
                mes: snap.mes,
                existencia: snap.existencia,
                costo_uni_proxy,
                inventario_mxn: costo_uni_proxy.map(|c| snap.existencia * c),
            }
        })
        .collect();

    valued.sort_by(|a, b| {
        compare_value_desc(a.inventario_mxn, b.inventario_mxn)
            .then_with(|| a.item.cmp(&b.item))
    });
    valued.truncate(top_n);
    valued
}

fn compare_value_desc(a: Option<Money>, b: Option<Money>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sale(item: &str, piezas: Decimal, dinero: Decimal) -> SalesRecord {
        SalesRecord {
            item: item.to_string(),
            mes: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            piezas,
            dinero,
            precio_prom: None,
        }
    }

    fn snap(item: &str, existencia: Decimal) -> InventorySnapshot {
        InventorySnapshot {
            item: item.to_string(),
            mes: None,
            existencia,
        }
    }

    #[test]
    fn test_cost_proxy_is_revenue_over_units() {
        let proxies = cost_proxies(&[sale("1", dec!(4), dec!(100)), sale("1", dec!(6), dec!(100))]);
        assert_eq!(proxies[0].piezas_2025, dec!(10));
        assert_eq!(proxies[0].dinero_2025, dec!(200));
        assert_eq!(proxies[0].costo_uni_proxy, Some(dec!(20)));
    }

    #[test]
    fn test_zero_units_leaves_proxy_undefined() {
        let proxies = cost_proxies(&[sale("1", dec!(0), dec!(50))]);
        assert_eq!(proxies[0].costo_uni_proxy, None);
    }

    #[test]
    fn test_top_n_selection_ordered_by_value() {
        // Values: a=100, b=50, c=200, d=10; N=2 keeps c then a.
        let proxies = cost_proxies(&[
            sale("a", dec!(1), dec!(100)),
            sale("b", dec!(1), dec!(50)),
            sale("c", dec!(1), dec!(200)),
            sale("d", dec!(1), dec!(10)),
        ]);
        let snaps = vec![snap("a", dec!(1)), snap("b", dec!(1)), snap("c", dec!(1)), snap("d", dec!(1))];
        let top = rank_inventory(&snaps, &proxies, 2);

        let items: Vec<&str> = top.iter().map(|v| v.item.as_str()).collect();
        assert_eq!(items, vec!["c", "a"]);
        assert_eq!(top[0].inventario_mxn, Some(dec!(200)));
        assert_eq!(top[1].inventario_mxn, Some(dec!(100)));
    }

    #[test]
    fn test_ties_break_by_item_id() {
        let proxies = cost_proxies(&[
            sale("z", dec!(1), dec!(100)),
            sale("m", dec!(1), dec!(100)),
        ]);
        let snaps = vec![snap("z", dec!(1)), snap("m", dec!(1))];
        let top = rank_inventory(&snaps, &proxies, 2);
        let items: Vec<&str> = top.iter().map(|v| v.item.as_str()).collect();
        assert_eq!(items, vec!["m", "z"]);
    }

    #[test]
    fn test_undefined_value_ranks_below_defined() {
        // "n" never sold, so its value is undefined and ranks last.
        let proxies = cost_proxies(&[sale("p", dec!(1), dec!(5))]);
        let snaps = vec![snap("n", dec!(1000)), snap("p", dec!(1))];
        let top = rank_inventory(&snaps, &proxies, 2);
        assert_eq!(top[0].item, "p");
        assert_eq!(top[1].item, "n");
        assert_eq!(top[1].inventario_mxn, None);
    }
}
