//! Inventory sheet ingestion: latest stock snapshot per SKU.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;

use crate::canon::{canon_item, canon_month, coerce_quantity};
use crate::columns::{find_column, find_column_opt, ITEM_ALIASES, SNAPSHOT_MONTH_ALIASES, STOCK_ALIASES};
use crate::types::{DataQuality, InventorySnapshot};
use crate::DemandInsightResult;

/// Result of ingesting the inventory sheet export.
#[derive(Debug, Clone)]
pub struct InventoryIngest {
    /// Latest snapshot per item, sorted by item
    pub snapshots: Vec<InventorySnapshot>,
    pub quality: DataQuality,
}

/// Load the inventory sheet, keeping only the most recent snapshot per item.
///
/// The snapshot-month column is optional; without it the source is treated as
/// a single undated snapshot (`mes = None`). When deduplicating, dated rows
/// beat undated ones and later months beat earlier.
pub fn load_inventory<R: Read>(reader: R) -> DemandInsightResult<InventoryIngest> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let item_idx = find_column(&headers, "item", ITEM_ALIASES)?;
    let stock_idx = find_column(&headers, "existencia", STOCK_ALIASES)?;
    let month_idx = find_column_opt(&headers, SNAPSHOT_MONTH_ALIASES);

    let mut quality = DataQuality::default();
    let mut latest: BTreeMap<String, (Option<NaiveDate>, InventorySnapshot)> = BTreeMap::new();

    for record in rdr.records() {
        let record = record?;
        let item = canon_item(record.get(item_idx).unwrap_or(""));
        let existencia = coerce_quantity(record.get(stock_idx).unwrap_or(""), &mut quality);

        let mes = match month_idx {
            Some(idx) => {
                let raw = record.get(idx).unwrap_or("");
                let parsed = canon_month(raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    quality.unparseable_dates += 1;
                }
                parsed
            }
            None => None,
        };

        let snapshot = InventorySnapshot {
            item: item.clone(),
            mes,
            existencia,
        };

        // Last row wins on equal months, matching a stable sort + tail(1)
        match latest.get(&item) {
            Some((existing_mes, _)) if *existing_mes > mes => {}
            _ => {
                latest.insert(item, (mes, snapshot));
            }
        }
    }

    let snapshots = latest.into_values().map(|(_, snap)| snap).collect();

    Ok(InventoryIngest { snapshots, quality })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_keeps_latest_snapshot_per_item() {
        let csv = "\
codigo,mes,existencia
1023,2025-10-01,50
1023,2025-12-01,80
1023,2025-11-01,60
";
        let out = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(out.snapshots.len(), 1);
        assert_eq!(out.snapshots[0].existencia, dec!(80));
        assert_eq!(
            out.snapshots[0].mes,
            Some(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap())
        );
    }

    #[test]
    fn test_dated_rows_beat_undated() {
        let csv = "\
item,mes,existencia
7,,100
7,2025-06-01,40
";
        let out = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(out.snapshots[0].existencia, dec!(40));
        assert_eq!(out.quality.unparseable_dates, 0);
    }

    #[test]
    fn test_no_month_column_is_single_undated_snapshot() {
        let csv = "sku,stock\nABC-1,12\n20.0,7\n";
        let out = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(out.snapshots.len(), 2);
        assert!(out.snapshots.iter().all(|s| s.mes.is_none()));
        // canonical ordering by item
        assert_eq!(out.snapshots[0].item, "20");
        assert_eq!(out.snapshots[1].item, "ABC-1");
    }

    #[test]
    fn test_unparseable_stock_coerces_to_zero() {
        let csv = "item,existencia\n1,abc\n";
        let out = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(out.snapshots[0].existencia, dec!(0));
        assert_eq!(out.quality.unparseable_quantities, 1);
    }

    #[test]
    fn test_missing_stock_column_is_fatal() {
        let csv = "item,cantidad_mal\n1,5\n";
        let err = load_inventory(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            crate::DemandInsightError::MissingColumn { .. }
        ));
    }
}
