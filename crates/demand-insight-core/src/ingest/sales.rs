//! Sales extract ingestion: one CSV per period, one row per transaction,
//! aggregated to the canonical SKU-month table.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::canon::{canon_item, canon_month, coerce_price, coerce_quantity};
use crate::columns::{
    find_column, ITEM_ALIASES, PRICE_ALIASES, REVENUE_ALIASES, SALE_DATE_ALIASES, UNITS_ALIASES,
};
use crate::error::DemandInsightError;
use crate::types::{DataQuality, Money, Qty, SalesRecord};
use crate::DemandInsightResult;

/// Result of ingesting the raw sales extracts.
#[derive(Debug, Clone)]
pub struct SalesIngest {
    /// Canonical SKU-month table, sorted by (item, mes)
    pub monthly: Vec<SalesRecord>,
    /// Raw transaction rows seen across all sources
    pub raw_rows: u64,
    pub quality: DataQuality,
}

#[derive(Default)]
struct MonthAcc {
    piezas: Qty,
    dinero: Money,
    price_sum: Money,
    price_count: u32,
}

/// Ingest period-labeled sales extracts and aggregate by `(item, mes)`.
///
/// Each source is `(label, reader)`; the label only appears in error
/// messages. Rows whose date fails to parse are counted and excluded from
/// the monthly table (there is no month to attribute them to).
pub fn load_sales<R: Read>(sources: Vec<(String, R)>) -> DemandInsightResult<SalesIngest> {
    let mut groups: BTreeMap<(String, NaiveDate), MonthAcc> = BTreeMap::new();
    let mut quality = DataQuality::default();
    let mut raw_rows = 0u64;

    for (label, reader) in sources {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let fecha_idx = find_column(&headers, "fecha", SALE_DATE_ALIASES)
            .map_err(|e| label_error(&label, e))?;
        let item_idx =
            find_column(&headers, "item", ITEM_ALIASES).map_err(|e| label_error(&label, e))?;
        let piezas_idx =
            find_column(&headers, "piezas", UNITS_ALIASES).map_err(|e| label_error(&label, e))?;
        let dinero_idx =
            find_column(&headers, "dinero", REVENUE_ALIASES).map_err(|e| label_error(&label, e))?;
        let precio_idx =
            find_column(&headers, "precio", PRICE_ALIASES).map_err(|e| label_error(&label, e))?;

        for record in rdr.records() {
            let record = record?;
            raw_rows += 1;

            let mes = match canon_month(field(&record, fecha_idx)) {
                Some(m) => m,
                None => {
                    quality.unparseable_dates += 1;
                    continue;
                }
            };
            let item = canon_item(field(&record, item_idx));

            let acc = groups.entry((item, mes)).or_default();
            acc.piezas += coerce_quantity(field(&record, piezas_idx), &mut quality);
            acc.dinero += coerce_quantity(field(&record, dinero_idx), &mut quality);
            if let Some(p) = coerce_price(field(&record, precio_idx), &mut quality) {
                acc.price_sum += p;
                acc.price_count += 1;
            }
        }
    }

    let monthly = groups
        .into_iter()
        .map(|((item, mes), acc)| SalesRecord {
            item,
            mes,
            piezas: acc.piezas,
            dinero: acc.dinero,
            precio_prom: if acc.price_count > 0 {
                Some(acc.price_sum / Decimal::from(acc.price_count))
            } else {
                None
            },
        })
        .collect();

    Ok(SalesIngest {
        monthly,
        raw_rows,
        quality,
    })
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}

fn label_error(label: &str, e: DemandInsightError) -> DemandInsightError {
    match e {
        DemandInsightError::MissingColumn { field, candidates } => {
            DemandInsightError::MissingColumn {
                field: format!("{field} in {label}"),
                candidates,
            }
        }
        other => other,
    }
}

/// Write the canonical SKU-month table as CSV.
pub fn write_monthly<W: Write>(writer: W, monthly: &[SalesRecord]) -> DemandInsightResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for rec in monthly {
        wtr.serialize(rec)?;
    }
    wtr.flush()
        .map_err(|e| DemandInsightError::Serialization(e.to_string()))?;
    Ok(())
}

/// Read the canonical SKU-month table back from CSV.
pub fn read_monthly<R: Read>(reader: R) -> DemandInsightResult<Vec<SalesRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for rec in rdr.deserialize() {
        out.push(rec?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn source(name: &str, body: &'static str) -> (String, &'static [u8]) {
        (name.to_string(), body.as_bytes())
    }

    #[test]
    fn test_aggregates_by_item_and_month() {
        let csv = "\
fecha,item,piezas,dinero,precio
2025-01-03,1023.0,2,20.0,10.0
2025-01-20,1023,3,36.0,12.0
2025-02-01,1023,1,11.0,11.0
2025-01-05,ABC-1,5,50.0,10.0
";
        let out = load_sales(vec![source("ventas_2025_01.csv", csv)]).unwrap();
        assert_eq!(out.raw_rows, 4);
        assert_eq!(out.monthly.len(), 3);

        let jan = &out.monthly[0];
        assert_eq!(jan.item, "1023");
        assert_eq!(jan.mes, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(jan.piezas, dec!(5));
        assert_eq!(jan.dinero, dec!(56.0));
        assert_eq!(jan.precio_prom, Some(dec!(11)));
    }

    #[test]
    fn test_sum_invariant_with_duplicate_rows() {
        // Identical source rows must add up, never be deduplicated away.
        let csv = "\
fecha,item,piezas,dinero,precio
2025-03-10,7,4,40,10
2025-03-10,7,4,40,10
";
        let out = load_sales(vec![source("ventas_2025_03.csv", csv)]).unwrap();
        assert_eq!(out.monthly.len(), 1);
        assert_eq!(out.monthly[0].piezas, dec!(8));
        assert_eq!(out.monthly[0].dinero, dec!(80));
    }

    #[test]
    fn test_unparseable_date_rows_counted_and_skipped() {
        let csv = "\
fecha,item,piezas,dinero,precio
bad-date,1,2,20,10
2025-04-02,1,3,30,10
";
        let out = load_sales(vec![source("ventas_2025_04.csv", csv)]).unwrap();
        assert_eq!(out.quality.unparseable_dates, 1);
        assert_eq!(out.monthly.len(), 1);
        assert_eq!(out.monthly[0].piezas, dec!(3));
    }

    #[test]
    fn test_unparseable_quantity_coerces_to_zero() {
        let csv = "\
fecha,item,piezas,dinero,precio
2025-05-01,1,n/a,30,10
";
        let out = load_sales(vec![source("ventas_2025_05.csv", csv)]).unwrap();
        assert_eq!(out.quality.unparseable_quantities, 1);
        assert_eq!(out.monthly[0].piezas, Decimal::ZERO);
        assert_eq!(out.monthly[0].dinero, dec!(30));
    }

    #[test]
    fn test_missing_price_column_is_fatal_with_source_label() {
        let csv = "fecha,item,piezas,dinero\n2025-01-01,1,1,1\n";
        let err = load_sales(vec![source("ventas_2025_01.csv", csv)]).unwrap_err();
        match err {
            DemandInsightError::MissingColumn { field, .. } => {
                assert!(field.contains("ventas_2025_01.csv"), "field was {field:?}");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_sources_concatenate() {
        let jan = "fecha,item,piezas,dinero,precio\n2025-01-01,1,1,10,10\n";
        let feb = "fecha,item,piezas,dinero,precio\n2025-02-01,1,2,20,10\n";
        let out = load_sales(vec![
            source("ventas_2025_01.csv", jan),
            source("ventas_2025_02.csv", feb),
        ])
        .unwrap();
        assert_eq!(out.monthly.len(), 2);
        let total: Decimal = out.monthly.iter().map(|r| r.piezas).sum();
        assert_eq!(total, dec!(3));
    }

    #[test]
    fn test_canonical_csv_round_trip() {
        let monthly = vec![
            SalesRecord {
                item: "1023".to_string(),
                mes: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                piezas: dec!(5),
                dinero: dec!(56.0),
                precio_prom: Some(dec!(11.2)),
            },
            SalesRecord {
                item: "ABC-1".to_string(),
                mes: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                piezas: dec!(1),
                dinero: dec!(9),
                precio_prom: None,
            },
        ];
        let mut buf = Vec::new();
        write_monthly(&mut buf, &monthly).unwrap();
        let back = read_monthly(buf.as_slice()).unwrap();
        assert_eq!(back, monthly);
    }
}
