//! Client forecast sheet ingestion.
//!
//! The sheet arrives wide: an identifier column plus one column per month,
//! with month headers that are date-like strings. It is melted to long form,
//! optionally year-corrected, and aggregated to annual units per SKU.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::{Datelike, NaiveDate};

use crate::canon::{canon_item, canon_month, coerce_quantity};
use crate::columns::{find_column, ITEM_ALIASES};
use crate::config::PipelineConfig;
use crate::error::DemandInsightError;
use crate::types::{ClientForecastAnnual, DataQuality, ForecastRecord, Qty};
use crate::DemandInsightResult;

/// Result of ingesting the client forecast sheet.
#[derive(Debug, Clone)]
pub struct ClientForecastIngest {
    /// Long form, one row per SKU-month
    pub monthly: Vec<ForecastRecord>,
    /// Annual units per SKU, sorted by item
    pub annual: Vec<ClientForecastAnnual>,
    pub quality: DataQuality,
}

/// Melt the wide client sheet into the long and annual forecast tables.
///
/// Month columns are discovered as headers that parse as dates. When
/// `forecast_year_override` is set, every month is rewritten into
/// `forecast_target_year` while preserving the calendar month; this repairs
/// sheets the client labelled with the historical year.
pub fn load_client_forecast<R: Read>(
    reader: R,
    config: &PipelineConfig,
) -> DemandInsightResult<ClientForecastIngest> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let item_idx = find_column(&headers, "sku", ITEM_ALIASES)?;

    let month_cols: Vec<(usize, NaiveDate)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != item_idx)
        .filter_map(|(idx, h)| canon_month(h).map(|m| (idx, m)))
        .collect();

    if month_cols.is_empty() {
        return Err(DemandInsightError::InvalidInput {
            field: "forecast sheet".to_string(),
            reason: "no date-like month columns found in header".to_string(),
        });
    }

    let mut quality = DataQuality::default();
    let mut monthly = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let item = canon_item(record.get(item_idx).unwrap_or(""));

        for (idx, header_month) in &month_cols {
            let unidades: Qty = coerce_quantity(record.get(*idx).unwrap_or(""), &mut quality);
            let mes = project_month(*header_month, config);
            monthly.push(ForecastRecord {
                item: item.clone(),
                mes,
                unidades,
            });
        }
    }

    let mut totals: BTreeMap<String, Qty> = BTreeMap::new();
    for rec in &monthly {
        *totals.entry(rec.item.clone()).or_default() += rec.unidades;
    }
    let annual = totals
        .into_iter()
        .map(|(item, unidades_2026)| ClientForecastAnnual {
            item,
            unidades_2026,
        })
        .collect();

    Ok(ClientForecastIngest {
        monthly,
        annual,
        quality,
    })
}

fn project_month(header_month: NaiveDate, config: &PipelineConfig) -> NaiveDate {
    if config.forecast_year_override {
        // Day is always 1, so the target year/month pair is always valid.
        NaiveDate::from_ymd_opt(config.forecast_target_year, header_month.month(), 1)
            .unwrap_or(header_month)
    } else {
        header_month
    }
}
