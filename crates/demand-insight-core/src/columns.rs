//! Header alias discovery for loosely-structured sheet exports.

use crate::error::DemandInsightError;
use crate::DemandInsightResult;

pub const ITEM_ALIASES: &[&str] = &["item", "sku", "codigo", "código"];
pub const STOCK_ALIASES: &[&str] = &["existencia", "existencias", "stock", "inventario"];
pub const SNAPSHOT_MONTH_ALIASES: &[&str] = &["mes", "fecha_corte", "corte"];
pub const SALE_DATE_ALIASES: &[&str] = &["fecha", "date"];
pub const UNITS_ALIASES: &[&str] = &["piezas", "unidades", "cantidad"];
pub const REVENUE_ALIASES: &[&str] = &["dinero", "importe", "ingresos"];
pub const PRICE_ALIASES: &[&str] = &["precio", "precio_unitario"];

/// Find the index of the first candidate that matches a header,
/// case-insensitively and ignoring surrounding whitespace. First alias wins.
pub fn find_column(
    headers: &csv::StringRecord,
    field: &str,
    candidates: &[&str],
) -> DemandInsightResult<usize> {
    find_column_opt(headers, candidates)
        .ok_or_else(|| DemandInsightError::missing_column(field, candidates))
}

/// Non-fatal variant for optional columns.
pub fn find_column_opt(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    for cand in candidates {
        let want = cand.to_lowercase();
        if let Some(idx) = normalized.iter().position(|h| *h == want) {
            return Some(idx);
        }
    }
    None
}
