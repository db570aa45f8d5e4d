use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (MXN). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Unit quantities (pieces, stock counts)
pub type Qty = Decimal;

/// Day counts (DIO, lead times)
pub type Days = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// One SKU-month of aggregated sales. `(item, mes)` is unique; `mes` is
/// always the first of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Canonical SKU identifier
    pub item: String,
    /// First-of-month date
    pub mes: NaiveDate,
    /// Units sold in the month
    pub piezas: Qty,
    /// Revenue in the month
    pub dinero: Money,
    /// Mean unit price over the month's raw rows; None when no price parsed
    pub precio_prom: Option<Money>,
}

/// One SKU-month of the client's unit forecast, melted from the wide sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub item: String,
    pub mes: NaiveDate,
    pub unidades: Qty,
}

/// Annual client forecast per SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientForecastAnnual {
    pub item: String,
    pub unidades_2026: Qty,
}

/// Latest stock count per SKU. `mes` is None for undated snapshot sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub item: String,
    pub mes: Option<NaiveDate>,
    pub existencia: Qty,
}

/// Counters for non-fatal parse failures at the ingestion boundary.
///
/// Unparseable quantities coerce to zero and unparseable dates to a null
/// month so downstream sums stay well-defined; these counters are the record
/// that it happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    pub unparseable_dates: u64,
    pub unparseable_quantities: u64,
    pub unparseable_prices: u64,
}

impl DataQuality {
    pub fn merge(&mut self, other: DataQuality) {
        self.unparseable_dates += other.unparseable_dates;
        self.unparseable_quantities += other.unparseable_quantities;
        self.unparseable_prices += other.unparseable_prices;
    }

    pub fn is_clean(&self) -> bool {
        *self == DataQuality::default()
    }

    /// Human-readable warnings, one per non-zero counter.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.unparseable_dates > 0 {
            out.push(format!(
                "{} rows had unparseable dates and were excluded from the monthly table.",
                self.unparseable_dates
            ));
        }
        if self.unparseable_quantities > 0 {
            out.push(format!(
                "{} quantity values failed to parse and were coerced to zero.",
                self.unparseable_quantities
            ));
        }
        if self.unparseable_prices > 0 {
            out.push(format!(
                "{} price values failed to parse and were excluded from averages.",
                self.unparseable_prices
            ));
        }
        out
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
