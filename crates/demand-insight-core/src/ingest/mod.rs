//! Ingestion boundaries: raw tabular sources in, canonical tables out.

pub mod forecast;
pub mod inventory;
pub mod sales;
