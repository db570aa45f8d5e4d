pub mod dio;
pub mod reorder;
pub mod valuation;
