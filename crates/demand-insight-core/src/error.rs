use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandInsightError {
    #[error("Missing column for {field}: no header matched any of {candidates:?}")]
    MissingColumn {
        field: String,
        candidates: Vec<String>,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DemandInsightError {
    fn from(e: serde_json::Error) -> Self {
        DemandInsightError::Serialization(e.to_string())
    }
}

impl DemandInsightError {
    /// Constructor for the column-discovery failure path, keeping the list of
    /// candidate aliases that were tried.
    pub fn missing_column(field: &str, candidates: &[&str]) -> Self {
        DemandInsightError::MissingColumn {
            field: field.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        }
    }
}
