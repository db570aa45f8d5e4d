pub mod analyze;
pub mod build_master;
pub mod run;

use std::path::PathBuf;

use demand_insight_core::forecast::client::ClientRevenueSummary;
use demand_insight_core::{DataQuality, PipelineConfig, SalesRecord};

/// Canonical tables handed from the build stage to the analysis stage,
/// either in memory (`run`) or through the processed CSVs.
pub struct MasterTables {
    pub sales_monthly: Vec<SalesRecord>,
    pub client: ClientRevenueSummary,
    pub quality: DataQuality,
}

/// Fold optional CLI flags over the loaded configuration.
pub(crate) fn apply_overrides(
    config: &mut PipelineConfig,
    raw_dir: Option<PathBuf>,
    processed_dir: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    top_n: Option<usize>,
) {
    if let Some(dir) = raw_dir {
        config.raw_dir = dir;
    }
    if let Some(dir) = processed_dir {
        config.processed_dir = dir;
    }
    if let Some(dir) = reports_dir {
        config.reports_dir = dir;
    }
    if let Some(n) = top_n {
        config.top_n = n;
    }
}
