use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Days;

/// Upper bounds for the DIO clusters: `< a_max` is A, `[a_max, b_max)` is B,
/// `[b_max, c_max)` is C, `>= c_max` is D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DioThresholds {
    pub a_max: Days,
    pub b_max: Days,
    pub c_max: Days,
}

impl Default for DioThresholds {
    fn default() -> Self {
        DioThresholds {
            a_max: dec!(180),
            b_max: dec!(400),
            c_max: dec!(700),
        }
    }
}

/// Immutable configuration passed to every pipeline stage.
///
/// Defaults reproduce the production constants; any subset can be overridden
/// from a JSON/YAML file or CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the raw sales extracts and sheet exports
    pub raw_dir: PathBuf,
    /// Directory for canonical tables and the strategy export
    pub processed_dir: PathBuf,
    /// Directory for the markdown report
    pub reports_dir: PathBuf,
    /// Filename prefix of the period-labeled sales extracts
    pub sales_file_prefix: String,
    /// Filename of the client forecast sheet export
    pub forecast_file: String,
    /// Filename of the inventory sheet export
    pub inventory_file: String,
    /// How many SKUs to keep when ranking by inventory value
    pub top_n: usize,
    pub dio_thresholds: DioThresholds,
    /// DIO at or above which purchases are frozen
    pub freeze_threshold_days: Days,
    /// Target DIO for the reorder policy
    pub target_dio_days: Days,
    /// Supplier lead time assumed by the reorder policy
    pub lead_time_days: Days,
    /// Year the projections are written into
    pub forecast_target_year: i32,
    /// Rewrite month-column years in the client sheet to the target year.
    /// Input-correction rule for sheets labelled with the historical year.
    pub forecast_year_override: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
            reports_dir: PathBuf::from("reports"),
            sales_file_prefix: "ventas_2025_".to_string(),
            forecast_file: "forecast_2026.csv".to_string(),
            inventory_file: "inventario.csv".to_string(),
            top_n: 20,
            dio_thresholds: DioThresholds::default(),
            freeze_threshold_days: dec!(520),
            target_dio_days: dec!(400),
            lead_time_days: dec!(120),
            forecast_target_year: 2026,
            forecast_year_override: true,
        }
    }
}

impl PipelineConfig {
    pub fn forecast_path(&self) -> PathBuf {
        self.raw_dir.join(&self.forecast_file)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.raw_dir.join(&self.inventory_file)
    }

    pub fn sales_monthly_path(&self) -> PathBuf {
        self.processed_dir.join("ventas_sku_mes.csv")
    }

    pub fn forecast_annual_path(&self) -> PathBuf {
        self.processed_dir.join("forecast_2026_anual.csv")
    }

    pub fn client_revenue_path(&self) -> PathBuf {
        self.processed_dir.join("forecast_2026_ingresos.csv")
    }

    pub fn strategy_csv_path(&self) -> PathBuf {
        self.processed_dir
            .join(format!("top{}_inventory_strategy.csv", self.top_n))
    }

    pub fn report_path(&self) -> PathBuf {
        self.reports_dir.join("analysis_summary.md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.top_n, 20);
        assert_eq!(cfg.freeze_threshold_days, dec!(520));
        assert_eq!(cfg.target_dio_days, dec!(400));
        assert_eq!(cfg.lead_time_days, dec!(120));
        assert_eq!(cfg.forecast_target_year, 2026);
        assert!(cfg.forecast_year_override);
        assert_eq!(cfg.dio_thresholds, DioThresholds::default());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(r#"{ "top_n": 5 }"#).unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(cfg.freeze_threshold_days, dec!(520));
    }

    #[test]
    fn test_strategy_path_tracks_top_n() {
        let cfg = PipelineConfig {
            top_n: 7,
            ..PipelineConfig::default()
        };
        assert!(cfg
            .strategy_csv_path()
            .ends_with("top7_inventory_strategy.csv"));
    }
}
