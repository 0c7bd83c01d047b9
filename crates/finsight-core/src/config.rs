//! Analytics configuration
//!
//! Resolution order:
//! 1. An explicit path (e.g. `finsight --config my.toml`)
//! 2. `<data_local_dir>/finsight/config/analytics.toml`
//! 3. The defaults embedded from `config/analytics.toml`
//!
//! Files only need to set the keys they change; everything else keeps the
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::insights::isolation_forest::IsolationForest;

/// Embedded default config
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Which transactions define the date span for average daily spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyAverageScope {
    /// Earliest to latest date across income and expenses
    #[default]
    AllTransactions,
    /// Earliest to latest expense date
    ExpensesOnly,
}

impl DailyAverageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllTransactions => "all_transactions",
            Self::ExpensesOnly => "expenses_only",
        }
    }
}

impl std::str::FromStr for DailyAverageScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all_transactions" => Ok(Self::AllTransactions),
            "expenses_only" => Ok(Self::ExpensesOnly),
            _ => Err(format!("Unknown daily average scope: {}", s)),
        }
    }
}

/// Outlier detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Detection is skipped below this many expense transactions
    pub min_transactions: usize,
    pub contamination: f64,
    pub n_trees: usize,
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_transactions: 10,
            contamination: 0.1,
            n_trees: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

impl AnomalyConfig {
    /// Forest parameters for this config
    pub fn forest(&self) -> IsolationForest {
        IsolationForest::new(
            self.n_trees,
            self.max_samples,
            self.contamination,
            self.seed,
        )
    }
}

/// Report shaping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub daily_average_scope: DailyAverageScope,
    pub projection_days: u32,
    pub max_savings_opportunities: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            daily_average_scope: DailyAverageScope::AllTransactions,
            projection_days: 30,
            max_savings_opportunities: 5,
        }
    }
}

/// Full analytics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub anomaly: AnomalyConfig,
    pub report: ReportConfig,
}

impl AnalyticsConfig {
    /// Load using the standard resolution order
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) if path.exists() => read_config(path)?,
            Some(path) => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                DEFAULT_CONFIG.to_string()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Built-in defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let anomaly = &self.anomaly;
        if !(anomaly.contamination > 0.0 && anomaly.contamination <= 0.5) {
            return Err(Error::Config(format!(
                "anomaly.contamination must be in (0, 0.5], got {}",
                anomaly.contamination
            )));
        }
        if anomaly.n_trees == 0 {
            return Err(Error::Config("anomaly.n_trees must be at least 1".into()));
        }
        if anomaly.max_samples == 0 {
            return Err(Error::Config(
                "anomaly.max_samples must be at least 1".into(),
            ));
        }
        if self.report.projection_days == 0 {
            return Err(Error::Config(
                "report.projection_days must be at least 1".into(),
            ));
        }
        if self.report.max_savings_opportunities == 0 {
            return Err(Error::Config(
                "report.max_savings_opportunities must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight").join("config").join("analytics.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Loading analytics config");
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    anomaly: Option<RawAnomaly>,
    report: Option<RawReport>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    min_transactions: Option<usize>,
    contamination: Option<f64>,
    n_trees: Option<usize>,
    max_samples: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    daily_average_scope: Option<String>,
    projection_days: Option<u32>,
    max_savings_opportunities: Option<usize>,
}

/// Parse config from TOML content, filling gaps with defaults
fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(anomaly) = raw.anomaly {
        if let Some(min) = anomaly.min_transactions {
            config.anomaly.min_transactions = min;
        }
        if let Some(contamination) = anomaly.contamination {
            config.anomaly.contamination = contamination;
        }
        if let Some(n_trees) = anomaly.n_trees {
            config.anomaly.n_trees = n_trees;
        }
        if let Some(max_samples) = anomaly.max_samples {
            config.anomaly.max_samples = max_samples;
        }
        if let Some(seed) = anomaly.seed {
            config.anomaly.seed = seed;
        }
    }

    if let Some(report) = raw.report {
        if let Some(scope) = report.daily_average_scope {
            config.report.daily_average_scope = scope.parse().map_err(Error::Config)?;
        }
        if let Some(days) = report.projection_days {
            config.report.projection_days = days;
        }
        if let Some(max) = report.max_savings_opportunities {
            config.report.max_savings_opportunities = max;
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_defaults() {
        let config = AnalyticsConfig::embedded().unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
[anomaly]
seed = 7

[report]
daily_average_scope = "expenses_only"
"#,
        )
        .unwrap();

        assert_eq!(config.anomaly.seed, 7);
        assert_eq!(config.anomaly.n_trees, 100);
        assert_eq!(
            config.report.daily_average_scope,
            DailyAverageScope::ExpensesOnly
        );
        assert_eq!(config.report.projection_days, 30);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("[anomaly]\ncontamination = 0.9\n").is_err());
        assert!(parse_config("[anomaly]\nn_trees = 0\n").is_err());
        assert!(parse_config("[report]\nmax_savings_opportunities = 0\n").is_err());
        assert!(parse_config("[report]\ndaily_average_scope = \"weekly\"\n").is_err());
        assert!(parse_config("not toml at all [").is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nmax_savings_opportunities = 3").unwrap();

        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.report.max_savings_opportunities, 3);
        assert_eq!(config.anomaly.min_transactions, 10);
    }

    #[test]
    fn test_missing_explicit_path_uses_defaults() {
        let config = AnalyticsConfig::load(Some(Path::new("/nonexistent/analytics.toml"))).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_scope_as_str_round_trip() {
        for scope in [DailyAverageScope::AllTransactions, DailyAverageScope::ExpensesOnly] {
            assert_eq!(scope.as_str().parse::<DailyAverageScope>().unwrap(), scope);
        }
    }
}
