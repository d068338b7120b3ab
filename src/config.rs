//! Configuration Module
//! Layered settings: built-in defaults, an optional TOML file, then `FUNDING_*` environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "funding.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// How an investor name is matched against a record's investor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestorMatch {
    /// `name` appears anywhere in the raw investor string.
    /// "Alpha" also matches "Alpha Ventures".
    #[default]
    Substring,
    /// `name` is one of the record's split investor tokens.
    Exact,
}

/// Source column names in the CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub startup: String,
    pub industry: String,
    pub subvertical: String,
    pub city: String,
    pub investors: String,
    pub round: String,
    pub amount: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            startup: "startup".to_string(),
            industry: "industry".to_string(),
            subvertical: "subvertical".to_string(),
            city: "city".to_string(),
            investors: "investor".to_string(),
            round: "investmenttype".to_string(),
            amount: "paisa".to_string(),
        }
    }
}

/// A city spelling rewritten at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityAlias {
    pub from: String,
    pub to: String,
}

/// Settings that shape how raw rows become a `FundingTable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub columns: ColumnMap,
    pub investor_delimiter: String,
    /// Placeholder investor tokens dropped from every investor list.
    pub noise_investors: Vec<String>,
    pub city_aliases: Vec<CityAlias>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            investor_delimiter: ",".to_string(),
            noise_investors: vec![String::new(), "& Others".to_string()],
            city_aliases: vec![CityAlias {
                from: "Bengaluru".to_string(),
                to: "Bangalore".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewSettings {
    /// Rows in the industry / investment type / city breakdowns.
    pub breakdown_limit: usize,
    pub top_startups: usize,
    pub top_investors: usize,
}

impl Default for OverviewSettings {
    fn default() -> Self {
        Self {
            breakdown_limit: 8,
            top_startups: 5,
            top_investors: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestorViewSettings {
    pub investor_match: InvestorMatch,
    pub recent_limit: usize,
    pub top_startups: usize,
    pub top_industries: usize,
}

impl Default for InvestorViewSettings {
    fn default() -> Self {
        Self {
            investor_match: InvestorMatch::Substring,
            recent_limit: 5,
            top_startups: 5,
            top_industries: 15,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV dataset opened at startup.
    pub data_path: PathBuf,
    pub dataset: DatasetSettings,
    pub overview: OverviewSettings,
    pub investor_view: InvestorViewSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("cleaneddata.csv"),
            dataset: DatasetSettings::default(),
            overview: OverviewSettings::default(),
            investor_view: InvestorViewSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `funding.toml` in the working
    /// directory is read if present. `FUNDING_*` variables override both, with `__`
    /// separating nested keys (`FUNDING_INVESTOR_VIEW__INVESTOR_MATCH=exact`).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                builder.add_source(config::File::from(path))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix("FUNDING")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize::<AppConfig>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_dataset_columns() {
        let config = AppConfig::default();
        assert_eq!(config.dataset.columns.amount, "paisa");
        assert_eq!(config.dataset.columns.round, "investmenttype");
        assert_eq!(config.overview.breakdown_limit, 8);
        assert_eq!(config.investor_view.investor_match, InvestorMatch::Substring);
        assert!(config.dataset.noise_investors.contains(&"& Others".to_string()));
    }

    #[test]
    fn toml_file_overrides_only_given_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
data_path = "funding.csv"

[overview]
breakdown_limit = 3

[investor_view]
investor_match = "exact"

[dataset.columns]
amount = "amount_in_crore"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data_path, PathBuf::from("funding.csv"));
        assert_eq!(config.overview.breakdown_limit, 3);
        assert_eq!(config.overview.top_investors, 10);
        assert_eq!(config.investor_view.investor_match, InvestorMatch::Exact);
        assert_eq!(config.dataset.columns.amount, "amount_in_crore");
        assert_eq!(config.dataset.columns.startup, "startup");
    }

    #[test]
    fn environment_overrides_defaults_and_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[overview]
breakdown_limit = 6
top_startups = 4

[investor_view]
investor_match = "substring"
"#
        )
        .unwrap();

        // Same values `toml_file_overrides_only_given_keys` expects, since tests share the process env.
        std::env::set_var("FUNDING_OVERVIEW__BREAKDOWN_LIMIT", "3");
        std::env::set_var("FUNDING_INVESTOR_VIEW__INVESTOR_MATCH", "exact");
        let from_env = AppConfig::load(None);
        let over_file = AppConfig::load(Some(file.path()));
        std::env::remove_var("FUNDING_OVERVIEW__BREAKDOWN_LIMIT");
        std::env::remove_var("FUNDING_INVESTOR_VIEW__INVESTOR_MATCH");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.overview.breakdown_limit, 3);
        assert_eq!(from_env.overview.top_startups, 5);
        assert_eq!(from_env.investor_view.investor_match, InvestorMatch::Exact);

        let over_file = over_file.unwrap();
        assert_eq!(over_file.overview.breakdown_limit, 3);
        assert_eq!(over_file.overview.top_startups, 4);
        assert_eq!(over_file.investor_view.investor_match, InvestorMatch::Exact);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/funding.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
