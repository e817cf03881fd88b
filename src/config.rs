//! Data layout and column mapping, read from TOML.
//!
//! ```toml
//! data_dir = "data"
//! monthly_file = "{month}_{year}.csv"
//! overall_file = "overall_monsoon_{year}.csv"
//!
//! [columns]
//! district = "DISTRICT NAME"
//! ```

use crate::columns::{ColumnStrategy, ExplicitColumns, HeaderHeuristic};
use crate::error::{MonsoonError, Result};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MONSOON_REPORT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "monsoon_report.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    June,
    July,
    August,
    September,
}

impl Month {
    pub fn as_str(self) -> &'static str {
        match self {
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub monthly_file: String,
    pub overall_file: String,
    pub monsoon_file: String,
    pub columns: ExplicitColumns,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            monthly_file: "{month}_{year}.csv".to_string(),
            overall_file: "overall_monsoon_{year}.csv".to_string(),
            monsoon_file: "Onset and Withdrawal of SW monsoon over Bihar.csv".to_string(),
            columns: ExplicitColumns::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MonsoonError::ConfigNotFound(path.to_path_buf()));
        }
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Explicit path, then `$MONSOON_REPORT_CONFIG`, then
    /// `./monsoon_report.toml` if present, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Using config {}", path.display());
            return Self::from_path(path);
        }
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            debug!("Using config from {}: {}", CONFIG_ENV, env_path);
            return Self::from_path(Path::new(&env_path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            debug!("Using config {}", local.display());
            return Self::from_path(local);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if !self.monthly_file.contains("{month}") || !self.monthly_file.contains("{year}") {
            return Err(MonsoonError::Config(format!(
                "monthly_file must contain {{month}} and {{year}}: {}",
                self.monthly_file
            )));
        }
        if !self.overall_file.contains("{year}") {
            return Err(MonsoonError::Config(format!(
                "overall_file must contain {{year}}: {}",
                self.overall_file
            )));
        }
        Ok(())
    }

    pub fn monthly_path(&self, year: i32, month: Month) -> PathBuf {
        let name = self
            .monthly_file
            .replace("{month}", month.as_str())
            .replace("{year}", &year.to_string());
        self.data_dir.join(name)
    }

    pub fn overall_path(&self, year: i32) -> PathBuf {
        self.data_dir
            .join(self.overall_file.replace("{year}", &year.to_string()))
    }

    pub fn monsoon_path(&self) -> PathBuf {
        self.data_dir.join(&self.monsoon_file)
    }

    /// Configured header names win; without any, headers are sniffed.
    pub fn column_strategy(&self) -> Box<dyn ColumnStrategy> {
        if self.columns.is_empty() {
            Box::new(HeaderHeuristic)
        } else {
            Box::new(self.columns.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRow;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.monthly_path(2024, Month::July), PathBuf::from("./july_2024.csv"));
        assert_eq!(
            config.overall_path(2023),
            PathBuf::from("./overall_monsoon_2023.csv")
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            data_dir = "data"
            monthly_file = "{year}/{month}.csv"

            [columns]
            district = "Zila"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.monthly_path(2025, Month::June),
            PathBuf::from("data/2025/june.csv")
        );
        assert_eq!(config.overall_file, "overall_monsoon_{year}.csv");
        assert_eq!(config.columns.district.as_deref(), Some("Zila"));

        let sample = RawRow::new([("Zila", ""), ("Actual", "")]);
        let map = config.column_strategy().resolve(&sample);
        assert_eq!(map.district.as_deref(), Some("Zila"));
        assert_eq!(map.actual.as_deref(), Some("Actual"));
    }

    #[test]
    fn test_rejects_template_without_year() {
        let err = Config::from_toml(r#"monthly_file = "{month}.csv""#).unwrap_err();
        assert!(matches!(err, MonsoonError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            Config::from_toml("data_dir = ").unwrap_err(),
            MonsoonError::Toml(_)
        ));
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monsoon_report.toml");
        std::fs::write(&path, "data_dir = \"/srv/rain\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/rain"));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)).unwrap_err(),
            MonsoonError::ConfigNotFound(_)
        ));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(Month::September.to_string(), "september");
        assert_eq!(Month::from_str("july", true).unwrap(), Month::July);
    }
}
