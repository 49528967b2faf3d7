//! Application settings.
//!
//! Resolution order, lowest to highest precedence:
//! 1. built-in defaults
//! 2. a TOML file (`--config`, else `$FINLENS_HOME/config.toml` when present)
//! 3. `FINLENS_ASSETS`, `FINLENS_TIME_HORIZON`, `FINLENS_FORECAST_DAYS`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    CoreError, HistoryWindow, RenderOptions, SanitizeConfig, Symbol, ValidationError,
    DEFAULT_FORECAST_DAYS,
};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_SCHEMA_VERSION: &str = "v1.0.0";
const DEFAULT_ASSETS: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub assets: Vec<Symbol>,
    /// Market history window, e.g. `6mo`; see [`HistoryWindow`].
    pub time_horizon: String,
    /// Forecast points kept per prediction.
    pub forecast_days: u32,
    pub schema_version: String,
    pub sanitize: SanitizeConfig,
    pub render: RenderOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets: DEFAULT_ASSETS
                .iter()
                .filter_map(|raw| Symbol::parse(raw).ok())
                .collect(),
            time_horizon: String::from("6mo"),
            forecast_days: DEFAULT_FORECAST_DAYS,
            schema_version: String::from(DEFAULT_SCHEMA_VERSION),
            sanitize: SanitizeConfig::default(),
            render: RenderOptions::default(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve settings from file and process environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut settings = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading settings");
                Self::from_file(path)?
            }
            None => {
                let default_path = resolve_finlens_home().join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    debug!(path = %default_path.display(), "loading settings");
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_overrides(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply `FINLENS_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("FINLENS_ASSETS").filter(|raw| !raw.trim().is_empty()) {
            self.assets = Symbol::parse_list(&raw)?;
        }
        if let Some(raw) = lookup("FINLENS_TIME_HORIZON").filter(|raw| !raw.trim().is_empty()) {
            self.time_horizon = raw.trim().to_owned();
        }
        if let Some(raw) = lookup("FINLENS_FORECAST_DAYS").filter(|raw| !raw.trim().is_empty()) {
            self.forecast_days = raw
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidForecastDays)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.assets.is_empty() {
            return Err(ValidationError::EmptyAssets);
        }
        if self.forecast_days == 0 {
            return Err(ValidationError::InvalidForecastDays);
        }
        HistoryWindow::parse(&self.time_horizon)?;
        crate::envelope::validate_schema_version(&self.schema_version)?;
        self.sanitize.validate()
    }

    pub fn history_window(&self) -> Result<HistoryWindow, ValidationError> {
        HistoryWindow::parse(&self.time_horizon)
    }
}

/// `$FINLENS_HOME`, else `~/.finlens`, else `./.finlens`.
pub fn resolve_finlens_home() -> PathBuf {
    if let Some(path) = env::var_os("FINLENS_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".finlens");
    }

    PathBuf::from(".finlens")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::BandAnchor;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.assets.len(), 5);
        assert_eq!(settings.forecast_days, 5);
        assert_eq!(settings.time_horizon, "6mo");
        settings.validate().expect("defaults should validate");
    }

    #[test]
    fn parses_partial_toml() {
        let settings = Settings::from_toml_str(
            r#"
            assets = ["nvda", "AMD"]

            [sanitize]
            lower_factor = 0.8
            anchor = "last_price"
            "#,
        )
        .expect("settings should parse");

        assert_eq!(settings.assets[0].as_str(), "NVDA");
        assert_eq!(settings.forecast_days, 5);
        assert_eq!(settings.sanitize.lower_factor, 0.8);
        assert_eq!(settings.sanitize.upper_factor, 1.1);
        assert_eq!(settings.sanitize.anchor, BandAnchor::LastPrice);
    }

    #[test]
    fn rejects_inverted_band() {
        let error = Settings::from_toml_str(
            r#"
            [sanitize]
            lower_factor = 1.2
            upper_factor = 1.1
            "#,
        )
        .expect_err("inverted band must fail");

        assert!(matches!(
            error,
            CoreError::Validation(ValidationError::InvertedBand { .. })
        ));
    }

    #[test]
    fn rejects_unknown_anchor() {
        let error = Settings::from_toml_str("[sanitize]\nanchor = \"midpoint\"\n")
            .expect_err("unknown anchor must fail");
        assert!(matches!(error, CoreError::Config(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(lookup(&[
                ("FINLENS_ASSETS", "tsla, aapl"),
                ("FINLENS_FORECAST_DAYS", "10"),
                ("FINLENS_TIME_HORIZON", ""),
            ]))
            .expect("overrides should apply");

        let assets: Vec<&str> = settings.assets.iter().map(Symbol::as_str).collect();
        assert_eq!(assets, vec!["TSLA", "AAPL"]);
        assert_eq!(settings.forecast_days, 10);
        assert_eq!(settings.time_horizon, "6mo");
        assert_eq!(settings.history_window(), Ok(HistoryWindow::TradingDays(126)));
    }

    #[test]
    fn rejects_unknown_time_horizon() {
        let mut settings = Settings::default();
        let error = settings
            .apply_overrides(lookup(&[("FINLENS_TIME_HORIZON", "half a year")]))
            .expect_err("unknown period must fail");
        assert!(matches!(error, ValidationError::InvalidTimeHorizon { .. }));
    }

    #[test]
    fn rejects_bad_forecast_days_override() {
        let mut settings = Settings::default();
        let error = settings
            .apply_overrides(lookup(&[("FINLENS_FORECAST_DAYS", "0")]))
            .expect_err("zero days must fail");
        assert_eq!(error, ValidationError::InvalidForecastDays);

        let error = settings
            .apply_overrides(lookup(&[("FINLENS_FORECAST_DAYS", "five")]))
            .expect_err("non-numeric days must fail");
        assert_eq!(error, ValidationError::InvalidForecastDays);
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "time_horizon = \"1y\"\nforecast_days = 7\n").expect("write config");

        let settings = Settings::from_file(&path).expect("settings should load");

        assert_eq!(settings.time_horizon, "1y");
        assert_eq!(settings.forecast_days, 7);
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = Settings::from_file(&dir.path().join("absent.toml"))
            .expect_err("missing file must fail");
        assert!(matches!(error, CoreError::Io(_)));
    }
}
