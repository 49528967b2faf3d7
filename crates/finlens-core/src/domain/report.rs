use serde::{Deserialize, Serialize};

use crate::markdown::{self, RenderOptions};
use crate::{Symbol, UtcDateTime, DEFAULT_FORECAST_DAYS};

/// Market analysis report produced by the report generator.
///
/// `report` holds the Markdown body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report: String,
    pub timestamp: UtcDateTime,
    #[serde(default)]
    pub assets_analyzed: Vec<Symbol>,
    /// Empty when the generator did not send one; see [`Self::with_default_horizon`].
    #[serde(default)]
    pub time_horizon: String,
    #[serde(default)]
    pub visualization_paths: Vec<String>,
}

impl AnalysisReport {
    pub fn new(report: impl Into<String>, assets_analyzed: Vec<Symbol>) -> Self {
        Self {
            report: report.into(),
            timestamp: UtcDateTime::now(),
            assets_analyzed,
            time_horizon: forecast_horizon_label(DEFAULT_FORECAST_DAYS),
            visualization_paths: Vec::new(),
        }
    }

    /// Fill a missing horizon with the label for `forecast_days`.
    pub fn with_default_horizon(mut self, forecast_days: u32) -> Self {
        if self.time_horizon.trim().is_empty() {
            self.time_horizon = forecast_horizon_label(forecast_days);
        }
        self
    }

    /// Render the Markdown body with default options.
    pub fn to_html(&self) -> String {
        self.to_html_with(&RenderOptions::default())
    }

    pub fn to_html_with(&self, options: &RenderOptions) -> String {
        markdown::to_html_with(Some(&self.report), options)
    }
}

/// `"5-day forecast"` for 5 days.
pub fn forecast_horizon_label(forecast_days: u32) -> String {
    format!("{forecast_days}-day forecast")
}
