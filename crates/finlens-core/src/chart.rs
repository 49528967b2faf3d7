//! Chart.js line-chart configuration for a sanitized forecast.
//!
//! Built only from a [`PredictionSummary`], so every dataset value is finite
//! and all datasets share the label count.

use serde::{Deserialize, Serialize};

use crate::{PredictionSummary, Trend};

pub const COLOR_POSITIVE: &str = "#4CAF50";
pub const COLOR_NEGATIVE: &str = "#F44336";
pub const COLOR_NEUTRAL: &str = "#9E9E9E";
pub const COLOR_BAND: &str = "#26A69A";
pub const COLOR_BAND_FILL: &str = "rgba(38,166,154,0.2)";

/// Dataset fill mode: `false`, or a relative target such as `"-1"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fill {
    Toggle(bool),
    Target(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub border_dash: Vec<u32>,
    pub point_radius: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub title: ChartTitle,
}

/// Complete chart config, serializable straight into `new Chart(ctx, config)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastChart {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ForecastChart {
    pub fn from_summary(summary: &PredictionSummary) -> Self {
        let labels = (1..=summary.len()).map(|day| format!("Day {day}")).collect();
        let trend_color = trend_color(summary.trend);

        let datasets = vec![
            Dataset {
                label: String::from("Forecast"),
                data: summary.forecast_series.clone(),
                border_color: trend_color.to_owned(),
                background_color: trend_color.to_owned(),
                fill: Fill::Toggle(false),
                border_dash: Vec::new(),
                point_radius: 3,
            },
            Dataset {
                label: String::from("Lower CI"),
                data: summary.lower_series.clone(),
                border_color: COLOR_BAND.to_owned(),
                background_color: COLOR_BAND_FILL.to_owned(),
                fill: Fill::Toggle(false),
                border_dash: vec![5, 5],
                point_radius: 0,
            },
            Dataset {
                label: String::from("Upper CI"),
                data: summary.upper_series.clone(),
                border_color: COLOR_BAND.to_owned(),
                background_color: COLOR_BAND_FILL.to_owned(),
                fill: Fill::Target(String::from("-1")),
                border_dash: vec![5, 5],
                point_radius: 0,
            },
        ];

        Self {
            kind: String::from("line"),
            data: ChartData { labels, datasets },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                title: ChartTitle {
                    display: true,
                    text: format!(
                        "{} {}-Day Price Forecast ({})",
                        summary.symbol,
                        summary.len(),
                        summary.display_range
                    ),
                },
            },
        }
    }
}

pub const fn trend_color(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => COLOR_POSITIVE,
        Trend::Down => COLOR_NEGATIVE,
        Trend::Neutral => COLOR_NEUTRAL,
    }
}
