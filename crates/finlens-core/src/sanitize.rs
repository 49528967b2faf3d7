//! # Forecast Series Sanitizer
//!
//! Turns a [`Prediction`] whose numeric fields may be NaN into three aligned,
//! fully finite series (forecast, lower CI, upper CI) plus a display summary.
//!
//! Every function here is total: no numeric input makes it fail or emit a
//! non-finite series value. The only sentinel is [`RANGE_NOT_AVAILABLE`].
//!
//! ```rust
//! use finlens_core::{sanitize, ForecastPoint, Prediction, Symbol, Trend};
//!
//! let prediction = Prediction::new(
//!     Symbol::parse("AAPL").unwrap(),
//!     100.0,
//!     vec![ForecastPoint::new(0, 110.0, f64::NAN, f64::NAN)],
//! );
//!
//! let summary = sanitize(&prediction);
//! assert_eq!(summary.lower_series, vec![99.0]);
//! assert_eq!(summary.trend, Trend::Up);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ForecastPoint, Prediction, Symbol, ValidationError};

/// Display range emitted when no finite bound exists on one side.
pub const RANGE_NOT_AVAILABLE: &str = "Range not available";

pub const DEFAULT_LOWER_FACTOR: f64 = 0.9;
pub const DEFAULT_UPPER_FACTOR: f64 = 1.1;

/// Direction of the average forecast relative to the last known price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn from_change(percent_change: f64) -> Self {
        if percent_change > 0.0 {
            Self::Up
        } else if percent_change < 0.0 {
            Self::Down
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Neutral => "neutral",
        }
    }

    /// Icon name used by the dashboard cards.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Up => "trending-up",
            Self::Down => "trending-down",
            Self::Neutral => "trending-flat",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value a missing confidence bound is scaled from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandAnchor {
    /// Scale the point's sanitized forecast, which is 0 when the forecast
    /// itself was invalid (degenerate `[0, 0]` band).
    #[default]
    Forecast,
    /// Like `Forecast`, but a point with an invalid forecast scales the last
    /// known price instead of 0.
    LastPrice,
}

impl BandAnchor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::LastPrice => "last_price",
        }
    }
}

impl FromStr for BandAnchor {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "forecast" => Ok(Self::Forecast),
            "last_price" => Ok(Self::LastPrice),
            other => Err(ValidationError::InvalidBandAnchor {
                value: other.to_owned(),
            }),
        }
    }
}

/// Fallback rules for missing confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    pub lower_factor: f64,
    pub upper_factor: f64,
    pub anchor: BandAnchor,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            lower_factor: DEFAULT_LOWER_FACTOR,
            upper_factor: DEFAULT_UPPER_FACTOR,
            anchor: BandAnchor::Forecast,
        }
    }
}

impl SanitizeConfig {
    pub fn new(
        lower_factor: f64,
        upper_factor: f64,
        anchor: BandAnchor,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            lower_factor,
            upper_factor,
            anchor,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_factor("lower_factor", self.lower_factor)?;
        validate_factor("upper_factor", self.upper_factor)?;
        if self.lower_factor > self.upper_factor {
            return Err(ValidationError::InvertedBand {
                lower: self.lower_factor.to_string(),
                upper: self.upper_factor.to_string(),
            });
        }
        Ok(())
    }
}

fn validate_factor(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidBandFactor { field });
    }
    Ok(())
}

/// Chart-ready view of a [`Prediction`].
///
/// The three series have the same length as the input forecast and contain
/// only finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub symbol: Symbol,
    pub last_price: f64,
    pub days: Vec<u32>,
    pub forecast_series: Vec<f64>,
    pub lower_series: Vec<f64>,
    pub upper_series: Vec<f64>,
    pub average_forecast: f64,
    pub percent_change: f64,
    pub display_range: String,
    pub trend: Trend,
    /// Number of individual values replaced by a fallback.
    pub fallback_count: usize,
}

impl PredictionSummary {
    pub fn len(&self) -> usize {
        self.forecast_series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast_series.is_empty()
    }

    /// Sanitized series re-emitted as forecast points.
    pub fn forecast_points(&self) -> Vec<ForecastPoint> {
        self.days
            .iter()
            .zip(&self.forecast_series)
            .zip(self.lower_series.iter().zip(&self.upper_series))
            .map(|((day, forecast), (lower, upper))| {
                ForecastPoint::new(*day, *forecast, *lower, *upper)
            })
            .collect()
    }
}

/// Sanitize with the default ×0.9 / ×1.1 band fallback.
pub fn sanitize(prediction: &Prediction) -> PredictionSummary {
    sanitize_with(prediction, &SanitizeConfig::default())
}

pub fn sanitize_with(prediction: &Prediction, config: &SanitizeConfig) -> PredictionSummary {
    let last_price = finite_or_zero(prediction.last_price);
    let points = &prediction.forecast;

    let mut days = Vec::with_capacity(points.len());
    let mut forecast_series = Vec::with_capacity(points.len());
    let mut lower_series = Vec::with_capacity(points.len());
    let mut upper_series = Vec::with_capacity(points.len());
    let mut fallback_count = 0;

    for point in points {
        let forecast_valid = point.forecast.is_finite();
        let forecast_value = if forecast_valid { point.forecast } else { 0.0 };
        let base = match config.anchor {
            BandAnchor::LastPrice if !forecast_valid => last_price,
            _ => forecast_value,
        };

        let lower_value = if point.lower_ci.is_finite() {
            point.lower_ci
        } else {
            fallback_count += 1;
            base * config.lower_factor
        };
        let upper_value = if point.upper_ci.is_finite() {
            point.upper_ci
        } else {
            fallback_count += 1;
            base * config.upper_factor
        };
        if !forecast_valid {
            fallback_count += 1;
        }

        days.push(point.day);
        forecast_series.push(forecast_value);
        lower_series.push(finite_or_zero(lower_value));
        upper_series.push(finite_or_zero(upper_value));
    }

    let average_forecast = average_forecast(points, last_price);
    let percent_change = percent_change(average_forecast, last_price);
    let display_range = display_range(points);

    if fallback_count > 0 {
        debug!(
            symbol = %prediction.symbol,
            points = points.len(),
            fallback_count,
            "replaced invalid forecast values"
        );
    }

    PredictionSummary {
        symbol: prediction.symbol.clone(),
        last_price,
        days,
        forecast_series,
        lower_series,
        upper_series,
        average_forecast,
        percent_change,
        display_range,
        trend: Trend::from_change(percent_change),
        fallback_count,
    }
}

/// Mean of the finite, positive forecast values; `last_price` when none.
pub fn average_forecast(points: &[ForecastPoint], last_price: f64) -> f64 {
    let (sum, count) = points
        .iter()
        .map(|point| point.forecast)
        .filter(|value| value.is_finite() && *value > 0.0)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        last_price
    } else {
        sum / count as f64
    }
}

/// Percent change from `last_price`, or 0 when `last_price` is not positive.
pub fn percent_change(average: f64, last_price: f64) -> f64 {
    if last_price > 0.0 && average.is_finite() {
        (average - last_price) / last_price * 100.0
    } else {
        0.0
    }
}

/// `"$<min lower> - $<max upper>"` over the finite input bounds.
pub fn display_range(points: &[ForecastPoint]) -> String {
    let min_lower = points
        .iter()
        .map(|point| point.lower_ci)
        .filter(|value| value.is_finite())
        .reduce(f64::min);
    let max_upper = points
        .iter()
        .map(|point| point.upper_ci)
        .filter(|value| value.is_finite())
        .reduce(f64::max);

    match (min_lower, max_upper) {
        (Some(min), Some(max)) => format!("${min:.2} - ${max:.2}"),
        _ => String::from(RANGE_NOT_AVAILABLE),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
