use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{CoreError, Symbol};

/// Forecast length produced by the prediction service.
pub const DEFAULT_FORECAST_DAYS: u32 = 5;

/// One day of a price forecast with its confidence band.
///
/// Numeric fields that are missing, `null`, or not numbers in the input
/// deserialize to NaN; numeric strings are accepted. Consumers must go
/// through [`crate::sanitize`] before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(default)]
    pub day: u32,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub forecast: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub lower_ci: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub upper_ci: f64,
}

impl ForecastPoint {
    pub fn new(day: u32, forecast: f64, lower_ci: f64, upper_ci: f64) -> Self {
        Self {
            day,
            forecast,
            lower_ci,
            upper_ci,
        }
    }
}

/// Forecast for a single symbol as emitted by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: Symbol,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub last_price: f64,
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    /// Opaque model description (e.g. `{"order": [1, 1, 1]}`), passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<Value>,
}

impl Prediction {
    pub fn new(symbol: Symbol, last_price: f64, forecast: Vec<ForecastPoint>) -> Self {
        Self {
            symbol,
            last_price,
            forecast,
            model_info: None,
        }
    }

    pub fn with_model_info(mut self, model_info: Value) -> Self {
        self.model_info = Some(model_info);
        self
    }

    /// Keep the first `days` forecast points. Returns how many were dropped.
    pub fn truncate_days(&mut self, days: u32) -> usize {
        let keep = usize::try_from(days).unwrap_or(usize::MAX);
        let dropped = self.forecast.len().saturating_sub(keep);
        self.forecast.truncate(keep);
        dropped
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Prediction>),
    One(Box<Prediction>),
}

/// Parse either a single prediction object or an array of them.
pub fn parse_predictions(json: &str) -> Result<Vec<Prediction>, CoreError> {
    let parsed = serde_json::from_str::<OneOrMany>(json)?;
    Ok(match parsed {
        OneOrMany::Many(predictions) => predictions,
        OneOrMany::One(prediction) => vec![*prediction],
    })
}

fn nan() -> f64 {
    f64::NAN
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}
