//! Per-symbol market summary combining price history and forecast.

use serde::{Deserialize, Serialize};

use crate::{sanitize, FinancialData, Prediction, Symbol, Trend};

/// Offset of the "monthly" base close, in trading days.
pub const MONTHLY_LOOKBACK: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastDetail {
    pub day: u32,
    pub price: f64,
    pub lower_ci: f64,
    pub upper_ci: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub current_price: f64,
    pub daily_change_pct: f64,
    pub monthly_change_pct: f64,
    pub average_volume: u64,
    pub predicted_average: f64,
    pub predicted_change_pct: f64,
    pub trend: Trend,
    pub forecast_details: Vec<ForecastDetail>,
}

pub fn summarize_market(data: &FinancialData, prediction: Option<&Prediction>) -> MarketSummary {
    let closes: Vec<f64> = data.closes().collect();
    let last_close = closes.last().copied().unwrap_or(0.0);

    let daily_change_pct = match closes.len() {
        0 | 1 => 0.0,
        len => change_pct(closes[len - 1], closes[len - 2]),
    };

    let monthly_change_pct = match closes.len() {
        0 => 0.0,
        len if len >= MONTHLY_LOOKBACK => change_pct(last_close, closes[len - MONTHLY_LOOKBACK]),
        _ => change_pct(last_close, closes[0]),
    };

    let average_volume = if data.data_points.is_empty() {
        0
    } else {
        let total: u128 = data
            .data_points
            .iter()
            .map(|point| u128::from(point.volume))
            .sum();
        (total / data.data_points.len() as u128) as u64
    };

    let (current_price, predicted_average, predicted_change_pct, trend, forecast_details) =
        match prediction {
            Some(prediction) => {
                // A broken last price would sanitize to 0; the history knows better.
                let summary = if prediction.last_price.is_finite() || closes.is_empty() {
                    sanitize(prediction)
                } else {
                    let mut anchored = prediction.clone();
                    anchored.last_price = last_close;
                    sanitize(&anchored)
                };
                let details = summary
                    .forecast_points()
                    .iter()
                    .map(|point| ForecastDetail {
                        day: point.day + 1,
                        price: round2(point.forecast),
                        lower_ci: round2(point.lower_ci),
                        upper_ci: round2(point.upper_ci),
                    })
                    .collect();
                (
                    summary.last_price,
                    summary.average_forecast,
                    summary.percent_change,
                    summary.trend,
                    details,
                )
            }
            None => (last_close, last_close, 0.0, Trend::Neutral, Vec::new()),
        };

    MarketSummary {
        symbol: data.symbol.clone(),
        name: if data.name.is_empty() {
            data.symbol.to_string()
        } else {
            data.name.clone()
        },
        sector: data.sector.clone(),
        current_price: round2(current_price),
        daily_change_pct: round2(daily_change_pct),
        monthly_change_pct: round2(monthly_change_pct),
        average_volume,
        predicted_average: round2(predicted_average),
        predicted_change_pct: round2(predicted_change_pct),
        trend,
        forecast_details,
    }
}

/// Summarize every market series, pairing each with its prediction by symbol.
pub fn summarize_markets(data: &[FinancialData], predictions: &[Prediction]) -> Vec<MarketSummary> {
    data.iter()
        .map(|series| {
            let prediction = predictions
                .iter()
                .find(|prediction| prediction.symbol == series.symbol);
            summarize_market(series, prediction)
        })
        .collect()
}

fn change_pct(current: f64, base: f64) -> f64 {
    if base == 0.0 || !base.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current - base) / base * 100.0
}

pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}
