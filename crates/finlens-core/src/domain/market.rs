use serde::{Deserialize, Serialize};

use crate::{CoreError, Symbol, ValidationError};

const TRADING_DAYS_PER_WEEK: usize = 5;
const TRADING_DAYS_PER_MONTH: usize = 21;
const TRADING_DAYS_PER_YEAR: usize = 252;

/// Daily OHLCV record as served by the market-data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

/// Price history for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialData {
    pub symbol: Symbol,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unknown_sector")]
    pub sector: String,
    #[serde(default)]
    pub data_points: Vec<PricePoint>,
}

impl FinancialData {
    pub fn new(symbol: Symbol, data_points: Vec<PricePoint>) -> Self {
        Self {
            name: symbol.as_str().to_owned(),
            symbol,
            sector: unknown_sector(),
            data_points,
        }
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.data_points.iter().map(|point| point.close)
    }

    /// Drop points older than `window`. Returns how many were dropped.
    pub fn retain_window(&mut self, window: HistoryWindow) -> usize {
        let before = self.data_points.len();
        match window {
            HistoryWindow::TradingDays(days) => {
                let excess = before.saturating_sub(days);
                self.data_points.drain(..excess);
            }
            HistoryWindow::YearToDate => {
                let year = self
                    .data_points
                    .last()
                    .and_then(|point| point.date.get(..4))
                    .map(str::to_owned);
                if let Some(year) = year {
                    self.data_points.retain(|point| point.date.starts_with(&year));
                }
            }
            HistoryWindow::Max => {}
        }
        before - self.data_points.len()
    }
}

/// History period in the market-data endpoint's notation: `5d`, `2wk`,
/// `6mo`, `1y`, `ytd` or `max`. Calendar periods are counted in trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    TradingDays(usize),
    YearToDate,
    Max,
}

impl HistoryWindow {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim().to_ascii_lowercase();
        let invalid = || ValidationError::InvalidTimeHorizon {
            value: raw.to_owned(),
        };

        match value.as_str() {
            "ytd" => return Ok(Self::YearToDate),
            "max" => return Ok(Self::Max),
            _ => {}
        }

        let split = value
            .find(|ch: char| !ch.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (count, unit) = value.split_at(split);
        let count: usize = count.parse().map_err(|_| invalid())?;
        let per_unit = match unit {
            "d" => 1,
            "wk" => TRADING_DAYS_PER_WEEK,
            "mo" => TRADING_DAYS_PER_MONTH,
            "y" => TRADING_DAYS_PER_YEAR,
            _ => return Err(invalid()),
        };

        if count == 0 {
            return Err(invalid());
        }
        Ok(Self::TradingDays(count.saturating_mul(per_unit)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<FinancialData>),
    One(Box<FinancialData>),
}

/// Parse either a single market-data object or an array of them.
pub fn parse_market_data(json: &str) -> Result<Vec<FinancialData>, CoreError> {
    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![*item],
    })
}

fn unknown_sector() -> String {
    String::from("Unknown")
}
