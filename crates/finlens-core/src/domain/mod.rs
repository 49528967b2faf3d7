//! # Domain Models
//!
//! Input and output shapes exchanged with the prediction service, the
//! report generator and the market-data endpoint.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ForecastPoint`] | One forecast day with confidence bounds (NaN-tolerant) |
//! | [`Prediction`] | Forecast series for a symbol plus its last known price |
//! | [`AnalysisReport`] | Markdown market report with metadata |
//! | [`FinancialData`] | OHLCV history for a symbol |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC timestamp |

mod forecast;
mod market;
mod report;
mod symbol;
mod timestamp;

pub use forecast::{parse_predictions, ForecastPoint, Prediction, DEFAULT_FORECAST_DAYS};
pub use market::{parse_market_data, FinancialData, HistoryWindow, PricePoint};
pub use report::{forecast_horizon_label, AnalysisReport};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
