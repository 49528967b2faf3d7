//! Core contracts for finlens.
//!
//! This crate contains:
//! - Prediction, market-data and report models with validation
//! - The forecast series sanitizer and its chart configuration
//! - The Markdown normalizer used by report panels
//! - Dashboard state with scoped chart lifetimes
//! - Settings, response envelope and structured errors

pub mod chart;
pub mod dashboard;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod markdown;
pub mod sanitize;
pub mod settings;
pub mod summary;

pub use chart::{trend_color, ChartData, ChartOptions, ChartTitle, Dataset, Fill, ForecastChart};
pub use dashboard::{
    render_prediction, render_predictions, render_report, ChartId, ChartScope, DashboardState,
    PredictionCard, ReportPanel,
};
pub use domain::{
    forecast_horizon_label, parse_market_data, parse_predictions, AnalysisReport, FinancialData,
    ForecastPoint, HistoryWindow, Prediction, PricePoint, Symbol, UtcDateTime,
    DEFAULT_FORECAST_DAYS,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{CoreError, ValidationError};
pub use markdown::{to_html, RenderOptions};
pub use sanitize::{
    sanitize, sanitize_with, BandAnchor, PredictionSummary, SanitizeConfig, Trend,
    RANGE_NOT_AVAILABLE,
};
pub use settings::{resolve_finlens_home, Settings};
pub use summary::{summarize_market, summarize_markets, ForecastDetail, MarketSummary};
