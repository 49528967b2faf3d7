// Shared fixtures for behaviour tests
pub use finlens_core::{ForecastPoint, Prediction, Symbol};

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("fixture symbol is valid")
}

pub fn point(day: u32, forecast: f64, lower_ci: f64, upper_ci: f64) -> ForecastPoint {
    ForecastPoint::new(day, forecast, lower_ci, upper_ci)
}

pub fn prediction(raw: &str, last_price: f64, forecast: Vec<ForecastPoint>) -> Prediction {
    Prediction::new(symbol(raw), last_price, forecast)
}
