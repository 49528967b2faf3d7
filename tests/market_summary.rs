//! Behaviour tests for market summaries
//!
//! These tests verify WHAT figures a report prompt receives for each asset
//! once price history and forecasts are combined.

use finlens_core::{parse_market_data, parse_predictions, summarize_markets, Trend};

// =============================================================================
// Market Summary: History And Forecast
// =============================================================================

#[test]
fn combines_history_with_matching_prediction() {
    // Given: Two symbols of history and a prediction for one of them
    let market = parse_market_data(
        r#"[
            {"symbol": "AAPL", "name": "Apple Inc.", "sector": "Technology",
             "data_points": [
                {"date": "2025-03-12", "open": 1, "high": 1, "low": 1, "close": 200.0, "volume": 1000},
                {"date": "2025-03-13", "open": 1, "high": 1, "low": 1, "close": 210.0, "volume": 3000}
             ]},
            {"symbol": "MSFT",
             "data_points": [
                {"date": "2025-03-13", "open": 1, "high": 1, "low": 1, "close": 400.0}
             ]}
        ]"#,
    )
    .expect("market data should parse");
    let predictions = parse_predictions(
        r#"{"symbol": "AAPL", "last_price": 210.0, "forecast": [
            {"day": 0, "forecast": 220.5, "lower_ci": 215.0, "upper_ci": null},
            {"day": 1, "forecast": 231.0, "lower_ci": 225.0, "upper_ci": 236.0}
        ]}"#,
    )
    .expect("predictions should parse");

    // When: Summaries are built
    let summaries = summarize_markets(&market, &predictions);

    // Then: AAPL reflects history and forecast
    let aapl = &summaries[0];
    assert_eq!(aapl.name, "Apple Inc.");
    assert_eq!(aapl.current_price, 210.0);
    assert_eq!(aapl.daily_change_pct, 5.0);
    assert_eq!(aapl.monthly_change_pct, 5.0);
    assert_eq!(aapl.average_volume, 2000);
    assert_eq!(aapl.predicted_average, 225.75);
    assert_eq!(aapl.predicted_change_pct, 7.5);
    assert_eq!(aapl.trend, Trend::Up);

    // And: Forecast details are one-based and finite
    assert_eq!(aapl.forecast_details[0].day, 1);
    assert_eq!(aapl.forecast_details[1].day, 2);
    assert_eq!(aapl.forecast_details[0].upper_ci, 242.55);

    // And: MSFT without a prediction falls back to its last close
    let msft = &summaries[1];
    assert_eq!(msft.sector, "Unknown");
    assert_eq!(msft.current_price, 400.0);
    assert_eq!(msft.predicted_average, 400.0);
    assert_eq!(msft.daily_change_pct, 0.0);
    assert!(msft.forecast_details.is_empty());
}
