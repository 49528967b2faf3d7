//! Behaviour tests for forecast sanitizing
//!
//! These tests verify WHAT a dashboard receives after a raw prediction goes
//! through the sanitizer: finite, aligned series and display-ready summaries.

use finlens_core::{
    parse_predictions, sanitize, sanitize_with, BandAnchor, ForecastChart, SanitizeConfig, Trend,
    RANGE_NOT_AVAILABLE,
};
use finlens_tests::{point, prediction};

// =============================================================================
// Sanitizer: Series Shape
// =============================================================================

#[test]
fn sanitized_series_keep_input_length_and_contain_only_finite_values() {
    // Given: A forecast where every kind of value is broken somewhere
    let raw = prediction(
        "AAPL",
        180.0,
        vec![
            point(0, 181.0, 179.0, 183.0),
            point(1, f64::NAN, 178.0, f64::NAN),
            point(2, f64::INFINITY, f64::NAN, 190.0),
            point(3, f64::NAN, f64::NAN, f64::NAN),
            point(4, 185.0, f64::NEG_INFINITY, 187.0),
        ],
    );

    // When: The prediction is sanitized
    let summary = sanitize(&raw);

    // Then: All three series match the input length
    assert_eq!(summary.forecast_series.len(), 5);
    assert_eq!(summary.lower_series.len(), 5);
    assert_eq!(summary.upper_series.len(), 5);

    // And: No NaN or infinity survives
    for series in [
        &summary.forecast_series,
        &summary.lower_series,
        &summary.upper_series,
    ] {
        assert!(series.iter().all(|value| value.is_finite()), "{series:?}");
    }
}

#[test]
fn missing_bounds_fall_back_to_ten_percent_around_forecast() {
    // Given: A point with a valid forecast but no confidence bounds
    let raw = prediction("AAPL", 100.0, vec![point(0, 110.0, f64::NAN, f64::NAN)]);

    // When: It is sanitized
    let summary = sanitize(&raw);

    // Then: Bounds are 0.9x and 1.1x the forecast
    assert!((summary.lower_series[0] - 99.0).abs() < 1e-9);
    assert!((summary.upper_series[0] - 121.0).abs() < 1e-9);
    assert_eq!(summary.forecast_series[0], 110.0);
    assert_eq!(summary.fallback_count, 2);
}

#[test]
fn invalid_forecast_zeroes_the_band_unless_anchored_to_last_price() {
    // Given: A point where forecast and both bounds are missing
    let raw = prediction("MSFT", 400.0, vec![point(0, f64::NAN, f64::NAN, f64::NAN)]);

    // When: It is sanitized with the default anchor
    let default_summary = sanitize(&raw);

    // Then: The fallback base is the zeroed forecast
    assert_eq!(default_summary.forecast_series, vec![0.0]);
    assert_eq!(default_summary.lower_series, vec![0.0]);
    assert_eq!(default_summary.upper_series, vec![0.0]);

    // When: It is sanitized with the last-price anchor
    let config = SanitizeConfig::new(0.9, 1.1, BandAnchor::LastPrice).expect("valid config");
    let anchored = sanitize_with(&raw, &config);

    // Then: The band is built around the last price instead
    assert_eq!(anchored.forecast_series, vec![0.0]);
    assert!((anchored.lower_series[0] - 360.0).abs() < 1e-9);
    assert!((anchored.upper_series[0] - 440.0).abs() < 1e-9);
}

// =============================================================================
// Sanitizer: Summary Statistics
// =============================================================================

#[test]
fn zero_last_price_reports_zero_change_without_dividing() {
    // Given: A prediction whose last price is unknown (0)
    let raw = prediction(
        "TSLA",
        0.0,
        vec![point(0, 210.0, 200.0, 220.0), point(1, 215.0, 205.0, 225.0)],
    );

    // When: It is sanitized
    let summary = sanitize(&raw);

    // Then: Percent change is exactly zero and the trend is neutral
    assert_eq!(summary.percent_change, 0.0);
    assert_eq!(summary.trend, Trend::Neutral);
    assert!((summary.average_forecast - 212.5).abs() < 1e-9);
}

#[test]
fn average_ignores_invalid_and_non_positive_forecasts() {
    // Given: Forecasts mixing valid, NaN, zero and negative values
    let raw = prediction(
        "AMZN",
        100.0,
        vec![
            point(0, 104.0, 100.0, 108.0),
            point(1, f64::NAN, 100.0, 108.0),
            point(2, 0.0, 100.0, 108.0),
            point(3, -5.0, 100.0, 108.0),
            point(4, 106.0, 100.0, 108.0),
        ],
    );

    // When: It is sanitized
    let summary = sanitize(&raw);

    // Then: Only 104 and 106 contribute to the average
    assert!((summary.average_forecast - 105.0).abs() < 1e-9);
    assert!((summary.percent_change - 5.0).abs() < 1e-9);
    assert_eq!(summary.trend, Trend::Up);
}

#[test]
fn no_valid_forecast_falls_back_to_last_price() {
    // Given: A prediction with no usable forecast values
    let raw = prediction("GOOGL", 150.0, vec![point(0, f64::NAN, f64::NAN, f64::NAN)]);

    // When: It is sanitized
    let summary = sanitize(&raw);

    // Then: The average equals the last price and nothing moved
    assert_eq!(summary.average_forecast, 150.0);
    assert_eq!(summary.percent_change, 0.0);
    assert_eq!(summary.trend, Trend::Neutral);
}

#[test]
fn display_range_needs_both_bounds() {
    // Given: Bounds that are all missing
    let all_missing = prediction(
        "AAPL",
        100.0,
        vec![
            point(0, 101.0, f64::NAN, f64::NAN),
            point(1, 102.0, f64::NAN, f64::NAN),
        ],
    );
    // And: Bounds where only upper values exist
    let only_upper = prediction("AAPL", 100.0, vec![point(0, 101.0, f64::NAN, 105.0)]);

    // Then: Neither can produce a range
    assert_eq!(sanitize(&all_missing).display_range, RANGE_NOT_AVAILABLE);
    assert_eq!(sanitize(&only_upper).display_range, RANGE_NOT_AVAILABLE);

    // And: Finite bounds produce a two-decimal dollar range
    let complete = prediction(
        "AAPL",
        100.0,
        vec![point(0, 101.0, 97.5, 104.0), point(1, 102.0, 98.0, 106.25)],
    );
    assert_eq!(sanitize(&complete).display_range, "$97.50 - $106.25");
}

#[test]
fn empty_forecast_yields_empty_series() {
    // Given: A prediction without forecast points
    let raw = prediction("AAPL", 180.0, Vec::new());

    // When: It is sanitized
    let summary = sanitize(&raw);

    // Then: The summary is empty but still well defined
    assert!(summary.is_empty());
    assert_eq!(summary.average_forecast, 180.0);
    assert_eq!(summary.percent_change, 0.0);
    assert_eq!(summary.display_range, RANGE_NOT_AVAILABLE);
}

// =============================================================================
// Sanitizer: From Service JSON To Chart
// =============================================================================

#[test]
fn service_payload_with_nulls_and_strings_renders_a_finite_chart() {
    // Given: A prediction service payload with null, missing and string values
    let json = r#"[{
        "symbol": "nvda",
        "last_price": "120.5",
        "forecast": [
            {"day": 0, "forecast": 121.0, "lower_ci": 118.0, "upper_ci": 124.0},
            {"day": 1, "forecast": null, "upper_ci": "NaN"},
            {"day": 2, "forecast": "123.25", "lower_ci": "n/a", "upper_ci": 127.0}
        ],
        "model_info": {"order": [5, 1, 0]}
    }]"#;

    // When: It is parsed, sanitized and turned into a chart
    let predictions = parse_predictions(json).expect("payload should parse");
    let summary = sanitize(&predictions[0]);
    let chart = ForecastChart::from_summary(&summary);

    // Then: The chart has one label per day and only finite data
    assert_eq!(summary.symbol.as_str(), "NVDA");
    assert_eq!(chart.data.labels.len(), 3);
    for dataset in &chart.data.datasets {
        assert!(dataset.data.iter().all(|value| value.is_finite()));
    }

    // And: The serialized config is valid JSON
    let value = serde_json::to_value(&chart).expect("chart should serialize");
    assert_eq!(value["type"], "line");
}
