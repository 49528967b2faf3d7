use finlens_core::{sanitize_with, Prediction, PredictionSummary, Settings};
use serde::Serialize;

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{load_predictions, CommandResult, ItemSink};

#[derive(Debug, Serialize)]
struct SanitizeResponseData {
    summaries: Vec<PredictionSummary>,
}

pub fn run<S: ItemSink>(
    args: &InputArgs,
    settings: &Settings,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let predictions = load_predictions(&args.input, settings)?;
    sink.begin("sanitize", predictions.len())?;

    let mut warnings = Vec::new();
    let mut summaries = Vec::with_capacity(predictions.len());
    for prediction in &predictions {
        warnings.extend(fallback_warnings(prediction));
        let summary = sanitize_with(prediction, &settings.sanitize);
        sink.item("summary", &summary)?;
        summaries.push(summary);
    }

    let data = serde_json::to_value(SanitizeResponseData { summaries })?;
    Ok(CommandResult::ok(data, vec![args.input.clone()]).with_warnings(warnings))
}

/// One warning per forecast point with at least one non-finite value.
pub fn fallback_warnings(prediction: &Prediction) -> Vec<String> {
    prediction
        .forecast
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let mut fields = Vec::new();
            if !point.forecast.is_finite() {
                fields.push("forecast");
            }
            if !point.lower_ci.is_finite() {
                fields.push("lower_ci");
            }
            if !point.upper_ci.is_finite() {
                fields.push("upper_ci");
            }

            (!fields.is_empty()).then(|| {
                format!(
                    "{} point {}: replaced invalid {}",
                    prediction.symbol,
                    index + 1,
                    fields.join(", ")
                )
            })
        })
        .collect()
}
