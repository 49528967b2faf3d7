use finlens_core::{sanitize_with, ForecastChart, Settings, Symbol};
use serde::Serialize;

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{load_predictions, CommandResult, ItemSink};

#[derive(Debug, Serialize)]
struct ChartEntry {
    symbol: Symbol,
    config: ForecastChart,
}

#[derive(Debug, Serialize)]
struct ChartResponseData {
    charts: Vec<ChartEntry>,
}

pub fn run<S: ItemSink>(
    args: &InputArgs,
    settings: &Settings,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let predictions = load_predictions(&args.input, settings)?;
    sink.begin("chart", predictions.len())?;

    let mut charts = Vec::with_capacity(predictions.len());
    for prediction in &predictions {
        let summary = sanitize_with(prediction, &settings.sanitize);
        let entry = ChartEntry {
            symbol: prediction.symbol.clone(),
            config: ForecastChart::from_summary(&summary),
        };
        sink.item("chart", &entry)?;
        charts.push(entry);
    }

    let data = serde_json::to_value(ChartResponseData { charts })?;
    Ok(CommandResult::ok(data, vec![args.input.clone()]))
}
