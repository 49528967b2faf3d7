use finlens_core::{parse_market_data, summarize_market, MarketSummary, Settings};
use serde::Serialize;
use tracing::debug;

use crate::cli::SummarizeArgs;
use crate::error::CliError;

use super::{load_predictions, read_input, CommandResult, ItemSink};

#[derive(Debug, Serialize)]
struct SummarizeResponseData {
    summaries: Vec<MarketSummary>,
}

pub fn run<S: ItemSink>(
    args: &SummarizeArgs,
    settings: &Settings,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let window = settings.history_window()?;
    let mut market = parse_market_data(&read_input(&args.market)?)?;
    let mut inputs = vec![args.market.clone()];

    let predictions = match &args.predictions {
        Some(path) => {
            inputs.push(path.clone());
            load_predictions(path, settings)?
        }
        None => Vec::new(),
    };

    sink.begin("summarize", market.len())?;

    let mut warnings = Vec::new();
    let mut summaries = Vec::with_capacity(market.len());
    for series in &mut market {
        let dropped = series.retain_window(window);
        if dropped > 0 {
            debug!(symbol = %series.symbol, dropped, "trimmed history to time horizon");
        }

        let prediction = predictions
            .iter()
            .find(|prediction| prediction.symbol == series.symbol);
        if args.predictions.is_some() && prediction.is_none() {
            warnings.push(format!("no prediction for {}", series.symbol));
        }

        let summary = summarize_market(series, prediction);
        sink.item("summary", &summary)?;
        summaries.push(summary);
    }

    let data = serde_json::to_value(SummarizeResponseData { summaries })?;
    Ok(CommandResult::ok(data, inputs).with_warnings(warnings))
}
