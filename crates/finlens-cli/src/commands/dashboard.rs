use finlens_core::{
    render_prediction, DashboardState, EnvelopeError, PredictionCard, Settings, Symbol,
};
use serde::Serialize;

use crate::cli::DashboardArgs;
use crate::error::CliError;

use super::{load_predictions, CommandResult, ItemSink};

#[derive(Debug, Serialize)]
struct DashboardResponseData {
    selected: Vec<Symbol>,
    cards: Vec<PredictionCard>,
}

pub fn run<S: ItemSink>(
    args: &DashboardArgs,
    settings: &Settings,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let selected = match &args.symbols {
        Some(raw) => Symbol::parse_list(raw)?,
        None => settings.assets.clone(),
    };

    let predictions = load_predictions(&args.input, settings)?;

    let mut state = DashboardState::new(selected);
    let total = predictions
        .iter()
        .filter(|prediction| state.is_selected(&prediction.symbol))
        .count();
    sink.begin("dashboard", total)?;

    let mut cards = Vec::with_capacity(total);
    for prediction in &predictions {
        if let Some(card) = render_prediction(&mut state, prediction, &settings.sanitize) {
            sink.item("card", &card)?;
            cards.push(card);
        }
    }

    let errors = state
        .symbols()
        .iter()
        .filter(|symbol| state.chart_for(symbol).is_none())
        .map(|symbol| {
            EnvelopeError::new("prediction_missing", format!("no prediction for {symbol}"))
                .map(|error| error.with_symbol(symbol.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = serde_json::to_value(DashboardResponseData {
        selected: state.symbols().to_vec(),
        cards,
    })?;

    Ok(CommandResult::ok(data, vec![args.input.clone()]).with_errors(errors))
}
