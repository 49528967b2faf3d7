use finlens_core::markdown;
use finlens_core::{RenderOptions, Settings};
use serde::Serialize;

use crate::cli::RenderArgs;
use crate::error::CliError;

use super::{read_input, CommandResult, ItemSink};

#[derive(Debug, Serialize)]
struct RenderResponseData {
    html: String,
}

pub fn render_html(args: &RenderArgs, settings: &Settings) -> Result<String, CliError> {
    let text = read_input(&args.input)?;
    let options = RenderOptions {
        escape_html: settings.render.escape_html && !args.no_escape,
        ..settings.render.clone()
    };
    Ok(markdown::to_html_with(Some(&text), &options))
}

pub fn run<S: ItemSink>(
    args: &RenderArgs,
    settings: &Settings,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let html = render_html(args, settings)?;
    sink.begin("render", 1)?;

    let data = RenderResponseData { html };
    sink.item("html", &data)?;
    Ok(CommandResult::ok(
        serde_json::to_value(data)?,
        vec![args.input.clone()],
    ))
}
