mod chart;
mod config;
mod dashboard;
pub mod render;
mod report;
mod sanitize;
mod summarize;

use std::fs;
use std::io::{self, Read};
use std::time::Instant;

use finlens_core::{parse_predictions, Envelope, EnvelopeError, Prediction, Settings};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub const STDIN_INPUT: &str = "-";

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub inputs: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value, inputs: Vec<String>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            inputs,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Receives domain items while a command produces them.
pub trait ItemSink {
    /// Called once the command knows how many items it will produce.
    fn begin(&mut self, command: &'static str, total: usize) -> Result<(), CliError>;

    fn item<T: Serialize + ?Sized>(&mut self, kind: &'static str, item: &T)
        -> Result<(), CliError>;
}

/// Ignores items; they reach the user through the envelope only.
pub struct EnvelopeOnly;

impl ItemSink for EnvelopeOnly {
    fn begin(&mut self, _command: &'static str, _total: usize) -> Result<(), CliError> {
        Ok(())
    }

    fn item<T: Serialize + ?Sized>(
        &mut self,
        _kind: &'static str,
        _item: &T,
    ) -> Result<(), CliError> {
        Ok(())
    }
}

pub fn run<S: ItemSink>(
    cli: &Cli,
    settings: &Settings,
    sink: &mut S,
) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Render(args) => render::run(args, settings, sink)?,
        Command::Report(args) => report::run(args, settings, sink)?,
        Command::Sanitize(args) => sanitize::run(args, settings, sink)?,
        Command::Chart(args) => chart::run(args, settings, sink)?,
        Command::Summarize(args) => summarize::run(args, settings, sink)?,
        Command::Dashboard(args) => dashboard::run(args, settings, sink)?,
        Command::Config => config::run(settings, cli.config.as_deref(), sink)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        inputs,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        latency_ms,
        warning_count = warnings.len(),
        error_count = errors.len(),
        "command finished"
    );

    let mut metadata = Metadata::new(inputs, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta(&settings.schema_version)?;

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Read a file, or stdin for `-`.
pub fn read_input(path: &str) -> Result<String, CliError> {
    if path == STDIN_INPUT {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    fs::read_to_string(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => CliError::InputNotFound {
            path: path.to_owned(),
        },
        _ => CliError::Io(error),
    })
}

/// Read predictions and keep at most `forecast_days` points of each.
pub fn load_predictions(path: &str, settings: &Settings) -> Result<Vec<Prediction>, CliError> {
    let mut predictions = parse_predictions(&read_input(path)?)?;
    for prediction in &mut predictions {
        let dropped = prediction.truncate_days(settings.forecast_days);
        if dropped > 0 {
            debug!(
                symbol = %prediction.symbol,
                dropped,
                forecast_days = settings.forecast_days,
                "truncated forecast"
            );
        }
    }
    Ok(predictions)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;

    use serde::Serialize;
    use serde_json::Value;
    use tempfile::TempDir;

    use super::ItemSink;
    use crate::error::CliError;

    /// Write `content` to a fresh temp dir; keep the dir alive while the path is used.
    pub fn input_file(name: &str, content: &str) -> (TempDir, String) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write input");
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[derive(Default)]
    pub struct RecordingSink {
        pub begun: Option<(&'static str, usize)>,
        pub items: Vec<(&'static str, Value)>,
    }

    impl RecordingSink {
        pub fn kinds(&self) -> Vec<&'static str> {
            self.items.iter().map(|(kind, _)| *kind).collect()
        }
    }

    impl ItemSink for RecordingSink {
        fn begin(&mut self, command: &'static str, total: usize) -> Result<(), CliError> {
            self.begun = Some((command, total));
            Ok(())
        }

        fn item<T: Serialize + ?Sized>(
            &mut self,
            kind: &'static str,
            item: &T,
        ) -> Result<(), CliError> {
            self.items.push((kind, serde_json::to_value(item)?));
            Ok(())
        }
    }
}
