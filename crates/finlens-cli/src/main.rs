mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use finlens_core::{Envelope, Settings};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::{Cli, Command};
use crate::commands::EnvelopeOnly;
use crate::error::CliError;
use crate::output::NdjsonStream;

/// Exit code when the envelope carries errors and `--strict` is off.
const ENVELOPE_ERROR_EXIT: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = logging::init(cli.verbose, logging::LogFormat::from_env()) {
        eprintln!("warning: logging disabled: {error}");
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<u8, CliError> {
    let settings = Settings::load(cli.config.as_deref())
        .map_err(|error| CliError::Config(error.to_string()))?;
    debug!(assets = settings.assets.len(), "settings resolved");

    if let Command::Render(args) = &cli.command {
        if args.raw {
            let html = commands::render::render_html(args, &settings)?;
            writeln!(io::stdout().lock(), "{html}")?;
            return Ok(0);
        }
    }

    let envelope = if cli.stream {
        let stdout = io::stdout();
        let mut stream = NdjsonStream::new(stdout.lock());
        match commands::run(cli, &settings, &mut stream) {
            Ok(envelope) => {
                stream.finish(&envelope)?;
                envelope
            }
            Err(error) => {
                if let Err(stream_error) = stream.fail(&error) {
                    warn!(error = %stream_error, "could not close event stream");
                }
                return Err(error);
            }
        }
    } else {
        let envelope = commands::run(cli, &settings, &mut EnvelopeOnly)?;
        output::render(&envelope, cli.format, cli.pretty)?;
        envelope
    };

    exit_status(cli.strict, &envelope)
}

/// Strict mode fails on any warning or error; otherwise errors exit with 3.
fn exit_status(strict: bool, envelope: &Envelope<Value>) -> Result<u8, CliError> {
    let warning_count = envelope.meta.warnings.len();
    let error_count = envelope.errors.len();

    if strict && (warning_count > 0 || error_count > 0) {
        return Err(CliError::StrictModeViolation {
            warning_count,
            error_count,
        });
    }

    if error_count > 0 {
        return Ok(ENVELOPE_ERROR_EXIT);
    }

    Ok(0)
}
