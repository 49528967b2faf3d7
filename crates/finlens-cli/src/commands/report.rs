use finlens_core::{render_report, AnalysisReport, Settings};

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{read_input, CommandResult, ItemSink};

pub fn run<S: ItemSink>(
    args: &InputArgs,
    settings: &Settings,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let content = read_input(&args.input)?;
    let report = serde_json::from_str::<AnalysisReport>(&content)?
        .with_default_horizon(settings.forecast_days);
    sink.begin("report", 1)?;

    let mut warnings = Vec::new();
    if report.report.trim().is_empty() {
        warnings.push(String::from("report body is empty"));
    }

    let panel = render_report(&report, &settings.render);
    sink.item("panel", &panel)?;

    let data = serde_json::to_value(panel)?;
    Ok(CommandResult::ok(data, vec![args.input.clone()]).with_warnings(warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::input_file;
    use crate::commands::EnvelopeOnly;

    #[test]
    fn renders_backend_report_with_naive_timestamp() {
        let (_dir, input) = input_file(
            "report.json",
            r##"{"report": "# Outlook\n**AAPL** leads", "timestamp": "2025-03-14T16:30:00.123456",
                 "assets_analyzed": ["AAPL"]}"##,
        );
        let settings = Settings {
            forecast_days: 7,
            ..Settings::default()
        };

        let result = run(&InputArgs { input }, &settings, &mut EnvelopeOnly)
            .expect("report should run");

        assert_eq!(
            result.data["html"],
            "<p><h1>Outlook</h1><br><strong>AAPL</strong> leads</p>"
        );
        assert_eq!(result.data["timestamp"], "2025-03-14T16:30:00.123456Z");
        assert_eq!(result.data["time_horizon"], "7-day forecast");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_body_is_a_warning() {
        let (_dir, input) = input_file(
            "report.json",
            r#"{"report": "  ", "timestamp": "2025-03-14T16:30:00Z", "time_horizon": "1-week"}"#,
        );

        let result = run(&InputArgs { input }, &Settings::default(), &mut EnvelopeOnly)
            .expect("report should run");

        assert_eq!(result.warnings, vec![String::from("report body is empty")]);
        assert_eq!(result.data["html"], "");
        assert_eq!(result.data["time_horizon"], "1-week");
    }

    #[test]
    fn malformed_report_is_a_serialization_error() {
        let (_dir, input) = input_file("report.json", r#"{"report": "x"}"#);
        let error = run(&InputArgs { input }, &Settings::default(), &mut EnvelopeOnly)
            .expect_err("missing timestamp must fail");
        assert_eq!(error.exit_code(), 4);
    }
}
