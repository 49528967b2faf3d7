//! NDJSON event stream for `--stream`.
//!
//! One line per event, numbered from 1:
//!
//! | Event | When | Data |
//! |-------|------|------|
//! | `start` | the command knows its item count | `command`, `total` |
//! | `chunk` | one domain item was produced | `kind`, `index`, `item` |
//! | `progress` | after every chunk | `completed`, `total` |
//! | `error` | per envelope error, or once on failure | `symbol` when known |
//! | `end` | last line | `status`, ids, counts, warnings |

use std::io::Write;

use finlens_core::{Envelope, UtcDateTime};
use serde::Serialize;
use serde_json::{json, Value};

use crate::commands::ItemSink;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventType {
    Start,
    Progress,
    Chunk,
    End,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEventError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct StreamEvent<'a> {
    event: StreamEventType,
    seq: u64,
    ts: UtcDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a StreamEventError>,
}

/// Streams a command's items as they are produced, then closes with the
/// envelope's metadata instead of the envelope itself.
pub struct NdjsonStream<W: Write> {
    writer: W,
    next_seq: u64,
    started: bool,
    total: usize,
    completed: usize,
}

impl<W: Write> NdjsonStream<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
            started: false,
            total: 0,
            completed: 0,
        }
    }

    /// Emit envelope errors and the closing `end` event.
    pub fn finish(&mut self, envelope: &Envelope<Value>) -> Result<(), CliError> {
        for error in &envelope.errors {
            let data = error
                .symbol
                .as_ref()
                .map(|symbol| json!({ "symbol": symbol.as_str() }));
            let event_error = StreamEventError {
                code: error.code.clone(),
                message: error.message.clone(),
            };
            self.emit(StreamEventType::Error, data.as_ref(), Some(&event_error))?;
        }

        let meta = &envelope.meta;
        let data = json!({
            "status": if envelope.errors.is_empty() { "ok" } else { "error" },
            "request_id": meta.request_id,
            "trace_id": meta.trace_id,
            "schema_version": meta.schema_version,
            "inputs": meta.inputs,
            "latency_ms": meta.latency_ms,
            "items": self.completed,
            "warnings": meta.warnings,
            "error_count": envelope.errors.len(),
        });
        self.emit(StreamEventType::End, Some(&data), None)
    }

    /// Close a stream whose command failed before producing an envelope.
    pub fn fail(&mut self, error: &CliError) -> Result<(), CliError> {
        let event_error = StreamEventError {
            code: error.code().to_owned(),
            message: error.to_string(),
        };
        self.emit(StreamEventType::Error, None, Some(&event_error))?;

        let data = json!({
            "status": "failed",
            "items": self.completed,
            "exit_code": error.exit_code(),
        });
        self.emit(StreamEventType::End, Some(&data), None)
    }

    fn emit(
        &mut self,
        event: StreamEventType,
        data: Option<&Value>,
        error: Option<&StreamEventError>,
    ) -> Result<(), CliError> {
        let event = StreamEvent {
            event,
            seq: self.next_seq,
            ts: UtcDateTime::now(),
            data,
            error,
        };
        self.next_seq += 1;

        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ItemSink for NdjsonStream<W> {
    fn begin(&mut self, command: &'static str, total: usize) -> Result<(), CliError> {
        self.started = true;
        self.total = total;
        let data = json!({ "command": command, "total": total });
        self.emit(StreamEventType::Start, Some(&data), None)
    }

    fn item<T: Serialize + ?Sized>(&mut self, kind: &'static str, item: &T) -> Result<(), CliError> {
        if !self.started {
            self.begin(kind, 0)?;
        }

        let chunk = json!({
            "kind": kind,
            "index": self.completed,
            "item": serde_json::to_value(item)?,
        });
        self.emit(StreamEventType::Chunk, Some(&chunk), None)?;

        self.completed += 1;
        let progress = json!({
            "completed": self.completed,
            "total": self.total.max(self.completed),
        });
        self.emit(StreamEventType::Progress, Some(&progress), None)
    }
}

#[cfg(test)]
mod tests {
    use finlens_core::{EnvelopeError, EnvelopeMeta, Symbol};

    use super::*;

    fn events(sink: &[u8]) -> Vec<Value> {
        std::str::from_utf8(sink)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
            .collect()
    }

    fn kinds(events: &[Value]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| event["event"].as_str())
            .collect()
    }

    fn envelope(errors: Vec<EnvelopeError>) -> Envelope<Value> {
        let mut meta = EnvelopeMeta::new(
            "request-12345",
            "v1.0.0",
            vec![String::from("predictions.json")],
            4,
        )
        .expect("meta should be valid");
        meta.push_warning("AAPL point 2: replaced invalid forecast");
        Envelope::with_errors(meta, json!({ "cards": [] }), errors).expect("valid envelope")
    }

    #[test]
    fn emits_one_chunk_and_progress_per_item() {
        let mut sink = Vec::<u8>::new();
        {
            let mut stream = NdjsonStream::new(&mut sink);
            stream.begin("sanitize", 2).expect("start");
            stream.item("summary", &json!({ "symbol": "AAPL" })).expect("first");
            stream.item("summary", &json!({ "symbol": "MSFT" })).expect("second");
            stream.finish(&envelope(Vec::new())).expect("end");
        }

        let events = events(&sink);
        assert_eq!(
            kinds(&events),
            vec!["start", "chunk", "progress", "chunk", "progress", "end"]
        );
        assert_eq!(events[0].pointer("/data/total"), Some(&json!(2)));
        assert_eq!(events[3].pointer("/data/index"), Some(&json!(1)));
        assert_eq!(events[3].pointer("/data/item/symbol"), Some(&json!("MSFT")));
        assert_eq!(events[4].pointer("/data/completed"), Some(&json!(2)));
        assert_eq!(events[5].pointer("/data/status"), Some(&json!("ok")));
        assert_eq!(events[5].pointer("/data/items"), Some(&json!(2)));
        assert_eq!(events[5]["seq"], 6);
    }

    #[test]
    fn envelope_errors_precede_end() {
        let error = EnvelopeError::new("prediction_missing", "no prediction for TSLA")
            .expect("error should be valid")
            .with_symbol(Symbol::parse("TSLA").expect("valid symbol"));

        let mut sink = Vec::<u8>::new();
        {
            let mut stream = NdjsonStream::new(&mut sink);
            stream.begin("dashboard", 0).expect("start");
            stream.finish(&envelope(vec![error])).expect("end");
        }

        let events = events(&sink);
        assert_eq!(kinds(&events), vec!["start", "error", "end"]);
        assert_eq!(events[1].pointer("/error/code"), Some(&json!("prediction_missing")));
        assert_eq!(events[1].pointer("/data/symbol"), Some(&json!("TSLA")));
        assert_eq!(events[2].pointer("/data/status"), Some(&json!("error")));
        assert_eq!(
            events[2].pointer("/data/warnings/0"),
            Some(&json!("AAPL point 2: replaced invalid forecast"))
        );
    }

    #[test]
    fn failure_closes_the_stream() {
        let mut sink = Vec::<u8>::new();
        {
            let mut stream = NdjsonStream::new(&mut sink);
            let error = CliError::InputNotFound {
                path: String::from("missing.json"),
            };
            stream.fail(&error).expect("failure events");
        }

        let events = events(&sink);
        assert_eq!(kinds(&events), vec!["error", "end"]);
        assert_eq!(events[0].pointer("/error/code"), Some(&json!("input_not_found")));
        assert_eq!(events[1].pointer("/data/exit_code"), Some(&json!(2)));
    }
}
