//! JSONL transcript writer.
//!
//! Every [`ConversationEvent`] becomes one line: the payload's fields plus
//! `type`, `timestamp` and, for session events, `session`. A payload that is
//! not a JSON object is nested under `data`. Files are opened for append, so
//! a resumed session keeps a single transcript.

use namesmith_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Flatten an event into the JSON object written for it
pub(crate) fn to_record(event: ConversationEvent, timestamp: String) -> Value {
    let mut record = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    record.insert("type".to_string(), Value::from(event.event_type));
    record.insert("timestamp".to_string(), Value::from(timestamp));
    if let Some(session) = event.session {
        record.insert("session".to_string(), Value::from(session.as_str()));
    }
    Value::Object(record)
}

/// Appends one JSON object per line to a transcript file.
///
/// Each line is flushed as it is written.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for append, creating it and its directory if needed.
    /// Returns `None` (after a warning) when that fails.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        let opened = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(path));

        match opened {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let Ok(line) = serde_json::to_string(&to_record(event, timestamp)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namesmith_domain::SessionId;
    use serde_json::json;

    const TS: &str = "2026-01-01T00:00:00.000Z";

    #[test]
    fn test_record_merges_payload_fields() {
        let event = ConversationEvent::new(
            "llm_response",
            json!({ "role": "creator", "model": "gpt-4o", "text": "{\"domains\": []}" }),
        )
        .for_session(&SessionId::from_parts(1_700_000_000, "a1b2c3"));

        let record = to_record(event, TS.to_string());
        assert_eq!(record["type"], "llm_response");
        assert_eq!(record["timestamp"], TS);
        assert_eq!(record["session"], "1700000000_a1b2c3");
        assert_eq!(record["model"], "gpt-4o");
    }

    #[test]
    fn test_record_nests_scalar_payload() {
        let record = to_record(
            ConversationEvent::new("note", json!("just a string")),
            TS.to_string(),
        );
        assert_eq!(record["data"], "just a string");
        assert!(record.get("session").is_none());
    }

    #[test]
    fn test_lines_append_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("session.jsonl");

        for round in 1..=2 {
            let logger = JsonlConversationLogger::new(&path).unwrap();
            logger.log(ConversationEvent::new(
                "round_complete",
                json!({ "loop": round, "available": ["leafly.io"] }),
            ));
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let loops: Vec<u64> = content
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["loop"].as_u64().unwrap())
            .collect();
        assert_eq!(loops, vec![1, 2]);
    }
}
