//! JSON formatter: one object per line

use super::error::{LoggerError, Result};
use super::formatter::Formatter;
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;

const RESERVED_KEYS: [&str; 6] = ["time", "level", "msg", "file", "line", "func"];

/// Renders records as single-line JSON objects.
///
/// Fields become top-level keys. A field whose name collides with one of the
/// record keys (`time`, `level`, `msg`, `file`, `line`, `func`) is renamed to
/// `fields.<name>`.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::Rfc3339,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn timestamp_value(&self, record: &LogRecord) -> Result<serde_json::Value> {
        if self.timestamp_format.is_numeric() {
            return Ok(serde_json::Value::Number(
                record.timestamp.timestamp_millis().into(),
            ));
        }
        Ok(serde_json::Value::String(
            self.timestamp_format.format(&record.timestamp)?,
        ))
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in record.fields.iter() {
            let key = if RESERVED_KEYS.contains(&key) {
                format!("fields.{}", key)
            } else {
                key.to_string()
            };
            json_obj.insert(key, value.to_json_value());
        }

        json_obj.insert("time".to_string(), self.timestamp_value(record)?);
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.as_str().to_string()),
        );
        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(record.message.clone()),
        );

        if let Some(ref caller) = record.caller {
            json_obj.insert(
                "file".to_string(),
                serde_json::Value::String(caller.file.clone()),
            );
            json_obj.insert(
                "line".to_string(),
                serde_json::Value::Number(caller.line.into()),
            );
            if !caller.function.is_empty() {
                json_obj.insert(
                    "func".to_string(),
                    serde_json::Value::String(caller.function.clone()),
                );
            }
        }

        let mut bytes = serde_json::to_vec(&serde_json::Value::Object(json_obj))
            .map_err(|e| LoggerError::formatter("JSON", e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn name(&self) -> &str {
        "json"
    }
}
