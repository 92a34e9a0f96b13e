//! Nested text formatter
//!
//! Renders a record as one human-readable line:
//!
//! ```text
//! Jan  8 10:30:45.123 [WARN] [scheduler] [retry:3] disk low
//! ```
//!
//! The layout is driven by [`FormatterConfig`]. Field order is deterministic:
//! names listed in `fields_order` come first, every other field follows in
//! lexicographic order.

use super::error::Result;
use super::fields::Fields;
use super::formatter::{Formatter, FormatterConfig};
use super::log_level::LogLevel;
use super::log_record::{Caller, LogRecord};
use super::timestamp::TimestampFormat;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

const COLOR_RESET: &str = "\x1b[0m";

/// Field names of `fields` in rendering order.
///
/// Names in `order` that are present come first, each at most once. Names in
/// `order` that the record lacks are skipped. The remaining names follow in
/// lexicographic order.
pub fn order_fields<'a>(order: Option<&[String]>, fields: &'a Fields) -> Vec<&'a str> {
    let mut ordered: Vec<&'a str> = Vec::with_capacity(fields.len());
    let mut seen: HashSet<&'a str> = HashSet::with_capacity(fields.len());

    for name in order.unwrap_or_default() {
        if let Some((key, _)) = fields.get_key_value(name) {
            if seen.insert(key) {
                ordered.push(key);
            }
        }
    }

    let mut rest: Vec<&'a str> = fields.keys().filter(|key| !seen.contains(key)).collect();
    rest.sort_unstable();
    ordered.extend(rest);
    ordered
}

/// Compact caller rendering: ` [main.rs:42][run()]`.
///
/// Only the file name and the last path segment of the function are kept.
pub fn compact_caller(caller: &Caller) -> Result<String> {
    let file = Path::new(&caller.file)
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or(Cow::Borrowed(caller.file.as_str()));

    let function = caller.function.rsplit("::").next().unwrap_or_default();
    if function.is_empty() {
        Ok(format!(" [{}:{}]", file, caller.line))
    } else {
        Ok(format!(" [{}:{}][{}()]", file, caller.line, function))
    }
}

/// Replace line breaks so a value can never split the output line.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace('\n', "\\n").replace('\r', "\\r"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Text formatter producing `timestamp [LEVL] [field]... message` lines.
///
/// # Examples
///
/// ```
/// use nested_logger::prelude::*;
/// use chrono::{Local, TimeZone};
///
/// let formatter = NestedFormatter::new(
///     FormatterConfig::new()
///         .with_timestamp_format(TimestampFormat::DateTime)
///         .with_fields_order(["component"])
///         .with_hide_keys(true)
///         .with_trim_messages(true)
///         .with_colors(false),
/// );
///
/// let record = LogRecord::new(LogLevel::Warn, "  disk low  ")
///     .with_timestamp(Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap())
///     .with_field("component", "scheduler");
///
/// let line = formatter.format(&record).unwrap();
/// assert_eq!(line, b"2024-03-05 14:07:09 [WARN] [scheduler] disk low\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NestedFormatter {
    config: Arc<FormatterConfig>,
}

impl NestedFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Share an existing configuration
    pub fn with_shared_config(config: Arc<FormatterConfig>) -> Self {
        Self { config }
    }

    /// The layout used by [`Logger::standard`](crate::Logger::standard):
    /// trimmed messages, hidden keys, `component` and `category` first,
    /// caller info right after the timestamp and only the level colored.
    pub fn standard() -> Self {
        Self::new(
            FormatterConfig::new()
                .with_trim_messages(true)
                .with_hide_keys(true)
                .with_timestamp_format(TimestampFormat::DateTime)
                .with_fields_order(["component", "category"])
                .with_caller_first(true)
                .with_fields_colors(false)
                .with_caller_formatter(compact_caller),
        )
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn level_tag(&self, level: LogLevel) -> String {
        let name = if self.config.no_uppercase_level {
            level.as_str().to_string()
        } else {
            level.as_str().to_uppercase()
        };

        if self.config.show_full_level {
            name
        } else {
            name.chars().take(4).collect()
        }
    }

    /// Caller text for `record`, or `None` when the record carries no caller
    fn render_caller(&self, record: &LogRecord) -> Result<Option<String>> {
        let Some(caller) = record.caller.as_ref() else {
            return Ok(None);
        };

        let rendered = match self.config.caller_formatter.as_ref() {
            Some(custom) => single_line(&custom(caller)?).into_owned(),
            None if caller.function.is_empty() => {
                format!(" ({}:{})", single_line(&caller.file), caller.line)
            }
            None => format!(
                " ({}:{} {})",
                single_line(&caller.file),
                caller.line,
                single_line(&caller.function)
            ),
        };
        Ok(Some(rendered))
    }

    fn write_fields(&self, out: &mut String, record: &LogRecord) {
        for key in order_fields(self.config.fields_order.as_deref(), &record.fields) {
            let Some(value) = record.fields.get(key) else {
                continue;
            };
            let value = value.to_string();

            if self.config.hide_keys {
                out.push_str(&format!("[{}]", single_line(&value)));
            } else {
                out.push_str(&format!("[{}:{}]", single_line(key), single_line(&value)));
            }

            if !self.config.no_fields_space {
                out.push(' ');
            }
        }
    }
}

impl Formatter for NestedFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>> {
        let config = &self.config;
        let mut out = String::with_capacity(128);

        out.push_str(&config.timestamp_format.format(&record.timestamp)?);

        let caller = self.render_caller(record)?;
        if config.caller_first {
            if let Some(caller) = caller.as_deref() {
                out.push_str(caller);
            }
        }

        if !config.no_colors {
            out.push_str(&record.level.color_escape());
        }

        out.push_str(" [");
        out.push_str(&self.level_tag(record.level));
        out.push(']');

        if !config.no_fields_space {
            out.push(' ');
        }

        if !config.no_colors && config.no_fields_colors {
            out.push_str(COLOR_RESET);
        }

        self.write_fields(&mut out, record);

        if config.no_fields_space {
            out.push(' ');
        }

        if !config.no_colors && !config.no_fields_colors {
            out.push_str(COLOR_RESET);
        }

        // the fields already end with a space; the caller gets its own
        if !config.caller_first {
            if let Some(caller) = caller.as_deref().map(str::trim_start) {
                if !caller.is_empty() {
                    out.push_str(caller);
                    out.push(' ');
                }
            }
        }

        let message = if config.trim_messages {
            record.message.trim()
        } else {
            record.message.as_str()
        };
        out.push_str(&single_line(message));

        out.push('\n');
        Ok(out.into_bytes())
    }

    fn name(&self) -> &str {
        "nested"
    }
}
