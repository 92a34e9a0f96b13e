//! Structured emission: bind fields first, then emit at a level.

use super::error::Result;
use super::fields::{FieldValue, Fields};
use super::log_level::LogLevel;
use super::log_record::CallSite;
use super::logger::Logger;
use std::panic::Location;

/// Fields bound to a logger, waiting for a message.
///
/// # Example
///
/// ```
/// use nested_logger::prelude::*;
///
/// let logger = Logger::builder().output(MemorySink::new()).build();
///
/// logger
///     .with_field("component", "scheduler")
///     .field("attempt", 3)
///     .warn("retrying job")
///     .unwrap();
/// ```
#[must_use = "a record builder does nothing until a level method is called"]
pub struct RecordBuilder<'a> {
    logger: &'a Logger,
    fields: Fields,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(logger: &'a Logger, fields: Fields) -> Self {
        Self { logger, fields }
    }

    /// Add a structured field
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key, value);
        self
    }

    /// Add every field of `fields`, overwriting on collision
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Emit the bound fields with `message` at `level`
    #[track_caller]
    pub fn log(self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        self.logger
            .emit(level, message.into(), self.fields, Location::caller().into())
    }

    /// Emit with an explicit call site
    pub fn log_at(self, level: LogLevel, site: CallSite, message: impl Into<String>) -> Result<()> {
        self.logger.emit(level, message.into(), self.fields, site)
    }

    #[track_caller]
    pub fn trace(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[track_caller]
    pub fn debug(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[track_caller]
    pub fn info(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[track_caller]
    pub fn warn(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[track_caller]
    pub fn error(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[track_caller]
    pub fn fatal(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    #[track_caller]
    pub fn panic(self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Panic, message)
    }
}

impl Logger {
    /// Bind `fields` to the next emitted record
    pub fn with_fields(&self, fields: Fields) -> RecordBuilder<'_> {
        RecordBuilder::new(self, fields)
    }

    /// Bind a single field to the next emitted record
    pub fn with_field<K, V>(&self, key: K, value: V) -> RecordBuilder<'_>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        RecordBuilder::new(self, Fields::new().with_field(key, value))
    }
}
