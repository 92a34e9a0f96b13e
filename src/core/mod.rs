//! Core logger types and traits

pub mod error;
pub mod fields;
pub mod formatter;
pub mod hook;
pub mod json;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod nested;
pub mod record_builder;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use formatter::{CallerFormatter, Formatter, FormatterConfig};
pub use hook::{ChannelHook, Hook};
pub use json::JsonFormatter;
pub use log_level::LogLevel;
pub use log_record::{CallSite, Caller, LogRecord};
pub use logger::{ExitHandler, Logger, LoggerBuilder, DEFAULT_LEVEL_ENV, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use nested::{compact_caller, order_fields, NestedFormatter};
pub use record_builder::RecordBuilder;
pub use timestamp::TimestampFormat;
