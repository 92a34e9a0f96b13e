//! # Nested Logger
//!
//! A small logging library built around a "nested" text layout:
//!
//! ```text
//! 2024-03-05 14:07:09 [main.rs:12][run()] [WARN] [scheduler] disk low
//! ```
//!
//! ## Features
//!
//! - **Explicit logger**: no hidden global; construct a [`Logger`] and share it
//! - **Nested formatter**: ordered `[field]` blocks, caller info, ANSI colors
//! - **Structured fields**: bind key/value pairs with [`Logger::with_fields`]
//! - **Hooks**: side channels fired per record
//! - **Thread Safe**: each record reaches the sink as one contiguous write

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        compact_caller, CallSite, Caller, ChannelHook, FieldValue, Fields, Formatter,
        FormatterConfig, Hook, JsonFormatter, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, NestedFormatter, RecordBuilder, Result, TimestampFormat,
    };
    pub use crate::sinks::MemorySink;
}

pub use self::core::{
    compact_caller, order_fields, CallSite, Caller, CallerFormatter, ChannelHook, ExitHandler,
    FieldValue, Fields, Formatter, FormatterConfig, Hook, JsonFormatter, LogLevel, LogRecord,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, NestedFormatter, RecordBuilder, Result,
    TimestampFormat, DEFAULT_LEVEL_ENV, FATAL_EXIT_CODE,
};
pub use sinks::MemorySink;
