//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    fields::Fields,
    formatter::Formatter,
    hook::Hook,
    log_level::LogLevel,
    log_record::{CallSite, LogRecord},
    metrics::LoggerMetrics,
    nested::NestedFormatter,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

/// Exit code passed to the exit handler after a fatal record
pub const FATAL_EXIT_CODE: i32 = 1;

/// Environment variable read by [`LoggerBuilder::level_from_default_env`]
pub const DEFAULT_LEVEL_ENV: &str = "NESTED_LOG_LEVEL";

/// Called with [`FATAL_EXIT_CODE`] after a fatal record has been written.
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

fn process_exit() -> ExitHandler {
    Arc::new(|code| std::process::exit(code))
}

struct LoggerState {
    out: Box<dyn Write + Send>,
    formatter: Arc<dyn Formatter>,
    level: LogLevel,
    report_caller: bool,
    hooks: Vec<Arc<dyn Hook>>,
    exit_handler: ExitHandler,
}

/// A logger owned by the application and shared by reference.
///
/// All configuration lives behind one mutex. Setters take `&self` and apply to
/// every subsequent call. Each record is written with a single `write_all`
/// while the lock is held, so lines from concurrent callers never interleave.
///
/// Two levels have side effects after the record is written:
/// - `fatal` calls the exit handler with [`FATAL_EXIT_CODE`]; by default this
///   terminates the process.
/// - `panic` unwinds with the record's message as a `String` payload, which
///   an enclosing `std::panic::catch_unwind` can recover.
///
/// # Example
///
/// ```
/// use nested_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .output(sink.clone())
///     .formatter(NestedFormatter::new(FormatterConfig::new().with_colors(false)))
///     .build();
///
/// logger.debug("cache warmed").unwrap();
/// logger.with_field("component", "scheduler").warn("disk low").unwrap();
///
/// assert_eq!(sink.lines().len(), 2);
/// ```
pub struct Logger {
    state: Mutex<LoggerState>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger writing to stderr with the default nested layout at `Info`,
    /// caller reporting off.
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(LoggerState {
            out: Box::new(io::stderr()),
            formatter: Arc::new(NestedFormatter::default()),
            level: LogLevel::Info,
            report_caller: false,
            hooks: Vec::new(),
            exit_handler: process_exit(),
        })
    }

    /// Logger with the [`NestedFormatter::standard`] layout and caller
    /// reporting on, writing to stderr at `Info`.
    #[must_use]
    pub fn standard() -> Self {
        let logger = Self::new();
        logger.set_formatter(NestedFormatter::standard());
        logger.set_report_caller(true);
        logger
    }

    fn from_state(state: LoggerState) -> Self {
        Self {
            state: Mutex::new(state),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_output<W: Write + Send + 'static>(&self, out: W) {
        self.state.lock().out = Box::new(out);
    }

    pub fn set_formatter<F: Formatter + 'static>(&self, formatter: F) {
        self.set_shared_formatter(Arc::new(formatter));
    }

    pub fn set_shared_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.state.lock().formatter = formatter;
    }

    pub fn set_level(&self, level: LogLevel) {
        self.state.lock().level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.state.lock().level
    }

    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    pub fn set_report_caller(&self, report: bool) {
        self.state.lock().report_caller = report;
    }

    pub fn reports_caller(&self) -> bool {
        self.state.lock().report_caller
    }

    pub fn add_hook<H: Hook + 'static>(&self, hook: H) {
        self.state.lock().hooks.push(Arc::new(hook));
    }

    /// Replace what happens after a fatal record. The default terminates the
    /// process with `std::process::exit`.
    pub fn set_exit_handler<F>(&self, handler: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.state.lock().exit_handler = Arc::new(handler);
    }

    /// Get the logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.state.lock().out.flush()?;
        Ok(())
    }

    /// Emit `message` at `level`, capturing the caller's location when
    /// caller reporting is on.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        self.emit(level, message.into(), Fields::new(), Location::caller().into())
    }

    /// Emit with an explicit call site. Used by the logging macros, which
    /// also know the enclosing module.
    pub fn log_at(
        &self,
        level: LogLevel,
        site: CallSite,
        message: impl Into<String>,
    ) -> Result<()> {
        self.emit(level, message.into(), Fields::new(), site)
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    /// Emit at `Fatal`, then call the exit handler.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    /// Emit at `Panic`, then unwind with the message as payload.
    #[inline]
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Panic, message)
    }

    /// Build, hook, format and write one record, then run the level's side
    /// effect. Fatal and panic side effects run even if writing failed.
    pub(crate) fn emit(
        &self,
        level: LogLevel,
        message: String,
        fields: Fields,
        site: CallSite,
    ) -> Result<()> {
        let (formatter, hooks, report_caller, exit_handler) = {
            let state = self.state.lock();
            if level < state.level {
                self.metrics.record_filtered();
                return Ok(());
            }
            (
                Arc::clone(&state.formatter),
                state.hooks.clone(),
                state.report_caller,
                Arc::clone(&state.exit_handler),
            )
        };

        let mut record = LogRecord::new(level, message).with_fields(fields);
        if report_caller {
            record = record.with_caller(site.to_caller());
        }

        self.fire_hooks(&hooks, &record);

        let outcome = formatter.format(&record).and_then(|bytes| {
            let mut state = self.state.lock();
            state.out.write_all(&bytes).map_err(LoggerError::from)
        });

        match outcome {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(_) => {
                self.metrics.record_failed();
            }
        }

        match level {
            LogLevel::Fatal => exit_handler(FATAL_EXIT_CODE),
            LogLevel::Panic => std::panic::panic_any(record.message),
            _ => {}
        }

        outcome
    }

    /// Fire every hook subscribed to the record's level with per-hook panic
    /// isolation. Failures are reported on stderr and counted.
    fn fire_hooks(&self, hooks: &[Arc<dyn Hook>], record: &LogRecord) {
        for hook in hooks {
            if !hook.levels().contains(&record.level) {
                continue;
            }

            let fire_result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| hook.fire(record)));

            match fire_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Hook '{}' failed: {}", hook.name(), e);
                    self.metrics.record_hook_failure();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Hook '{}' panicked: {}. \
                         Other hooks continue to function.",
                        hook.name(),
                        panic_msg
                    );
                    self.metrics.record_hook_failure();
                }
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use nested_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .output(std::io::stdout())
///     .formatter(NestedFormatter::standard())
///     .report_caller(true)
///     .build();
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    out: Option<Box<dyn Write + Send>>,
    formatter: Option<Arc<dyn Formatter>>,
    report_caller: bool,
    hooks: Vec<Arc<dyn Hook>>,
    exit_handler: Option<ExitHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            out: None,
            formatter: None,
            report_caller: false,
            hooks: Vec::new(),
            exit_handler: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Read the minimum level from the environment variable `var`.
    ///
    /// An unset variable keeps the current level; an unparsable value is an
    /// error.
    pub fn level_from_env(mut self, var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) => {
                self.level = value
                    .parse()
                    .map_err(|message: String| LoggerError::config(var, message))?;
                Ok(self)
            }
            Err(std::env::VarError::NotPresent) => Ok(self),
            Err(e) => Err(LoggerError::config(var, e.to_string())),
        }
    }

    /// [`LoggerBuilder::level_from_env`] with [`DEFAULT_LEVEL_ENV`]
    pub fn level_from_default_env(self) -> Result<Self> {
        self.level_from_env(DEFAULT_LEVEL_ENV)
    }

    /// Set the sink. Defaults to stderr.
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, out: W) -> Self {
        self.out = Some(Box::new(out));
        self
    }

    /// Set the formatter. Defaults to [`NestedFormatter::default`].
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, report: bool) -> Self {
        self.report_caller = report;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_handler = Some(Arc::new(handler));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger::from_state(LoggerState {
            out: self.out.unwrap_or_else(|| Box::new(io::stderr())),
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(NestedFormatter::default())),
            level: self.level,
            report_caller: self.report_caller,
            hooks: self.hooks,
            exit_handler: self.exit_handler.unwrap_or_else(process_exit),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::FormatterConfig;
    use crate::core::json::JsonFormatter;
    use crate::core::log_record::Caller;
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    fn plain_logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .level(LogLevel::Trace)
            .output(sink.clone())
            .formatter(NestedFormatter::new(
                FormatterConfig::new()
                    .with_colors(false)
                    .with_custom_timestamp("T"),
            ))
            .build()
    }

    struct CountingHook {
        levels: Vec<LogLevel>,
        fired: Arc<AtomicUsize>,
    }

    impl Hook for CountingHook {
        fn levels(&self) -> Vec<LogLevel> {
            self.levels.clone()
        }

        fn fire(&self, _record: &LogRecord) -> Result<()> {
            self.fired.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FailingHook;

    impl Hook for FailingHook {
        fn fire(&self, _record: &LogRecord) -> Result<()> {
            Err(LoggerError::other("Simulated failure"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingHook;

    impl Hook for PanickingHook {
        fn fire(&self, _record: &LogRecord) -> Result<()> {
            panic!("hook exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        assert_eq!(logger.level(), LogLevel::Info);
        assert!(!logger.reports_caller());
    }

    #[test]
    fn test_standard_preset() {
        let logger = Logger::standard();
        assert_eq!(logger.level(), LogLevel::Info);
        assert!(logger.reports_caller());
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);

        logger.info("first").unwrap();
        logger.error("second").unwrap();

        assert_eq!(sink.lines(), vec!["T [INFO] first", "T [ERRO] second"]);
        assert_eq!(logger.metrics().written_count(), 2);
    }

    #[test]
    fn test_level_filtering() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        logger.set_level(LogLevel::Warn);

        logger.trace("hidden").unwrap();
        logger.debug("hidden").unwrap();
        logger.info("hidden").unwrap();
        logger.warn("shown").unwrap();

        assert_eq!(sink.lines(), vec!["T [WARN] shown"]);
        assert_eq!(logger.metrics().filtered_count(), 3);
        assert!(logger.is_level_enabled(LogLevel::Error));
        assert!(!logger.is_level_enabled(LogLevel::Info));
    }

    #[test]
    fn test_report_caller_uses_call_site() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        logger.set_report_caller(true);

        logger.info("located").unwrap();

        let line = &sink.lines()[0];
        assert!(line.contains("logger.rs:"), "line was {}", line);
        assert!(line.ends_with(") located"), "line was {}", line);
    }

    #[test]
    fn test_log_at_explicit_site() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        logger.set_report_caller(true);

        logger
            .log_at(LogLevel::Info, CallSite::new("app.rs", 4, "app::main"), "hi")
            .unwrap();

        assert_eq!(sink.lines(), vec!["T [INFO] (app.rs:4 app::main) hi"]);
    }

    #[test]
    fn test_set_formatter_swaps_rendering() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        logger.set_formatter(JsonFormatter::new());

        logger.info("as json").unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(parsed["msg"], "as json");
    }

    #[test]
    fn test_set_output_redirects() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let logger = plain_logger(&first);

        logger.info("one").unwrap();
        logger.set_output(second.clone());
        logger.info("two").unwrap();

        assert_eq!(first.lines(), vec!["T [INFO] one"]);
        assert_eq!(second.lines(), vec!["T [INFO] two"]);
    }

    #[test]
    fn test_hooks_fire_for_their_levels() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        let fired = Arc::new(AtomicUsize::new(0));
        logger.add_hook(CountingHook {
            levels: vec![LogLevel::Error],
            fired: Arc::clone(&fired),
        });

        logger.info("ignored by hook").unwrap();
        logger.error("seen by hook").unwrap();

        assert_eq!(fired.load(Ordering::Relaxed), 1);
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_failing_hooks_do_not_block_output() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        logger.add_hook(FailingHook);
        logger.add_hook(PanickingHook);

        logger.warn("still written").unwrap();

        assert_eq!(sink.lines(), vec!["T [WARN] still written"]);
        assert_eq!(logger.metrics().hook_failure_count(), 2);
    }

    #[test]
    fn test_sink_error_propagates() {
        let logger = Logger::builder().output(BrokenSink).build();

        let err = logger.info("lost").unwrap_err();
        assert!(matches!(err, LoggerError::IoError(_)));
        assert_eq!(logger.metrics().failed_count(), 1);
    }

    #[test]
    fn test_caller_formatter_error_propagates() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .output(sink.clone())
            .report_caller(true)
            .formatter(NestedFormatter::new(
                FormatterConfig::new()
                    .with_caller_formatter(|_: &Caller| Err(LoggerError::caller_format("nope"))),
            ))
            .build();

        let err = logger.info("dropped").unwrap_err();
        assert!(matches!(err, LoggerError::CallerFormat { .. }));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_fatal_calls_exit_handler_after_write() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        let code = Arc::new(AtomicI32::new(-1));
        let code_clone = Arc::clone(&code);
        let sink_clone = sink.clone();
        logger.set_exit_handler(move |c| {
            // the record is already in the sink when the handler runs
            assert_eq!(sink_clone.lines().len(), 1);
            code_clone.store(c, Ordering::SeqCst);
        });

        logger.fatal("unrecoverable").unwrap();

        assert_eq!(code.load(Ordering::SeqCst), FATAL_EXIT_CODE);
        assert_eq!(sink.lines(), vec!["T [FATA] unrecoverable"]);
    }

    #[test]
    fn test_panic_unwinds_after_write() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = logger.panic("invariant broken");
        }));

        let payload = result.unwrap_err();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("invariant broken")
        );
        assert_eq!(sink.lines(), vec!["T [PANI] invariant broken"]);

        // the lock was released before unwinding
        logger.info("after").unwrap();
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_fatal_below_level_is_noop() {
        let sink = MemorySink::new();
        let logger = plain_logger(&sink);
        logger.set_level(LogLevel::Panic);
        let exits = Arc::new(AtomicUsize::new(0));
        let exits_clone = Arc::clone(&exits);
        logger.set_exit_handler(move |_| {
            exits_clone.fetch_add(1, Ordering::SeqCst);
        });

        logger.fatal("filtered fatal").unwrap();

        assert_eq!(exits.load(Ordering::SeqCst), 0);
        assert!(sink.is_empty());
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_invalid_custom_timestamp_returns_error() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .output(sink.clone())
            .formatter(NestedFormatter::new(
                FormatterConfig::new()
                    .with_colors(false)
                    .with_custom_timestamp("%Q"),
            ))
            .build();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| logger.info("hello")));

        let err = result.expect("no panic").unwrap_err();
        assert!(matches!(err, LoggerError::FormatterError { .. }));
        assert!(sink.is_empty());
        assert_eq!(logger.metrics().failed_count(), 1);
    }

    #[test]
    fn test_level_from_env() {
        std::env::set_var("NESTED_LOGGER_TEST_LEVEL", "warning");
        let builder = Logger::builder()
            .level_from_env("NESTED_LOGGER_TEST_LEVEL")
            .unwrap();
        assert_eq!(builder.build().level(), LogLevel::Warn);

        std::env::set_var("NESTED_LOGGER_TEST_LEVEL_BAD", "loud");
        let err = Logger::builder()
            .level_from_env("NESTED_LOGGER_TEST_LEVEL_BAD")
            .err()
            .expect("invalid level rejected");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let logger = Logger::builder()
            .level(LogLevel::Error)
            .level_from_env("NESTED_LOGGER_TEST_LEVEL_UNSET")
            .unwrap()
            .build();
        assert_eq!(logger.level(), LogLevel::Error);
    }
}
