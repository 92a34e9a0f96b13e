//! Formatter trait and shared formatting configuration

use super::error::Result;
use super::log_record::{Caller, LogRecord};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Renders a record into the bytes written to the sink.
///
/// Implementations must produce exactly one line, terminated by `\n`, and
/// must not keep mutable state between calls: the logger may call `format`
/// from many threads.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}

/// Custom rendering of caller info. The returned text is written as is,
/// including any leading separator.
pub type CallerFormatter = Arc<dyn Fn(&Caller) -> Result<String> + Send + Sync>;

/// Options of the nested formatter.
///
/// # Examples
///
/// ```
/// use nested_logger::{FormatterConfig, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_timestamp_format(TimestampFormat::DateTime)
///     .with_fields_order(["component", "category"])
///     .with_hide_keys(true)
///     .with_trim_messages(true);
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Fields rendered first, in this order; the rest follow alphabetically.
    /// `None` sorts every field alphabetically.
    pub fields_order: Option<Vec<String>>,
    pub timestamp_format: TimestampFormat,
    /// Render `[value]` instead of `[key:value]`
    pub hide_keys: bool,
    pub no_colors: bool,
    /// Color only the level tag instead of level and fields
    pub no_fields_colors: bool,
    /// No space between fields
    pub no_fields_space: bool,
    /// `[WARNING]` instead of `[WARN]`
    pub show_full_level: bool,
    pub no_uppercase_level: bool,
    pub trim_messages: bool,
    /// Render caller info right after the timestamp
    pub caller_first: bool,
    #[serde(skip)]
    pub caller_formatter: Option<CallerFormatter>,
}

impl fmt::Debug for FormatterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterConfig")
            .field("fields_order", &self.fields_order)
            .field("timestamp_format", &self.timestamp_format)
            .field("hide_keys", &self.hide_keys)
            .field("no_colors", &self.no_colors)
            .field("no_fields_colors", &self.no_fields_colors)
            .field("no_fields_space", &self.no_fields_space)
            .field("show_full_level", &self.show_full_level)
            .field("no_uppercase_level", &self.no_uppercase_level)
            .field("trim_messages", &self.trim_messages)
            .field("caller_first", &self.caller_first)
            .field("caller_formatter", &self.caller_formatter.is_some())
            .finish()
    }
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing keys keep their defaults; a
    /// custom timestamp pattern chrono cannot render is rejected.
    ///
    /// ```
    /// use nested_logger::FormatterConfig;
    ///
    /// let config = FormatterConfig::from_json(r#"{"hide_keys": true, "fields_order": ["component"]}"#)
    ///     .unwrap();
    /// assert!(config.hide_keys);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.timestamp_format.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_fields_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Use a strftime-compatible timestamp pattern. An invalid pattern makes
    /// every `format` call fail; check it first with
    /// [`TimestampFormat::validate`] when it comes from user input.
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    #[must_use]
    pub fn with_hide_keys(mut self, hide: bool) -> Self {
        self.hide_keys = hide;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.no_colors = !colors;
        self
    }

    #[must_use]
    pub fn with_fields_colors(mut self, colors: bool) -> Self {
        self.no_fields_colors = !colors;
        self
    }

    #[must_use]
    pub fn with_fields_space(mut self, space: bool) -> Self {
        self.no_fields_space = !space;
        self
    }

    #[must_use]
    pub fn with_full_level(mut self, full: bool) -> Self {
        self.show_full_level = full;
        self
    }

    #[must_use]
    pub fn with_uppercase_level(mut self, uppercase: bool) -> Self {
        self.no_uppercase_level = !uppercase;
        self
    }

    #[must_use]
    pub fn with_trim_messages(mut self, trim: bool) -> Self {
        self.trim_messages = trim;
        self
    }

    #[must_use]
    pub fn with_caller_first(mut self, first: bool) -> Self {
        self.caller_first = first;
        self
    }

    #[must_use]
    pub fn with_caller_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Caller) -> Result<String> + Send + Sync + 'static,
    {
        self.caller_formatter = Some(Arc::new(formatter));
        self
    }

    /// Wrap this config in an Arc for sharing
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;

    #[test]
    fn test_default_config() {
        let config = FormatterConfig::default();
        assert!(config.fields_order.is_none());
        assert_eq!(config.timestamp_format, TimestampFormat::StampMilli);
        assert!(!config.hide_keys);
        assert!(!config.no_colors);
        assert!(!config.trim_messages);
        assert!(!config.caller_first);
        assert!(config.caller_formatter.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = FormatterConfig::new()
            .with_fields_order(["component"])
            .with_hide_keys(true)
            .with_colors(false)
            .with_fields_space(false)
            .with_full_level(true)
            .with_uppercase_level(false)
            .with_caller_first(true)
            .with_caller_formatter(|caller| Ok(format!(" <{}>", caller.line)));

        assert_eq!(config.fields_order, Some(vec!["component".to_string()]));
        assert!(config.hide_keys);
        assert!(config.no_colors);
        assert!(config.no_fields_space);
        assert!(config.show_full_level);
        assert!(config.no_uppercase_level);
        assert!(config.caller_first);
        assert!(config.caller_formatter.is_some());
    }

    #[test]
    fn test_from_json() {
        let config = FormatterConfig::from_json(
            r#"{
                "fields_order": ["component", "category"],
                "timestamp_format": "DateTime",
                "hide_keys": true,
                "no_colors": true,
                "trim_messages": true
            }"#,
        )
        .expect("valid config");

        assert_eq!(
            config.fields_order,
            Some(vec!["component".to_string(), "category".to_string()])
        );
        assert_eq!(config.timestamp_format, TimestampFormat::DateTime);
        assert!(config.hide_keys && config.no_colors && config.trim_messages);
        assert!(!config.caller_first);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(FormatterConfig::from_json("{\"hide_keys\": 3}").is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_timestamp_pattern() {
        let err = FormatterConfig::from_json(
            r#"{"no_colors": true, "timestamp_format": {"Custom": "%Q"}}"#,
        )
        .unwrap_err();

        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_debug_hides_closure() {
        let config = FormatterConfig::new().with_caller_formatter(|_| Ok(String::new()));
        let debug = format!("{:?}", config);
        assert!(debug.contains("caller_formatter: true"));
    }
}
