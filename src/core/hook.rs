//! Hooks: side channels fired for every emitted record

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use crossbeam_channel::{Receiver, Sender, TrySendError};

/// A callback invoked for each record whose level it subscribes to.
///
/// Hooks run before the record is formatted and written. A failing hook is
/// reported on stderr and does not prevent the record from reaching the sink.
///
/// # Example
///
/// ```
/// use nested_logger::prelude::*;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct ErrorCounter(AtomicUsize);
///
/// impl Hook for ErrorCounter {
///     fn levels(&self) -> Vec<LogLevel> {
///         vec![LogLevel::Error, LogLevel::Fatal, LogLevel::Panic]
///     }
///
///     fn fire(&self, _record: &LogRecord) -> Result<()> {
///         self.0.fetch_add(1, Ordering::Relaxed);
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "error_counter"
///     }
/// }
/// ```
pub trait Hook: Send + Sync {
    /// Levels this hook fires for. Defaults to every level.
    fn levels(&self) -> Vec<LogLevel> {
        LogLevel::ALL.to_vec()
    }

    fn fire(&self, record: &LogRecord) -> Result<()>;

    fn name(&self) -> &str;
}

/// Forwards a copy of each record over a channel.
///
/// With a bounded channel a full queue drops the record and reports the hook
/// as failed rather than blocking the caller.
pub struct ChannelHook {
    sender: Sender<LogRecord>,
    levels: Vec<LogLevel>,
}

impl ChannelHook {
    /// Create a hook with an unbounded channel, returning the receiving end
    pub fn unbounded() -> (Self, Receiver<LogRecord>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    /// Create a hook with a bounded channel of `capacity` records
    pub fn bounded(capacity: usize) -> (Self, Receiver<LogRecord>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self::new(sender), receiver)
    }

    pub fn new(sender: Sender<LogRecord>) -> Self {
        Self {
            sender,
            levels: LogLevel::ALL.to_vec(),
        }
    }

    /// Only forward records at `min_level` or above
    #[must_use]
    pub fn with_min_level(mut self, min_level: LogLevel) -> Self {
        self.levels = LogLevel::ALL
            .into_iter()
            .filter(|level| *level >= min_level)
            .collect();
        self
    }
}

impl Hook for ChannelHook {
    fn levels(&self) -> Vec<LogLevel> {
        self.levels.clone()
    }

    fn fire(&self, record: &LogRecord) -> Result<()> {
        match self.sender.try_send(record.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(LoggerError::hook(self.name(), "channel full")),
            Err(TrySendError::Disconnected(_)) => {
                Err(LoggerError::hook(self.name(), "receiver dropped"))
            }
        }
    }

    fn name(&self) -> &str {
        "channel"
    }
}
