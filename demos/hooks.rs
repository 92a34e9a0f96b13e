//! Hooks example
//!
//! Demonstrates forwarding records over a channel, a custom hook and
//! recovering from a panic-level record.
//!
//! Run with: cargo run --example hooks

use nested_logger::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

struct WarningCounter(Arc<AtomicUsize>);

impl Hook for WarningCounter {
    fn levels(&self) -> Vec<LogLevel> {
        vec![LogLevel::Warn]
    }

    fn fire(&self, _record: &LogRecord) -> Result<()> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        "warning_counter"
    }
}

fn main() -> Result<()> {
    println!("=== Nested Logger - Hooks Example ===\n");

    let warnings = Arc::new(AtomicUsize::new(0));
    let (channel_hook, receiver) = ChannelHook::unbounded();

    let logger = Arc::new(
        Logger::builder()
            .output(std::io::stdout())
            .hook(channel_hook.with_min_level(LogLevel::Error))
            .hook(WarningCounter(Arc::clone(&warnings)))
            .build(),
    );

    let collector = thread::spawn(move || {
        receiver
            .iter()
            .map(|record| format!("{} {}", record.level, record.message))
            .collect::<Vec<_>>()
    });

    println!("1. Logging from several threads:");
    let handles: Vec<_> = (0..3)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || -> Result<()> {
                logger.with_field("worker", worker).info("started")?;
                logger.with_field("worker", worker).warn("queue is slow")?;
                logger.with_field("worker", worker).error("job failed")?;
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked")?;
    }

    println!("\n2. Recovering from a panic-level record:");
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = logger.panic("state corrupted");
    }));
    if let Err(payload) = outcome {
        if let Some(message) = payload.downcast_ref::<String>() {
            println!("   recovered: {}", message);
        }
    }

    let metrics = logger.metrics().clone();
    drop(logger);
    let forwarded = collector.join().expect("collector thread panicked");

    println!("\nwarnings counted: {}", warnings.load(Ordering::Relaxed));
    println!("records forwarded: {:?}", forwarded);
    println!("records written: {}", metrics.written_count());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
