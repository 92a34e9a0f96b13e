//! Structured fields example
//!
//! Demonstrates field ordering, hidden keys and the logging macros.
//!
//! Run with: cargo run --example structured_fields

use nested_logger::prelude::*;
use nested_logger::{error, info};

fn main() -> Result<()> {
    println!("=== Nested Logger - Structured Fields Example ===\n");

    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .output(std::io::stdout())
        .formatter(NestedFormatter::new(
            FormatterConfig::new()
                .with_fields_order(["component", "category"])
                .with_timestamp_format(TimestampFormat::DateTime),
        ))
        .build();

    println!("1. Ordered fields:");
    logger
        .with_fields(
            Fields::new()
                .with_field("zone", "eu-west-1")
                .with_field("category", "rest")
                .with_field("component", "api")
                .with_field("latency_ms", 12.5),
        )
        .info("request served")?;

    println!("\n2. Fields added one by one:");
    logger
        .with_field("component", "db")
        .field("pool", "primary")
        .field("connections", 48)
        .field("healthy", true)
        .debug("pool status")?;

    println!("\n3. Hidden keys, fields without spaces:");
    logger.set_formatter(NestedFormatter::new(
        FormatterConfig::new()
            .with_hide_keys(true)
            .with_fields_space(false)
            .with_fields_order(["component"]),
    ));
    logger
        .with_field("component", "cache")
        .field("hit_ratio", 0.97)
        .info("cache stats")?;

    println!("\n4. Macros with format arguments:");
    logger.set_report_caller(true);
    info!(logger, "listening on port {}", 8080)?;
    error!(logger.with_field("component", "api"), "handler failed: {}", "timeout")?;

    logger.flush()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
