//! Basic logger usage example
//!
//! Demonstrates the default and standard layouts and level filtering.
//!
//! Run with: cargo run --example basic_usage

use nested_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Nested Logger - Basic Usage Example ===\n");

    // Default layout on stderr
    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;

    println!("\n2. Logging with a higher minimum level:");
    logger.set_level(LogLevel::Warn);
    logger.debug("This debug message is filtered")?;
    logger.info("This info message is filtered")?;
    logger.warn("This warning is shown")?;

    println!("\n3. The standard layout with caller info:");
    let standard = Logger::standard();
    standard.info("  surrounding whitespace is trimmed  ")?;
    standard
        .with_field("component", "scheduler")
        .warn("disk low")?;

    println!("\n4. Logging to stdout without colors:");
    let plain = Logger::builder()
        .output(std::io::stdout())
        .formatter(NestedFormatter::new(
            FormatterConfig::new()
                .with_colors(false)
                .with_full_level(true)
                .with_timestamp_format(TimestampFormat::Rfc3339),
        ))
        .build();
    plain.warn("Full level names and RFC 3339 timestamps")?;
    plain.flush()?;

    let metrics = logger.metrics();
    println!(
        "\nwritten: {}, filtered: {}",
        metrics.written_count(),
        metrics.filtered_count()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
