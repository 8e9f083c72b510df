//! Basic console logger usage
//!
//! Installs the process-wide handler, logs at every level, then reinstalls it
//! with different options.
//!
//! Run with: cargo run --example basic_usage
//! Compare with: cargo run --example basic_usage 2>&1 | cat

use rust_console_logger::prelude::*;
use rust_console_logger::{info, warning};

fn main() -> Result<()> {
    println!("=== Rust Console Logger - Basic Usage Example ===\n");

    println!("1. Default options (stderr, INFO and above):");
    init_logger(&InitOptions::new())?;
    logger().debug("This is a debug message (hidden)");
    logger().info("This is an info message");
    logger().warning("This is a warning message");
    logger().error("This is an error message");
    logger().critical("This is a critical message");
    logger().log(LogLevel::custom("PROGRESS", 25), "Custom levels are never colored");

    println!("\n2. Reinitialized with debug, timestamps and stdout:");
    init_logger(&InitOptions::new().debug(true).timestamp(true).use_stdout(true))?;
    logger().debug("This is a debug message (visible)");
    info!(logger(), "{} of {} steps done", 3, 10);
    warning!(logger(), "Handlers attached: {}", logger().handler_count());

    println!("\n3. Colors disabled:");
    init_logger(&InitOptions::new().no_color(true))?;
    logger().error("Plain error line");

    logger().flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
