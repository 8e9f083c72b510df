//! # Rust Console Logger
//!
//! Human-readable console output for log records: severity colors on
//! terminals, optional timestamps, and line-atomic writes from any number of
//! threads (and, with a shared lock file, processes).
//!
//! ## Features
//!
//! - **Severity Colors**: DEBUG blue, INFO green, WARNING yellow, ERROR and CRITICAL red
//! - **Clean Pipes**: No escape codes when the stream is not a terminal
//! - **Atomic Lines**: One process-wide lock around every write and flush
//! - **Reinstallable**: `init_logger` swaps the handler instead of stacking another
//!
//! ```
//! use rust_console_logger::prelude::*;
//!
//! init_logger(&InitOptions::new().debug(true)).unwrap();
//! rust_console_logger::info!(logger(), "Building {} targets", 3);
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        global, init_logger, logger, Handler, HandlerId, HandlerMetrics, InitOptions, LogLevel,
        LogRecord, Logger, LoggerError, LoggerLifecycle, Result, TimestampFormat,
    };
    pub use crate::handlers::{CaptureStream, StreamHandler, TargetStream};
}

pub use crate::core::{
    global, init_logger, logger, Handler, HandlerId, HandlerMetrics, InitOptions, LogLevel,
    LogRecord, Logger, LoggerError, LoggerLifecycle, OutputLock, Result, TimestampFormat,
    DEFAULT_LOGGER_NAME,
};
pub use handlers::{CaptureStream, StreamHandler, TargetStream};
