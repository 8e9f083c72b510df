//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use rust_console_logger::prelude::*;
//! use rust_console_logger::info;
//!
//! let logger = Logger::new("build");
//!
//! // Basic logging
//! info!(logger, "Workflow started");
//!
//! // With format arguments
//! let jobs = 12;
//! info!(logger, "Scheduling {} jobs", jobs);
//! ```

/// Log a message with automatic formatting.
///
/// The message is only formatted if the level passes the logger's threshold.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::new("build");
/// use rust_console_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::custom("NOTICE", 25), "Exit code: {}", 1);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.is_enabled_for(&level) {
            $logger.log(level, format!($($arg)+))
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::new("build");
/// # logger.set_min_level(LogLevel::Debug);
/// use rust_console_logger::debug;
/// debug!(logger, "Resolved input: {}", "reads.fq");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::new("build");
/// use rust_console_logger::info;
/// info!(logger, "{} of {} steps done", 3, 10);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::new("build");
/// use rust_console_logger::warning;
/// warning!(logger, "Output {} is older than its input", "sorted.bam");
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::new("build");
/// use rust_console_logger::error;
/// error!(logger, "Job {} failed with exit code {}", 7, 1);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::new("build");
/// use rust_console_logger::critical;
/// critical!(logger, "Lost connection to {}", "cluster");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
