//! Core logger types and traits

pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_lock;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use handler::Handler;
pub use lifecycle::{global, init_logger, logger, InitOptions, LoggerLifecycle, DEFAULT_LOGGER_NAME};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{HandlerId, Logger};
pub use metrics::HandlerMetrics;
pub use output_lock::{OutputGuard, OutputLock};
pub use timestamp::TimestampFormat;
