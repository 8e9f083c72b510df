//! Handler trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// A destination attached to a [`Logger`](super::Logger).
///
/// `emit` must not fail observably: implementations deal with their own
/// formatting and I/O errors.
pub trait Handler: Send + Sync {
    fn emit(&self, record: &LogRecord);
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
