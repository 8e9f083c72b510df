//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::cell::RefCell;

// Thread-local cache for the thread label to avoid repeated allocations
thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Thread name if set, otherwise the debug form of its id
fn thread_label() -> String {
    THREAD_LABEL_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let current = std::thread::current();
                current
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("{:?}", current.id()))
            })
            .clone()
    })
}

/// One log event, created at the call site and handed to handlers by reference.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub logger: String,
    pub thread: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            logger: String::new(),
            thread: thread_label(),
        }
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    /// Override the creation time, mostly useful for reproducible output
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_thread_label() {
        let record = std::thread::Builder::new()
            .name("worker-1".into())
            .spawn(|| LogRecord::new(LogLevel::Info, "hello"))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(record.thread, "worker-1");
    }

    #[test]
    fn test_message_is_kept_verbatim() {
        let record = LogRecord::new(LogLevel::Warning, "line one\nline two").with_logger("console");
        assert_eq!(record.message, "line one\nline two");
        assert_eq!(record.logger, "console");
    }
}
