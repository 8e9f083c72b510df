//! Named logger with a severity threshold and attached handlers

use super::{error::Result, handler::Handler, log_level::LogLevel, log_record::LogRecord};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one attachment of a handler to a logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    handlers: RwLock<Vec<(HandlerId, Arc<dyn Handler>)>>,
    next_id: AtomicU64,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LogLevel::Info),
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, handler));
        id
    }

    /// Detach a handler. Once this returns, no record is dispatched to it.
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(attached, _)| *attached != id);
        handlers.len() != before
    }

    /// Detach `previous` (if still attached) and attach `handler` in one step,
    /// so every concurrent record reaches exactly one of the two.
    pub fn replace_handler(
        &self,
        previous: Option<HandlerId>,
        handler: Arc<dyn Handler>,
    ) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write();
        if let Some(previous) = previous {
            handlers.retain(|(attached, _)| *attached != previous);
        }
        handlers.push((id, handler));
        id
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level.read().clone()
    }

    pub fn is_enabled_for(&self, level: &LogLevel) -> bool {
        *level >= *self.min_level.read()
    }

    /// Dispatch a record to every attached handler.
    ///
    /// Records below the threshold are dropped before a record is built. The
    /// handler list stays read-locked during dispatch, so a concurrent
    /// `remove_handler` waits for in-flight records to finish.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled_for(&level) {
            return;
        }

        let record = LogRecord::new(level, message).with_logger(self.name.as_str());
        for (_, handler) in self.handlers.read().iter() {
            handler.emit(&record);
        }
    }

    pub fn flush(&self) -> Result<()> {
        for (_, handler) in self.handlers.read().iter() {
            handler.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &*self.min_level.read())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recording {
        records: Mutex<Vec<(LogLevel, String, String)>>,
    }

    impl Handler for Recording {
        fn emit(&self, record: &LogRecord) {
            self.records.lock().push((
                record.level.clone(),
                record.logger.clone(),
                record.message.clone(),
            ));
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[test]
    fn test_threshold_filters_before_dispatch() {
        let logger = Logger::new("build");
        let recording = Arc::new(Recording::default());
        logger.add_handler(recording.clone());

        logger.debug("hidden");
        logger.info("shown");
        logger.set_min_level(LogLevel::Debug);
        logger.debug("now shown");

        let records = recording.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (LogLevel::Info, "build".into(), "shown".into()));
        assert_eq!(records[1].2, "now shown");
    }

    #[test]
    fn test_custom_level_respects_threshold() {
        let logger = Logger::new("build");
        let recording = Arc::new(Recording::default());
        logger.add_handler(recording.clone());

        logger.log(LogLevel::custom("TRACE", 5), "below debug");
        logger.log(LogLevel::custom("NOTICE", 25), "above info");

        let records = recording.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].2, "above info");
    }

    #[test]
    fn test_remove_handler() {
        let logger = Logger::new("build");
        let recording = Arc::new(Recording::default());
        let id = logger.add_handler(recording.clone());
        assert_eq!(logger.handler_count(), 1);

        assert!(logger.remove_handler(id));
        assert!(!logger.remove_handler(id));
        logger.error("nobody listening");

        assert_eq!(logger.handler_count(), 0);
        assert!(recording.records.lock().is_empty());
    }

    #[test]
    fn test_replace_handler() {
        let logger = Logger::new("build");
        let old = Arc::new(Recording::default());
        let new = Arc::new(Recording::default());
        let old_id = logger.add_handler(old.clone());

        let new_id = logger.replace_handler(Some(old_id), new.clone());
        logger.info("routed");

        assert_ne!(old_id, new_id);
        assert_eq!(logger.handler_count(), 1);
        assert!(old.records.lock().is_empty());
        assert_eq!(new.records.lock().len(), 1);
    }

    #[test]
    fn test_every_handler_receives_record() {
        let logger = Logger::new("build");
        let first = Arc::new(Recording::default());
        let second = Arc::new(Recording::default());
        logger.add_handler(first.clone());
        logger.add_handler(second.clone());

        logger.warning("twice");

        assert_eq!(first.records.lock().len(), 1);
        assert_eq!(second.records.lock().len(), 1);
    }
}
