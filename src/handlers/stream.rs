//! Colorizing stream handler
//!
//! Writes one line per record to a single stream, colored by severity when the
//! stream is a terminal, optionally prefixed with a timestamp. Writes from all
//! stream handlers in the process are serialized through one shared lock.

use super::target::TargetStream;
use crate::core::{
    Handler, HandlerMetrics, LogRecord, LoggerError, OutputLock, Result, TimestampFormat,
};
use colored::Color;
use parking_lot::Mutex;
use std::io::{self, Write};

const RESET_SEQ: &str = "\x1b[0m";

/// Whether this platform's console understands ANSI escape codes
fn ansi_supported() -> bool {
    !cfg!(windows)
}

pub struct StreamHandler {
    stream: Mutex<Box<dyn TargetStream>>,
    name: String,
    is_tty: bool,
    no_color: bool,
    timestamp: bool,
    timestamp_format: TimestampFormat,
    terminator: String,
    lock: OutputLock,
    report_errors: bool,
    metrics: HandlerMetrics,
}

impl StreamHandler {
    /// Handler writing to `stream`; the terminal check happens here, once.
    pub fn new(stream: impl TargetStream + 'static) -> Self {
        Self::from_boxed(Box::new(stream))
    }

    /// Like [`new`](Self::new) for an already boxed stream.
    ///
    /// The stream is asked once whether it is a terminal; the answer holds for
    /// the lifetime of the handler, even if the stream is later redirected.
    pub fn from_boxed(stream: Box<dyn TargetStream>) -> Self {
        Self {
            name: stream.name().to_string(),
            is_tty: stream.is_tty(),
            stream: Mutex::new(stream),
            no_color: false,
            timestamp: false,
            timestamp_format: TimestampFormat::default(),
            terminator: "\n".to_string(),
            lock: OutputLock::shared(),
            report_errors: true,
            metrics: HandlerMetrics::new(),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    #[must_use]
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Prefix each message with `[<timestamp>] `
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// # Examples
    ///
    /// ```
    /// use rust_console_logger::handlers::{CaptureStream, StreamHandler};
    /// use rust_console_logger::TimestampFormat;
    ///
    /// let handler = StreamHandler::new(CaptureStream::new())
    ///     .with_timestamp(true)
    ///     .with_timestamp_format(TimestampFormat::Iso8601);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Text written after every line, `"\n"` by default
    #[must_use]
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    /// Whether swallowed errors are reported on standard error
    #[must_use]
    pub fn with_error_reporting(mut self, report_errors: bool) -> Self {
        self.report_errors = report_errors;
        self
    }

    /// Extend output exclusion to every process locking the same file
    #[cfg(feature = "process-lock")]
    pub fn with_lock_file(mut self, path: impl Into<std::path::PathBuf>) -> Result<Self> {
        self.lock = OutputLock::with_lock_file(path)?;
        Ok(self)
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }

    /// Render a record as it would be written, without the terminator.
    ///
    /// A stream that is not a terminal gets the bare message: no color and
    /// no timestamp.
    pub fn format(&self, record: &LogRecord) -> Result<String> {
        if !self.is_tty {
            return Ok(record.message.clone());
        }

        let mut out = String::with_capacity(record.message.len() + 48);
        match self.color_for(record) {
            Some(color) => {
                out.push_str("\x1b[");
                out.push_str(&color.to_fg_str());
                out.push('m');
                self.write_body(&mut out, record)?;
                out.push_str(RESET_SEQ);
            }
            None => self.write_body(&mut out, record)?,
        }
        Ok(out)
    }

    fn color_for(&self, record: &LogRecord) -> Option<Color> {
        if self.no_color || !ansi_supported() {
            return None;
        }
        record.level.color()
    }

    fn write_body(&self, out: &mut String, record: &LogRecord) -> Result<()> {
        if self.timestamp {
            out.push('[');
            self.timestamp_format
                .write_to(out, &record.timestamp)
                .map_err(|_| {
                    LoggerError::formatter(
                        "timestamp",
                        format!("cannot render {:?}", self.timestamp_format),
                    )
                })?;
            out.push_str("] ");
        }
        out.push_str(&record.message);
        Ok(())
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let _guard = self.lock.acquire()?;
        let mut stream = self.stream.lock();
        stream
            .write_all(line.as_bytes())
            .and_then(|()| stream.write_all(self.terminator.as_bytes()))
            .map_err(|e| LoggerError::io_operation("writing log line", self.name.as_str(), e))?;
        stream
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing stream", self.name.as_str(), e))
    }

    fn report(&self, error: &LoggerError) -> String {
        format!(
            "[LOGGER ERROR] Handler '{}' failed to emit record: {}",
            self.name, error
        )
    }

    fn handle_error(&self, error: &LoggerError) {
        self.metrics.record_failed();
        if self.report_errors {
            // Best effort: stderr itself may be the stream that just failed
            let _ = writeln!(io::stderr(), "{}", self.report(error));
        }
    }
}

impl Handler for StreamHandler {
    /// Format outside the lock, then write, terminate and flush under it.
    ///
    /// Formatting and I/O errors are counted and reported, never returned.
    /// A panic raised by the stream unwinds through here untouched; the
    /// output lock is released on the way out.
    fn emit(&self, record: &LogRecord) {
        let result = self.format(record).and_then(|line| self.write_line(&line));
        match result {
            Ok(()) => {
                self.metrics.record_emitted();
            }
            Err(e) => self.handle_error(&e),
        }
    }

    fn flush(&self) -> Result<()> {
        let _guard = self.lock.acquire()?;
        self.stream
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing stream", self.name.as_str(), e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandler")
            .field("name", &self.name)
            .field("is_tty", &self.is_tty)
            .field("no_color", &self.no_color)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use crate::handlers::CaptureStream;
    use chrono::{Local, TimeZone};

    fn record(level: LogLevel, message: &str) -> LogRecord {
        let at = Local
            .with_ymd_and_hms(2026, 10, 5, 9, 5, 3)
            .single()
            .expect("valid local time");
        LogRecord::new(level, message).with_timestamp(at)
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl TargetStream for BrokenPipe {
        fn is_tty(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "<broken>"
        }
    }

    #[test]
    fn test_colored_plain() {
        let handler = StreamHandler::new(CaptureStream::interactive());
        assert_eq!(
            handler.format(&record(LogLevel::Warning, "low disk")).unwrap(),
            "\x1b[33mlow disk\x1b[0m"
        );
    }

    #[test]
    fn test_colored_timestamp_inside_color_span() {
        let handler = StreamHandler::new(CaptureStream::interactive()).with_timestamp(true);
        assert_eq!(
            handler.format(&record(LogLevel::Error, "failed")).unwrap(),
            "\x1b[31m[Mon Oct  5 09:05:03 2026] failed\x1b[0m"
        );
    }

    #[test]
    fn test_uncolored_timestamp() {
        let handler = StreamHandler::new(CaptureStream::interactive())
            .with_no_color(true)
            .with_timestamp(true);
        assert_eq!(
            handler.format(&record(LogLevel::Info, "done")).unwrap(),
            "[Mon Oct  5 09:05:03 2026] done"
        );
    }

    #[test]
    fn test_pipe_suppresses_color() {
        let handler = StreamHandler::new(CaptureStream::new());
        assert!(!handler.is_tty());
        assert_eq!(handler.format(&record(LogLevel::Critical, "boom")).unwrap(), "boom");
    }

    #[test]
    fn test_pipe_drops_timestamp() {
        let handler = StreamHandler::new(CaptureStream::new()).with_timestamp(true);
        assert_eq!(handler.format(&record(LogLevel::Info, "done")).unwrap(), "done");

        let handler = handler.with_no_color(true);
        assert_eq!(handler.format(&record(LogLevel::Info, "done")).unwrap(), "done");
    }

    #[test]
    fn test_unknown_level_not_colored() {
        let handler = StreamHandler::new(CaptureStream::interactive());
        let notice = record(LogLevel::custom("NOTICE", 25), "heads up");
        assert_eq!(handler.format(&notice).unwrap(), "heads up");
    }

    #[test]
    fn test_emit_writes_terminated_line() {
        let capture = CaptureStream::interactive();
        let handler = StreamHandler::new(capture.clone()).with_terminator("\r\n");
        handler.emit(&record(LogLevel::Debug, "cache miss"));
        assert_eq!(capture.contents(), "\x1b[34mcache miss\x1b[0m\r\n");
        assert_eq!(handler.metrics().emitted_count(), 1);
    }

    #[test]
    fn test_write_error_is_swallowed_and_counted() {
        let handler = StreamHandler::new(BrokenPipe).with_error_reporting(false);
        handler.emit(&record(LogLevel::Info, "lost"));
        handler.emit(&record(LogLevel::Info, "lost again"));
        assert_eq!(handler.metrics().failed_count(), 2);
        assert_eq!(handler.metrics().emitted_count(), 0);
    }

    #[test]
    fn test_write_error_carries_context() {
        let handler = StreamHandler::new(BrokenPipe).with_error_reporting(false);
        let err = handler.write_line("lost").unwrap_err();
        assert!(matches!(
            &err,
            LoggerError::IoOperation { operation, message, .. }
                if operation == "writing log line" && message == "<broken>"
        ));
        assert_eq!(
            handler.report(&err),
            "[LOGGER ERROR] Handler '<broken>' failed to emit record: \
             IO error while writing log line: <broken>"
        );
    }

    #[test]
    fn test_bad_timestamp_format_is_swallowed() {
        let capture = CaptureStream::interactive();
        let handler = StreamHandler::new(capture.clone())
            .with_timestamp(true)
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()))
            .with_error_reporting(false);
        handler.emit(&record(LogLevel::Info, "never written"));
        assert_eq!(capture.contents(), "");
        assert_eq!(handler.metrics().failed_count(), 1);
    }

    #[test]
    fn test_error_does_not_stick() {
        let capture = CaptureStream::interactive();
        let handler = StreamHandler::new(capture.clone())
            .with_no_color(true)
            .with_timestamp(true)
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()))
            .with_error_reporting(false);
        handler.emit(&record(LogLevel::Info, "dropped"));

        let handler = handler.with_timestamp(false);
        handler.emit(&record(LogLevel::Info, "kept"));
        assert_eq!(capture.contents(), "kept\n");
    }
}
