//! Installation and replacement of the console handler
//!
//! A [`LoggerLifecycle`] owns a named [`Logger`] and at most one
//! [`StreamHandler`] attached to it. Each [`init`](LoggerLifecycle::init)
//! swaps in a freshly configured handler, so repeated initialization (for
//! example on configuration reload) never stacks duplicate output.
//!
//! Most programs use the process-wide instance through [`init_logger`] and
//! [`logger`]; embedders and tests can create their own.

use super::{
    error::Result,
    log_level::LogLevel,
    logger::{HandlerId, Logger},
};
use crate::handlers::{StreamHandler, TargetStream};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the logger behind [`global`]
pub const DEFAULT_LOGGER_NAME: &str = "console";

static GLOBAL: Lazy<LoggerLifecycle> = Lazy::new(|| LoggerLifecycle::new(DEFAULT_LOGGER_NAME));

/// Options accepted by [`LoggerLifecycle::init`]
///
/// Deserializable so a CLI or config layer can load it directly; missing
/// fields take their defaults.
///
/// # Example
///
/// ```
/// use rust_console_logger::InitOptions;
///
/// let options = InitOptions::new().debug(true).timestamp(true);
/// assert!(!options.use_stdout);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitOptions {
    /// Never emit color escape codes
    pub no_color: bool,
    /// Write to standard output instead of standard error
    pub use_stdout: bool,
    /// Lower the threshold from INFO to DEBUG
    pub debug: bool,
    /// Prefix messages with `[<timestamp>] `
    pub timestamp: bool,
    /// Lock file shared with other processes writing to the same console
    pub lock_file: Option<PathBuf>,
}

impl InitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_stdout(mut self, use_stdout: bool) -> Self {
        self.use_stdout = use_stdout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn lock_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_file = Some(path.into());
        self
    }

    pub fn min_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    fn build_handler(&self, stream: Box<dyn TargetStream>) -> Result<StreamHandler> {
        let handler = StreamHandler::from_boxed(stream)
            .with_no_color(self.no_color)
            .with_timestamp(self.timestamp);

        match &self.lock_file {
            None => Ok(handler),
            #[cfg(feature = "process-lock")]
            Some(path) => handler.with_lock_file(path.clone()),
            #[cfg(not(feature = "process-lock"))]
            Some(_) => Err(super::error::LoggerError::config(
                "InitOptions",
                "lock_file requires the `process-lock` feature",
            )),
        }
    }
}

struct Installed {
    id: HandlerId,
    handler: Arc<StreamHandler>,
}

pub struct LoggerLifecycle {
    logger: Arc<Logger>,
    installed: Mutex<Option<Installed>>,
}

impl LoggerLifecycle {
    pub fn new(logger_name: impl Into<String>) -> Self {
        Self {
            logger: Arc::new(Logger::new(logger_name)),
            installed: Mutex::new(None),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// The handler currently attached by this lifecycle, if any
    pub fn installed(&self) -> Option<Arc<StreamHandler>> {
        self.installed
            .lock()
            .as_ref()
            .map(|installed| Arc::clone(&installed.handler))
    }

    /// Replace the installed handler with one writing to stdout or stderr.
    pub fn init(&self, options: &InitOptions) -> Result<()> {
        let stream: Box<dyn TargetStream> = if options.use_stdout {
            Box::new(io::stdout())
        } else {
            Box::new(io::stderr())
        };
        self.init_with_stream(options, stream)
    }

    /// Replace the installed handler with one writing to `stream`.
    ///
    /// `use_stdout` is ignored. If the new handler cannot be built the
    /// previous one stays installed.
    pub fn init_with_stream(
        &self,
        options: &InitOptions,
        stream: Box<dyn TargetStream>,
    ) -> Result<()> {
        let mut installed = self.installed.lock();
        let handler = Arc::new(options.build_handler(stream)?);

        let previous = installed.take().map(|previous| previous.id);
        let id = self.logger.replace_handler(previous, handler.clone());
        self.logger.set_min_level(options.min_level());
        *installed = Some(Installed { id, handler });
        Ok(())
    }
}

/// The process-wide lifecycle for the logger named [`DEFAULT_LOGGER_NAME`]
pub fn global() -> &'static LoggerLifecycle {
    &GLOBAL
}

/// Install (or reinstall) the process-wide console handler
pub fn init_logger(options: &InitOptions) -> Result<()> {
    GLOBAL.init(options)
}

/// The process-wide logger
pub fn logger() -> &'static Logger {
    GLOBAL.logger()
}
