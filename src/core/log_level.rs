//! Log level definitions

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// The five standard levels carry fixed numeric severities (10 through 50).
/// `Custom` levels slot in anywhere on that scale and are never colorized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
    Custom { name: String, severity: u8 },
}

impl LogLevel {
    pub fn custom(name: impl Into<String>, severity: u8) -> Self {
        LogLevel::Custom {
            name: name.into(),
            severity,
        }
    }

    pub fn severity(&self) -> u8 {
        match self {
            LogLevel::Debug => 10,
            LogLevel::Info => 20,
            LogLevel::Warning => 30,
            LogLevel::Error => 40,
            LogLevel::Critical => 50,
            LogLevel::Custom { severity, .. } => *severity,
        }
    }

    /// Case-sensitive level name, as printed and as keyed in the color table
    pub fn name(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Custom { name, .. } => name,
        }
    }

    /// Foreground color for this level, or `None` if it is not in the color table.
    ///
    /// The lookup goes by name, so a custom level named exactly like a
    /// standard one shares its color.
    pub fn color(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self.name() {
            "WARNING" => Some(Yellow),
            "INFO" => Some(Green),
            "DEBUG" => Some(Blue),
            "CRITICAL" | "ERROR" => Some(Red),
            _ => None,
        }
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity()
            .cmp(&other.severity())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" | "FATAL" => Ok(LogLevel::Critical),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
