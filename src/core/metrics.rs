//! Handler metrics for observability
//!
//! Counts emitted lines and swallowed emission failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by each handler
///
/// # Example
///
/// ```
/// use rust_console_logger::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_failed();
///
/// assert_eq!(metrics.emitted_count(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct HandlerMetrics {
    /// Lines fully written and flushed
    emitted_count: AtomicU64,

    /// Records lost to a formatting or I/O error
    failed_count: AtomicU64,
}

impl HandlerMetrics {
    pub const fn new() -> Self {
        Self {
            emitted_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted_count(&self) -> u64 {
        self.emitted_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    /// Record a successful emission, returning the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed emission, returning the previous count
    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage of records that failed to reach the stream
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = failed + self.emitted_count() as f64;
        if total == 0.0 {
            0.0
        } else {
            failed / total * 100.0
        }
    }
}
