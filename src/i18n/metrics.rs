//! Localization metrics and observability module.
//!
//! This module tracks how language changes propagate: broadcasts, per-subscriber
//! deliveries and failures, rejected selections, and reads that fell back to the
//! "translation unavailable" sentinel.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Counters for the localization core.
///
/// The process-wide instance is reached through [`LocalizationMetrics::global`];
/// separate instances can be created for isolated measurements.
#[derive(Debug, Default)]
pub struct LocalizationMetrics {
    /// Number of accepted language changes that were broadcast
    broadcasts: AtomicUsize,

    /// Number of subscriber callbacks that completed successfully
    subscriber_updates: AtomicUsize,

    /// Number of subscriber callbacks that returned an error or panicked
    subscriber_failures: AtomicUsize,

    /// Number of language selections rejected by validation
    rejected_selections: AtomicUsize,

    /// Number of reads that returned the sentinel instead of a translation
    unavailable_reads: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<LocalizationMetrics> = OnceLock::new();

impl LocalizationMetrics {
    /// Create a fresh set of counters, all at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the global localization metrics instance.
    ///
    /// This method initializes the metrics on first call and returns a reference
    /// to the singleton instance on subsequent calls.
    pub fn global() -> &'static LocalizationMetrics {
        METRICS.get_or_init(LocalizationMetrics::new)
    }

    /// Record an accepted language change.
    pub fn record_broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscriber that took the new language.
    pub fn record_subscriber_update(&self) {
        self.subscriber_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscriber that failed during a broadcast.
    pub fn record_subscriber_failure(&self) {
        self.subscriber_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected language selection.
    pub fn record_rejected_selection(&self) {
        self.rejected_selections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a read that returned the sentinel.
    pub fn record_unavailable_read(&self) {
        self.unavailable_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcasts.load(Ordering::Relaxed)
    }

    pub fn subscriber_updates(&self) -> usize {
        self.subscriber_updates.load(Ordering::Relaxed)
    }

    pub fn subscriber_failures(&self) -> usize {
        self.subscriber_failures.load(Ordering::Relaxed)
    }

    pub fn rejected_selections(&self) -> usize {
        self.rejected_selections.load(Ordering::Relaxed)
    }

    pub fn unavailable_reads(&self) -> usize {
        self.unavailable_reads.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let updates = self.subscriber_updates();
        let failures = self.subscriber_failures();
        let deliveries = updates + failures;
        let delivery_success_rate = if deliveries > 0 {
            (updates as f64 / deliveries as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            broadcasts: self.broadcasts(),
            subscriber_updates: updates,
            subscriber_failures: failures,
            delivery_success_rate,
            rejected_selections: self.rejected_selections(),
            unavailable_reads: self.unavailable_reads(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.broadcasts.store(0, Ordering::Relaxed);
        self.subscriber_updates.store(0, Ordering::Relaxed);
        self.subscriber_failures.store(0, Ordering::Relaxed);
        self.rejected_selections.store(0, Ordering::Relaxed);
        self.unavailable_reads.store(0, Ordering::Relaxed);
    }
}

/// Metrics report containing current localization statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of accepted language changes
    pub broadcasts: usize,

    /// Number of successful subscriber updates
    pub subscriber_updates: usize,

    /// Number of failed subscriber updates
    pub subscriber_failures: usize,

    /// Share of subscriber updates that succeeded, as a percentage (0-100)
    pub delivery_success_rate: f64,

    /// Number of rejected language selections
    pub rejected_selections: usize,

    /// Number of sentinel reads
    pub unavailable_reads: usize,
}
