// Rust guideline compliant 2026-02-06

//! Progress reporting utilities for long-running CLI operations.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe progress reporter that emits periodic updates on stderr.
///
/// Workers call [`ProgressReporter::tick`] once per item; every `interval`
/// items a line is printed.
pub struct ProgressReporter {
    label: String,
    total: Option<usize>,
    interval: usize,
    done: AtomicUsize,
    enabled: bool,
}

impl ProgressReporter {
    /// Creates a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `label` - Label to include in progress messages
    /// * `total` - Optional total count for the operation
    /// * `interval` - Report every N items (minimum 1)
    /// * `enabled` - Whether anything is printed at all
    ///
    /// # Returns
    ///
    /// A new ProgressReporter instance.
    pub fn new(label: &str, total: Option<usize>, interval: usize, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            total,
            interval: interval.max(1),
            done: AtomicUsize::new(0),
            enabled,
        }
    }

    /// Records one finished item and reports at the configured interval.
    ///
    /// # Returns
    ///
    /// The number of items finished so far.
    pub fn tick(&self) -> usize {
        let current = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.enabled && current % self.interval == 0 {
            eprintln!("{}", self.message(current));
        }
        current
    }

    /// Reports completion for the operation.
    pub fn finish(&self) {
        if self.enabled {
            let current = self.done.load(Ordering::Relaxed);
            eprintln!("{} complete", self.message(current));
        }
    }

    fn message(&self, current: usize) -> String {
        match self.total {
            Some(total) => format!("{}: {} / {}", self.label, current, total),
            None => format!("{}: {}", self.label, current),
        }
    }
}
