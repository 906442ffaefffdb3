use std::collections::BTreeMap;
use std::fmt;

use crate::foundation::error::MotionError;

/// Laid-out position and size of one item along the bar's main axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Measurement {
    /// Item index.
    pub index: usize,
    /// Leading edge offset.
    pub offset: f64,
    /// Size along the main axis.
    pub extent: f64,
}

/// Result of [`MeasurementRegistry::report`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportStatus {
    /// Stored; still waiting for other items.
    Pending,
    /// Stored, and this report completed the set. The complete callback fired.
    Completed,
    /// Stored after the set had already completed. Nothing fired.
    AlreadyComplete,
    /// Ignored (index out of range or non-finite geometry).
    Rejected,
}

type CompleteCallback = Box<dyn FnMut(&[Measurement])>;

/// Collects per-item measurements arriving in any order and signals once when all
/// `expected_count` items have reported.
///
/// The latest report per index wins. The complete latch re-arms only on
/// [`MeasurementRegistry::reset`]; an expected count of zero never completes.
pub struct MeasurementRegistry {
    entries: BTreeMap<usize, Measurement>,
    expected: usize,
    armed: bool,
    on_complete: Option<CompleteCallback>,
}

impl MeasurementRegistry {
    /// Empty registry expecting `expected_count` items.
    pub fn new(expected_count: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            expected: expected_count,
            armed: true,
            on_complete: None,
        }
    }

    /// Register the one-shot complete callback, replacing any previous one.
    ///
    /// It receives the measurements ordered by index. If the set is already complete the
    /// callback is kept for the next cycle and not called now.
    pub fn on_complete(&mut self, f: impl FnMut(&[Measurement]) + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    /// Record a measurement for `index`.
    pub fn report(&mut self, index: usize, offset: f64, extent: f64) -> ReportStatus {
        if index >= self.expected {
            let err = MotionError::StaleMeasurement {
                index,
                expected: self.expected,
            };
            tracing::warn!(error = %err, "measurement ignored");
            return ReportStatus::Rejected;
        }
        if !offset.is_finite() || !extent.is_finite() {
            let err = MotionError::invalid_value(format!(
                "measurement {index} has non-finite geometry (offset {offset}, extent {extent})"
            ));
            tracing::warn!(error = %err, "measurement ignored");
            return ReportStatus::Rejected;
        }

        self.entries.insert(
            index,
            Measurement {
                index,
                offset,
                extent,
            },
        );
        tracing::trace!(index, offset, extent, received = self.entries.len(), expected = self.expected, "measurement stored");

        if self.entries.len() < self.expected {
            return ReportStatus::Pending;
        }
        if !self.armed {
            let err = MotionError::DuplicateCompletion {
                expected: self.expected,
            };
            tracing::debug!(error = %err, index, "measurement updated after completion");
            return ReportStatus::AlreadyComplete;
        }

        self.armed = false;
        tracing::debug!(expected = self.expected, "measurements complete");
        let snapshot = self.snapshot();
        if let Some(cb) = self.on_complete.as_mut() {
            cb(&snapshot);
        }
        ReportStatus::Completed
    }

    /// Drop every entry, set a new expected count and re-arm the latch.
    ///
    /// The complete callback stays registered.
    pub fn reset(&mut self, expected_count: usize) {
        tracing::debug!(
            previous = self.expected,
            expected = expected_count,
            dropped = self.entries.len(),
            "measurement registry reset"
        );
        self.entries.clear();
        self.expected = expected_count;
        self.armed = true;
    }

    /// Measurements ordered by index.
    pub fn snapshot(&self) -> Vec<Measurement> {
        self.entries.values().copied().collect()
    }

    /// Latest measurement for `index`.
    pub fn get(&self, index: usize) -> Option<Measurement> {
        self.entries.get(&index).copied()
    }

    /// Return `true` once the current cycle has completed.
    pub fn is_complete(&self) -> bool {
        !self.armed
    }

    /// Item count that completes a cycle.
    pub fn expected_count(&self) -> usize {
        self.expected
    }

    /// Number of distinct indices stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing has reported since the last reset.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MeasurementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementRegistry")
            .field("entries", &self.entries)
            .field("expected", &self.expected)
            .field("complete", &!self.armed)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/registry.rs"]
mod tests;
