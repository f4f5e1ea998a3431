//! Position collation heuristic.

use crate::position::Position;

/// Decides whether two positions are close enough to be one history stop.
///
/// Small movements within a measure/staff window represent browsing the same
/// passage; collating them keeps the history from filling up with
/// near-duplicate stops.
#[derive(Debug, Clone, Copy)]
pub struct Collator {
    measure_threshold: u32,
    staff_threshold: u32,
}

impl Collator {
    /// Creates a collator with the given distance thresholds.
    pub fn new(measure_threshold: u32, staff_threshold: u32) -> Self {
        Self {
            measure_threshold,
            staff_threshold,
        }
    }

    /// Returns true if the two positions should be counted as one stop.
    ///
    /// True iff the measure distance and the staff distance are both within
    /// their thresholds. Symmetric in its arguments; the part name is
    /// ignored.
    pub fn should_collate(&self, a: &Position, b: &Position) -> bool {
        a.measure_number.abs_diff(b.measure_number) <= self.measure_threshold
            && a.staff_index.abs_diff(b.staff_index) <= self.staff_threshold
    }
}

impl Default for Collator {
    /// Thresholds of one measure and one staff in either direction.
    fn default() -> Self {
        Self::new(1, 1)
    }
}
