//! Selection positions within a score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a score that a selection can point at.
///
/// Positions are compared structurally for exact equality; the collation
/// heuristic in `history::collator` compares only the two numeric fields.
/// The optional part name is carried through for hosts that report it, but
/// never influences collation distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based staff index within the score.
    pub staff_index: u32,
    /// One-based measure number.
    pub measure_number: u32,
    /// Part name, when the host resolves one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

impl Position {
    /// Creates a position at the given staff and measure.
    pub fn new(staff_index: u32, measure_number: u32) -> Self {
        Self {
            staff_index,
            measure_number,
            part: None,
        }
    }

    /// Creates a position carrying a part name.
    pub fn with_part(staff_index: u32, measure_number: u32, part: impl Into<String>) -> Self {
        Self {
            staff_index,
            measure_number,
            part: Some(part.into()),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.part {
            Some(part) => write!(
                f,
                "m. {} / staff {} ({})",
                self.measure_number, self.staff_index, part
            ),
            None => write!(f, "m. {} / staff {}", self.measure_number, self.staff_index),
        }
    }
}
