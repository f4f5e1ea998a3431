//! Error types for history operations.

use crate::position::Position;
use std::fmt;

/// Direction of a history traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Back => write!(f, "back"),
            Direction::Forward => write!(f, "forward"),
        }
    }
}

/// Recoverable conditions surfaced by the history engine.
///
/// None of these are fatal: every operation leaves the document history in a
/// structurally valid shape and the engine keeps accepting calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The host could not resolve the current selection to a position.
    NoSelection,
    /// A traversal was requested with nothing on its source stack.
    NoHistory { direction: Direction },
    /// The host failed to move the selection after the stacks were already
    /// updated; the committed stack mutation is not rolled back.
    SelectionFailed { position: Position, reason: String },
    /// Another actor's persisted snapshot diverges from local state by more
    /// than a single back/forward step could explain.
    CrossUpdateAnomaly { back_delta: i64, forward_delta: i64 },
    /// Persisted state failed to parse or contained invalid entries; the
    /// affected data is replaced with an empty equivalent.
    MalformedPersistedState { reason: String },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::NoSelection => {
                write!(f, "nothing selected that maps to a history position")
            }
            HistoryError::NoHistory { direction } => {
                write!(f, "no position to go {} to", direction)
            }
            HistoryError::SelectionFailed { position, reason } => {
                write!(f, "could not select {}: {}", position, reason)
            }
            HistoryError::CrossUpdateAnomaly {
                back_delta,
                forward_delta,
            } => write!(
                f,
                "persisted stacks diverged by more than one step (back {:+}, forward {:+})",
                back_delta, forward_delta
            ),
            HistoryError::MalformedPersistedState { reason } => {
                write!(f, "malformed persisted history state: {}", reason)
            }
        }
    }
}

impl std::error::Error for HistoryError {}
