//! Detection of history mutations made by other actors.
//!
//! A second engine instance (or another feature manipulating selection
//! history) may go back or forward against the same persisted state. That
//! action reaches this engine only as an ordinary selection change, plus -
//! when the other actor cooperates - a side-channel snapshot it persisted
//! before moving the selection. The detector turns either signal into the
//! equivalent local stack transition so the two actors converge instead of
//! logging each other's navigation as new history.

use super::error::HistoryError;
use super::state::DocumentHistory;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// An externally-caused transition the local state should replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossUpdate {
    /// Another actor went one step back.
    WentBack,
    /// Another actor went one step forward.
    WentForward,
}

/// Side-channel snapshot of one document's history, persisted by an actor
/// just before it moves the selection.
///
/// Consumed at most once: whoever interprets a snapshot clears it from the
/// store, so it is never replayed twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Document the snapshot was taken for.
    pub document: String,
    pub back_stack: Vec<Position>,
    pub forward_stack: Vec<Position>,
    pub current: Option<Position>,
}

/// Reconciliation strategies for externally-caused stack mutations.
///
/// Two strategies coexist; the engine picks whichever signal the
/// environment provides. The snapshot comparison is authoritative when a
/// snapshot exists; the observed-position comparison is the fallback when
/// no side channel is available.
pub struct CrossUpdateDetector;

impl CrossUpdateDetector {
    /// Compares a consumed snapshot's stack lengths against local state.
    ///
    /// A back stack shorter by one (with the forward stack longer by one)
    /// means the other actor went back; the mirror delta means it went
    /// forward; equal lengths mean no cross-update happened. Any other
    /// divergence cannot be explained by a single step and is reported as
    /// an anomaly.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        local: &DocumentHistory,
    ) -> Result<Option<CrossUpdate>, HistoryError> {
        let back_delta = snapshot.back_stack.len() as i64 - local.back_len() as i64;
        let forward_delta = snapshot.forward_stack.len() as i64 - local.forward_len() as i64;
        match (back_delta, forward_delta) {
            (0, 0) => Ok(None),
            (-1, 1) => Ok(Some(CrossUpdate::WentBack)),
            (1, -1) => Ok(Some(CrossUpdate::WentForward)),
            _ => Err(HistoryError::CrossUpdateAnomaly {
                back_delta,
                forward_delta,
            }),
        }
    }

    /// Compares an observed position against the local stack tops.
    ///
    /// A position exactly equal to the back top is read as an
    /// externally-caused step back; equal to the forward top, a step
    /// forward; anything else is an ordinary navigation event.
    pub fn from_observed(position: &Position, local: &DocumentHistory) -> Option<CrossUpdate> {
        if local.back_records().last() == Some(position) {
            Some(CrossUpdate::WentBack)
        } else if local.forward_records().last() == Some(position) {
            Some(CrossUpdate::WentForward)
        } else {
            None
        }
    }
}
