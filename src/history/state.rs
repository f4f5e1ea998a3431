//! Per-document history state.

use super::collator::Collator;
use super::error::{Direction, HistoryError};
use crate::position::Position;

/// Back/forward stacks and the live pointer for exactly one document.
///
/// The history is kept as two stacks: going back transfers a record from the
/// back stack to the forward stack, going forward transfers it the other
/// way. `current` is the live pointer - where the user is right now - and is
/// never simultaneously an entry on top of either stack.
#[derive(Debug, Clone, Default)]
pub struct DocumentHistory {
    back: Vec<Position>,
    forward: Vec<Position>,
    current: Option<Position>,
}

impl DocumentHistory {
    /// Creates an empty history: no stacks, no position observed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from previously persisted parts.
    pub fn from_parts(
        back: Vec<Position>,
        forward: Vec<Position>,
        current: Option<Position>,
    ) -> Self {
        Self {
            back,
            forward,
            current,
        }
    }

    /// Registers a newly observed selection position.
    ///
    /// The first observation only sets the live pointer. A position that
    /// collates with the live pointer replaces it in place, so browsing one
    /// passage never grows the stacks. A non-collating position pushes the
    /// old pointer onto the back stack (skipped when the back top already
    /// collates with it, to avoid duplicate-looking stops) and becomes the
    /// new pointer; if it re-enters territory the forward stack was
    /// tracking, that stale forward top is dropped.
    pub fn log(&mut self, new: Position, collator: &Collator, max_records: usize) {
        let current = match self.current.take() {
            Some(current) => current,
            None => {
                self.current = Some(new);
                return;
            }
        };

        if collator.should_collate(&new, &current) {
            self.current = Some(new);
            return;
        }

        let top_collates = self
            .back
            .last()
            .map_or(false, |top| collator.should_collate(top, &current));
        if !top_collates {
            self.back.push(current);
            Self::evict(&mut self.back, max_records);
        }

        if self
            .forward
            .last()
            .map_or(false, |top| collator.should_collate(&new, top))
        {
            self.forward.pop();
        }

        self.current = Some(new);
    }

    /// Moves one step back through history.
    ///
    /// Pops the back stack into the live pointer and pushes the old pointer
    /// onto the forward stack. Returns the position to select, or
    /// `NoHistory` (with no state change) when the back stack is empty.
    pub fn go_back(&mut self, max_records: usize) -> Result<Position, HistoryError> {
        let target = self.back.pop().ok_or(HistoryError::NoHistory {
            direction: Direction::Back,
        })?;
        if let Some(current) = self.current.take() {
            self.forward.push(current);
            Self::evict(&mut self.forward, max_records);
        }
        self.current = Some(target.clone());
        Ok(target)
    }

    /// Moves one step forward through history; mirror of [`Self::go_back`].
    pub fn go_forward(&mut self, max_records: usize) -> Result<Position, HistoryError> {
        let target = self.forward.pop().ok_or(HistoryError::NoHistory {
            direction: Direction::Forward,
        })?;
        if let Some(current) = self.current.take() {
            self.back.push(current);
            Self::evict(&mut self.back, max_records);
        }
        self.current = Some(target.clone());
        Ok(target)
    }

    /// Clears all records and forgets the live pointer.
    pub fn clear(&mut self) {
        self.back.clear();
        self.forward.clear();
        self.current = None;
    }

    /// FIFO truncation: dropping the oldest entry keeps the newest stops.
    fn evict(stack: &mut Vec<Position>, max_records: usize) {
        while stack.len() > max_records {
            stack.remove(0);
        }
    }

    /// The live pointer, if any position has been observed.
    pub fn current(&self) -> Option<&Position> {
        self.current.as_ref()
    }

    /// Returns true if going back is possible.
    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    /// Returns true if going forward is possible.
    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Number of back-stack records.
    pub fn back_len(&self) -> usize {
        self.back.len()
    }

    /// Number of forward-stack records.
    pub fn forward_len(&self) -> usize {
        self.forward.len()
    }

    /// The back-stack entries, oldest first.
    pub fn back_records(&self) -> &[Position] {
        &self.back
    }

    /// The forward-stack entries, oldest first.
    pub fn forward_records(&self) -> &[Position] {
        &self.forward
    }

    /// The most recent `n` back-stack records, oldest first. Diagnostics
    /// helper.
    pub fn recent(&self, n: usize) -> &[Position] {
        let start = self.back.len().saturating_sub(n);
        &self.back[start..]
    }

    /// Returns true if nothing has been recorded or observed.
    pub fn is_empty(&self) -> bool {
        self.back.is_empty() && self.forward.is_empty() && self.current.is_none()
    }

    /// Consumes the history into its persistable parts.
    pub fn into_parts(self) -> (Vec<Position>, Vec<Position>, Option<Position>) {
        (self.back, self.forward, self.current)
    }
}
