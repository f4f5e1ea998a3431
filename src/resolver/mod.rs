//! Boundary to the host editor's selection model.

use crate::position::Position;
use anyhow::Result;

/// The narrow interface the engine needs from the host editor.
///
/// The engine never inspects host internals; everything it knows about the
/// editor flows through these three capabilities. An adapter outside this
/// crate maps them onto the host's actual object model.
pub trait PositionResolver {
    /// Resolves the current selection to a position.
    ///
    /// Returns `None` when nothing history-eligible is selected; this is an
    /// expected everyday outcome, not an error.
    fn current_position(&self) -> Option<Position>;

    /// Moves the editor's live selection to `position`.
    fn select_position(&mut self, position: &Position) -> Result<()>;

    /// Identifies the currently open document, for history partitioning.
    fn current_document_key(&self) -> String;
}
