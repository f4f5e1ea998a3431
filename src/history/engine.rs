//! The orchestrating history engine.

use super::collator::Collator;
use super::cross_update::{CrossUpdate, CrossUpdateDetector};
use super::error::{Direction, HistoryError};
use super::state::DocumentHistory;
use super::store::HistoryStore;
use crate::config::NavConfig;
use crate::persist::StateStore;
use crate::position::Position;
use crate::report::Reporter;
use crate::resolver::PositionResolver;

/// Records selection positions and navigates back/forward through them.
///
/// The engine wires the collator, per-document stacks, store, and
/// cross-update detection together behind the four operations a host calls:
/// `log_position` (from selection-changed hooks), `go_back`/`go_forward`
/// (from UI commands), and `clear`. All operations run to completion
/// synchronously; recoverable conditions surface through the supplied
/// [`Reporter`] rather than as return values or panics.
///
/// After the engine itself moves the selection, a one-shot suppression flag
/// swallows the next `log_position` call, which the host will issue in
/// response to that very move. If the host never issues it, the next
/// genuine call is swallowed instead - a known false-negative window kept
/// for behavior parity with the established design.
pub struct HistoryEngine {
    collator: Collator,
    max_records: usize,
    store: HistoryStore,
    resolver: Box<dyn PositionResolver>,
    reporter: Box<dyn Reporter>,
    suppress_next_log: bool,
}

impl HistoryEngine {
    /// Builds an engine and loads any previously persisted history.
    ///
    /// A malformed persisted blob is reported and replaced with an empty
    /// mapping; construction itself never fails.
    pub fn new(
        config: &NavConfig,
        resolver: Box<dyn PositionResolver>,
        backend: Box<dyn StateStore>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        let mut store = HistoryStore::new(backend);
        store.set_read_only(config.read_only);
        if let Err(err) = store.load(config.repair_on_load) {
            reporter.error(&err);
        }
        Self {
            collator: Collator::new(config.measure_threshold, config.staff_threshold),
            max_records: config.max_records,
            store,
            resolver,
            reporter,
            suppress_next_log: false,
        }
    }

    /// Registers the host's current selection as a navigation event.
    ///
    /// Called by the host whenever the selection changes. With
    /// `trigger_cross_update_check` set, the observed position is first
    /// tested against signals left by other actors (see
    /// [`CrossUpdateDetector`]); an explained position replays the
    /// equivalent stack transition instead of being logged as new
    /// navigation.
    pub fn log_position(&mut self, trigger_cross_update_check: bool) {
        if self.suppress_next_log {
            tracing::debug!("ignoring selection change caused by this engine");
            self.suppress_next_log = false;
            return;
        }

        let position = match self.resolver.current_position() {
            Some(position) => position,
            None => {
                // Expected during normal use; informational only.
                self.reporter.info(&HistoryError::NoSelection.to_string());
                return;
            }
        };

        self.switch_to_current_document();

        if trigger_cross_update_check && self.reconcile_cross_update(&position) {
            return;
        }

        tracing::debug!(%position, "logging position");
        self.store
            .active_mut()
            .log(position, &self.collator, self.max_records);
        self.persist();
    }

    /// Moves the selection one history stop back.
    pub fn go_back(&mut self) {
        self.traverse(Direction::Back);
    }

    /// Moves the selection one history stop forward.
    pub fn go_forward(&mut self) {
        self.traverse(Direction::Forward);
    }

    /// Clears the active document's history. Other documents keep theirs.
    pub fn clear(&mut self) {
        self.switch_to_current_document();
        self.store.active_mut().clear();
        self.persist();
    }

    /// Switches observer mode on or off. Observer engines never persist.
    pub fn set_readonly(&mut self, read_only: bool) {
        self.store.set_read_only(read_only);
    }

    /// The active document's history, for host UI state.
    pub fn history(&self) -> &DocumentHistory {
        self.store.active()
    }

    /// A stored document's history, active or not.
    pub fn document_history(&self, key: &str) -> Option<&DocumentHistory> {
        self.store.document(key)
    }

    fn traverse(&mut self, direction: Direction) {
        self.switch_to_current_document();

        let result = match direction {
            Direction::Back => self.store.active_mut().go_back(self.max_records),
            Direction::Forward => self.store.active_mut().go_forward(self.max_records),
        };
        let target = match result {
            Ok(target) => target,
            Err(err) => {
                self.reporter.error(&err);
                return;
            }
        };

        // Persist the transition and the side-channel snapshot before
        // touching the selection, so another actor observing the resulting
        // selection change can explain it.
        self.persist();
        if let Err(err) = self.store.write_snapshot() {
            tracing::warn!("could not write cross-update snapshot: {err}");
        }

        tracing::debug!(%target, %direction, "selecting history stop");
        match self.resolver.select_position(&target) {
            Ok(()) => {
                // The host will notify us of the selection change we just
                // caused; swallow that one notification.
                self.suppress_next_log = true;
            }
            Err(err) => {
                // The stack transition stays committed; no notification
                // will arrive for a failed selection, so nothing is armed.
                self.reporter.error(&HistoryError::SelectionFailed {
                    position: target,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Tests an observed position against cross-update signals. Returns
    /// true when the event was consumed as a replayed transition.
    fn reconcile_cross_update(&mut self, position: &Position) -> bool {
        match self.store.take_snapshot() {
            Ok(Some(snapshot)) => {
                match CrossUpdateDetector::from_snapshot(&snapshot, self.store.active()) {
                    Ok(Some(update)) => {
                        self.replay(update);
                        true
                    }
                    Ok(None) => false,
                    Err(err) => {
                        // More divergence than one step explains; report and
                        // treat the event as ordinary navigation.
                        self.reporter.error(&err);
                        false
                    }
                }
            }
            Ok(None) => match CrossUpdateDetector::from_observed(position, self.store.active()) {
                Some(update) => {
                    self.replay(update);
                    true
                }
                None => false,
            },
            Err(err) => {
                self.reporter.error(&err);
                false
            }
        }
    }

    /// Applies an externally-caused transition to local state without
    /// re-selecting: the other actor already moved the selection.
    fn replay(&mut self, update: CrossUpdate) {
        let result = match update {
            CrossUpdate::WentBack => self.store.active_mut().go_back(self.max_records),
            CrossUpdate::WentForward => self.store.active_mut().go_forward(self.max_records),
        };
        match result {
            Ok(target) => {
                tracing::debug!(%target, ?update, "replayed cross-update");
                self.persist();
            }
            Err(err) => self.reporter.error(&err),
        }
    }

    fn switch_to_current_document(&mut self) {
        let key = self.resolver.current_document_key();
        self.store.switch_active(&key);
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save() {
            tracing::warn!("could not persist history: {err}");
        }
    }
}
