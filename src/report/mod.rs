//! Reporting channel for surfaced conditions.
//!
//! The engine never panics on recoverable conditions and its public
//! operations return no values; everything a caller might want to show the
//! user (or log) flows through a [`Reporter`] supplied at construction.

use crate::history::error::HistoryError;

/// Receives informational messages and recoverable errors from the engine.
pub trait Reporter {
    /// An informational message, e.g. "nothing selected".
    fn info(&self, message: &str);

    /// A recoverable error the caller may want to surface.
    fn error(&self, error: &HistoryError);
}

/// Reporter that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, error: &HistoryError) {
        tracing::warn!("{error}");
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _message: &str) {}

    fn error(&self, _error: &HistoryError) {}
}
