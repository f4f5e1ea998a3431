//! scorenav - navigation history for score editor selections.
//!
//! This crate implements browser-style back/forward navigation over the
//! selection positions of a score editor. Every time the user's selection
//! moves to a sufficiently distant position, the engine records a history
//! stop; `go_back`/`go_forward` then walk those stops, moving the editor's
//! live selection along the way.
//!
//! # Modules
//!
//! - `position`: the `Position` value type (staff index + measure number)
//! - `history`: the core engine - collation, per-document stacks,
//!   cross-update reconciliation, and the orchestrating `HistoryEngine`
//! - `persist`: the key-value blob boundary used for persisted state
//! - `resolver`: the boundary to the host editor's selection model
//! - `report`: the channel through which recoverable conditions surface
//! - `config`: thresholds and limits, loadable from a TOML file
//!
//! # Example
//!
//! ```
//! use scorenav::config::NavConfig;
//! use scorenav::history::collator::Collator;
//! use scorenav::position::Position;
//!
//! let config = NavConfig::default();
//! let collator = Collator::new(config.measure_threshold, config.staff_threshold);
//!
//! // Positions one measure apart browse the same passage.
//! let a = Position::new(0, 4);
//! let b = Position::new(0, 5);
//! assert!(collator.should_collate(&a, &b));
//! ```

pub mod config;
pub mod history;
pub mod persist;
pub mod position;
pub mod report;
pub mod resolver;
