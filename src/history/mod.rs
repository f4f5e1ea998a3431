//! Navigation history core.
//!
//! This module contains the parts with real state-machine behavior:
//!
//! - `collator`: decides whether two positions count as one history stop
//! - `state`: the back/forward stacks and live pointer for one document
//! - `store`: the per-document partitioning and persisted-blob handling
//! - `cross_update`: detection of stack mutations made by other actors
//! - `engine`: the orchestrator exposed to UI commands and selection hooks
//! - `error`: the recoverable error taxonomy

pub mod collator;
pub mod cross_update;
pub mod engine;
pub mod error;
pub mod state;
pub mod store;
