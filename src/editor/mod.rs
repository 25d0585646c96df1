//! Command processor
//!
//! Interprets editing commands against the region store and session state.
//! Each command runs to completion and is followed by one reconciliation pass
//! (drop a dangling selection, then mirror the active region's label), so
//! observers only ever see consistent snapshots.

mod command;
mod processor;
mod snapshot;

pub use command::{Command, Direction};
pub use processor::Editor;
pub use snapshot::EditorSnapshot;
