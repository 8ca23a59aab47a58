//! Session persistence: saving and restoring board contents across runs.
//!
//! The on-disk format is a versioned JSON document holding the PNG-encoded
//! persistent layer, the anchor-point list, and a small tool-state snapshot,
//! optionally gzip-compressed. Writes are atomic (temp file + rename) and
//! guarded by an advisory file lock so concurrent instances cannot corrupt
//! each other's sessions.

pub mod options;
pub mod snapshot;
pub mod storage;

#[cfg(test)]
mod tests;

pub use options::{CompressionMode, SessionOptions, options_from_config};
pub use snapshot::{
    BoardSnapshot, ToolStateSnapshot, apply_snapshot, load_snapshot, save_snapshot,
    snapshot_from_state,
};
pub use storage::{ClearOutcome, SessionInspection, clear_session, inspect_session};
