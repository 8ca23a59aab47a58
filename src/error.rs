//! Core error type for drawing-surface operations.

use thiserror::Error;

/// Errors surfaced by the drawing core.
///
/// All of these are local and recoverable: the worst outcome of any failed
/// operation is a no-op or a discarded in-progress gesture, never corrupted
/// canvas state.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A Cairo drawing operation failed.
    #[error("render operation failed: {0}")]
    Render(#[from] cairo::Error),

    /// Raw pixel access to a surface was rejected (surface still referenced).
    #[error("surface pixel access failed: {0}")]
    SurfaceAccess(#[from] cairo::BorrowError),

    /// The requested surface dimensions are unusable.
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// Radius lock was requested before any circle or arc established a radius.
    #[error("cannot lock the compass radius before a circle or arc has been drawn")]
    RadiusUnset,

    /// A restored snapshot does not match the current surface dimensions.
    #[error("snapshot size {snapshot} does not match surface buffer size {surface}")]
    SnapshotMismatch { snapshot: usize, surface: usize },

    /// PNG encoding or decoding of a layer failed.
    #[error("png codec failed: {0}")]
    PngCodec(#[from] cairo::IoError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BoardError>;
