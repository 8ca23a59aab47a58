//! draftboard is an interactive drafting surface: freehand pen strokes,
//! snapped ruler segments, compass circles and arcs with a lockable radius,
//! rectangular and freehand erasing, lasso cut/move/paste with anchor
//! migration, and a bounded undo/redo history over full-board snapshots.
//!
//! The crate is display-agnostic. A host shell feeds pointer events into
//! [`input::InputState`] and presents the flattened output of
//! [`draw::Compositor`]; clipboard access and image decoding likewise stay
//! on the host side, which hands pre-decoded bitmaps to
//! [`input::InputState::begin_paste`].

pub mod config;
pub mod draw;
pub mod error;
pub mod history;
pub mod input;
pub mod lasso;
pub mod session;
pub mod snap;
pub mod util;

pub use config::Config;
pub use draw::{Color, Compositor, Layer};
pub use error::{BoardError, Result};
pub use history::{History, Snapshot};
pub use input::{CompassMode, InputState, PenMode, Tool, ToolSettings};
pub use lasso::LassoEngine;
pub use snap::{SNAP_DISTANCE, SnapIndex};
pub use util::{Point, Rect};
