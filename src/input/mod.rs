//! Pointer-driven interaction: tools, gestures, and the central state machine.

pub mod compass;
pub mod paste;
pub mod state;
pub mod tool;

pub use compass::{Compass, CompassState};
pub use paste::{PasteSession, PasteStage};
pub use state::{InputState, POINT_RADIUS};
pub use tool::{CompassMode, PenMode, SIZE_SCALE_DIVISOR, Tool, ToolSettings};
