//! Rendering primitives for the drawing surface (Cairo-based).
//!
//! This module defines the raster types the tools draw into:
//! - [`Color`]: RGBA color representation with hex parsing
//! - [`Layer`]: an ARGB32 raster layer (persistent canvas, preview, bitmaps)
//! - [`Compositor`]: merges background, canvas, and preview into the output
//! - `preview`: dashed guide rendering redrawn per interaction frame

pub mod color;
pub mod compositor;
pub mod layer;
pub mod preview;

pub use color::Color;
pub use compositor::Compositor;
pub use layer::Layer;
