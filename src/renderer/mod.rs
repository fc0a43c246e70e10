//! Rendering module
//!
//! `frame` builds a display list from game state; on the web `canvas`
//! paints it onto a Canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod frame;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use frame::{DrawCommand, build_frame};
