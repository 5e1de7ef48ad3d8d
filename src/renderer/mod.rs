//! Rendering
//!
//! `scene` builds a backend-agnostic draw list from the simulation state.
//! `canvas` draws it with the browser's Canvas 2D API (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCommand, build_scene};
