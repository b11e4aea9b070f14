//! Floor-plan render library
//!
//! Renderer abstraction for the floor-plan editor. [`DisplayListRenderer`]
//! turns a scene into backend-agnostic draw commands that a canvas, GPU or
//! test harness can replay.

mod display_list;
pub mod palette;
mod renderer;

pub use display_list::{DisplayList, DisplayListRenderer, DrawCommand, DrawItem, Layer};
pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
