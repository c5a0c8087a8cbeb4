//! GPU rendering subsystem.
//!
//! Two independent passes, each owning its GPU resources (pipelines, buffers):
//! - [`BlitRenderer`]: full-screen source image blended toward a solid color
//! - [`BubbleRenderer`]: mesh tinted by the time-bubble overlay, added on top
//!
//! The WGSL in `shaders/` mirrors `crate::effect` line for line; change both
//! together.

mod blit;
mod bubble;
mod common;
mod ctx;
mod texture;
mod uniforms;

pub use blit::BlitRenderer;
pub use bubble::{BubbleFrame, BubbleRenderer};
pub use ctx::{RenderCtx, RenderTarget};
pub use texture::{checkerboard, load_image, SourceImage};
pub use uniforms::{BlendUniform, BubbleParamsUniform, BubbleRegionRaw, CameraUniform, ModelUniform};
