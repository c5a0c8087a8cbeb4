//! Time-bubble effect math.
//!
//! Pure CPU reference of everything the WGSL shaders in `render::shaders`
//! compute. Every function here is total: no `Result`, no panics. Malformed
//! host input (see [`ContractViolation`]) produces wrong-but-bounded output.
//!
//! Pipeline A (overlay): [`vertex_stage_a`] → [`fragment_stage_a`], which
//! calls [`evaluate_overlay`].
//! Pipeline B (blit): [`vertex_stage_b`] → [`fragment_stage_b`], which
//! calls [`composite`].

mod bubble;
mod color;
mod compositor;
mod math;
mod stages;

pub use bubble::{
    evaluate_overlay, overlay_for_time_scale, time_scale_at, BubbleRegion, BubbleSet,
    ContractViolation, MAX_BUBBLES, MAX_OVERLAY_OPACITY,
};
pub use color::Rgba;
pub use compositor::{blend_factor, composite, BlendParameters};
pub use math::{range_map, smoothstep};
pub use stages::{
    fragment_stage_a, fragment_stage_b, vertex_stage_a, vertex_stage_b, FragmentInput,
    FullscreenVertex, TransformSet, Vertex, FULLSCREEN_TRIANGLE,
};
