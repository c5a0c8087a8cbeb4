//! Coordinate types shared across the effect and renderers.
//!
//! Canonical CPU space for the demo host:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The effect itself is space-agnostic: bubble centers and world positions
//! only need to share one space.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
