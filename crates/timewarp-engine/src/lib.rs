//! Timewarp engine crate.
//!
//! Owns the platform + GPU runtime pieces and the time-bubble effect:
//! - `effect`: CPU reference of the per-vertex / per-fragment math
//! - `render`: wgpu renderers running the same math in WGSL

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod effect;
pub mod render;
