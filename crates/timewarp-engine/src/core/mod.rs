//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and applications
//! such as `timewarp-demo`.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
