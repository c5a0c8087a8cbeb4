//! Timewarp demo: time bubbles over a blended full-screen image.
//!
//! Usage: `timewarp-demo [config.toml]`. Escape quits.

mod app;
mod config;
mod mesh;

use std::path::PathBuf;

use anyhow::Result;
use timewarp_engine::device::GpuInit;
use timewarp_engine::logging::{init_logging, LoggingConfig};
use timewarp_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::app::DemoApp;
use crate::config::DemoConfig;

fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DemoConfig::load(&path)?,
        None => DemoConfig::default(),
    };

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let runtime = RuntimeConfig {
        title: config.window.title.clone(),
        initial_size: LogicalSize::new(config.window.width, config.window.height),
    };

    let app = DemoApp::new(config)?;
    Runtime::run(runtime, GpuInit::default(), app)
}
