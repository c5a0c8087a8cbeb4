//! Demo configuration, loaded from an optional TOML file.
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! overrides:
//!
//! ```toml
//! [blend]
//! color = [0.0, 0.0, 0.0, 1.0]
//! period_secs = 6.0
//!
//! [[bubbles]]
//! center = [400.0, 300.0]
//! radius = 150.0
//! factor = 0.4
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use timewarp_engine::coords::Vec2;
use timewarp_engine::effect::{BlendParameters, BubbleRegion, BubbleSet, Rgba, MAX_BUBBLES};

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// `env_logger` filter; `RUST_LOG` is used when absent.
    pub log_filter: Option<String>,
    pub window: WindowOptions,
    pub blend: BlendOptions,
    pub mesh: MeshOptions,
    pub source: SourceOptions,
    pub cursor: CursorBubbleOptions,
    pub bubbles: Vec<BubbleOptions>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub clear_color: [f32; 4],
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "timewarp".to_string(),
            width: 960.0,
            height: 640.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlendOptions {
    pub color: [f32; 4],
    /// Fixed progress, used when `period_secs` is absent.
    pub progress: f32,
    /// Animates progress 0 → 1 → 0 over this many seconds.
    pub period_secs: Option<f32>,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            color: [0.05, 0.05, 0.1, 1.0],
            progress: 0.0,
            period_secs: Some(8.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    pub columns: u32,
    pub rows: u32,
    pub color: [f32; 4],
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            columns: 32,
            rows: 20,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    /// Image blitted behind the overlay; a checkerboard when absent.
    pub image: Option<PathBuf>,
    pub checker_cell: u32,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self { image: None, checker_cell: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CursorBubbleOptions {
    pub enabled: bool,
    pub radius: f32,
    pub factor: f32,
}

impl Default for CursorBubbleOptions {
    fn default() -> Self {
        Self { enabled: true, radius: 90.0, factor: 0.3 }
    }
}

/// One static bubble. Radius is un-squared here.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BubbleOptions {
    pub center: [f32; 2],
    pub radius: f32,
    pub factor: f32,
}

impl Default for BubbleOptions {
    fn default() -> Self {
        Self { center: [0.0, 0.0], radius: 0.0, factor: 1.0 }
    }
}

impl From<BubbleOptions> for BubbleRegion {
    fn from(b: BubbleOptions) -> Self {
        BubbleRegion::with_radius(Vec2::from(b.center), b.radius, b.factor)
    }
}

impl DemoConfig {
    /// Loads a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Built-in scene used when no bubbles are configured.
    pub fn default_bubbles() -> Vec<BubbleOptions> {
        vec![
            BubbleOptions { center: [300.0, 260.0], radius: 160.0, factor: 0.5 },
            BubbleOptions { center: [420.0, 330.0], radius: 120.0, factor: 0.5 },
            BubbleOptions { center: [700.0, 380.0], radius: 180.0, factor: 2.5 },
            BubbleOptions { center: [180.0, 500.0], radius: 90.0, factor: 0.1 },
        ]
    }

    /// Static bubbles as a set, leaving one slot free for the cursor bubble.
    pub fn bubble_set(&self) -> BubbleSet {
        let source = if self.bubbles.is_empty() {
            Self::default_bubbles()
        } else {
            self.bubbles.clone()
        };

        let limit = if self.cursor.enabled { MAX_BUBBLES - 1 } else { MAX_BUBBLES };
        if source.len() > limit {
            log::warn!("{} bubbles configured, keeping the first {limit}", source.len());
        }

        BubbleSet::from_regions(source.into_iter().take(limit).map(BubbleRegion::from))
    }

    /// Blend parameters at `elapsed` seconds.
    pub fn blend_at(&self, elapsed: f32) -> BlendParameters {
        let progress = match self.blend.period_secs {
            Some(period) if period > 0.0 => triangle_wave(elapsed / period),
            _ => self.blend.progress,
        };
        BlendParameters {
            blend_color: Rgba::from_array(self.blend.color),
            blend_progress: progress,
        }
    }
}

/// 0 at integer phases, 1 at half phases, linear in between.
fn triangle_wave(phase: f32) -> f32 {
    1.0 - (2.0 * phase.rem_euclid(1.0) - 1.0).abs()
}
