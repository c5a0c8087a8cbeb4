//! Host-side mirrors of the WGSL uniform blocks.
//!
//! Field order, padding and sizes must match `shaders/bubble.wgsl` and
//! `shaders/blit.wgsl` exactly.

use bytemuck::{Pod, Zeroable};

use crate::effect::{BlendParameters, BubbleRegion, BubbleSet, TransformSet, MAX_BUBBLES};

/// `@group(0) @binding(0)` of the overlay pipeline (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub model_view: [[f32; 4]; 4],
}

/// `@group(0) @binding(1)` of the overlay pipeline (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ModelUniform {
    pub model_view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_transforms(t: &TransformSet) -> Self {
        Self { model_view: t.model_view.to_cols_array_2d() }
    }
}

impl ModelUniform {
    pub fn from_transforms(t: &TransformSet) -> Self {
        Self { model_view_proj: t.model_view_proj.to_cols_array_2d() }
    }
}

/// One region slot (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct BubbleRegionRaw {
    pub pos: [f32; 2],
    pub radius_squared: f32,
    pub time_scale_factor: f32,
}

impl From<BubbleRegion> for BubbleRegionRaw {
    fn from(r: BubbleRegion) -> Self {
        Self {
            pos: r.center.to_array(),
            radius_squared: r.radius_squared,
            time_scale_factor: r.time_scale_factor,
        }
    }
}

/// `@group(0) @binding(2)` of the overlay pipeline (1616 bytes).
///
///  offset  0  active_count  i32
///  offset  4  _pad          [f32; 3]
///  offset 16  regions       [BubbleRegionRaw; 100]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct BubbleParamsUniform {
    pub active_count: i32,
    pub _pad: [f32; 3],
    pub regions: [BubbleRegionRaw; MAX_BUBBLES],
}

impl BubbleParamsUniform {
    /// Packs every slot; the count is clamped to capacity before upload.
    pub fn from_set(set: &BubbleSet) -> Self {
        let mut regions = [BubbleRegionRaw::default(); MAX_BUBBLES];
        for (dst, src) in regions.iter_mut().zip(set.slots()) {
            *dst = (*src).into();
        }
        Self {
            active_count: set.len() as i32,
            _pad: [0.0; 3],
            regions,
        }
    }
}

/// `@group(0) @binding(2)` of the blit pipeline (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlendUniform {
    pub blend_color: [f32; 4],
    pub blend_progress: f32,
    pub _pad: [f32; 3],
}

impl From<&BlendParameters> for BlendUniform {
    fn from(p: &BlendParameters) -> Self {
        Self {
            blend_color: p.blend_color.to_array(),
            blend_progress: p.blend_progress,
            _pad: [0.0; 3],
        }
    }
}
