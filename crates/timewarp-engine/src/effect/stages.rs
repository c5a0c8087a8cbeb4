//! Vertex / fragment stage reference for both pipelines.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::coords::Vec2;

use super::bubble::{evaluate_overlay, BubbleSet};
use super::color::Rgba;
use super::compositor::{composite, BlendParameters};

/// Mesh vertex consumed by the overlay pipeline.
///
/// Layout (36 bytes):
///
///  offset  0  position [f32; 3]   loc 0
///  offset 12  color    [f32; 4]   loc 1
///  offset 28  uv       [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

/// Camera and model transforms for one draw call.
///
/// Column-major, column vectors (`clip = M * v`), matching WGSL `mat4x4<f32>`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformSet {
    /// Uploaded with every draw; no shader path reads it yet.
    pub model_view: Mat4,
    pub model_view_proj: Mat4,
}

impl Default for TransformSet {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            model_view_proj: Mat4::IDENTITY,
        }
    }
}

/// Per-vertex output of stage A, interpolated per fragment by the rasterizer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FragmentInput {
    pub clip_position: [f32; 4],
    pub color: Rgba,
    pub uv: [f32; 2],
    /// Untransformed mesh-space XY; the space bubble centers live in.
    pub world_position: Vec2,
}

pub fn vertex_stage_a(vertex: &Vertex, transforms: &TransformSet) -> FragmentInput {
    let [x, y, z] = vertex.position;
    let clip = transforms.model_view_proj * Vec4::new(x, y, z, 1.0);
    FragmentInput {
        clip_position: clip.to_array(),
        color: Rgba::from_array(vertex.color),
        uv: vertex.uv,
        world_position: Vec2::new(x, y),
    }
}

/// Vertex color tinted by the bubble overlay at the fragment's world position.
#[inline]
pub fn fragment_stage_a(input: &FragmentInput, bubbles: &BubbleSet) -> Rgba {
    input.color * evaluate_overlay(input.world_position, bubbles)
}

/// One corner of the full-screen triangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FullscreenVertex {
    /// NDC position (z = 0, w = 1 implied).
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Over-sized triangle covering NDC `[-1, 1]²`. After clipping, UV spans
/// exactly `[0, 1]²` with V pointing down.
pub const FULLSCREEN_TRIANGLE: [FullscreenVertex; 3] = [
    FullscreenVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    FullscreenVertex { position: [3.0, -1.0], uv: [2.0, 1.0] },
    FullscreenVertex { position: [-1.0, 3.0], uv: [0.0, -1.0] },
];

/// Table lookup by vertex ordinal; ids wrap modulo 3 like the shader.
#[inline]
pub fn vertex_stage_b(vertex_index: u32) -> FullscreenVertex {
    FULLSCREEN_TRIANGLE[(vertex_index % 3) as usize]
}

/// Blit fragment: `sampled` is the source texel at the interpolated UV.
#[inline]
pub fn fragment_stage_b(sampled: Rgba, params: &BlendParameters) -> Rgba {
    composite(sampled, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::BubbleRegion;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── stage A ───────────────────────────────────────────────────────────

    #[test]
    fn stage_a_applies_mvp_and_keeps_raw_xy() {
        let transforms = TransformSet {
            model_view: Mat4::IDENTITY,
            model_view_proj: Mat4::from_translation(glam::Vec3::new(1.0, -2.0, 0.0))
                * Mat4::from_scale(glam::Vec3::splat(2.0)),
        };
        let v = Vertex {
            position: [3.0, 4.0, 0.5],
            color: [0.1, 0.2, 0.3, 0.4],
            uv: [0.25, 0.75],
        };

        let out = vertex_stage_a(&v, &transforms);
        assert_eq!(out.clip_position, [7.0, 6.0, 1.0, 1.0]);
        assert_eq!(out.world_position, Vec2::new(3.0, 4.0));
        assert_eq!(out.color, Rgba::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(out.uv, [0.25, 0.75]);
    }

    #[test]
    fn model_view_does_not_affect_clip_position() {
        let mut transforms = TransformSet::default();
        let v = Vertex { position: [1.0, 2.0, 3.0], ..Vertex::default() };
        let before = vertex_stage_a(&v, &transforms);
        transforms.model_view = Mat4::from_scale(glam::Vec3::splat(9.0));
        assert_eq!(vertex_stage_a(&v, &transforms), before);
    }

    #[test]
    fn fragment_a_multiplies_vertex_color() {
        let bubbles = BubbleSet::from_regions([BubbleRegion::with_radius(Vec2::zero(), 10.0, 3.0)]);
        let input = FragmentInput {
            clip_position: [0.0; 4],
            color: Rgba::new(0.5, 0.5, 0.5, 1.0),
            uv: [0.0; 2],
            world_position: Vec2::new(1.0, 1.0),
        };
        let out = fragment_stage_a(&input, &bubbles);
        assert_eq!(out.r, 0.5);
        assert_eq!(out.g, 0.0);
        assert_eq!(out.b, 0.0);
        assert!(close(out.a, 0.7));
    }

    #[test]
    fn fragment_a_outside_bubbles_is_transparent() {
        let input = FragmentInput {
            clip_position: [0.0; 4],
            color: Rgba::WHITE,
            uv: [0.0; 2],
            world_position: Vec2::new(50.0, 50.0),
        };
        assert_eq!(fragment_stage_a(&input, &BubbleSet::new()).a, 0.0);
    }

    // ── stage B ───────────────────────────────────────────────────────────

    /// Affine UV at an NDC point from the triangle's barycentrics.
    fn uv_at(x: f32, y: f32) -> [f32; 2] {
        let [a, b, c] = FULLSCREEN_TRIANGLE;
        let (ax, ay) = (a.position[0], a.position[1]);
        let det = (b.position[0] - ax) * (c.position[1] - ay)
            - (c.position[0] - ax) * (b.position[1] - ay);
        let wb = ((x - ax) * (c.position[1] - ay) - (c.position[0] - ax) * (y - ay)) / det;
        let wc = ((b.position[0] - ax) * (y - ay) - (x - ax) * (b.position[1] - ay)) / det;
        let wa = 1.0 - wb - wc;
        [
            wa * a.uv[0] + wb * b.uv[0] + wc * c.uv[0],
            wa * a.uv[1] + wb * b.uv[1] + wc * c.uv[1],
        ]
    }

    #[test]
    fn fullscreen_triangle_covers_ndc_square() {
        let [a, b, c] = FULLSCREEN_TRIANGLE;
        // Right angle at (-1, -1); hypotenuse x + y = 2 passes through (1, 1).
        assert_eq!(a.position, [-1.0, -1.0]);
        assert_eq!(b.position[0] + b.position[1], 2.0);
        assert_eq!(c.position[0] + c.position[1], 2.0);
    }

    #[test]
    fn clipped_uvs_span_unit_square() {
        let corners = [
            ((-1.0, 1.0), [0.0, 0.0]),
            ((1.0, 1.0), [1.0, 0.0]),
            ((1.0, -1.0), [1.0, 1.0]),
            ((-1.0, -1.0), [0.0, 1.0]),
        ];
        for ((x, y), expected) in corners {
            let uv = uv_at(x, y);
            assert!(close(uv[0], expected[0]) && close(uv[1], expected[1]), "uv at ({x}, {y}) = {uv:?}");
        }
    }

    #[test]
    fn stage_b_wraps_ordinals() {
        assert_eq!(vertex_stage_b(0), FULLSCREEN_TRIANGLE[0]);
        assert_eq!(vertex_stage_b(2), FULLSCREEN_TRIANGLE[2]);
        assert_eq!(vertex_stage_b(4), FULLSCREEN_TRIANGLE[1]);
    }

    #[test]
    fn fragment_b_blends_toward_color() {
        let params = BlendParameters { blend_color: Rgba::WHITE, blend_progress: 1.0 };
        assert_eq!(fragment_stage_b(Rgba::BLACK, &params), Rgba::WHITE);
    }
}
