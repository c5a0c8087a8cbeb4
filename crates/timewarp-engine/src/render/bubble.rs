use crate::effect::{BubbleSet, TransformSet, Vertex};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    additive_blend, create_uniform_buffer, grown_capacity, triangle_list, uniform_layout_entry,
};
use super::uniforms::{BubbleParamsUniform, CameraUniform, ModelUniform};

pub(super) const SHADER_SOURCE: &str = include_str!("shaders/bubble.wgsl");

/// Per-draw inputs of the overlay pass.
pub struct BubbleFrame<'a> {
    pub transforms: &'a TransformSet,
    pub bubbles: &'a BubbleSet,
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
}

/// Renderer for the time-bubble overlay.
///
/// Draws an indexed triangle mesh whose fragments are the vertex color times
/// the bubble overlay at the fragment's mesh-space XY. Output is added onto
/// the target (see `additive_blend`).
///
/// Uniforms (group 0): camera, model, bubble parameters. They and the mesh
/// buffers are written through the queue, so every pass recorded before the
/// next submit sees the last upload. Draw once per renderer per frame; use a
/// second renderer for a second mesh or bubble set. A repeat draw within one
/// `RenderCtx::frame_index` is logged once.
#[derive(Default)]
pub struct BubbleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    camera_ubo: Option<wgpu::Buffer>,
    model_ubo: Option<wgpu::Buffer>,
    bubble_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    index_capacity: usize,

    warned_contract: bool,
    last_frame: Option<u64>,
    warned_repeat_draw: bool,
}

impl BubbleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &BubbleFrame<'_>,
    ) {
        if frame.vertices.is_empty() || frame.indices.is_empty() {
            return;
        }

        self.check_contract(frame.bubbles);
        self.check_single_draw(ctx.frame_index);

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_mesh_capacity(ctx, frame.vertices.len(), frame.indices.len());

        self.write_uniforms(ctx, frame);

        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(frame.vertices));
        ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(frame.indices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.begin_load_pass("timewarp bubble pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..frame.indices.len() as u32, 0, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    /// Reports host contract violations once per renderer; the data is
    /// uploaded regardless.
    fn check_contract(&mut self, bubbles: &BubbleSet) {
        if self.warned_contract {
            return;
        }
        let violations = bubbles.contract_violations();
        if violations.is_empty() {
            return;
        }
        for v in &violations {
            log::warn!("bubble parameters: {v}");
        }
        self.warned_contract = true;
    }

    /// Notes a draw in `frame_index`; returns false if this renderer already
    /// drew in that frame.
    fn note_draw(&mut self, frame_index: u64) -> bool {
        let first = self.last_frame != Some(frame_index);
        self.last_frame = Some(frame_index);
        first
    }

    fn check_single_draw(&mut self, frame_index: u64) {
        if self.note_draw(frame_index) || self.warned_repeat_draw {
            return;
        }
        log::warn!(
            "bubble renderer drew twice in frame {frame_index}; both draws use the last upload"
        );
        self.warned_repeat_draw = true;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("timewarp bubble shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("timewarp bubble bgl"),
                entries: &[
                    uniform_layout_entry::<CameraUniform>(0, wgpu::ShaderStages::VERTEX),
                    uniform_layout_entry::<ModelUniform>(1, wgpu::ShaderStages::VERTEX),
                    uniform_layout_entry::<BubbleParamsUniform>(2, wgpu::ShaderStages::FRAGMENT),
                ],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("timewarp bubble pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("timewarp bubble pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(additive_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("bubble pipeline created for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let camera_ubo = create_uniform_buffer::<CameraUniform>(ctx.device, "timewarp camera ubo");
        let model_ubo = create_uniform_buffer::<ModelUniform>(ctx.device, "timewarp model ubo");
        let bubble_ubo =
            create_uniform_buffer::<BubbleParamsUniform>(ctx.device, "timewarp bubble ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("timewarp bubble bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: camera_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: model_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: bubble_ubo.as_entire_binding() },
            ],
        });

        self.camera_ubo = Some(camera_ubo);
        self.model_ubo = Some(model_ubo);
        self.bubble_ubo = Some(bubble_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_mesh_capacity(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if vertices > self.vertex_capacity || self.vbo.is_none() {
            let cap = grown_capacity(vertices, 256);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("timewarp bubble vbo"),
                size: (cap * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }

        if indices > self.index_capacity || self.ibo.is_none() {
            let cap = grown_capacity(indices, 512);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("timewarp bubble ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }
    }

    fn write_uniforms(&self, ctx: &RenderCtx<'_>, frame: &BubbleFrame<'_>) {
        if let Some(ubo) = self.camera_ubo.as_ref() {
            let u = CameraUniform::from_transforms(frame.transforms);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }
        if let Some(ubo) = self.model_ubo.as_ref() {
            let u = ModelUniform::from_transforms(frame.transforms);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }
        if let Some(ubo) = self.bubble_ubo.as_ref() {
            let u = BubbleParamsUniform::from_set(frame.bubbles);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x4, // color
    2 => Float32x2  // uv
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_draw_of_each_frame_is_accepted() {
        let mut r = BubbleRenderer::new();
        assert!(r.note_draw(0));
        assert!(r.note_draw(1));
        assert!(r.note_draw(7));
    }

    #[test]
    fn repeat_draw_in_one_frame_is_flagged() {
        let mut r = BubbleRenderer::new();
        assert!(r.note_draw(3));
        assert!(!r.note_draw(3));
        assert!(r.note_draw(4));
    }

    #[test]
    fn repeat_draw_warns_once() {
        let mut r = BubbleRenderer::new();
        r.check_single_draw(5);
        assert!(!r.warned_repeat_draw);
        r.check_single_draw(5);
        assert!(r.warned_repeat_draw);
        r.check_single_draw(6);
        r.check_single_draw(6);
        assert!(r.warned_repeat_draw);
    }
}
