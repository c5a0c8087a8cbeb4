use anyhow::Result;
use image::RgbaImage;
use timewarp_engine::coords::Vec2;
use timewarp_engine::core::{App, AppControl, FrameCtx};
use timewarp_engine::effect::{BubbleRegion, BubbleSet, Rgba, TransformSet};
use timewarp_engine::render::{
    checkerboard, load_image, BlitRenderer, BubbleFrame, BubbleRenderer, SourceImage,
};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::config::DemoConfig;
use crate::mesh::GridMesh;

const CHECKER_SIZE: u32 = 512;
const CHECKER_LIGHT: [u8; 4] = [200, 200, 190, 255];
const CHECKER_DARK: [u8; 4] = [90, 90, 100, 255];

/// Blit pass (source image → blend color) followed by the bubble overlay
/// on a full-window grid.
pub struct DemoApp {
    config: DemoConfig,
    static_bubbles: BubbleSet,

    // decoded up front so a bad path fails before the window opens
    source_pixels: RgbaImage,
    source: Option<SourceImage>,
    mesh: GridMesh,

    blit: BlitRenderer,
    overlay: BubbleRenderer,
}

impl DemoApp {
    pub fn new(config: DemoConfig) -> Result<Self> {
        let source_pixels = match &config.source.image {
            Some(path) => load_image(path)?,
            None => checkerboard(
                CHECKER_SIZE,
                CHECKER_SIZE,
                config.source.checker_cell,
                CHECKER_LIGHT,
                CHECKER_DARK,
            ),
        };

        let static_bubbles = config.bubble_set();
        log::info!(
            "{} static bubbles, cursor bubble {}",
            static_bubbles.len(),
            if config.cursor.enabled { "on" } else { "off" }
        );

        Ok(Self {
            config,
            static_bubbles,
            source_pixels,
            source: None,
            mesh: GridMesh::default(),
            blit: BlitRenderer::new(),
            overlay: BubbleRenderer::new(),
        })
    }

    /// Static bubbles plus the one following the cursor, if any.
    fn frame_bubbles(&self, pointer: Option<Vec2>) -> BubbleSet {
        let mut set = self.static_bubbles.clone();
        if let (true, Some(p)) = (self.config.cursor.enabled, pointer) {
            let cursor = BubbleRegion::with_radius(p, self.config.cursor.radius, self.config.cursor.factor);
            if !set.push(cursor) {
                log::trace!("bubble set full, cursor bubble dropped");
            }
        }
        set
    }
}

impl App for DemoApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();
        if !viewport.is_valid() {
            return AppControl::Continue;
        }

        if self.mesh.viewport() != viewport {
            let m = &self.config.mesh;
            self.mesh = GridMesh::new(viewport, m.columns, m.rows, m.color);
            log::debug!("grid rebuilt for {}x{}", viewport.width, viewport.height);
        }

        if self.source.is_none() {
            self.source = Some(SourceImage::from_rgba(
                ctx.gpu.device(),
                ctx.gpu.queue(),
                &self.source_pixels,
            ));
        }

        let transforms = TransformSet {
            model_view_proj: viewport.ortho_projection(),
            ..TransformSet::default()
        };
        let bubbles = self.frame_bubbles(ctx.pointer);
        let blend = self.config.blend_at(ctx.time.elapsed);
        let clear = Rgba::from_array(self.config.window.clear_color);

        let Some(source) = self.source.as_ref() else {
            return AppControl::Continue;
        };
        let blit = &mut self.blit;
        let overlay = &mut self.overlay;
        let mesh = &self.mesh;

        ctx.render(clear, |rctx, target| {
            blit.render(rctx, target, source, &blend);
            overlay.render(
                rctx,
                target,
                &BubbleFrame {
                    transforms: &transforms,
                    bubbles: &bubbles,
                    vertices: &mesh.vertices,
                    indices: &mesh.indices,
                },
            );
        })
    }
}
