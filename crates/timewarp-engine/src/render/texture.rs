use std::borrow::Cow;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use wgpu::util::DeviceExt;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Source image for the blit pass, resident on the GPU.
pub struct SourceImage {
    id: u64,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl SourceImage {
    /// Uploads an sRGB RGBA8 image as a sampled texture.
    ///
    /// An empty image uploads as a single transparent pixel.
    pub fn from_rgba(device: &wgpu::Device, queue: &wgpu::Queue, image: &RgbaImage) -> Self {
        let image = non_empty(image);
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("timewarp source image"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("uploaded source image {width}x{height}");

        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            _texture: texture,
            view,
        }
    }

    /// Process-unique id; renderers use it to notice a swapped source.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

fn non_empty(image: &RgbaImage) -> Cow<'_, RgbaImage> {
    if image.width() == 0 || image.height() == 0 {
        Cow::Owned(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])))
    } else {
        Cow::Borrowed(image)
    }
}

/// Decodes an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode source image {}", path.display()))?;
    let rgba = img.to_rgba8();
    anyhow::ensure!(
        rgba.width() > 0 && rgba.height() > 0,
        "source image {} is empty",
        path.display()
    );
    Ok(rgba)
}

/// Two-color checkerboard, used when no source image is configured.
///
/// `cell` is clamped to at least one pixel.
pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width.max(1), height.max(1), |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 { Rgba(a) } else { Rgba(b) }
    })
}
