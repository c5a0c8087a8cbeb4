/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Orthographic projection mapping logical px (top-left origin, +Y down)
    /// to clip space.
    pub fn ortho_projection(self) -> glam::Mat4 {
        glam::Mat4::orthographic_rh(
            0.0,
            self.width.max(1.0),
            self.height.max(1.0),
            0.0,
            -1.0,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn ortho_maps_corners_to_ndc() {
        let proj = Viewport::new(800.0, 600.0).ortho_projection();

        let tl = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(close(tl.x, -1.0) && close(tl.y, 1.0));

        let br = proj * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!(close(br.x, 1.0) && close(br.y, -1.0));
    }

    #[test]
    fn zero_size_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(!Viewport::new(10.0, f32::NAN).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
