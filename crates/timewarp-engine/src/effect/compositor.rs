use super::color::Rgba;
use super::math::smoothstep;

/// Per-draw parameters of the blit pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlendParameters {
    pub blend_color: Rgba,
    /// Expected in `[0, 1]`; `0` shows the source, `1` the blend color.
    pub blend_progress: f32,
}

impl Default for BlendParameters {
    fn default() -> Self {
        Self {
            blend_color: Rgba::BLACK,
            blend_progress: 0.0,
        }
    }
}

/// Eased interpolation factor for a progress value.
#[inline]
pub fn blend_factor(progress: f32) -> f32 {
    smoothstep(progress)
}

/// Blends a sampled source color toward the blend color on all four channels.
#[inline]
pub fn composite(source: Rgba, params: &BlendParameters) -> Rgba {
    source.lerp(params.blend_color, blend_factor(params.blend_progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: Rgba = Rgba::new(0.2, 0.4, 0.6, 1.0);
    const BLEND: Rgba = Rgba::new(1.0, 0.0, 0.5, 0.0);

    fn params(progress: f32) -> BlendParameters {
        BlendParameters { blend_color: BLEND, blend_progress: progress }
    }

    #[test]
    fn zero_progress_returns_source() {
        assert_eq!(composite(SOURCE, &params(0.0)), SOURCE);
    }

    #[test]
    fn full_progress_returns_blend_color() {
        assert_eq!(composite(SOURCE, &params(1.0)), BLEND);
    }

    #[test]
    fn half_progress_is_exact_midpoint() {
        assert_eq!(blend_factor(0.5), 0.5);
        let out = composite(SOURCE, &params(0.5));
        let mid = Rgba::new(
            SOURCE.r * 0.5 + BLEND.r * 0.5,
            SOURCE.g * 0.5 + BLEND.g * 0.5,
            SOURCE.b * 0.5 + BLEND.b * 0.5,
            SOURCE.a * 0.5 + BLEND.a * 0.5,
        );
        assert_eq!(out, mid);
    }

    #[test]
    fn easing_lags_linear_early_and_leads_late() {
        assert!(blend_factor(0.25) < 0.25);
        assert!(blend_factor(0.75) > 0.75);
    }

    #[test]
    fn alpha_channel_is_blended() {
        let out = composite(SOURCE, &params(1.0));
        assert_eq!(out.a, 0.0);
    }
}
