/// Affine remap of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Not clamped: values outside the input domain extrapolate.
/// `in_min == in_max` is a caller precondition (division by zero otherwise).
#[inline]
pub fn range_map(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Cubic Hermite ease `x²(3 − 2x)`.
///
/// Unlike the WGSL builtin `smoothstep(e0, e1, x)` this does not clamp `x`,
/// so inputs outside `[0, 1]` overshoot.
#[inline]
pub fn smoothstep(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}
