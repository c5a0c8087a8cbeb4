use core::fmt;

use crate::coords::Vec2;

use super::color::Rgba;
use super::math::range_map;

/// Fixed region capacity; mirrors the uniform array length in `bubble.wgsl`.
pub const MAX_BUBBLES: usize = 100;

/// Overlay opacity never exceeds this, whatever the time scale.
pub const MAX_OVERLAY_OPACITY: f32 = 0.7;

const SLOW_TINT: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);
const FAST_TINT: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

// time scale at which the slow / fast tint reaches MAX_OVERLAY_OPACITY
const SLOW_SATURATION: f32 = 0.1;
const FAST_SATURATION: f32 = 3.0;

/// Circular area that scales time for every point strictly inside it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BubbleRegion {
    pub center: Vec2,
    /// Pre-squared radius. Must be `>= 0`.
    pub radius_squared: f32,
    /// Multiplier applied to the time scale inside. Must be `> 0`.
    pub time_scale_factor: f32,
}

impl BubbleRegion {
    #[inline]
    pub const fn new(center: Vec2, radius_squared: f32, time_scale_factor: f32) -> Self {
        Self { center, radius_squared, time_scale_factor }
    }

    /// Builds a region from an un-squared radius.
    #[inline]
    pub fn with_radius(center: Vec2, radius: f32, time_scale_factor: f32) -> Self {
        Self::new(center, radius * radius, time_scale_factor)
    }

    /// Strict containment: a point on the circle is outside.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_squared(self.center) < self.radius_squared
    }
}

impl Default for BubbleRegion {
    /// Empty region with a neutral factor.
    fn default() -> Self {
        Self::new(Vec2::zero(), 0.0, 1.0)
    }
}

/// Host contract violation found by [`BubbleSet::contract_violations`].
///
/// The evaluator never checks these itself; they exist for diagnostics.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ContractViolation {
    ActiveCountOutOfRange { active_count: i32 },
    NonPositiveFactor { index: usize, factor: f32 },
    NegativeRadiusSquared { index: usize, radius_squared: f32 },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ContractViolation::ActiveCountOutOfRange { active_count } => write!(
                f,
                "active bubble count {active_count} outside 0..={MAX_BUBBLES}"
            ),
            ContractViolation::NonPositiveFactor { index, factor } => {
                write!(f, "bubble {index} has non-positive time scale factor {factor}")
            }
            ContractViolation::NegativeRadiusSquared { index, radius_squared } => {
                write!(f, "bubble {index} has negative squared radius {radius_squared}")
            }
        }
    }
}

/// Fixed-capacity region array plus the host-declared active count.
///
/// `active_count` is kept as the raw `i32` the host would upload so that an
/// out-of-range value stays observable. Iteration always clamps it to
/// `0..=MAX_BUBBLES`, which bounds per-point work even for bad input.
/// Slots at or beyond the active count are ignored whatever they hold.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSet {
    regions: [BubbleRegion; MAX_BUBBLES],
    active_count: i32,
}

impl BubbleSet {
    pub fn new() -> Self {
        Self {
            regions: [BubbleRegion::default(); MAX_BUBBLES],
            active_count: 0,
        }
    }

    /// Wraps a host-supplied buffer as-is.
    pub fn from_raw(regions: [BubbleRegion; MAX_BUBBLES], active_count: i32) -> Self {
        Self { regions, active_count }
    }

    /// Collects up to `MAX_BUBBLES` regions; the rest are dropped.
    pub fn from_regions<I>(regions: I) -> Self
    where
        I: IntoIterator<Item = BubbleRegion>,
    {
        let mut set = Self::new();
        for r in regions {
            if !set.push(r) {
                break;
            }
        }
        set
    }

    /// Appends a region. Returns `false` (and drops it) when full.
    pub fn push(&mut self, region: BubbleRegion) -> bool {
        let len = self.len();
        if len >= MAX_BUBBLES {
            return false;
        }
        self.regions[len] = region;
        self.active_count = len as i32 + 1;
        true
    }

    /// Raw host-declared count, possibly out of range.
    #[inline]
    pub fn active_count(&self) -> i32 {
        self.active_count
    }

    #[inline]
    pub fn set_active_count(&mut self, active_count: i32) {
        self.active_count = active_count;
    }

    /// Number of regions actually evaluated.
    #[inline]
    pub fn len(&self) -> usize {
        self.active_count.clamp(0, MAX_BUBBLES as i32) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The evaluated regions, `[0, len())`.
    #[inline]
    pub fn active(&self) -> &[BubbleRegion] {
        &self.regions[..self.len()]
    }

    /// All slots including inactive ones.
    #[inline]
    pub fn slots(&self) -> &[BubbleRegion; MAX_BUBBLES] {
        &self.regions
    }

    /// Lists host contract violations among the evaluated regions.
    pub fn contract_violations(&self) -> Vec<ContractViolation> {
        let mut out = Vec::new();
        if self.active_count < 0 || self.active_count > MAX_BUBBLES as i32 {
            out.push(ContractViolation::ActiveCountOutOfRange {
                active_count: self.active_count,
            });
        }
        for (index, r) in self.active().iter().enumerate() {
            // `!(x > 0)` also catches NaN.
            if !(r.time_scale_factor > 0.0) {
                out.push(ContractViolation::NonPositiveFactor {
                    index,
                    factor: r.time_scale_factor,
                });
            }
            if r.radius_squared < 0.0 {
                out.push(ContractViolation::NegativeRadiusSquared {
                    index,
                    radius_squared: r.radius_squared,
                });
            }
        }
        out
    }
}

impl Default for BubbleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Product of the factors of every active region containing `p`.
///
/// Starts at `1.0`; every region is tested (no early exit), so overlapping
/// bubbles compose multiplicatively and region order does not matter.
pub fn time_scale_at(p: Vec2, bubbles: &BubbleSet) -> f32 {
    bubbles
        .active()
        .iter()
        .fold(1.0, |ts, r| if r.contains(p) { ts * r.time_scale_factor } else { ts })
}

/// Maps a time scale onto the overlay tint.
///
/// - `ts < 1`: blue, opacity rising from 0 at `ts = 1` to 0.7 at `ts = 0.1`
/// - `ts >= 1`: red, opacity rising from 0 at `ts = 1` to 0.7 at `ts = 3`
///
/// Opacity is clamped to `[0, MAX_OVERLAY_OPACITY]` on both branches.
pub fn overlay_for_time_scale(time_scale: f32) -> Rgba {
    let (tint, opacity) = if time_scale < 1.0 {
        (
            SLOW_TINT,
            range_map(time_scale, SLOW_SATURATION, 1.0, MAX_OVERLAY_OPACITY, 0.0),
        )
    } else {
        (
            FAST_TINT,
            range_map(time_scale, 1.0, FAST_SATURATION, 0.0, MAX_OVERLAY_OPACITY),
        )
    };

    Rgba::new(tint.r, tint.g, tint.b, opacity.clamp(0.0, MAX_OVERLAY_OPACITY))
}

/// Overlay color for a world-space point.
#[inline]
pub fn evaluate_overlay(p: Vec2, bubbles: &BubbleSet) -> Rgba {
    overlay_for_time_scale(time_scale_at(p, bubbles))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn bubble(x: f32, y: f32, radius: f32, factor: f32) -> BubbleRegion {
        BubbleRegion::with_radius(Vec2::new(x, y), radius, factor)
    }

    fn is_red(c: Rgba) -> bool {
        c.r == 1.0 && c.g == 0.0 && c.b == 0.0
    }

    fn is_blue(c: Rgba) -> bool {
        c.r == 0.0 && c.g == 0.0 && c.b == 1.0
    }

    // ── neutral state ─────────────────────────────────────────────────────

    #[test]
    fn empty_set_is_transparent_red() {
        let set = BubbleSet::new();
        let c = evaluate_overlay(Vec2::new(12.0, -4.0), &set);
        assert!(is_red(c));
        assert_eq!(c.a, 0.0);
    }

    #[test]
    fn point_outside_every_region_is_neutral() {
        let set = BubbleSet::from_regions([bubble(0.0, 0.0, 1.0, 0.5), bubble(10.0, 0.0, 2.0, 2.0)]);
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(time_scale_at(p, &set), 1.0);
        let c = evaluate_overlay(p, &set);
        assert!(is_red(c));
        assert_eq!(c.a, 0.0);
    }

    // ── containment ───────────────────────────────────────────────────────

    #[test]
    fn single_slow_bubble_at_center() {
        let set = BubbleSet::from_regions([bubble(3.0, 4.0, 2.0, 0.5)]);
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(time_scale_at(p, &set), 0.5);

        let c = evaluate_overlay(p, &set);
        assert!(is_blue(c));
        assert!(close(c.a, 0.388_888_9), "opacity was {}", c.a);
    }

    #[test]
    fn boundary_point_is_outside() {
        // distance² == radius² == 4
        let set = BubbleSet::from_regions([BubbleRegion::new(Vec2::zero(), 4.0, 0.5)]);
        assert_eq!(time_scale_at(Vec2::new(2.0, 0.0), &set), 1.0);
        assert_eq!(time_scale_at(Vec2::new(0.0, -2.0), &set), 1.0);
        assert_eq!(time_scale_at(Vec2::new(1.999, 0.0), &set), 0.5);
    }

    #[test]
    fn zero_radius_contains_nothing() {
        let set = BubbleSet::from_regions([BubbleRegion::new(Vec2::zero(), 0.0, 0.5)]);
        assert_eq!(time_scale_at(Vec2::zero(), &set), 1.0);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn overlapping_regions_multiply() {
        let set = BubbleSet::from_regions([bubble(0.0, 0.0, 5.0, 0.5), bubble(1.0, 0.0, 5.0, 0.5)]);
        assert_eq!(time_scale_at(Vec2::new(0.5, 0.0), &set), 0.25);
    }

    #[test]
    fn slow_and_fast_regions_can_cancel() {
        let set = BubbleSet::from_regions([bubble(0.0, 0.0, 5.0, 0.5), bubble(0.0, 0.0, 5.0, 2.0)]);
        let c = evaluate_overlay(Vec2::zero(), &set);
        assert!(is_red(c));
        assert_eq!(c.a, 0.0);
    }

    #[test]
    fn region_order_does_not_matter() {
        let regions = [
            bubble(0.0, 0.0, 4.0, 0.5),
            bubble(1.0, 1.0, 3.0, 1.5),
            bubble(-1.0, 0.5, 6.0, 0.8),
            bubble(0.5, -0.5, 2.0, 2.5),
        ];
        let forward = BubbleSet::from_regions(regions);
        let reversed = BubbleSet::from_regions(regions.iter().rev().copied());
        let rotated = BubbleSet::from_regions(regions.iter().cycle().skip(2).take(4).copied());

        for p in [Vec2::new(0.2, 0.1), Vec2::new(1.0, 1.0), Vec2::new(-3.0, 2.0), Vec2::new(9.0, 9.0)] {
            let a = evaluate_overlay(p, &forward);
            for other in [&reversed, &rotated] {
                let b = evaluate_overlay(p, other);
                assert!(close(a.a, b.a) && a.r == b.r && a.b == b.b, "mismatch at {p:?}");
            }
        }
    }

    #[test]
    fn slots_beyond_active_count_are_ignored() {
        let mut slots = [BubbleRegion::default(); MAX_BUBBLES];
        slots[0] = bubble(0.0, 0.0, 10.0, 0.5);
        slots[1] = bubble(0.0, 0.0, 10.0, 0.1);
        slots[2] = bubble(0.0, 0.0, 10.0, 3.0);

        let set = BubbleSet::from_raw(slots, 1);
        assert_eq!(time_scale_at(Vec2::zero(), &set), 0.5);
    }

    // ── opacity mapping ───────────────────────────────────────────────────

    #[test]
    fn opacity_clamps_at_both_extremes() {
        let very_slow = overlay_for_time_scale(0.01);
        assert!(is_blue(very_slow));
        assert_eq!(very_slow.a, MAX_OVERLAY_OPACITY);

        let very_fast = overlay_for_time_scale(10.0);
        assert!(is_red(very_fast));
        assert_eq!(very_fast.a, MAX_OVERLAY_OPACITY);
    }

    #[test]
    fn fast_opacity_is_linear() {
        assert!(close(overlay_for_time_scale(2.0).a, 0.35));
        assert!(close(overlay_for_time_scale(3.0).a, 0.7));
    }

    #[test]
    fn just_below_one_is_blue() {
        let c = overlay_for_time_scale(0.999);
        assert!(is_blue(c));
        assert!(c.a > 0.0 && c.a < 0.01);
    }

    // ── capacity / contract ───────────────────────────────────────────────

    #[test]
    fn push_stops_at_capacity() {
        let mut set = BubbleSet::new();
        for i in 0..MAX_BUBBLES {
            assert!(set.push(bubble(i as f32, 0.0, 1.0, 1.0)));
        }
        assert!(!set.push(bubble(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(set.len(), MAX_BUBBLES);
        assert_eq!(set.active_count(), MAX_BUBBLES as i32);
    }

    #[test]
    fn oversized_active_count_is_bounded() {
        let mut slots = [bubble(0.0, 0.0, 1.0, 0.5); MAX_BUBBLES];
        slots[MAX_BUBBLES - 1] = bubble(0.0, 0.0, 1.0, 2.0);
        let set = BubbleSet::from_raw(slots, 5_000);

        assert_eq!(set.len(), MAX_BUBBLES);
        let ts = time_scale_at(Vec2::zero(), &set);
        assert!(ts.is_finite());
        assert_eq!(
            set.contract_violations(),
            vec![ContractViolation::ActiveCountOutOfRange { active_count: 5_000 }]
        );
    }

    #[test]
    fn negative_active_count_evaluates_nothing() {
        let set = BubbleSet::from_raw([bubble(0.0, 0.0, 1.0, 0.5); MAX_BUBBLES], -3);
        assert!(set.is_empty());
        assert_eq!(time_scale_at(Vec2::zero(), &set), 1.0);
    }

    #[test]
    fn contract_violations_report_bad_regions() {
        let set = BubbleSet::from_regions([
            bubble(0.0, 0.0, 1.0, 0.5),
            BubbleRegion::new(Vec2::zero(), -1.0, 1.0),
            bubble(0.0, 0.0, 1.0, 0.0),
        ]);
        let v = set.contract_violations();
        assert_eq!(v.len(), 2);
        assert!(matches!(v[0], ContractViolation::NegativeRadiusSquared { index: 1, .. }));
        assert!(matches!(v[1], ContractViolation::NonPositiveFactor { index: 2, .. }));
    }

    #[test]
    fn well_formed_set_has_no_violations() {
        let set = BubbleSet::from_regions([bubble(1.0, 2.0, 3.0, 0.25)]);
        assert!(set.contract_violations().is_empty());
    }
}
