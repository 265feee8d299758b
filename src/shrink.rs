//! Two-pass downscale planning.
//!
//! Interpolating filters look poor when reducing by more than half in one
//! step. Below that, the engine first shrinks by a whole factor (fast, pixel
//! dropping), then finishes with an interpolated pass at the residual scale.

use num_traits::Float;

/// Smallest scale handled by a single interpolated pass.
pub const DIRECT_PASS_MIN_SCALE: f64 = 0.5;

/// How to reach a target scale.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShrinkPlan {
    /// Whole-factor shrink before the interpolated pass. `None` when the
    /// interpolated pass alone suffices.
    pub pre_shrink_factor: Option<u32>,
    /// Scale for the interpolated pass, relative to the pre-shrunk image.
    pub residual_scale: f64,
}

impl ShrinkPlan {
    /// Single interpolated pass at `scale`.
    pub const fn direct(scale: f64) -> Self {
        Self {
            pre_shrink_factor: None,
            residual_scale: scale,
        }
    }

    /// Plan for reaching `scale` from the full-size image.
    ///
    /// The pre-shrink never reaches the target on its own: when `1 / scale`
    /// is a whole number the factor backs off by one so the interpolated pass
    /// always has work left. Scales that are not positive and finite get the
    /// direct plan.
    pub fn for_scale(scale: f64) -> Self {
        if scale >= DIRECT_PASS_MIN_SCALE || !(scale > 0.0 && scale.is_finite()) {
            return Self::direct(scale);
        }
        let inverse = 1.0 / scale;
        let mut factor = Float::floor(inverse);
        if factor == inverse {
            factor -= 1.0;
        }
        // Saturate before deriving the residual so the two passes still compose.
        let factor = factor.min(u32::MAX as f64);
        Self {
            pre_shrink_factor: Some(factor as u32),
            residual_scale: scale * factor,
        }
    }

    pub fn is_two_pass(&self) -> bool {
        self.pre_shrink_factor.is_some()
    }

    /// Overall scale: shrink by the factor, then scale by the residual.
    pub fn effective_scale(&self) -> f64 {
        match self.pre_shrink_factor {
            Some(factor) => self.residual_scale / factor as f64,
            None => self.residual_scale,
        }
    }
}

/// Plan for reaching `scale` from the full-size image.
pub fn plan_shrink(scale: f64) -> ShrinkPlan {
    ShrinkPlan::for_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_and_above_is_direct() {
        assert_eq!(plan_shrink(0.5), ShrinkPlan::direct(0.5));
        assert_eq!(plan_shrink(0.75), ShrinkPlan::direct(0.75));
        assert_eq!(plan_shrink(3.0), ShrinkPlan::direct(3.0));
    }

    #[test]
    fn fractional_inverse_floors() {
        // 1 / 0.4 = 2.5 → shrink by 2, then 0.8
        let p = plan_shrink(0.4);
        assert_eq!(p.pre_shrink_factor, Some(2));
        assert!((p.residual_scale - 0.8).abs() < 1e-12);
    }

    #[test]
    fn whole_inverse_backs_off() {
        // 1 / 0.25 = 4 exactly → shrink by 3, leave 0.75 for interpolation
        let p = plan_shrink(0.25);
        assert_eq!(p.pre_shrink_factor, Some(3));
        assert_eq!(p.residual_scale, 0.75);

        let p = plan_shrink(0.125);
        assert_eq!(p.pre_shrink_factor, Some(7));
        assert_eq!(p.residual_scale, 0.875);
    }

    #[test]
    fn just_below_half() {
        let p = plan_shrink(0.49);
        assert_eq!(p.pre_shrink_factor, Some(2));
        assert!((p.residual_scale - 0.98).abs() < 1e-12);
        assert!(p.residual_scale < 1.0);
    }

    #[test]
    fn composes_to_target() {
        for scale in [0.01, 0.1, 0.2, 0.3, 0.333, 0.45] {
            let p = plan_shrink(scale);
            assert!(p.is_two_pass());
            assert!(
                (p.effective_scale() - scale).abs() < 1e-12,
                "{scale}: {p:?}"
            );
        }
    }

    #[test]
    fn degenerate_scales_are_direct() {
        assert!(!plan_shrink(0.0).is_two_pass());
        assert!(!plan_shrink(-1.0).is_two_pass());
        assert!(!plan_shrink(f64::NAN).is_two_pass());
    }

    #[test]
    fn tiny_scale_large_factor() {
        let p = plan_shrink(0.001);
        assert!(p.pre_shrink_factor.unwrap() >= 999);
    }

    #[test]
    fn saturated_factor_still_composes() {
        // 1 / 1e-10 overflows u32; the residual absorbs the difference.
        let p = plan_shrink(1e-10);
        assert_eq!(p.pre_shrink_factor, Some(u32::MAX));
        assert!(p.residual_scale > 0.0 && p.residual_scale < 1.0);
        assert!((p.effective_scale() - 1e-10).abs() < 1e-20, "{p:?}");
    }
}
