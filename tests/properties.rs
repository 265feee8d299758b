//! Property tests over the whole input space.

use proptest::prelude::*;
use zenfocus::*;

fn image(w: u32, h: u32) -> ImageProperties {
    ImageProperties::new(w as f64, h as f64, ImageFormat::Jpeg)
}

proptest! {
    #[test]
    fn identity_viewport_without_poi(w in 1u32..8000, h in 1u32..8000, explicit in any::<bool>()) {
        let viewport = if explicit {
            ViewportRequest::new(w as f64, h as f64)
        } else {
            ViewportRequest::source()
        };
        let t = calculate(&image(w, h), &viewport, &InterestPoint::none()).unwrap();
        prop_assert_eq!(
            t,
            Transform { x: 0.0, y: 0.0, width: w as f64, height: h as f64, scale: 1.0 }
        );
    }

    #[test]
    fn crop_is_non_negative_and_viewport_sized(
        w in 1u32..6000,
        h in 1u32..6000,
        vw in 1u32..3000,
        vh in 1u32..3000,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
        region in 0.01f64..=1.0,
    ) {
        let poi = InterestPoint::fraction(fx, fy).region(region);
        let t = calculate(&image(w, h), &ViewportRequest::new(vw as f64, vh as f64), &poi).unwrap();
        prop_assert!(t.x >= 0.0 && t.y >= 0.0, "{t:?}");
        prop_assert_eq!(t.width, vw as f64);
        prop_assert_eq!(t.height, vh as f64);
        prop_assert!(t.scale > 0.0);
        // The scaled image always covers the viewport, so the crop stays inside it.
        prop_assert!(t.x + t.width <= w as f64 * t.scale + 1e-6, "{t:?}");
        prop_assert!(t.y + t.height <= h as f64 * t.scale + 1e-6, "{t:?}");
    }

    #[test]
    fn poi_inside_image_stays_in_crop(
        w in 1u32..6000,
        h in 1u32..6000,
        vw in 1u32..3000,
        vh in 1u32..3000,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let poi = InterestPoint::fraction(fx, fy);
        let t = calculate(&image(w, h), &ViewportRequest::new(vw as f64, vh as f64), &poi).unwrap();
        let (px, py) = (fx * w as f64 * t.scale, fy * h as f64 * t.scale);
        // Half a pixel of slack for the rounded origin.
        prop_assert!(px >= t.x - 0.5 - 1e-6 && px <= t.x + t.width + 0.5 + 1e-6, "{t:?}");
        prop_assert!(py >= t.y - 0.5 - 1e-6 && py <= t.y + t.height + 0.5 + 1e-6, "{t:?}");
    }

    #[test]
    fn single_axis_viewport_keeps_aspect(w in 1u32..6000, h in 1u32..6000, vw in 1u32..3000) {
        let t = calculate(&image(w, h), &ViewportRequest::width_only(vw as f64), &InterestPoint::none()).unwrap();
        let expected = vw as f64 * h as f64 / w as f64;
        prop_assert!((t.height - expected).abs() < 1e-9);
    }

    #[test]
    fn quality_non_increasing(a in 0.0f64..2_000_000.0, b in 0.0f64..2_000_000.0) {
        let curve = QualityCurve::default();
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let q_small = curve.evaluate(small, 1.0).unwrap();
        let q_large = curve.evaluate(large, 1.0).unwrap();
        prop_assert!(q_small >= q_large);
        prop_assert!((60.0..=90.0).contains(&q_large));
        prop_assert_eq!(curve.evaluate(a, 1.0), curve.evaluate(a, 1.0));
    }

    #[test]
    fn shrink_composes_to_scale(scale in 0.0005f64..0.5) {
        let plan = plan_shrink(scale);
        let factor = plan.pre_shrink_factor.unwrap();
        prop_assert!(factor >= 1);
        prop_assert!(plan.residual_scale < 1.0);
        prop_assert!((plan.residual_scale / factor as f64 - scale).abs() < 1e-12);
    }

    #[test]
    fn shrink_direct_from_half(scale in 0.5f64..10.0) {
        prop_assert_eq!(plan_shrink(scale), ShrinkPlan::direct(scale));
    }

    #[test]
    fn rotated_plan_swaps_dimensions(w in 1u32..6000, h in 1u32..6000, code in 0u8..=9) {
        let p = plan(&image(w, h), code, &ResizeRequest::default()).unwrap();
        let swapped = matches!(code, 6 | 8);
        let (ew, eh) = if swapped { (h, w) } else { (w, h) };
        prop_assert_eq!((p.transform.width, p.transform.height), (ew as f64, eh as f64));
        prop_assert_eq!(p.correction.rotation.is_some(), matches!(code, 3 | 6 | 8));
    }
}
