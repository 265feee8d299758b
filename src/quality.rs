//! JPEG quality from output area.
//!
//! Small outputs tolerate less compression than large ones, so quality is
//! interpolated linearly between two `(area, quality)` anchors and held flat
//! outside them.

use crate::transform::FrameError;

/// One anchor of a [`QualityCurve`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityLimit {
    /// Output area in pixels.
    pub area: f64,
    /// Encoder quality at that area.
    pub quality: f64,
}

impl QualityLimit {
    pub const fn new(area: f64, quality: f64) -> Self {
        Self { area, quality }
    }
}

/// Encoder quality as a function of output area.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualityCurve {
    /// Same quality regardless of size.
    Fixed(f64),
    /// Linear from `min_area.quality` at `min_area.area` to
    /// `max_area.quality` at `max_area.area`, flat outside.
    Interpolated {
        min_area: QualityLimit,
        max_area: QualityLimit,
    },
}

impl Default for QualityCurve {
    /// 90 at 4000 px and below, 60 at one megapixel and above.
    fn default() -> Self {
        Self::Interpolated {
            min_area: QualityLimit::new(4000.0, 90.0),
            max_area: QualityLimit::new(1_000_000.0, 60.0),
        }
    }
}

impl QualityCurve {
    /// Quality for an output of `width` × `height` pixels.
    ///
    /// Fails with [`FrameError::InvalidConfig`] when `max_area.area` does not
    /// exceed `min_area.area`.
    pub fn evaluate(&self, width: f64, height: f64) -> Result<f64, FrameError> {
        match *self {
            Self::Fixed(quality) => Ok(quality),
            Self::Interpolated { min_area, max_area } => {
                let span = max_area.area - min_area.area;
                if span.is_nan() || span <= 0.0 {
                    return Err(FrameError::InvalidConfig(
                        "quality curve max area must exceed min area",
                    ));
                }
                let normalized = (width * height - min_area.area).max(0.0);
                let fraction = (normalized / span).min(1.0);
                Ok(min_area.quality - (min_area.quality - max_area.quality) * fraction)
            }
        }
    }
}

/// Quality for an output of `width` × `height` pixels under `curve`.
pub fn evaluate(width: f64, height: f64, curve: &QualityCurve) -> Result<f64, FrameError> {
    curve.evaluate(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_passes_through() {
        assert_eq!(QualityCurve::Fixed(72.0).evaluate(10.0, 10.0), Ok(72.0));
        assert_eq!(QualityCurve::Fixed(72.0).evaluate(1e5, 1e5), Ok(72.0));
    }

    #[test]
    fn anchors_and_midpoint() {
        let curve = QualityCurve::default();
        // 4000 px
        assert_eq!(curve.evaluate(80.0, 50.0), Ok(90.0));
        // 1 000 000 px
        assert_eq!(curve.evaluate(1000.0, 1000.0), Ok(60.0));
        // 502 000 px is halfway
        assert_eq!(curve.evaluate(502.0, 1000.0), Ok(75.0));
    }

    #[test]
    fn flat_outside_anchors() {
        let curve = QualityCurve::default();
        assert_eq!(curve.evaluate(1.0, 1.0), Ok(90.0));
        assert_eq!(curve.evaluate(0.0, 0.0), Ok(90.0));
        assert_eq!(curve.evaluate(5000.0, 5000.0), Ok(60.0));
    }

    #[test]
    fn zero_span_is_config_error() {
        let curve = QualityCurve::Interpolated {
            min_area: QualityLimit::new(1000.0, 90.0),
            max_area: QualityLimit::new(1000.0, 60.0),
        };
        assert!(matches!(
            curve.evaluate(10.0, 10.0),
            Err(FrameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_span_is_config_error() {
        let curve = QualityCurve::Interpolated {
            min_area: QualityLimit::new(2000.0, 90.0),
            max_area: QualityLimit::new(1000.0, 60.0),
        };
        assert!(evaluate(10.0, 10.0, &curve).is_err());
    }

    #[test]
    fn non_increasing_in_area() {
        let curve = QualityCurve::default();
        let mut last = f64::INFINITY;
        for side in (0..1200).step_by(25) {
            let q = curve.evaluate(side as f64, side as f64).unwrap();
            assert!(q <= last, "quality rose at {side}px: {q} > {last}");
            last = q;
        }
    }
}
