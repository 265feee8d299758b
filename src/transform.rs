//! Interest-aware crop and scale computation.
//!
//! Fits a source image into a viewport while keeping a point of interest
//! (POI) and a box of `region` × the image size around it visible. Pure
//! geometry on `f64` scalars.
//!
//! # Example
//!
//! ```
//! use zenfocus::{ImageFormat, ImageProperties, InterestPoint, ViewportRequest, calculate};
//!
//! let image = ImageProperties::new(2000.0, 1000.0, ImageFormat::Jpeg);
//! let transform = calculate(
//!     &image,
//!     &ViewportRequest::new(100.0, 200.0),
//!     &InterestPoint::at(986.0, 820.0),
//! )
//! .unwrap();
//!
//! assert_eq!((transform.x, transform.y), (607.0, 447.0));
//! assert_eq!((transform.width, transform.height), (100.0, 200.0));
//! ```
//!
//! The returned rectangle lives in the coordinate space of the image after
//! uniform scaling by [`Transform::scale`]: the engine scales the whole
//! image first, then crops.

use num_traits::Float;

/// Region used when a POI is given without an explicit region.
pub const DEFAULT_REGION: f64 = 0.3;

/// Container format reported by the metadata probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageFormat {
    /// JPEG family. The only format whose orientation tag is honored.
    Jpeg,
    /// PNG. Kept lossless on output.
    Png,
    /// Anything else the probe recognizes. Re-encoded as JPEG.
    Other,
}

impl ImageFormat {
    /// Container the resized image is written in.
    pub fn output_format(self) -> OutputFormat {
        match self {
            Self::Png => OutputFormat::Png,
            Self::Jpeg | Self::Other => OutputFormat::Jpeg,
        }
    }

    /// Whether an embedded orientation tag should be read for this format.
    pub fn reads_orientation(self) -> bool {
        self == Self::Jpeg
    }
}

/// Container of the resized output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputFormat {
    /// Lossy; takes a quality parameter.
    Jpeg,
    /// Lossless.
    Png,
}

impl OutputFormat {
    /// File extension for the output container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Whether the encoder takes a quality parameter.
    pub fn is_lossy(self) -> bool {
        self == Self::Jpeg
    }
}

/// Source image properties as reported by the metadata probe.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageProperties {
    /// Stored width in pixels.
    pub width: f64,
    /// Stored height in pixels.
    pub height: f64,
    /// Color bands. 4 means the image carries alpha.
    pub bands: u8,
    /// Container the source was read from.
    pub format: ImageFormat,
}

impl ImageProperties {
    /// Three-band image of the given size and format.
    pub fn new(width: f64, height: f64, format: ImageFormat) -> Self {
        Self {
            width,
            height,
            bands: 3,
            format,
        }
    }

    /// Set the band count.
    pub fn bands(mut self, bands: u8) -> Self {
        self.bands = bands;
        self
    }

    pub fn has_alpha(&self) -> bool {
        self.bands == 4
    }

    /// Same image with width and height exchanged (after a 90° or 270° turn).
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
            ..self
        }
    }

    fn size(&self) -> Result<Size, FrameError> {
        if !positive(self.width) || !positive(self.height) {
            return Err(FrameError::InvalidInput(
                "image width and height must be positive",
            ));
        }
        Ok(Size::new(self.width, self.height))
    }
}

/// Requested output dimensions. Either axis may be left for inference.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportRequest {
    /// Output width. Inferred from the aspect ratio when `None`.
    pub width: Option<f64>,
    /// Output height. Inferred from the aspect ratio when `None`.
    pub height: Option<f64>,
}

impl ViewportRequest {
    /// Viewport with both dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Only width; height follows the image aspect ratio.
    pub fn width_only(width: f64) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Only height; width follows the image aspect ratio.
    pub fn height_only(height: f64) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    /// No dimensions: the viewport is the image itself.
    pub fn source() -> Self {
        Self::default()
    }

    /// Fill in missing dimensions from the image size.
    fn resolve(&self, image: Size) -> Result<Size, FrameError> {
        let (w, h) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * image.height / image.width),
            (None, Some(h)) => (h * image.width / image.height, h),
            (None, None) => (image.width, image.height),
        };
        if !positive(w) || !positive(h) {
            return Err(FrameError::InvalidInput(
                "viewport width and height must be positive",
            ));
        }
        Ok(Size::new(w, h))
    }
}

/// Point of interest and the fraction of the image that must stay visible
/// around it.
///
/// `xf`/`yf` are fractions of the image size and win over `x`/`y`. When an
/// axis has no coordinate at all, the POI is centered on that axis and the
/// region becomes the whole image.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterestPoint {
    /// Absolute x in source pixels.
    pub x: Option<f64>,
    /// Absolute y in source pixels.
    pub y: Option<f64>,
    /// x as a fraction of the image width.
    pub xf: Option<f64>,
    /// y as a fraction of the image height.
    pub yf: Option<f64>,
    /// Fraction of the image (per linear dimension) kept visible.
    /// Defaults to [`DEFAULT_REGION`].
    pub region: Option<f64>,
}

impl InterestPoint {
    /// No POI: frame the whole image.
    pub fn none() -> Self {
        Self::default()
    }

    /// POI in absolute pixel coordinates.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// POI as fractions of the image size (`0.0..=1.0`).
    pub fn fraction(xf: f64, yf: f64) -> Self {
        Self {
            xf: Some(xf),
            yf: Some(yf),
            ..Self::default()
        }
    }

    /// Set the region kept visible around the POI.
    pub fn region(mut self, region: f64) -> Self {
        self.region = Some(region);
        self
    }

    fn resolve(&self, image: Size) -> Result<Focus, FrameError> {
        let x = self.xf.map(|f| f * image.width).or(self.x);
        let y = self.yf.map(|f| f * image.height).or(self.y);
        let mut region = self.region.unwrap_or(DEFAULT_REGION);
        let x = x.unwrap_or_else(|| {
            region = 1.0;
            image.width / 2.0
        });
        let y = y.unwrap_or_else(|| {
            region = 1.0;
            image.height / 2.0
        });
        if !positive(region) {
            return Err(FrameError::InvalidInput("region must be positive"));
        }
        Ok(Focus { x, y, region })
    }
}

/// Computed crop and scale.
///
/// `x`/`y`/`width`/`height` describe the crop in the coordinate space of the
/// image after scaling by `scale`. `width`/`height` always equal the
/// resolved viewport; `x`/`y` are whole pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Crop left edge, whole pixels.
    pub x: f64,
    /// Crop top edge, whole pixels.
    pub y: f64,
    /// Crop width, equal to the viewport width.
    pub width: f64,
    /// Crop height, equal to the viewport height.
    pub height: f64,
    /// Uniform scale applied to the whole image before cropping.
    pub scale: f64,
}

impl Transform {
    /// Output pixel area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Core computation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Quality curve bounds are malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Image size, region or viewport is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// Compute the crop rectangle and scale for fitting `image` into `viewport`
/// around `poi`.
///
/// Two rules compete: the scaled image always covers the viewport, and the
/// interest box is never shown smaller than the viewport. Whichever needs
/// more zoom wins. The rectangle is then pushed back inside the scaled
/// image, right/bottom edges first, then clamped at zero.
pub fn calculate(
    image: &ImageProperties,
    viewport: &ViewportRequest,
    poi: &InterestPoint,
) -> Result<Transform, FrameError> {
    let source = image.size()?;
    let focus = poi.resolve(source)?;
    let viewport = viewport.resolve(source)?;

    let scales = Scales::new(source, viewport, focus.region);
    let best = best_region(source, focus, scales.for_best_region);
    let scale = final_scale(scales.to_fill, viewport, best);
    let placed = fit_to_viewport(best, scale, viewport);
    let crop = clamp_to_scaled(placed, source, scale);

    Ok(Transform {
        x: crop.x,
        y: crop.y,
        width: crop.width,
        height: crop.height,
        scale,
    })
}

// ============================================================================
// Internal geometry
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq)]
struct Size {
    width: f64,
    height: f64,
}

impl Size {
    const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Resolved POI: absolute coordinates plus the region.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Focus {
    x: f64,
    y: f64,
    region: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Scales {
    /// Smallest scale at which the image covers the viewport.
    to_fill: f64,
    /// Scale at which the interest box alone would fill the viewport.
    to_interest: f64,
    for_best_region: f64,
}

impl Scales {
    fn new(source: Size, viewport: Size, region: f64) -> Self {
        let interest = Size::new(source.width * region, source.height * region);
        let to_fill = (viewport.width / source.width).max(viewport.height / source.height);
        let to_interest = (interest.width / source.width).max(interest.height / source.height);
        Self {
            to_fill,
            to_interest,
            for_best_region: to_fill.max(to_interest),
        }
    }
}

/// Frame of `source * scale` centered on the POI. May extend past the image.
fn best_region(source: Size, focus: Focus, scale: f64) -> Rect {
    let width = source.width * scale;
    let height = source.height * scale;
    Rect {
        x: focus.x - width / 2.0,
        y: focus.y - height / 2.0,
        width,
        height,
    }
}

/// Scale that fits `best` into the viewport on its tighter axis, never
/// below scale-to-fill.
fn final_scale(to_fill: f64, viewport: Size, best: Rect) -> f64 {
    to_fill
        .max(viewport.width / best.width)
        .max(viewport.height / best.height)
}

/// Move `best` into scaled coordinates and trim it symmetrically to the
/// viewport shape. Origin is rounded to whole pixels.
fn fit_to_viewport(best: Rect, scale: f64, viewport: Size) -> Rect {
    let scaled_w = best.width * scale;
    let scaled_h = best.height * scale;
    let x = best.x * scale - (viewport.width - scaled_w) / 2.0;
    let y = best.y * scale - (viewport.height - scaled_h) / 2.0;
    Rect {
        x: Float::round(x),
        y: Float::round(y),
        width: viewport.width,
        height: viewport.height,
    }
}

/// Align overhanging right/bottom edges with the scaled image, then clamp the
/// origin at zero.
///
/// The order matters: a crop wider than the scaled image ends up at `x = 0`
/// and still overhangs on the right.
fn clamp_to_scaled(rect: Rect, source: Size, scale: f64) -> Rect {
    let scaled = Size::new(source.width * scale, source.height * scale);
    let mut x = rect.x;
    let mut y = rect.y;
    if x + rect.width > scaled.width {
        x = scaled.width - rect.width;
    }
    if y + rect.height > scaled.height {
        y = scaled.height - rect.height;
    }
    Rect {
        x: x.max(0.0),
        y: y.max(0.0),
        ..rect
    }
}

/// Strictly positive and finite. NaN fails.
fn positive(v: f64) -> bool {
    v > 0.0 && v.is_finite()
}
