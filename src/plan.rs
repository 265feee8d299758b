//! Resize planning and the engine command sequence.
//!
//! [`plan()`] runs the whole computation for one image: orientation
//! correction, dimension swap, transform, quality and shrink plan.
//! [`ResizePlan::commands()`] turns the result into the ordered steps the
//! raster engine executes.

use crate::orientation::{self, OrientationCorrection, Rotation};
use crate::quality::QualityCurve;
use crate::shrink::ShrinkPlan;
use crate::transform::{
    FrameError, ImageProperties, InterestPoint, OutputFormat, Transform, ViewportRequest,
    calculate,
};

/// Quality for lossy intermediates written between engine passes.
pub const INTERMEDIATE_QUALITY: f64 = 90.0;

/// A single raster engine step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Rotate the source upright. Always written as a JPEG intermediate.
    Rotate {
        /// Clockwise turn that makes the stored pixels upright.
        rotation: Rotation,
        /// Intermediate JPEG quality.
        quality: f64,
    },
    /// Drop embedded metadata, the orientation tag included, from the
    /// rotated intermediate. Emitted right after every [`Command::Rotate`].
    StripMetadata,
    /// Fast whole-factor shrink on both axes.
    Shrink {
        /// Integer divisor applied to both dimensions.
        factor: u32,
        /// Intermediate quality when the output is lossy.
        quality: Option<f64>,
    },
    /// Uniform scale followed by a crop of the scaled image.
    Affine {
        /// Scale relative to the input of this pass.
        scale: f64,
        /// Crop left edge in the scaled image.
        x: f64,
        /// Crop top edge in the scaled image.
        y: f64,
        /// Output width.
        width: f64,
        /// Output height.
        height: f64,
        /// Final encoder quality when the output is lossy.
        quality: Option<f64>,
    },
}

/// What to produce from a source image.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeRequest {
    /// Output dimensions.
    pub viewport: ViewportRequest,
    /// Point kept in view. [`InterestPoint::none`] frames the whole image.
    pub interest: InterestPoint,
    /// Quality curve applied to lossy output.
    pub quality: QualityCurve,
}

impl ResizeRequest {
    /// Request for a viewport, no POI, default quality curve.
    pub fn new(viewport: ViewportRequest) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Set the point of interest.
    pub fn interest(mut self, interest: InterestPoint) -> Self {
        self.interest = interest;
        self
    }

    /// Set the quality curve used for lossy output.
    pub fn quality(mut self, quality: QualityCurve) -> Self {
        self.quality = quality;
        self
    }
}

/// Everything the engine needs for one image.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizePlan {
    /// Orientation fix applied before the transform.
    pub correction: OrientationCorrection,
    /// Source properties after the orientation fix.
    pub oriented: ImageProperties,
    /// Crop and scale relative to `oriented`.
    pub transform: Transform,
    /// How the engine reaches `transform.scale`.
    pub shrink: ShrinkPlan,
    /// Container the output is encoded in.
    pub output: OutputFormat,
    /// Encoder quality. `None` for lossless output.
    pub quality: Option<f64>,
}

impl ResizePlan {
    /// Engine steps in execution order: rotate and strip, shrink, affine.
    pub fn commands(&self) -> impl Iterator<Item = Command> + use<> {
        let rotate = self.correction.rotation.into_iter().flat_map(|rotation| {
            [
                Command::Rotate {
                    rotation,
                    quality: INTERMEDIATE_QUALITY,
                },
                Command::StripMetadata,
            ]
        });
        let intermediate = self.quality.map(|_| INTERMEDIATE_QUALITY);
        let shrink = self
            .shrink
            .pre_shrink_factor
            .map(|factor| Command::Shrink {
                factor,
                quality: intermediate,
            });
        let affine = Command::Affine {
            scale: self.shrink.residual_scale,
            x: self.transform.x,
            y: self.transform.y,
            width: self.transform.width,
            height: self.transform.height,
            quality: self.quality,
        };
        rotate
            .chain(shrink)
            .chain(core::iter::once(affine))
    }

    /// Number of engine passes.
    pub fn pass_count(&self) -> usize {
        self.commands().count()
    }
}

/// Plan the resize of an image with the given probed properties and raw
/// EXIF orientation code.
///
/// The orientation code is ignored unless the source is JPEG. Quality is only
/// computed for lossy output.
pub fn plan(
    image: &ImageProperties,
    orientation_code: u8,
    request: &ResizeRequest,
) -> Result<ResizePlan, FrameError> {
    let correction = if image.format.reads_orientation() {
        orientation::resolve(orientation_code)
    } else {
        OrientationCorrection::NONE
    };
    let oriented = if correction.swap_dimensions {
        image.swapped()
    } else {
        *image
    };

    let transform = calculate(&oriented, &request.viewport, &request.interest)?;

    let output = image.format.output_format();
    let quality = if output.is_lossy() {
        Some(request.quality.evaluate(transform.width, transform.height)?)
    } else {
        None
    };

    Ok(ResizePlan {
        correction,
        oriented,
        transform,
        shrink: ShrinkPlan::for_scale(transform.scale),
        output,
        quality,
    })
}
