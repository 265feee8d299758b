//! Interest-aware crop and scale computation for image resizing.
//!
//! Pure geometry on scalar inputs. No pixel operations and no allocations;
//! the core is `no_std` compatible. Pixel work is left to an external raster engine.
//!
//! # Modules
//!
//! - [`transform`]: Crop rectangle and scale that keep a point of interest visible
//! - [`quality`]: JPEG quality interpolated from output area
//! - [`orientation`]: EXIF orientation and the rotation that corrects it
//! - [`shrink`]: Two-pass downscale planning
//! - [`plan`]: Per-image resize plan and engine command sequence
//! - `process` (`std`): Collaborator traits and the end-to-end driver

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate alloc;

pub mod orientation;
pub mod plan;
#[cfg(feature = "std")]
pub mod process;
pub mod quality;
pub mod shrink;
pub mod transform;

pub use orientation::{Orientation, OrientationCorrection, Rotation};
pub use plan::{Command, INTERMEDIATE_QUALITY, ResizePlan, ResizeRequest, plan};
#[cfg(feature = "std")]
pub use process::{
    EngineError, MetadataProbe, OrientationSource, ProbeError, ProcessError, Processed, Processor,
    RasterEngine,
};
pub use quality::{QualityCurve, QualityLimit};
pub use shrink::{DIRECT_PASS_MIN_SCALE, ShrinkPlan, plan_shrink};
pub use transform::{
    DEFAULT_REGION, FrameError, ImageFormat, ImageProperties, InterestPoint, OutputFormat,
    Transform, ViewportRequest, calculate,
};
