//! Collaborator contracts and the end-to-end resize driver.
//!
//! The crate never touches pixels or files itself. A [`Processor`] asks a
//! [`MetadataProbe`] for the source properties, an [`OrientationSource`] for
//! the stored orientation, computes a [`ResizePlan`], and hands its commands
//! to a [`RasterEngine`], which owns every intermediate and output file.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::orientation::Orientation;
use crate::plan::{Command, ResizePlan, ResizeRequest, plan};
use crate::transform::{FrameError, ImageProperties};

/// Metadata probe failure.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a recognized image", .0.display())]
    Unrecognized(PathBuf),
}

/// Raster engine failure.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
    #[error("engine output unreadable: {0}")]
    Io(#[from] io::Error),
}

/// Any failure while processing one image.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Reads dimensions, band count and container format.
pub trait MetadataProbe: Sync {
    fn probe(&self, path: &Path) -> Result<ImageProperties, ProbeError>;
}

/// Reads the stored EXIF orientation code. Returns 0 when absent or unknown.
pub trait OrientationSource: Sync {
    fn read_orientation(&self, path: &Path) -> u8;
}

/// Executes engine commands in order against `input`, returning the path of
/// the final output.
pub trait RasterEngine: Sync {
    fn execute(&self, input: &Path, commands: &[Command]) -> Result<PathBuf, EngineError>;
}

/// Result of a successful [`Processor::process`].
#[derive(Clone, Debug, PartialEq)]
pub struct Processed {
    /// Final file written by the engine.
    pub output: PathBuf,
    /// Plan the engine executed.
    pub plan: ResizePlan,
}

/// Drives probe → orientation → plan → engine for one image at a time.
///
/// Holds no mutable state; share it across threads to process independent
/// images in parallel.
#[derive(Clone, Debug)]
pub struct Processor<P, O, E> {
    probe: P,
    orientation: O,
    engine: E,
}

impl<P, O, E> Processor<P, O, E>
where
    P: MetadataProbe,
    O: OrientationSource,
    E: RasterEngine,
{
    pub fn new(probe: P, orientation: O, engine: E) -> Self {
        Self {
            probe,
            orientation,
            engine,
        }
    }

    /// Compute the plan for `input` without running the engine.
    pub fn plan(&self, input: &Path, request: &ResizeRequest) -> Result<ResizePlan, ProcessError> {
        let image = self.probe.probe(input)?;
        log::debug!(
            "probed {}: {}x{} {:?}, {} bands",
            input.display(),
            image.width,
            image.height,
            image.format,
            image.bands
        );

        let code = if image.format.reads_orientation() {
            self.orientation.read_orientation(input)
        } else {
            0
        };
        if Orientation::from_exif(code).is_some_and(Orientation::is_mirrored) {
            log::warn!(
                "{}: mirrored EXIF orientation {code} left uncorrected",
                input.display()
            );
        }

        let plan = plan(&image, code, request)?;
        log::debug!(
            "{}: crop {}x{} at ({}, {}), scale {:.4}, shrink {:?}, quality {:?}",
            input.display(),
            plan.transform.width,
            plan.transform.height,
            plan.transform.x,
            plan.transform.y,
            plan.transform.scale,
            plan.shrink.pre_shrink_factor,
            plan.quality
        );
        Ok(plan)
    }

    /// Plan and execute the resize of `input`.
    pub fn process(&self, input: &Path, request: &ResizeRequest) -> Result<Processed, ProcessError> {
        let plan = self.plan(input, request)?;
        let commands: Vec<Command> = plan.commands().collect();
        let output = self.engine.execute(input, &commands)?;
        log::info!(
            "resized {} -> {} ({} passes)",
            input.display(),
            output.display(),
            commands.len()
        );
        Ok(Processed { output, plan })
    }
}
