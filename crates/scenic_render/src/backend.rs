//! Render backends
//!
//! Pixel computation lives behind [`RenderBackend`]. A backend receives a
//! resolved [`RenderJob`] and a framebuffer already sized to the job's
//! resolution, and fills it in one blocking call.

use scenic_core::{FrameBuffer, SceneError};
use thiserror::Error;

use crate::job::RenderJob;

/// Failure reported by a backend
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<BackendError> for SceneError {
    fn from(err: BackendError) -> Self {
        SceneError::Backend(err.0)
    }
}

/// Computes the pixels of a render job
pub trait RenderBackend {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Render `job` into `target`
    fn render(&mut self, job: &RenderJob, target: &mut FrameBuffer) -> Result<(), BackendError>;
}

/// Backend that fills the framebuffer with a single colour
///
/// Useful for checking scene assembly and output paths without a tracer.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatBackend {
    pub background: [f32; 4],
}

impl Default for FlatBackend {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl FlatBackend {
    pub fn new(background: [f32; 4]) -> Self {
        Self { background }
    }
}

impl RenderBackend for FlatBackend {
    fn name(&self) -> &str {
        "flat"
    }

    fn render(&mut self, _job: &RenderJob, target: &mut FrameBuffer) -> Result<(), BackendError> {
        target.fill(&self.background);
        Ok(())
    }
}
