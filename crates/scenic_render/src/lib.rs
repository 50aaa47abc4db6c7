//! Renderer invocation for scenic
//!
//! This crate turns a renderer entity into pixels and writes them out.
//!
//! ## Key Components
//!
//! - [`job::RenderJob`] - Owned snapshot of everything one render needs
//! - [`backend::RenderBackend`] - Pixel computation behind a narrow trait
//! - [`codec`] - Native `.fb` and PNG framebuffer files
//!
//! [`render_scene`] resolves a job, sizes the output framebuffer, and calls
//! the backend once. [`save_framebuffer`] persists a framebuffer by name.

pub mod backend;
pub mod codec;
pub mod job;

use std::path::Path;
use std::time::Instant;

use scenic_core::{EntityKind, EntityRegistry, SceneError};

pub use backend::{BackendError, FlatBackend, RenderBackend};
pub use job::{
    CameraView, InstanceJob, LightJob, RenderJob, RenderSettings, ShaderBinding, MAX_RESOLUTION,
};

/// Render the scene seen by `renderer_id` into its framebuffer
///
/// Validation issues found while resolving are logged as warnings and do
/// not stop the render. The call blocks until the backend returns.
///
/// # Errors
///
/// - [`SceneError::UnknownEntity`] / [`SceneError::KindMismatch`] for a bad renderer id
/// - [`SceneError::IncompleteRenderer`] if camera or framebuffer is unbound
/// - [`SceneError::InvalidValue`] if the resolution is out of range
/// - [`SceneError::Backend`] if the backend fails
pub fn render_scene(
    registry: &mut EntityRegistry,
    renderer_id: &str,
    backend: &mut dyn RenderBackend,
) -> Result<(), SceneError> {
    let job = RenderJob::resolve(registry, renderer_id)?;
    for warning in &job.warnings {
        log::warn!("{}: {}", renderer_id, warning);
    }

    let [width, height] = job.settings.resolution;
    let target = registry
        .framebuffer_mut(job.framebuffer_key())
        .ok_or_else(|| SceneError::UnknownEntity(job.framebuffer.clone()))?;
    target
        .resize(width, height)
        .map_err(|err| SceneError::InvalidValue {
            entity: renderer_id.to_string(),
            key: "resolution".to_string(),
            reason: err.to_string(),
        })?;

    log::info!(
        "Rendering '{}' at {}x{} with {} backend ({} instances, {} lights)",
        renderer_id,
        width,
        height,
        backend.name(),
        job.instances.len(),
        job.lights.len()
    );
    let start = Instant::now();
    backend.render(&job, target)?;
    log::info!("Rendered '{}' in {:.2?}", renderer_id, start.elapsed());
    Ok(())
}

/// Write the framebuffer named `id` to `path`
///
/// # Errors
///
/// - [`SceneError::UnknownEntity`] if `id` is missing or not a framebuffer
/// - [`SceneError::Io`] if the file cannot be written
pub fn save_framebuffer(
    registry: &EntityRegistry,
    id: &str,
    path: impl AsRef<Path>,
) -> Result<(), SceneError> {
    let path = path.as_ref();
    let fb = registry
        .lookup(id)
        .filter(|entity| entity.kind() == EntityKind::FrameBuffer)
        .and_then(|entity| entity.framebuffer())
        .ok_or_else(|| SceneError::UnknownEntity(id.to_string()))?;
    codec::save(fb, path)?;
    log::info!("Saved framebuffer '{}' to {}", id, path.display());
    Ok(())
}
