//! Command dispatch
//!
//! The [`Executor`] owns the session state (entity registry, asset library,
//! render backend) and applies one [`Command`] at a time. It is the only
//! place where commands touch the scene graph.

use std::path::{Path, PathBuf};

use scenic_core::{
    AssetLibrary, EntityKind, EntityRegistry, Payload, PluginRegistry, SceneError,
};
use scenic_render::{FlatBackend, RenderBackend};

use crate::command::Command;

/// Session state that commands are applied to
pub struct Executor {
    registry: EntityRegistry,
    assets: AssetLibrary,
    backend: Box<dyn RenderBackend>,
    /// Base for relative mesh and texture paths
    asset_dir: Option<PathBuf>,
    /// Base for relative framebuffer output paths
    output_dir: Option<PathBuf>,
    renders: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(
            EntityRegistry::default(),
            AssetLibrary::default(),
            Box::new(FlatBackend::default()),
        )
    }
}

impl Executor {
    pub fn new(
        registry: EntityRegistry,
        assets: AssetLibrary,
        backend: Box<dyn RenderBackend>,
    ) -> Self {
        Self {
            registry,
            assets,
            backend,
            asset_dir: None,
            output_dir: None,
            renders: 0,
        }
    }

    /// Create an executor with a specific plugin registry and backend
    pub fn with_plugins(plugins: PluginRegistry, backend: Box<dyn RenderBackend>) -> Self {
        Self::new(EntityRegistry::new(plugins), AssetLibrary::default(), backend)
    }

    /// Resolve relative mesh and texture paths against `dir`
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// Resolve relative output paths against `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// The scene graph built so far
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable access to the scene graph
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// The asset library
    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    /// Number of renders performed
    pub fn render_count(&self) -> usize {
        self.renders
    }

    fn resolve(base: Option<&Path>, path: &Path) -> PathBuf {
        match base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Apply one command
    ///
    /// A failing command leaves the graph as it was before the call.
    pub fn apply(&mut self, command: &Command) -> Result<(), SceneError> {
        log::debug!("Applying {}", command);
        let registry = &mut self.registry;
        match command {
            Command::LoadPlugin { name } => {
                registry.plugins_mut().load(name)?;
            }
            Command::NewCamera { id, type_name } => {
                registry.create(EntityKind::Camera, id, Some(type_name.as_str()))?;
            }
            Command::NewLight { id, type_name } => {
                registry.create(EntityKind::Light, id, Some(type_name.as_str()))?;
            }
            Command::NewShader { id, type_name } => {
                registry.create(EntityKind::Shader, id, Some(type_name.as_str()))?;
            }
            Command::NewTexture { id, path } => {
                registry.check_new_id(id)?;
                let path = Self::resolve(self.asset_dir.as_deref(), path);
                let texture = self.assets.load_texture(&path)?;
                registry.create_with(EntityKind::Texture, id, None, Payload::Texture(texture))?;
            }
            Command::NewMesh { id, path } => {
                registry.check_new_id(id)?;
                let path = Self::resolve(self.asset_dir.as_deref(), path);
                let mesh = self.assets.load_mesh(&path)?;
                registry.create_with(EntityKind::Mesh, id, None, Payload::Mesh(mesh))?;
            }
            Command::NewObjectInstance { id, mesh } => {
                registry.create_object_instance(id, mesh)?;
            }
            Command::NewObjectGroup { id } => {
                registry.create(EntityKind::ObjectGroup, id, None)?;
            }
            Command::NewFrameBuffer { id, format } => {
                registry.create(EntityKind::FrameBuffer, id, Some(format.as_str()))?;
            }
            Command::NewRenderer { id } => {
                registry.create(EntityKind::Renderer, id, None)?;
            }
            Command::SetProperty { id, key, values } => {
                registry.set_property(id, key, values)?;
            }
            Command::AssignTexture { owner, slot, texture } => {
                registry.assign_texture(owner, slot, texture)?;
            }
            Command::AssignShader { instance, group, shader } => {
                registry.assign_shader(instance, group, shader)?;
            }
            Command::AddObjectToGroup { group, instance } => {
                registry.add_object_to_group(group, instance)?;
            }
            Command::AssignObjectGroup { instance, role, group } => {
                registry.assign_object_group(instance, role, group)?;
            }
            Command::AssignCamera { renderer, camera } => {
                registry.assign_camera(renderer, camera)?;
            }
            Command::AssignFrameBuffer { renderer, framebuffer } => {
                registry.assign_framebuffer(renderer, framebuffer)?;
            }
            Command::RenderScene { renderer } => {
                scenic_render::render_scene(registry, renderer, self.backend.as_mut())?;
                self.renders += 1;
            }
            Command::SaveFrameBuffer { framebuffer, path } => {
                let path = Self::resolve(self.output_dir.as_deref(), path);
                scenic_render::save_framebuffer(registry, framebuffer, path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd_new_camera(id: &str) -> Command {
        Command::NewCamera {
            id: id.to_string(),
            type_name: "PerspectiveCamera".to_string(),
        }
    }

    #[test]
    fn test_apply_creates_entities() {
        let mut executor = Executor::default();
        executor.apply(&cmd_new_camera("cam1")).unwrap();
        executor
            .apply(&Command::NewRenderer { id: "ren1".to_string() })
            .unwrap();
        assert_eq!(executor.registry().len(), 2);
        assert_eq!(executor.registry().kind("cam1").unwrap(), EntityKind::Camera);
    }

    #[test]
    fn test_apply_reports_duplicate() {
        let mut executor = Executor::default();
        executor.apply(&cmd_new_camera("cam1")).unwrap();
        let err = executor.apply(&cmd_new_camera("cam1")).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateId(_)));
        assert_eq!(executor.registry().len(), 1);
    }

    #[test]
    fn test_missing_mesh_file_creates_nothing() {
        let mut executor = Executor::default().with_asset_dir(std::env::temp_dir());
        let err = executor
            .apply(&Command::NewMesh {
                id: "mesh1".to_string(),
                path: PathBuf::from("scenic_no_such_mesh.obj"),
            })
            .unwrap_err();
        assert!(matches!(err, SceneError::Asset(_)));
        assert!(!executor.registry().contains("mesh1"));
    }

    #[test]
    fn test_shader_needs_plugin() {
        let mut executor = Executor::default();
        let new_shader = Command::NewShader {
            id: "plastic1".to_string(),
            type_name: "PlasticShader".to_string(),
        };
        assert!(matches!(
            executor.apply(&new_shader),
            Err(SceneError::UnknownType { .. })
        ));

        executor
            .apply(&Command::LoadPlugin { name: "PlasticShader".to_string() })
            .unwrap();
        executor.apply(&new_shader).unwrap();
    }

    #[test]
    fn test_resolve_paths() {
        let base = Path::new("/scenes");
        assert_eq!(
            Executor::resolve(Some(base), Path::new("mesh.obj")),
            PathBuf::from("/scenes/mesh.obj")
        );
        assert_eq!(
            Executor::resolve(Some(base), Path::new("/abs/mesh.obj")),
            PathBuf::from("/abs/mesh.obj")
        );
        assert_eq!(
            Executor::resolve(None, Path::new("mesh.obj")),
            PathBuf::from("mesh.obj")
        );
    }
}
