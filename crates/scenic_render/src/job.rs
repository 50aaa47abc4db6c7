//! Render jobs - bridges the entity graph to a render backend
//!
//! A [`RenderJob`] is an owned, fully resolved description of one render:
//! settings read from the renderer's properties, the camera view, every
//! object instance with its mesh and shader bindings, and every light.
//! Backends only ever see a job, never the registry.

use std::path::PathBuf;

use scenic_core::{
    Entity, EntityKey, EntityKind, EntityRegistry, SceneError, ShadingGroup, Slot, TargetRole,
    ValidationIssue, GraphValidator,
};

fn scalar(entity: &Entity, key: &str, default: f64) -> f64 {
    entity.property(key).and_then(|v| v.as_scalar()).unwrap_or(default)
}

fn pair(entity: &Entity, key: &str, default: [f64; 2]) -> [f64; 2] {
    entity.property(key).and_then(|v| v.as_pair()).unwrap_or(default)
}

fn triple(entity: &Entity, key: &str, default: [f64; 3]) -> [f64; 3] {
    entity.property(key).and_then(|v| v.as_triple()).unwrap_or(default)
}

/// Largest accepted renderer width or height, in pixels
pub const MAX_RESOLUTION: f64 = 16384.0;

/// Sampling and tracing settings of a renderer
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Output width and height in pixels
    pub resolution: [usize; 2],
    pub pixel_samples: [u32; 2],
    pub tile_size: [u32; 2],
    pub filter_width: [f64; 2],
    pub sample_jitter: f64,
    pub sample_time_range: [f64; 2],
    pub cast_shadow: bool,
    pub max_reflect_depth: u32,
    pub max_refract_depth: u32,
    pub raymarch_step: f64,
    pub raymarch_shadow_step: f64,
    pub raymarch_reflect_step: f64,
    pub raymarch_refract_step: f64,
    /// Worker threads the backend may use (already resolved from `use_max_thread`)
    pub thread_count: usize,
}

impl RenderSettings {
    /// Read settings from a renderer entity
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidValue`] if either resolution component is not a
    /// number in `0..=MAX_RESOLUTION`.
    pub fn from_renderer(renderer: &Entity) -> Result<Self, SceneError> {
        let [xres, yres] = pair(renderer, "resolution", [320.0, 240.0]);
        if !(0.0..=MAX_RESOLUTION).contains(&xres) || !(0.0..=MAX_RESOLUTION).contains(&yres) {
            return Err(SceneError::InvalidValue {
                entity: renderer.name().to_string(),
                key: "resolution".to_string(),
                reason: format!("{} x {} is outside 0..={}", xres, yres, MAX_RESOLUTION),
            });
        }
        let [xsamples, ysamples] = pair(renderer, "pixelsamples", [3.0, 3.0]);
        let [xtile, ytile] = pair(renderer, "tilesize", [64.0, 64.0]);

        let thread_count = if scalar(renderer, "use_max_thread", 0.0) != 0.0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            scalar(renderer, "thread_count", 1.0).max(1.0) as usize
        };

        Ok(Self {
            resolution: [xres as usize, yres as usize],
            pixel_samples: [xsamples.max(1.0) as u32, ysamples.max(1.0) as u32],
            tile_size: [xtile.max(1.0) as u32, ytile.max(1.0) as u32],
            filter_width: pair(renderer, "filterwidth", [2.0, 2.0]),
            sample_jitter: scalar(renderer, "sample_jitter", 1.0),
            sample_time_range: pair(renderer, "sample_time_range", [0.0, 1.0]),
            cast_shadow: scalar(renderer, "cast_shadow", 1.0) != 0.0,
            max_reflect_depth: scalar(renderer, "max_reflect_depth", 3.0).max(0.0) as u32,
            max_refract_depth: scalar(renderer, "max_refract_depth", 3.0).max(0.0) as u32,
            raymarch_step: scalar(renderer, "raymarch_step", 0.05),
            raymarch_shadow_step: scalar(renderer, "raymarch_shadow_step", 0.1),
            raymarch_reflect_step: scalar(renderer, "raymarch_reflect_step", 0.1),
            raymarch_refract_step: scalar(renderer, "raymarch_refract_step", 0.1),
            thread_count,
        })
    }

    /// Output width over height
    pub fn aspect(&self) -> f64 {
        let [width, height] = self.resolution;
        width as f64 / height.max(1) as f64
    }
}

/// Camera placement and projection
#[derive(Clone, Debug, PartialEq)]
pub struct CameraView {
    pub name: String,
    pub type_name: String,
    pub translate: [f64; 3],
    pub rotate: [f64; 3],
    pub fov: f64,
    pub znear: f64,
    pub zfar: f64,
    /// Set from the renderer resolution
    pub aspect: f64,
}

/// A texture bound to a named slot
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBinding {
    pub slot: String,
    pub texture: String,
    pub path: Option<PathBuf>,
}

/// A shader bound to one shading group of an instance
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderBinding {
    pub group: ShadingGroup,
    pub shader: String,
    pub shader_type: String,
    /// Numeric shader properties, sorted by name
    pub properties: Vec<(String, Vec<f64>)>,
    pub textures: Vec<TextureBinding>,
}

/// An object instance ready to render
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceJob {
    pub name: String,
    pub mesh: String,
    pub mesh_path: Option<PathBuf>,
    pub translate: [f64; 3],
    pub rotate: [f64; 3],
    pub scale: [f64; 3],
    pub transform_order: i32,
    pub rotate_order: i32,
    pub shaders: Vec<ShaderBinding>,
    /// Member names of each targeted group
    pub targets: Vec<(TargetRole, Vec<String>)>,
}

impl InstanceJob {
    /// Shader covering `group`, falling back to the default binding
    pub fn shader_for(&self, group: &str) -> Option<&ShaderBinding> {
        self.shaders
            .iter()
            .find(|b| matches!(&b.group, ShadingGroup::Named(name) if name == group))
            .or_else(|| self.shaders.iter().find(|b| b.group == ShadingGroup::All))
    }
}

/// A light ready to render
#[derive(Clone, Debug, PartialEq)]
pub struct LightJob {
    pub name: String,
    pub type_name: String,
    pub translate: [f64; 3],
    pub rotate: [f64; 3],
    pub scale: [f64; 3],
    pub color: [f64; 3],
    pub intensity: f64,
    pub sample_count: u32,
    pub double_sided: bool,
    pub textures: Vec<TextureBinding>,
}

/// Everything a backend needs for one render
#[derive(Clone, Debug, PartialEq)]
pub struct RenderJob {
    pub renderer: String,
    pub settings: RenderSettings,
    pub camera: CameraView,
    pub framebuffer: String,
    pub instances: Vec<InstanceJob>,
    pub lights: Vec<LightJob>,
    /// Non-fatal problems found while resolving
    pub warnings: Vec<ValidationIssue>,
    framebuffer_key: EntityKey,
}

impl RenderJob {
    /// Resolve a job for the renderer named `renderer_id`
    ///
    /// # Errors
    ///
    /// - [`SceneError::UnknownEntity`] / [`SceneError::KindMismatch`] if the id
    ///   does not name a renderer
    /// - [`SceneError::IncompleteRenderer`] if no camera or framebuffer is bound
    /// - [`SceneError::InvalidValue`] if the resolution is out of range
    pub fn resolve(registry: &EntityRegistry, renderer_id: &str) -> Result<Self, SceneError> {
        let renderer_key = registry.expect_kind(renderer_id, &[EntityKind::Renderer], "Renderer")?;
        let renderer = registry
            .get(renderer_key)
            .ok_or_else(|| SceneError::UnknownEntity(renderer_id.to_string()))?;

        let incomplete = |missing| SceneError::IncompleteRenderer {
            renderer: renderer_id.to_string(),
            missing,
        };
        let camera = registry
            .linked(renderer_key, &Slot::Camera)
            .and_then(|key| registry.get(key))
            .ok_or_else(|| incomplete("camera"))?;
        let framebuffer_key = registry
            .linked(renderer_key, &Slot::FrameBuffer)
            .ok_or_else(|| incomplete("framebuffer"))?;
        let framebuffer = registry
            .name_of(framebuffer_key)
            .ok_or_else(|| incomplete("framebuffer"))?
            .to_string();

        let settings = RenderSettings::from_renderer(renderer)?;
        let camera = CameraView {
            name: camera.name().to_string(),
            type_name: camera.type_name().to_string(),
            translate: triple(camera, "translate", [0.0; 3]),
            rotate: triple(camera, "rotate", [0.0; 3]),
            fov: scalar(camera, "fov", 30.0),
            znear: scalar(camera, "znear", 0.01),
            zfar: scalar(camera, "zfar", 1000.0),
            aspect: settings.aspect(),
        };

        let instances = registry
            .iter_kind(EntityKind::ObjectInstance)
            .map(|(key, entity)| resolve_instance(registry, key, entity))
            .collect();
        let lights = registry
            .iter_kind(EntityKind::Light)
            .map(|(_, entity)| resolve_light(registry, entity))
            .collect();

        // Other renderers being incomplete does not concern this render
        let warnings = GraphValidator::validate(registry)
            .into_iter()
            .filter(|issue| !matches!(issue, ValidationIssue::IncompleteRenderer { .. }))
            .collect();

        Ok(Self {
            renderer: renderer_id.to_string(),
            settings,
            camera,
            framebuffer,
            instances,
            lights,
            warnings,
            framebuffer_key,
        })
    }

    /// Key of the output framebuffer
    pub fn framebuffer_key(&self) -> EntityKey {
        self.framebuffer_key
    }
}

fn resolve_textures(registry: &EntityRegistry, entity: &Entity) -> Vec<TextureBinding> {
    entity
        .references()
        .filter_map(|(slot, value)| match slot {
            Slot::Texture(name) => {
                let texture = registry.get(value.as_reference()?)?;
                Some(TextureBinding {
                    slot: name.clone(),
                    texture: texture.name().to_string(),
                    path: texture.texture().map(|t| t.path().to_path_buf()),
                })
            }
            _ => None,
        })
        .collect()
}

fn resolve_instance(registry: &EntityRegistry, key: EntityKey, entity: &Entity) -> InstanceJob {
    let mesh = registry
        .linked(key, &Slot::Mesh)
        .and_then(|mesh| registry.get(mesh));

    let mut shaders = Vec::new();
    let mut targets = Vec::new();
    for (slot, value) in entity.references() {
        let Some(target) = value.as_reference().and_then(|k| registry.get(k)) else {
            continue;
        };
        match slot {
            Slot::Shader(group) => shaders.push(ShaderBinding {
                group: group.clone(),
                shader: target.name().to_string(),
                shader_type: target.type_name().to_string(),
                properties: target
                    .properties()
                    .map(|(k, v)| (k.to_string(), v.components()))
                    .collect(),
                textures: resolve_textures(registry, target),
            }),
            Slot::Target(role) => {
                let members = target
                    .reference(&Slot::Members)
                    .map(|m| m.references())
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|&member| registry.name_of(member))
                    .map(str::to_string)
                    .collect();
                targets.push((*role, members));
            }
            _ => {}
        }
    }

    InstanceJob {
        name: entity.name().to_string(),
        mesh: mesh.map(|m| m.name().to_string()).unwrap_or_default(),
        mesh_path: mesh.and_then(|m| m.mesh()).map(|m| m.path().to_path_buf()),
        translate: triple(entity, "translate", [0.0; 3]),
        rotate: triple(entity, "rotate", [0.0; 3]),
        scale: triple(entity, "scale", [1.0; 3]),
        transform_order: scalar(entity, "transform_order", 0.0) as i32,
        rotate_order: scalar(entity, "rotate_order", 0.0) as i32,
        shaders,
        targets,
    }
}

fn resolve_light(registry: &EntityRegistry, entity: &Entity) -> LightJob {
    LightJob {
        name: entity.name().to_string(),
        type_name: entity.type_name().to_string(),
        translate: triple(entity, "translate", [0.0; 3]),
        rotate: triple(entity, "rotate", [0.0; 3]),
        scale: triple(entity, "scale", [1.0; 3]),
        color: triple(entity, "color", [1.0; 3]),
        intensity: scalar(entity, "intensity", 1.0),
        sample_count: scalar(entity, "sample_count", 1.0).max(1.0) as u32,
        double_sided: scalar(entity, "double_sided", 0.0) != 0.0,
        textures: resolve_textures(registry, entity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenic_core::{AssetCache, MeshAsset, MeshData, Payload, DEFAULT_SHADING_GROUP};

    fn scene() -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry.plugins_mut().load("PlasticShader").unwrap();

        let mut cache = AssetCache::new();
        let (handle, data) = cache
            .load_with("dragon.obj", |_| {
                Ok(MeshData {
                    shading_groups: vec!["body".to_string()],
                    ..Default::default()
                })
            })
            .unwrap();
        registry
            .create_with(
                EntityKind::Mesh,
                "dragon_mesh",
                Some("dragon.obj"),
                Payload::Mesh(MeshAsset { handle, data }),
            )
            .unwrap();
        registry.create_object_instance("dragon", "dragon_mesh").unwrap();
        registry.create(EntityKind::Shader, "plastic", Some("PlasticShader")).unwrap();
        registry.assign_shader("dragon", DEFAULT_SHADING_GROUP, "plastic").unwrap();
        registry.create(EntityKind::Light, "key", Some("PointLight")).unwrap();
        registry.set_property("key", "intensity", &[2.5]).unwrap();

        registry
            .create(EntityKind::Camera, "cam", Some("PerspectiveCamera"))
            .unwrap();
        registry.create(EntityKind::FrameBuffer, "fb", Some("rgba")).unwrap();
        registry.create(EntityKind::Renderer, "ren", None).unwrap();
        registry
    }

    #[test]
    fn test_incomplete_renderer() {
        let mut registry = scene();
        match RenderJob::resolve(&registry, "ren") {
            Err(SceneError::IncompleteRenderer { missing, .. }) => assert_eq!(missing, "camera"),
            other => panic!("Expected IncompleteRenderer, got {:?}", other),
        }

        registry.assign_camera("ren", "cam").unwrap();
        match RenderJob::resolve(&registry, "ren") {
            Err(SceneError::IncompleteRenderer { missing, .. }) => assert_eq!(missing, "framebuffer"),
            other => panic!("Expected IncompleteRenderer, got {:?}", other),
        }
    }

    #[test]
    fn test_not_a_renderer() {
        let registry = scene();
        assert!(matches!(
            RenderJob::resolve(&registry, "cam"),
            Err(SceneError::KindMismatch { .. })
        ));
        assert!(matches!(
            RenderJob::resolve(&registry, "nope"),
            Err(SceneError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_resolve_job() {
        let mut registry = scene();
        registry.assign_camera("ren", "cam").unwrap();
        registry.assign_framebuffer("ren", "fb").unwrap();
        registry.set_property("ren", "resolution", &[640.0, 480.0]).unwrap();

        let job = RenderJob::resolve(&registry, "ren").unwrap();
        assert_eq!(job.settings.resolution, [640, 480]);
        assert_eq!(job.settings.pixel_samples, [3, 3]);
        assert!((job.camera.aspect - 640.0 / 480.0).abs() < 1e-12);
        assert_eq!(job.camera.fov, 30.0);
        assert_eq!(job.framebuffer, "fb");

        assert_eq!(job.instances.len(), 1);
        let dragon = &job.instances[0];
        assert_eq!(dragon.mesh, "dragon_mesh");
        assert_eq!(dragon.mesh_path, Some(PathBuf::from("dragon.obj")));
        assert_eq!(dragon.shader_for("body").unwrap().shader, "plastic");

        assert_eq!(job.lights.len(), 1);
        assert_eq!(job.lights[0].intensity, 2.5);
        assert!(job.warnings.is_empty());
    }

    #[test]
    fn test_unresolved_group_is_a_warning() {
        let mut registry = scene();
        registry.assign_camera("ren", "cam").unwrap();
        registry.assign_framebuffer("ren", "fb").unwrap();
        registry.assign_shader("dragon", "wings", "plastic").unwrap();

        let job = RenderJob::resolve(&registry, "ren").unwrap();
        assert_eq!(
            job.warnings,
            vec![ValidationIssue::UnresolvedShadingGroup {
                instance: "dragon".to_string(),
                group: "wings".to_string(),
            }]
        );
    }

    #[test]
    fn test_use_max_thread() {
        let mut registry = scene();
        registry.set_property("ren", "thread_count", &[4.0]).unwrap();
        let renderer = registry.lookup("ren").unwrap();
        assert_eq!(RenderSettings::from_renderer(renderer).unwrap().thread_count, 4);

        registry.set_property("ren", "use_max_thread", &[1.0]).unwrap();
        let renderer = registry.lookup("ren").unwrap();
        assert!(RenderSettings::from_renderer(renderer).unwrap().thread_count >= 1);
    }

    #[test]
    fn test_resolution_out_of_range() {
        let mut registry = scene();
        registry.assign_camera("ren", "cam").unwrap();
        registry.assign_framebuffer("ren", "fb").unwrap();

        for bad in [[1e300, 1e300], [-1.0, 240.0], [f64::NAN, 240.0], [320.0, f64::INFINITY]] {
            registry.set_property("ren", "resolution", &bad).unwrap();
            match RenderJob::resolve(&registry, "ren") {
                Err(SceneError::InvalidValue { entity, key, .. }) => {
                    assert_eq!(entity, "ren");
                    assert_eq!(key, "resolution");
                }
                other => panic!("Expected InvalidValue for {:?}, got {:?}", bad, other),
            }
        }

        registry
            .set_property("ren", "resolution", &[MAX_RESOLUTION, 0.0])
            .unwrap();
        let job = RenderJob::resolve(&registry, "ren").unwrap();
        assert_eq!(job.settings.resolution, [16384, 0]);
    }
}
