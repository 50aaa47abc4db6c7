//! Material import from Wavefront OBJ/MTL
//!
//! [`assign_materials`] reads the face groups of an OBJ file and the
//! materials of its MTL library, then issues `NewShader`, `SetProperty`,
//! `NewTexture`, `AssignTexture` and `AssignShader` calls so each group of
//! the instance gets a shader built from its material. Only properties and
//! texture slots the shader type declares are set, as described by the
//! session's plugin registry.

use std::path::Path;

use scenic_core::AssetError;

use crate::interface::SceneInterface;

/// What an import queued
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    /// Shader ids created, one per material
    pub shaders: Vec<String>,
    /// Texture ids created
    pub textures: Vec<String>,
    /// (group, shader) bindings queued
    pub bindings: Vec<(String, String)>,
}

fn shader_id(instance: &str, material: &str) -> String {
    format!("{}_{}", instance, material)
}

/// Queue shaders for the materials of `obj_path` and bind them to `instance`
///
/// `shader_type` must name a plugin that will be loaded by the time the
/// queue runs. If the session's plugin provider does not know it, only the
/// shaders and bindings are queued. The OBJ file is read now; the queued
/// calls are validated when the queue runs.
pub fn assign_materials(
    si: &mut SceneInterface,
    obj_path: impl AsRef<Path>,
    instance: &str,
    shader_type: &str,
) -> Result<ImportSummary, AssetError> {
    let obj_path = obj_path.as_ref();
    let (models, materials) = tobj::load_obj(
        obj_path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No materials for {}: {}", obj_path.display(), err);
        Vec::new()
    });

    let schema = si
        .registry()
        .plugins()
        .describe(shader_type)
        .map(|plugin| plugin.schema.clone());
    if schema.is_none() {
        log::warn!("Unknown shader type '{}', material values not imported", shader_type);
    }
    let declares = |key: &str| schema.as_deref().is_some_and(|s| s.find(key).is_some());
    let has_slot = |slot: &str| schema.as_deref().is_some_and(|s| s.has_texture_slot(slot));
    let base_dir = obj_path.parent().unwrap_or_else(|| Path::new(""));

    let mut summary = ImportSummary::default();
    for material in &materials {
        let shader = shader_id(instance, &material.name);
        si.new_shader(&shader, shader_type);

        let colors = [
            ("diffuse", material.diffuse),
            ("specular", material.specular),
            ("ambient", material.ambient),
        ];
        for (key, color) in colors {
            if let Some([r, g, b]) = color {
                if declares(key) {
                    si.set_property3(&shader, key, r.into(), g.into(), b.into());
                }
            }
        }
        if let Some(ior) = material.optical_density {
            if declares("ior") {
                si.set_property1(&shader, "ior", ior.into());
            }
        }
        if let Some(opacity) = material.dissolve {
            if declares("opacity") {
                si.set_property1(&shader, "opacity", opacity.into());
            }
        }

        let maps = [
            ("diffuse_map", &material.diffuse_texture),
            ("bump_map", &material.normal_texture),
        ];
        for (slot, file) in maps {
            let Some(file) = file else { continue };
            if !has_slot(slot) {
                continue;
            }
            let texture = format!("{}_{}", shader, slot);
            si.new_texture(&texture, base_dir.join(file));
            si.assign_texture(&shader, slot, &texture);
            summary.textures.push(texture);
        }
        summary.shaders.push(shader);
    }

    for model in &models {
        let Some(material) = model.mesh.material_id.and_then(|id| materials.get(id)) else {
            continue;
        };
        if model.name.is_empty() {
            continue;
        }
        let shader = shader_id(instance, &material.name);
        si.assign_shader(instance, &model.name, &shader);
        summary.bindings.push((model.name.clone(), shader));
    }

    log::info!(
        "Imported {} material(s) for '{}' from {}",
        summary.shaders.len(),
        instance,
        obj_path.display()
    );
    Ok(summary)
}
