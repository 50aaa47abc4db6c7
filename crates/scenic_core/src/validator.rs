//! Scene graph validation
//!
//! Checks a resolved graph for problems that are not fatal while authoring
//! but worth reporting before a render: shaders bound to shading groups the
//! mesh does not have, instances without any shader, empty target groups,
//! and renderers missing a binding.

use crate::entity::{EntityKind, ShadingGroup, Slot};
use crate::registry::EntityRegistry;
use crate::value::Value;

/// Problem found in a scene graph
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// Scene has no object instances
    NoObjects,
    /// A shader is bound to a group the instance's mesh does not declare
    UnresolvedShadingGroup { instance: String, group: String },
    /// An instance has no shader bound to any group
    MissingShader(String),
    /// An instance targets a group with no members
    EmptyTargetGroup { instance: String, group: String },
    /// A renderer has no camera or framebuffer
    IncompleteRenderer { renderer: String, missing: &'static str },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::NoObjects => write!(f, "Scene has no object instances"),
            ValidationIssue::UnresolvedShadingGroup { instance, group } => write!(
                f,
                "Shading group '{}' of '{}' does not exist in its mesh",
                group, instance
            ),
            ValidationIssue::MissingShader(instance) => {
                write!(f, "Object instance '{}' has no shader", instance)
            }
            ValidationIssue::EmptyTargetGroup { instance, group } => write!(
                f,
                "Object instance '{}' targets empty group '{}'",
                instance, group
            ),
            ValidationIssue::IncompleteRenderer { renderer, missing } => {
                write!(f, "Renderer '{}' has no {}", renderer, missing)
            }
        }
    }
}

/// Static checks over an [`EntityRegistry`]
pub struct GraphValidator;

impl GraphValidator {
    /// Validate the graph, returning all issues found
    pub fn validate(registry: &EntityRegistry) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if registry.iter_kind(EntityKind::ObjectInstance).next().is_none() {
            issues.push(ValidationIssue::NoObjects);
        }

        for (key, instance) in registry.iter_kind(EntityKind::ObjectInstance) {
            let mesh = registry
                .linked(key, &Slot::Mesh)
                .and_then(|mesh| registry.get(mesh))
                .and_then(|mesh| mesh.mesh());

            let mut has_shader = false;
            for (slot, _) in instance.references() {
                match slot {
                    Slot::Shader(group) => {
                        has_shader = true;
                        if let (ShadingGroup::Named(name), Some(mesh)) = (group, mesh) {
                            if !mesh.has_shading_group(name) {
                                issues.push(ValidationIssue::UnresolvedShadingGroup {
                                    instance: instance.name().to_string(),
                                    group: name.clone(),
                                });
                            }
                        }
                    }
                    Slot::Target(_) => {
                        let group = registry
                            .linked(key, slot)
                            .and_then(|group| registry.get(group));
                        if let Some(group) = group {
                            let empty = group
                                .reference(&Slot::Members)
                                .map(|members| members.references().is_empty())
                                .unwrap_or(true);
                            if empty {
                                issues.push(ValidationIssue::EmptyTargetGroup {
                                    instance: instance.name().to_string(),
                                    group: group.name().to_string(),
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
            if !has_shader {
                issues.push(ValidationIssue::MissingShader(instance.name().to_string()));
            }
        }

        for (_, renderer) in registry.iter_kind(EntityKind::Renderer) {
            for (slot, missing) in [(Slot::Camera, "camera"), (Slot::FrameBuffer, "framebuffer")] {
                if !matches!(renderer.reference(&slot), Some(Value::Reference(_))) {
                    issues.push(ValidationIssue::IncompleteRenderer {
                        renderer: renderer.name().to_string(),
                        missing,
                    });
                }
            }
        }

        issues
    }
}
