//! Name-resolved view of a scene graph
//!
//! A [`GraphSnapshot`] replaces every [`EntityKey`](crate::EntityKey) with
//! the name it points at, so two registries built from the same commands
//! compare equal even though their keys differ.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Payload};
use crate::registry::EntityRegistry;

/// Snapshot of one entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub kind: String,
    pub type_name: String,
    pub properties: BTreeMap<String, Vec<f64>>,
    /// Slot name to referenced entity names
    pub references: BTreeMap<String, Vec<String>>,
    /// Short description of the payload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Snapshot of a whole registry, entities in creation order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub plugins: Vec<String>,
    pub entities: Vec<EntitySnapshot>,
}

impl GraphSnapshot {
    /// Find an entity by name
    pub fn entity(&self, name: &str) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.name == name)
    }
}

impl EntityRegistry {
    /// Take a name-resolved snapshot of the graph
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            plugins: self
                .plugins()
                .loaded_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            entities: self.iter().map(|(_, e)| self.snapshot_entity(e)).collect(),
        }
    }

    fn snapshot_entity(&self, entity: &Entity) -> EntitySnapshot {
        let properties = entity
            .properties()
            .map(|(key, value)| (key.to_string(), value.components()))
            .collect();
        let references = entity
            .references()
            .map(|(slot, value)| {
                let names = value
                    .references()
                    .iter()
                    .filter_map(|&key| self.name_of(key))
                    .map(str::to_string)
                    .collect();
                (slot.to_string(), names)
            })
            .collect();
        let payload = match entity.payload() {
            Payload::None => None,
            Payload::Mesh(mesh) => Some(format!("mesh {}", mesh.path().display())),
            Payload::Texture(texture) => Some(format!("texture {}", texture.path().display())),
            Payload::FrameBuffer(fb) => Some(format!(
                "{}x{}x{}",
                fb.width(),
                fb.height(),
                fb.channels()
            )),
        };

        EntitySnapshot {
            name: entity.name().to_string(),
            kind: entity.kind().to_string(),
            type_name: entity.type_name().to_string(),
            properties,
            references,
            payload,
        }
    }
}

fn write_components(f: &mut fmt::Formatter<'_>, components: &[f64]) -> fmt::Result {
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

impl fmt::Display for GraphSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.plugins.is_empty() {
            writeln!(f, "plugins: {}", self.plugins.join(", "))?;
        }
        for entity in &self.entities {
            write!(f, "{} '{}' ({})", entity.kind, entity.name, entity.type_name)?;
            if let Some(payload) = &entity.payload {
                write!(f, " [{}]", payload)?;
            }
            writeln!(f)?;
            for (key, components) in &entity.properties {
                write!(f, "  {} = ", key)?;
                write_components(f, components)?;
                writeln!(f)?;
            }
            for (slot, names) in &entity.references {
                writeln!(f, "  {} -> {}", slot, names.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::EntityKind;
    use crate::registry::EntityRegistry;

    fn build() -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry
            .create(EntityKind::Camera, "cam1", Some("PerspectiveCamera"))
            .unwrap();
        registry.create(EntityKind::FrameBuffer, "fb1", Some("rgb")).unwrap();
        registry.create(EntityKind::Renderer, "ren1", None).unwrap();
        registry.set_property("cam1", "fov", &[45.0]).unwrap();
        registry.assign_camera("ren1", "cam1").unwrap();
        registry.assign_framebuffer("ren1", "fb1").unwrap();
        registry
    }

    #[test]
    fn test_snapshot_resolves_names() {
        let snapshot = build().snapshot();
        assert_eq!(snapshot.entities.len(), 3);

        let renderer = snapshot.entity("ren1").unwrap();
        assert_eq!(renderer.references["camera"], vec!["cam1".to_string()]);
        assert_eq!(renderer.references["framebuffer"], vec!["fb1".to_string()]);
        assert_eq!(renderer.properties["resolution"], vec![320.0, 240.0]);

        let camera = snapshot.entity("cam1").unwrap();
        assert_eq!(camera.properties["fov"], vec![45.0]);
        assert_eq!(snapshot.entity("fb1").unwrap().payload.as_deref(), Some("0x0x3"));
    }

    #[test]
    fn test_equal_graphs_compare_equal() {
        assert_eq!(build().snapshot(), build().snapshot());

        let mut other = build();
        other.set_property("cam1", "fov", &[50.0]).unwrap();
        assert_ne!(build().snapshot(), other.snapshot());
    }

    #[test]
    fn test_display() {
        let text = build().snapshot().to_string();
        assert!(text.contains("Camera 'cam1' (PerspectiveCamera)"));
        assert!(text.contains("  fov = 45"));
        assert!(text.contains("  camera -> cam1"));
    }
}
