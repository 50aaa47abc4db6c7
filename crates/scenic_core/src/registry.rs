//! Entity registry
//!
//! The registry owns every entity of a scene session. Entities are stored in
//! a slot map and indexed by their user-chosen name; other components refer
//! to them only by name or [`EntityKey`].

use std::collections::HashMap;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::entity::{Entity, EntityKind, Payload, Slot, DEFAULT_SHADING_GROUP};
use crate::error::SceneError;
use crate::framebuffer::{channels_for_format, FrameBuffer};
use crate::plugin::PluginRegistry;
use crate::schema::{BuiltinSchemas, EntitySchema};
use crate::value::Value;

new_key_type! {
    /// Key to an entity in the registry
    pub struct EntityKey;
}

/// Owner of all entities in a scene session
pub struct EntityRegistry {
    entities: SlotMap<EntityKey, Entity>,
    names: HashMap<String, EntityKey>,
    /// Keys in creation order
    order: Vec<EntityKey>,
    plugins: PluginRegistry,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(PluginRegistry::default())
    }
}

impl EntityRegistry {
    /// Create an empty registry that resolves shader types through `plugins`
    pub fn new(plugins: PluginRegistry) -> Self {
        Self {
            entities: SlotMap::with_key(),
            names: HashMap::new(),
            order: Vec::new(),
            plugins,
        }
    }

    /// The plugin registry
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Mutable access to the plugin registry (for loading plugins)
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Create an entity with the default payload for its kind
    ///
    /// `type_name` is required for Camera, Light, Shader and FrameBuffer.
    pub fn create(
        &mut self,
        kind: EntityKind,
        id: &str,
        type_name: Option<&str>,
    ) -> Result<EntityKey, SceneError> {
        let payload = match kind {
            EntityKind::FrameBuffer => {
                let channels = type_name.and_then(channels_for_format).unwrap_or(4);
                Payload::FrameBuffer(FrameBuffer::new(channels))
            }
            _ => Payload::None,
        };
        self.create_with(kind, id, type_name, payload)
    }

    /// Create an entity with an explicit payload
    pub fn create_with(
        &mut self,
        kind: EntityKind,
        id: &str,
        type_name: Option<&str>,
        payload: Payload,
    ) -> Result<EntityKey, SceneError> {
        self.check_new_id(id)?;
        let schema = self.schema_for(kind, type_name)?;
        let type_name = type_name.unwrap_or(kind.name());

        let mut entity = Entity::new(id, kind, type_name, schema).with_payload(payload);
        if kind == EntityKind::ObjectGroup {
            entity.set_reference(Slot::Members, Value::ReferenceList(Vec::new()));
        }

        let key = self.entities.insert(entity);
        self.names.insert(id.to_string(), key);
        self.order.push(key);
        log::debug!("Created {} '{}' ({})", kind, id, type_name);
        Ok(key)
    }

    /// Check that `id` may name a new entity
    pub fn check_new_id(&self, id: &str) -> Result<(), SceneError> {
        if id == DEFAULT_SHADING_GROUP {
            return Err(SceneError::ReservedId(id.to_string()));
        }
        if self.names.contains_key(id) {
            return Err(SceneError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn schema_for(
        &self,
        kind: EntityKind,
        type_name: Option<&str>,
    ) -> Result<Arc<EntitySchema>, SceneError> {
        let unknown = || SceneError::UnknownType {
            kind,
            type_name: type_name.unwrap_or_default().to_string(),
        };
        match kind {
            EntityKind::Camera => type_name.and_then(BuiltinSchemas::camera).ok_or_else(unknown),
            EntityKind::Light => type_name.and_then(BuiltinSchemas::light).ok_or_else(unknown),
            EntityKind::Shader => type_name
                .and_then(|t| self.plugins.get(t))
                .map(|plugin| plugin.schema.clone())
                .ok_or_else(unknown),
            EntityKind::FrameBuffer => type_name
                .and_then(channels_for_format)
                .map(|_| BuiltinSchemas::empty())
                .ok_or_else(unknown),
            EntityKind::ObjectInstance => Ok(BuiltinSchemas::object_instance()),
            EntityKind::Renderer => Ok(BuiltinSchemas::renderer()),
            EntityKind::Texture | EntityKind::Mesh | EntityKind::ObjectGroup => {
                Ok(BuiltinSchemas::empty())
            }
        }
    }

    /// Look up an entity by name
    pub fn lookup(&self, id: &str) -> Option<&Entity> {
        self.names.get(id).and_then(|&key| self.entities.get(key))
    }

    /// Key of a named entity
    pub fn key(&self, id: &str) -> Option<EntityKey> {
        self.names.get(id).copied()
    }

    /// Get an entity by key
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Name of the entity behind a key
    pub fn name_of(&self, key: EntityKey) -> Option<&str> {
        self.entities.get(key).map(Entity::name)
    }

    /// Kind of a named entity
    pub fn kind(&self, id: &str) -> Result<EntityKind, SceneError> {
        self.lookup(id)
            .map(Entity::kind)
            .ok_or_else(|| SceneError::UnknownEntity(id.to_string()))
    }

    /// Check if a name is registered
    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    /// Resolve `id` and check its kind is one of `expected`
    ///
    /// `label` names the accepted kinds in the error message.
    pub fn expect_kind(
        &self,
        id: &str,
        expected: &[EntityKind],
        label: &'static str,
    ) -> Result<EntityKey, SceneError> {
        let key = self
            .key(id)
            .ok_or_else(|| SceneError::UnknownEntity(id.to_string()))?;
        let actual = self.entities[key].kind();
        if !expected.contains(&actual) {
            return Err(SceneError::KindMismatch {
                entity: id.to_string(),
                expected: label,
                actual,
            });
        }
        Ok(key)
    }

    /// Mutable pixel storage of a framebuffer entity
    pub fn framebuffer_mut(&mut self, key: EntityKey) -> Option<&mut FrameBuffer> {
        self.entities.get_mut(key).and_then(Entity::framebuffer_mut)
    }

    /// Number of entities
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the registry is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over keys and entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.order.iter().map(move |&key| (key, &self.entities[key]))
    }

    /// Iterate over entities of one kind in creation order
    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.iter().filter(move |(_, e)| e.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_plastic() -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry.plugins_mut().load("PlasticShader").unwrap();
        registry
    }

    #[test]
    fn test_registry_new() {
        let registry = EntityRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_create_and_lookup() {
        let mut registry = registry_with_plastic();
        let ids = [
            (EntityKind::Camera, "cam1", Some("PerspectiveCamera")),
            (EntityKind::Light, "light1", Some("DomeLight")),
            (EntityKind::Shader, "shader1", Some("PlasticShader")),
            (EntityKind::ObjectGroup, "group1", None),
            (EntityKind::FrameBuffer, "fb1", Some("rgba")),
            (EntityKind::Renderer, "ren1", None),
        ];
        for (kind, id, type_name) in ids {
            registry.create(kind, id, type_name).unwrap();
        }

        assert_eq!(registry.len(), ids.len());
        for (kind, id, _) in ids {
            let entity = registry.lookup(id).expect("entity should exist");
            assert_eq!(entity.name(), id);
            assert_eq!(entity.kind(), kind);
            assert_eq!(registry.kind(id).unwrap(), kind);
        }
    }

    #[test]
    fn test_duplicate_id_leaves_original() {
        let mut registry = EntityRegistry::default();
        registry
            .create(EntityKind::Camera, "thing", Some("PerspectiveCamera"))
            .unwrap();

        let result = registry.create(EntityKind::Renderer, "thing", None);
        assert!(matches!(result, Err(SceneError::DuplicateId(ref id)) if id == "thing"));

        let entity = registry.lookup("thing").unwrap();
        assert_eq!(entity.kind(), EntityKind::Camera);
        assert_eq!(entity.type_name(), "PerspectiveCamera");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reserved_id_rejected() {
        let mut registry = EntityRegistry::default();
        let result = registry.create(EntityKind::ObjectGroup, DEFAULT_SHADING_GROUP, None);
        assert!(matches!(result, Err(SceneError::ReservedId(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_types() {
        let mut registry = EntityRegistry::default();
        assert!(matches!(
            registry.create(EntityKind::Camera, "cam", Some("FisheyeCamera")),
            Err(SceneError::UnknownType { kind: EntityKind::Camera, .. })
        ));
        assert!(matches!(
            registry.create(EntityKind::Light, "light", None),
            Err(SceneError::UnknownType { kind: EntityKind::Light, .. })
        ));
        // Shader types must be loaded first
        assert!(matches!(
            registry.create(EntityKind::Shader, "s", Some("PlasticShader")),
            Err(SceneError::UnknownType { kind: EntityKind::Shader, .. })
        ));
        assert!(matches!(
            registry.create(EntityKind::FrameBuffer, "fb", Some("cmyk")),
            Err(SceneError::UnknownType { kind: EntityKind::FrameBuffer, .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let registry = EntityRegistry::default();
        assert!(registry.lookup("ghost").is_none());
        assert!(matches!(registry.kind("ghost"), Err(SceneError::UnknownEntity(_))));
    }

    #[test]
    fn test_framebuffer_payload() {
        let mut registry = EntityRegistry::default();
        let key = registry.create(EntityKind::FrameBuffer, "fb1", Some("rgb")).unwrap();
        let fb = registry.framebuffer_mut(key).unwrap();
        assert_eq!(fb.channels(), 3);
        assert!(fb.is_empty());
    }

    #[test]
    fn test_group_starts_with_empty_members() {
        let mut registry = EntityRegistry::default();
        registry.create(EntityKind::ObjectGroup, "group1", None).unwrap();
        let group = registry.lookup("group1").unwrap();
        assert_eq!(group.reference(&Slot::Members), Some(&Value::ReferenceList(Vec::new())));
    }

    #[test]
    fn test_iter_in_creation_order() {
        let mut registry = EntityRegistry::default();
        for name in ["c", "a", "b"] {
            registry.create(EntityKind::ObjectGroup, name, None).unwrap();
        }
        let names: Vec<_> = registry.iter().map(|(_, e)| e.name().to_string()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_expect_kind() {
        let mut registry = EntityRegistry::default();
        registry.create(EntityKind::Renderer, "ren1", None).unwrap();
        assert!(registry
            .expect_kind("ren1", &[EntityKind::Renderer], "Renderer")
            .is_ok());
        assert!(matches!(
            registry.expect_kind("ren1", &[EntityKind::Camera], "Camera"),
            Err(SceneError::KindMismatch { actual: EntityKind::Renderer, .. })
        ));
        assert!(matches!(
            registry.expect_kind("nope", &[EntityKind::Camera], "Camera"),
            Err(SceneError::UnknownEntity(_))
        ));
    }
}
