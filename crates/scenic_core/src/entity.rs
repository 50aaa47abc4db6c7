//! Entity types
//!
//! An [`Entity`] is a named, typed node of the scene graph. Its numeric
//! properties are keyed by name and checked against the entity's
//! [`EntitySchema`]; its links to other entities are keyed by a typed [`Slot`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::asset::{MeshAsset, TextureAsset};
use crate::error::SceneError;
use crate::framebuffer::FrameBuffer;
use crate::schema::EntitySchema;
use crate::value::Value;

/// Script spelling of the shading group that covers every primitive of a mesh
pub const DEFAULT_SHADING_GROUP: &str = "DEFAULT_SHADING_GROUP";

/// The closed set of entity kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Camera,
    Light,
    Texture,
    Shader,
    Mesh,
    ObjectInstance,
    ObjectGroup,
    FrameBuffer,
    Renderer,
}

impl EntityKind {
    /// All kinds, in declaration order
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Camera,
        EntityKind::Light,
        EntityKind::Texture,
        EntityKind::Shader,
        EntityKind::Mesh,
        EntityKind::ObjectInstance,
        EntityKind::ObjectGroup,
        EntityKind::FrameBuffer,
        EntityKind::Renderer,
    ];

    /// Human-readable name of the kind
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Camera => "Camera",
            EntityKind::Light => "Light",
            EntityKind::Texture => "Texture",
            EntityKind::Shader => "Shader",
            EntityKind::Mesh => "Mesh",
            EntityKind::ObjectInstance => "ObjectInstance",
            EntityKind::ObjectGroup => "ObjectGroup",
            EntityKind::FrameBuffer => "FrameBuffer",
            EntityKind::Renderer => "Renderer",
        }
    }

    /// Whether `create` needs a type name for this kind
    pub fn requires_type_name(self) -> bool {
        matches!(
            self,
            EntityKind::Camera | EntityKind::Light | EntityKind::Shader | EntityKind::FrameBuffer
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A partition of a mesh's primitives that a shader binds to
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShadingGroup {
    /// Every primitive of the mesh
    All,
    /// A group name found in the mesh data
    Named(String),
}

impl ShadingGroup {
    /// Parse the script spelling; [`DEFAULT_SHADING_GROUP`] maps to [`ShadingGroup::All`]
    pub fn parse(name: &str) -> Self {
        if name == DEFAULT_SHADING_GROUP {
            ShadingGroup::All
        } else {
            ShadingGroup::Named(name.to_string())
        }
    }
}

impl fmt::Display for ShadingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadingGroup::All => f.write_str(DEFAULT_SHADING_GROUP),
            ShadingGroup::Named(name) => f.write_str(name),
        }
    }
}

/// Role an object group plays for an object instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetRole {
    /// Objects considered when tracing shadow rays
    ShadowTarget,
    /// Objects visible in reflections
    ReflectTarget,
    /// Objects visible through refraction
    RefractTarget,
}

impl TargetRole {
    /// Script spelling of the role
    pub fn name(self) -> &'static str {
        match self {
            TargetRole::ShadowTarget => "shadow_target",
            TargetRole::ReflectTarget => "reflect_target",
            TargetRole::RefractTarget => "refract_target",
        }
    }
}

impl FromStr for TargetRole {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shadow_target" => Ok(TargetRole::ShadowTarget),
            "reflect_target" => Ok(TargetRole::ReflectTarget),
            "refract_target" => Ok(TargetRole::RefractTarget),
            other => Err(SceneError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for TargetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named link from an entity to one or more other entities
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Texture bound to a shader or light slot
    Texture(String),
    /// Shader bound to a shading group of an object instance
    Shader(ShadingGroup),
    /// Object group targeted by an object instance
    Target(TargetRole),
    /// Member list of an object group
    Members,
    /// Mesh instanced by an object instance
    Mesh,
    /// Camera of a renderer
    Camera,
    /// Output framebuffer of a renderer
    FrameBuffer,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Texture(name) => write!(f, "texture:{}", name),
            Slot::Shader(group) => write!(f, "shader:{}", group),
            Slot::Target(role) => write!(f, "{}", role),
            Slot::Members => f.write_str("members"),
            Slot::Mesh => f.write_str("mesh"),
            Slot::Camera => f.write_str("camera"),
            Slot::FrameBuffer => f.write_str("framebuffer"),
        }
    }
}

/// Data owned by an entity beyond its properties
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    /// Loaded texture handle
    Texture(TextureAsset),
    /// Loaded mesh handle
    Mesh(MeshAsset),
    /// Pixel storage
    FrameBuffer(FrameBuffer),
}

/// A named node of the scene graph
///
/// Each entity has:
/// - A unique name (immutable once created)
/// - A kind and a type name (e.g. `Light` / `DomeLight`)
/// - Numeric properties, pre-filled with schema defaults
/// - References to other entities, keyed by [`Slot`]
/// - An optional payload (mesh, texture or pixel data)
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    name: String,
    kind: EntityKind,
    type_name: String,
    schema: Arc<EntitySchema>,
    properties: BTreeMap<String, Value>,
    references: BTreeMap<Slot, Value>,
    payload: Payload,
}

impl Entity {
    /// Create an entity with every schema property set to its default
    pub fn new(
        name: impl Into<String>,
        kind: EntityKind,
        type_name: impl Into<String>,
        schema: Arc<EntitySchema>,
    ) -> Self {
        let properties = schema
            .properties()
            .iter()
            .map(|spec| (spec.name.clone(), spec.default_value()))
            .collect();
        Self {
            name: name.into(),
            kind,
            type_name: type_name.into(),
            schema,
            properties,
            references: BTreeMap::new(),
            payload: Payload::None,
        }
    }

    /// Attach a payload to this entity
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Name of this entity
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of this entity
    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Type name (camera/light/shader type, framebuffer format, asset path)
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The schema properties are checked against
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Current value of a numeric property
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// All numeric properties, sorted by key
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Value bound to a reference slot
    pub fn reference(&self, slot: &Slot) -> Option<&Value> {
        self.references.get(slot)
    }

    /// All reference slots, sorted by slot
    pub fn references(&self) -> impl Iterator<Item = (&Slot, &Value)> {
        self.references.iter()
    }

    /// Payload of this entity
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Mesh payload, if this is a mesh
    pub fn mesh(&self) -> Option<&MeshAsset> {
        match &self.payload {
            Payload::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Texture payload, if this is a texture
    pub fn texture(&self) -> Option<&TextureAsset> {
        match &self.payload {
            Payload::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    /// Pixel storage, if this is a framebuffer
    pub fn framebuffer(&self) -> Option<&FrameBuffer> {
        match &self.payload {
            Payload::FrameBuffer(fb) => Some(fb),
            _ => None,
        }
    }

    pub(crate) fn framebuffer_mut(&mut self) -> Option<&mut FrameBuffer> {
        match &mut self.payload {
            Payload::FrameBuffer(fb) => Some(fb),
            _ => None,
        }
    }

    pub(crate) fn set_value(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    pub(crate) fn set_reference(&mut self, slot: Slot, value: Value) {
        self.references.insert(slot, value);
    }

    pub(crate) fn reference_mut(&mut self, slot: &Slot) -> Option<&mut Value> {
        self.references.get_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuiltinSchemas, PropertySpec};
    use crate::value::Arity;

    #[test]
    fn test_shading_group_parse() {
        assert_eq!(ShadingGroup::parse(DEFAULT_SHADING_GROUP), ShadingGroup::All);
        assert_eq!(
            ShadingGroup::parse("roof"),
            ShadingGroup::Named("roof".to_string())
        );
        assert_eq!(ShadingGroup::All.to_string(), DEFAULT_SHADING_GROUP);
    }

    #[test]
    fn test_target_role_parse() {
        assert_eq!("shadow_target".parse::<TargetRole>().unwrap(), TargetRole::ShadowTarget);
        assert_eq!("reflect_target".parse::<TargetRole>().unwrap(), TargetRole::ReflectTarget);
        match "glow_target".parse::<TargetRole>() {
            Err(SceneError::InvalidRole(role)) => assert_eq!(role, "glow_target"),
            other => panic!("Expected InvalidRole, got {:?}", other),
        }
    }

    #[test]
    fn test_new_entity_has_defaults() {
        let schema = BuiltinSchemas::camera("PerspectiveCamera").unwrap();
        let entity = Entity::new("cam1", EntityKind::Camera, "PerspectiveCamera", schema);

        assert_eq!(entity.name(), "cam1");
        assert_eq!(entity.kind(), EntityKind::Camera);
        assert_eq!(entity.property("fov"), Some(&Value::Scalar(30.0)));
        assert_eq!(entity.property("translate"), Some(&Value::Triple(0.0, 0.0, 0.0)));
        assert!(entity.references().next().is_none());
    }

    #[test]
    fn test_custom_schema() {
        let schema = Arc::new(EntitySchema::new(
            vec![PropertySpec::new("weight", Arity::Scalar, [2.5, 0.0, 0.0])],
            Vec::new(),
        ));
        let entity = Entity::new("x", EntityKind::Shader, "Custom", schema);
        assert_eq!(entity.property("weight"), Some(&Value::Scalar(2.5)));
        assert_eq!(entity.payload(), &Payload::None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(EntityKind::ObjectInstance.to_string(), "ObjectInstance");
        assert!(EntityKind::Shader.requires_type_name());
        assert!(!EntityKind::ObjectGroup.requires_type_name());
        assert_eq!(EntityKind::ALL.len(), 9);
    }
}
