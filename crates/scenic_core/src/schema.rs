//! Property schemas
//!
//! Each entity carries an [`EntitySchema`]: the numeric properties it accepts
//! (name, arity, default) and the texture slots it exposes. Built-in kinds
//! get theirs from [`BuiltinSchemas`]; shaders get theirs from the plugin
//! that implements them.

use std::sync::Arc;

use crate::value::{Arity, Value};

/// Camera types known without a plugin
pub const CAMERA_TYPES: &[&str] = &["PerspectiveCamera"];

/// Light types known without a plugin
pub const LIGHT_TYPES: &[&str] = &["PointLight", "GridLight", "SphereLight", "DomeLight"];

/// Declaration of one numeric property
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySpec {
    /// Property key
    pub name: String,
    /// Number of components
    pub arity: Arity,
    /// Default components (only the first `arity` are used)
    pub default: [f64; 3],
}

impl PropertySpec {
    /// Declare a property
    pub fn new(name: impl Into<String>, arity: Arity, default: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            arity,
            default,
        }
    }

    /// Declare a scalar property
    pub fn scalar(name: impl Into<String>, default: f64) -> Self {
        Self::new(name, Arity::Scalar, [default, 0.0, 0.0])
    }

    /// Declare a two-component property
    pub fn pair(name: impl Into<String>, a: f64, b: f64) -> Self {
        Self::new(name, Arity::Pair, [a, b, 0.0])
    }

    /// Declare a three-component property
    pub fn triple(name: impl Into<String>, a: f64, b: f64, c: f64) -> Self {
        Self::new(name, Arity::Triple, [a, b, c])
    }

    /// Default as a [`Value`] of the declared arity
    pub fn default_value(&self) -> Value {
        let [a, b, c] = self.default;
        match self.arity {
            Arity::Scalar => Value::Scalar(a),
            Arity::Pair => Value::Pair(a, b),
            Arity::Triple => Value::Triple(a, b, c),
        }
    }
}

/// Properties and texture slots accepted by one entity type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntitySchema {
    properties: Vec<PropertySpec>,
    texture_slots: Vec<String>,
}

impl EntitySchema {
    /// Create a schema
    pub fn new(properties: Vec<PropertySpec>, texture_slots: Vec<String>) -> Self {
        Self {
            properties,
            texture_slots,
        }
    }

    /// Schema with no properties and no texture slots
    pub fn empty() -> Self {
        Self::default()
    }

    /// Declared properties, in declaration order
    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    /// Look up a property declaration
    pub fn find(&self, key: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|spec| spec.name == key)
    }

    /// Declared texture slots
    pub fn texture_slots(&self) -> &[String] {
        &self.texture_slots
    }

    /// Check whether a texture slot is declared
    pub fn has_texture_slot(&self, slot: &str) -> bool {
        self.texture_slots.iter().any(|s| s == slot)
    }
}

/// Schemas of the built-in entity types
pub struct BuiltinSchemas;

impl BuiltinSchemas {
    /// Schema for a camera type, `None` if the type is unknown
    pub fn camera(type_name: &str) -> Option<Arc<EntitySchema>> {
        if !CAMERA_TYPES.contains(&type_name) {
            return None;
        }
        Some(Arc::new(EntitySchema::new(
            vec![
                PropertySpec::triple("translate", 0.0, 0.0, 0.0),
                PropertySpec::triple("rotate", 0.0, 0.0, 0.0),
                PropertySpec::scalar("fov", 30.0),
                PropertySpec::scalar("znear", 0.01),
                PropertySpec::scalar("zfar", 1000.0),
            ],
            Vec::new(),
        )))
    }

    /// Schema for a light type, `None` if the type is unknown
    pub fn light(type_name: &str) -> Option<Arc<EntitySchema>> {
        if !LIGHT_TYPES.contains(&type_name) {
            return None;
        }
        let texture_slots = if type_name == "DomeLight" {
            vec!["environment_map".to_string()]
        } else {
            Vec::new()
        };
        Some(Arc::new(EntitySchema::new(
            vec![
                PropertySpec::triple("translate", 0.0, 0.0, 0.0),
                PropertySpec::triple("rotate", 0.0, 0.0, 0.0),
                PropertySpec::triple("scale", 1.0, 1.0, 1.0),
                PropertySpec::triple("color", 1.0, 1.0, 1.0),
                PropertySpec::scalar("intensity", 1.0),
                PropertySpec::scalar("sample_count", 1.0),
                PropertySpec::scalar("double_sided", 0.0),
            ],
            texture_slots,
        )))
    }

    /// Schema for object instances
    pub fn object_instance() -> Arc<EntitySchema> {
        Arc::new(EntitySchema::new(
            vec![
                PropertySpec::triple("translate", 0.0, 0.0, 0.0),
                PropertySpec::triple("rotate", 0.0, 0.0, 0.0),
                PropertySpec::triple("scale", 1.0, 1.0, 1.0),
                PropertySpec::scalar("transform_order", 0.0),
                PropertySpec::scalar("rotate_order", 0.0),
            ],
            Vec::new(),
        ))
    }

    /// Schema for renderers
    pub fn renderer() -> Arc<EntitySchema> {
        Arc::new(EntitySchema::new(
            vec![
                PropertySpec::pair("resolution", 320.0, 240.0),
                PropertySpec::pair("pixelsamples", 3.0, 3.0),
                PropertySpec::pair("tilesize", 64.0, 64.0),
                PropertySpec::pair("filterwidth", 2.0, 2.0),
                PropertySpec::scalar("sample_jitter", 1.0),
                PropertySpec::pair("sample_time_range", 0.0, 1.0),
                PropertySpec::scalar("cast_shadow", 1.0),
                PropertySpec::scalar("max_reflect_depth", 3.0),
                PropertySpec::scalar("max_refract_depth", 3.0),
                PropertySpec::scalar("raymarch_step", 0.05),
                PropertySpec::scalar("raymarch_shadow_step", 0.1),
                PropertySpec::scalar("raymarch_reflect_step", 0.1),
                PropertySpec::scalar("raymarch_refract_step", 0.1),
                PropertySpec::scalar("use_max_thread", 0.0),
                PropertySpec::scalar("thread_count", 1.0),
            ],
            Vec::new(),
        ))
    }

    /// Schema for kinds without numeric properties
    pub fn empty() -> Arc<EntitySchema> {
        Arc::new(EntitySchema::empty())
    }
}
