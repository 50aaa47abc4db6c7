//! Property assignment
//!
//! Numeric properties are set by entity name and key. The number of
//! components must match the arity declared by the entity's schema; a
//! rejected call leaves the entity untouched.

use crate::error::SceneError;
use crate::registry::EntityRegistry;
use crate::value::Value;

impl EntityRegistry {
    /// Set a numeric property (last write wins)
    ///
    /// # Errors
    ///
    /// - [`SceneError::UnknownEntity`] if `id` is not registered
    /// - [`SceneError::UnknownProperty`] if the schema has no `key`
    /// - [`SceneError::ArityMismatch`] if `values.len()` differs from the declared arity
    pub fn set_property(&mut self, id: &str, key: &str, values: &[f64]) -> Result<(), SceneError> {
        let entity_key = self
            .key(id)
            .ok_or_else(|| SceneError::UnknownEntity(id.to_string()))?;
        let entity = self
            .get_mut(entity_key)
            .ok_or_else(|| SceneError::UnknownEntity(id.to_string()))?;

        let spec = entity
            .schema()
            .find(key)
            .ok_or_else(|| SceneError::UnknownProperty {
                entity: id.to_string(),
                key: key.to_string(),
            })?;
        let expected = spec.arity.len();

        let value = Value::from_components(values)
            .filter(|_| values.len() == expected)
            .ok_or_else(|| SceneError::ArityMismatch {
                entity: id.to_string(),
                key: key.to_string(),
                expected,
                got: values.len(),
            })?;

        entity.set_value(key, value);
        Ok(())
    }

    /// Current value of a numeric property
    pub fn property(&self, id: &str, key: &str) -> Result<&Value, SceneError> {
        let entity = self
            .lookup(id)
            .ok_or_else(|| SceneError::UnknownEntity(id.to_string()))?;
        entity.property(key).ok_or_else(|| SceneError::UnknownProperty {
            entity: id.to_string(),
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::EntityKind;
    use crate::error::SceneError;
    use crate::registry::EntityRegistry;
    use crate::value::Value;

    fn registry() -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry
            .create(EntityKind::Camera, "cam1", Some("PerspectiveCamera"))
            .unwrap();
        registry.create(EntityKind::Light, "light1", Some("PointLight")).unwrap();
        registry.create(EntityKind::Renderer, "ren1", None).unwrap();
        registry
    }

    #[test]
    fn test_defaults_before_any_write() {
        let registry = registry();
        assert_eq!(registry.property("cam1", "fov").unwrap(), &Value::Scalar(30.0));
        assert_eq!(
            registry.property("light1", "sample_count").unwrap(),
            &Value::Scalar(1.0)
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = registry();
        registry.set_property("cam1", "translate", &[0.0, 1.0, 3.0]).unwrap();
        registry.set_property("cam1", "translate", &[0.0, 2.0, 5.0]).unwrap();
        assert_eq!(
            registry.property("cam1", "translate").unwrap(),
            &Value::Triple(0.0, 2.0, 5.0)
        );

        registry.set_property("ren1", "resolution", &[640.0, 480.0]).unwrap();
        assert_eq!(
            registry.property("ren1", "resolution").unwrap(),
            &Value::Pair(640.0, 480.0)
        );
    }

    #[test]
    fn test_arity_mismatch_does_not_mutate() {
        let mut registry = registry();
        registry.set_property("cam1", "fov", &[80.0]).unwrap();

        for bad in [&[][..], &[1.0, 2.0][..], &[1.0, 2.0, 3.0][..], &[1.0, 2.0, 3.0, 4.0][..]] {
            match registry.set_property("cam1", "fov", bad) {
                Err(SceneError::ArityMismatch { expected, got, .. }) => {
                    assert_eq!(expected, 1);
                    assert_eq!(got, bad.len());
                }
                other => panic!("Expected ArityMismatch, got {:?}", other),
            }
        }
        assert_eq!(registry.property("cam1", "fov").unwrap(), &Value::Scalar(80.0));
    }

    #[test]
    fn test_unknown_property() {
        let mut registry = registry();
        let result = registry.set_property("light1", "fov", &[45.0]);
        assert!(matches!(result, Err(SceneError::UnknownProperty { .. })));
    }

    #[test]
    fn test_unknown_entity() {
        let mut registry = registry();
        let result = registry.set_property("cam2", "fov", &[45.0]);
        assert!(matches!(result, Err(SceneError::UnknownEntity(ref id)) if id == "cam2"));
    }
}
