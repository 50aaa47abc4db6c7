//! Reference resolution
//!
//! Binds named relationships between entities: textures to shaders and
//! lights, shaders to shading groups of object instances, instances to
//! groups, groups to instance target roles, and camera/framebuffer to
//! renderers. Every operation resolves and kind-checks both ends before it
//! writes anything.

use crate::entity::{EntityKind, ShadingGroup, Slot, TargetRole};
use crate::error::SceneError;
use crate::registry::{EntityKey, EntityRegistry};
use crate::value::Value;

impl EntityRegistry {
    /// Create an object instance of an existing mesh
    pub fn create_object_instance(&mut self, id: &str, mesh: &str) -> Result<EntityKey, SceneError> {
        self.check_new_id(id)?;
        let mesh_key = self.expect_kind(mesh, &[EntityKind::Mesh], "Mesh")?;
        let key = self.create(EntityKind::ObjectInstance, id, None)?;
        self.link(key, Slot::Mesh, Value::Reference(mesh_key));
        Ok(key)
    }

    /// Bind a texture to a texture slot of a shader or light
    pub fn assign_texture(&mut self, owner: &str, slot: &str, texture: &str) -> Result<(), SceneError> {
        let owner_key = self.expect_kind(
            owner,
            &[EntityKind::Shader, EntityKind::Light],
            "Shader or Light",
        )?;
        let texture_key = self.expect_kind(texture, &[EntityKind::Texture], "Texture")?;

        let has_slot = self
            .get(owner_key)
            .map(|entity| entity.schema().has_texture_slot(slot))
            .unwrap_or(false);
        if !has_slot {
            return Err(SceneError::InvalidSlot {
                entity: owner.to_string(),
                slot: slot.to_string(),
            });
        }

        self.link(owner_key, Slot::Texture(slot.to_string()), Value::Reference(texture_key));
        Ok(())
    }

    /// Bind a shader to a shading group of an object instance
    ///
    /// Named groups are not checked against the mesh here; unmatched groups
    /// are reported when the scene is rendered.
    pub fn assign_shader(
        &mut self,
        instance: &str,
        shading_group: &str,
        shader: &str,
    ) -> Result<(), SceneError> {
        let instance_key = self.expect_kind(instance, &[EntityKind::ObjectInstance], "ObjectInstance")?;
        let shader_key = self.expect_kind(shader, &[EntityKind::Shader], "Shader")?;

        self.link(
            instance_key,
            Slot::Shader(ShadingGroup::parse(shading_group)),
            Value::Reference(shader_key),
        );
        Ok(())
    }

    /// Add an object instance to a group
    ///
    /// Adding an existing member is a no-op; membership order is insertion order.
    pub fn add_object_to_group(&mut self, group: &str, instance: &str) -> Result<(), SceneError> {
        let group_key = self.expect_kind(group, &[EntityKind::ObjectGroup], "ObjectGroup")?;
        let instance_key = self.expect_kind(instance, &[EntityKind::ObjectInstance], "ObjectInstance")?;

        let entity = self
            .get_mut(group_key)
            .ok_or_else(|| SceneError::UnknownEntity(group.to_string()))?;
        match entity.reference_mut(&Slot::Members) {
            Some(Value::ReferenceList(members)) => {
                if members.contains(&instance_key) {
                    log::debug!("'{}' is already a member of '{}'", instance, group);
                } else {
                    members.push(instance_key);
                }
            }
            _ => entity.set_reference(Slot::Members, Value::ReferenceList(vec![instance_key])),
        }
        Ok(())
    }

    /// Use an object group as the shadow/reflect/refract target of an instance
    pub fn assign_object_group(&mut self, instance: &str, role: &str, group: &str) -> Result<(), SceneError> {
        let role: TargetRole = role.parse()?;
        let instance_key = self.expect_kind(instance, &[EntityKind::ObjectInstance], "ObjectInstance")?;
        let group_key = self.expect_kind(group, &[EntityKind::ObjectGroup], "ObjectGroup")?;

        self.link(instance_key, Slot::Target(role), Value::Reference(group_key));
        Ok(())
    }

    /// Bind the camera of a renderer (last write wins)
    pub fn assign_camera(&mut self, renderer: &str, camera: &str) -> Result<(), SceneError> {
        let renderer_key = self.expect_kind(renderer, &[EntityKind::Renderer], "Renderer")?;
        let camera_key = self.expect_kind(camera, &[EntityKind::Camera], "Camera")?;
        self.link(renderer_key, Slot::Camera, Value::Reference(camera_key));
        Ok(())
    }

    /// Bind the output framebuffer of a renderer (last write wins)
    pub fn assign_framebuffer(&mut self, renderer: &str, framebuffer: &str) -> Result<(), SceneError> {
        let renderer_key = self.expect_kind(renderer, &[EntityKind::Renderer], "Renderer")?;
        let fb_key = self.expect_kind(framebuffer, &[EntityKind::FrameBuffer], "FrameBuffer")?;
        self.link(renderer_key, Slot::FrameBuffer, Value::Reference(fb_key));
        Ok(())
    }

    /// Names of the members of an object group, in insertion order
    pub fn group_members(&self, group: &str) -> Result<Vec<&str>, SceneError> {
        let key = self.expect_kind(group, &[EntityKind::ObjectGroup], "ObjectGroup")?;
        let members = match self.get(key).and_then(|group| group.reference(&Slot::Members)) {
            Some(value) => value.references(),
            None => &[],
        };
        Ok(members
            .iter()
            .filter_map(|&member| self.name_of(member))
            .collect())
    }

    /// Entity referenced by a single-reference slot
    pub fn linked(&self, key: EntityKey, slot: &Slot) -> Option<EntityKey> {
        self.get(key)?.reference(slot)?.as_reference()
    }

    fn link(&mut self, key: EntityKey, slot: Slot, value: Value) {
        if let Some(entity) = self.get_mut(key) {
            entity.set_reference(slot, value);
        }
    }
}
