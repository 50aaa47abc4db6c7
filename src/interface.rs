//! The scene interface
//!
//! [`SceneInterface`] is the authoring surface: one method per scene call.
//! Calls only record commands; nothing touches the scene graph until
//! [`SceneInterface::run`] drains the queue.

use std::path::{Path, PathBuf};

use scenic_core::{EntityRegistry, GraphSnapshot};

use crate::command::Command;
use crate::executor::Executor;
use crate::queue::{CommandQueue, RunError, RunReport};
use crate::script::SceneScript;

/// Records scene calls and applies them on [`run`](Self::run)
#[derive(Default)]
pub struct SceneInterface {
    queue: CommandQueue,
    executor: Executor,
}

impl SceneInterface {
    /// Create an interface over an explicitly configured executor
    pub fn new(executor: Executor) -> Self {
        Self {
            queue: CommandQueue::new(),
            executor,
        }
    }

    /// Record a raw command
    pub fn push(&mut self, command: Command) -> &mut Self {
        self.queue.push(command);
        self
    }

    /// Record every command of a script
    pub fn queue_script(&mut self, script: &SceneScript) -> &mut Self {
        self.queue.extend(script.commands.iter().cloned());
        self
    }

    /// Record `LoadPlugin`
    pub fn load_plugin(&mut self, name: &str) -> &mut Self {
        self.push(Command::LoadPlugin { name: name.to_string() })
    }

    /// Record `NewCamera`
    pub fn new_camera(&mut self, id: &str, type_name: &str) -> &mut Self {
        self.push(Command::NewCamera {
            id: id.to_string(),
            type_name: type_name.to_string(),
        })
    }

    /// Record `NewLight`
    pub fn new_light(&mut self, id: &str, type_name: &str) -> &mut Self {
        self.push(Command::NewLight {
            id: id.to_string(),
            type_name: type_name.to_string(),
        })
    }

    /// Record `NewTexture`; the image is read when the queue runs
    pub fn new_texture(&mut self, id: &str, path: impl AsRef<Path>) -> &mut Self {
        self.push(Command::NewTexture {
            id: id.to_string(),
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Record `NewShader`
    pub fn new_shader(&mut self, id: &str, type_name: &str) -> &mut Self {
        self.push(Command::NewShader {
            id: id.to_string(),
            type_name: type_name.to_string(),
        })
    }

    /// Record `NewMesh`; the mesh is read when the queue runs
    pub fn new_mesh(&mut self, id: &str, path: impl AsRef<Path>) -> &mut Self {
        self.push(Command::NewMesh {
            id: id.to_string(),
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Record `NewObjectInstance` of `mesh`
    pub fn new_object_instance(&mut self, id: &str, mesh: &str) -> &mut Self {
        self.push(Command::NewObjectInstance {
            id: id.to_string(),
            mesh: mesh.to_string(),
        })
    }

    /// Record `NewObjectGroup`
    pub fn new_object_group(&mut self, id: &str) -> &mut Self {
        self.push(Command::NewObjectGroup { id: id.to_string() })
    }

    /// Record `NewFrameBuffer`; `format` is `rgb` or `rgba`
    pub fn new_framebuffer(&mut self, id: &str, format: &str) -> &mut Self {
        self.push(Command::NewFrameBuffer {
            id: id.to_string(),
            format: format.to_string(),
        })
    }

    /// Record `NewRenderer`
    pub fn new_renderer(&mut self, id: &str) -> &mut Self {
        self.push(Command::NewRenderer { id: id.to_string() })
    }

    /// Set a property with any number of components
    pub fn set_property(&mut self, id: &str, key: &str, values: &[f64]) -> &mut Self {
        self.push(Command::SetProperty {
            id: id.to_string(),
            key: key.to_string(),
            values: values.to_vec(),
        })
    }

    /// Set a scalar property
    pub fn set_property1(&mut self, id: &str, key: &str, a: f64) -> &mut Self {
        self.set_property(id, key, &[a])
    }

    /// Set a two-component property
    pub fn set_property2(&mut self, id: &str, key: &str, a: f64, b: f64) -> &mut Self {
        self.set_property(id, key, &[a, b])
    }

    /// Set a three-component property
    pub fn set_property3(&mut self, id: &str, key: &str, a: f64, b: f64, c: f64) -> &mut Self {
        self.set_property(id, key, &[a, b, c])
    }

    /// Record `AssignTexture` on a shader or light slot
    pub fn assign_texture(&mut self, owner: &str, slot: &str, texture: &str) -> &mut Self {
        self.push(Command::AssignTexture {
            owner: owner.to_string(),
            slot: slot.to_string(),
            texture: texture.to_string(),
        })
    }

    /// Record `AssignShader` for one shading group of `instance`
    pub fn assign_shader(&mut self, instance: &str, group: &str, shader: &str) -> &mut Self {
        self.push(Command::AssignShader {
            instance: instance.to_string(),
            group: group.to_string(),
            shader: shader.to_string(),
        })
    }

    /// Record `AddObjectToGroup`
    pub fn add_object_to_group(&mut self, group: &str, instance: &str) -> &mut Self {
        self.push(Command::AddObjectToGroup {
            group: group.to_string(),
            instance: instance.to_string(),
        })
    }

    /// Record `AssignObjectGroup`; see [`TargetRole`](scenic_core::TargetRole) for roles
    pub fn assign_object_group(&mut self, instance: &str, role: &str, group: &str) -> &mut Self {
        self.push(Command::AssignObjectGroup {
            instance: instance.to_string(),
            role: role.to_string(),
            group: group.to_string(),
        })
    }

    /// Record `AssignCamera`
    pub fn assign_camera(&mut self, renderer: &str, camera: &str) -> &mut Self {
        self.push(Command::AssignCamera {
            renderer: renderer.to_string(),
            camera: camera.to_string(),
        })
    }

    /// Record `AssignFrameBuffer`
    pub fn assign_framebuffer(&mut self, renderer: &str, framebuffer: &str) -> &mut Self {
        self.push(Command::AssignFrameBuffer {
            renderer: renderer.to_string(),
            framebuffer: framebuffer.to_string(),
        })
    }

    /// Record `RenderScene`
    pub fn render_scene(&mut self, renderer: &str) -> &mut Self {
        self.push(Command::RenderScene {
            renderer: renderer.to_string(),
        })
    }

    /// Record `SaveFrameBuffer`; `.png` paths are written as PNG
    pub fn save_framebuffer(&mut self, framebuffer: &str, path: impl Into<PathBuf>) -> &mut Self {
        self.push(Command::SaveFrameBuffer {
            framebuffer: framebuffer.to_string(),
            path: path.into(),
        })
    }

    /// Apply all recorded commands
    pub fn run(&mut self) -> Result<RunReport, RunError> {
        self.queue.run(&mut self.executor)
    }

    /// Pending commands, one script line each
    pub fn print(&self) -> String {
        self.queue.iter().map(|c| format!("{}\n", c)).collect()
    }

    /// Pending commands as a script
    pub fn to_script(&self, name: &str) -> SceneScript {
        SceneScript {
            name: name.to_string(),
            commands: self.queue.iter().cloned().collect(),
        }
    }

    /// Number of pending commands
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The scene graph as applied so far
    pub fn registry(&self) -> &EntityRegistry {
        self.executor.registry()
    }

    /// Name-resolved view of the applied graph
    pub fn snapshot(&self) -> GraphSnapshot {
        self.executor.registry().snapshot()
    }

    /// The executor commands are applied to
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}
