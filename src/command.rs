//! Scene commands
//!
//! Every mutating call of the scene interface is captured as a [`Command`]
//! value. Commands carry names, never keys, so a recorded sequence can be
//! saved as a script and replayed into a fresh session.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One deferred scene operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    LoadPlugin { name: String },
    NewCamera { id: String, type_name: String },
    NewLight { id: String, type_name: String },
    NewTexture { id: String, path: PathBuf },
    NewShader { id: String, type_name: String },
    NewMesh { id: String, path: PathBuf },
    NewObjectInstance { id: String, mesh: String },
    NewObjectGroup { id: String },
    /// `format` is `rgb` or `rgba`
    NewFrameBuffer { id: String, format: String },
    NewRenderer { id: String },
    SetProperty { id: String, key: String, values: Vec<f64> },
    AssignTexture { owner: String, slot: String, texture: String },
    AssignShader { instance: String, group: String, shader: String },
    AddObjectToGroup { group: String, instance: String },
    AssignObjectGroup { instance: String, role: String, group: String },
    AssignCamera { renderer: String, camera: String },
    AssignFrameBuffer { renderer: String, framebuffer: String },
    RenderScene { renderer: String },
    SaveFrameBuffer { framebuffer: String, path: PathBuf },
}

impl Command {
    /// Operation name as written in scripts
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadPlugin { .. } => "LoadPlugin",
            Command::NewCamera { .. } => "NewCamera",
            Command::NewLight { .. } => "NewLight",
            Command::NewTexture { .. } => "NewTexture",
            Command::NewShader { .. } => "NewShader",
            Command::NewMesh { .. } => "NewMesh",
            Command::NewObjectInstance { .. } => "NewObjectInstance",
            Command::NewObjectGroup { .. } => "NewObjectGroup",
            Command::NewFrameBuffer { .. } => "NewFrameBuffer",
            Command::NewRenderer { .. } => "NewRenderer",
            Command::SetProperty { .. } => "SetProperty",
            Command::AssignTexture { .. } => "AssignTexture",
            Command::AssignShader { .. } => "AssignShader",
            Command::AddObjectToGroup { .. } => "AddObjectToGroup",
            Command::AssignObjectGroup { .. } => "AssignObjectGroup",
            Command::AssignCamera { .. } => "AssignCamera",
            Command::AssignFrameBuffer { .. } => "AssignFrameBuffer",
            Command::RenderScene { .. } => "RenderScene",
            Command::SaveFrameBuffer { .. } => "SaveFrameBuffer",
        }
    }

    /// Id of the entity this command creates, if any
    pub fn created_id(&self) -> Option<&str> {
        match self {
            Command::NewCamera { id, .. }
            | Command::NewLight { id, .. }
            | Command::NewTexture { id, .. }
            | Command::NewShader { id, .. }
            | Command::NewMesh { id, .. }
            | Command::NewObjectInstance { id, .. }
            | Command::NewObjectGroup { id }
            | Command::NewFrameBuffer { id, .. }
            | Command::NewRenderer { id } => Some(id),
            _ => None,
        }
    }
}

/// Renders as a single script line, e.g. `SetProperty("cam1", "fov", 45)`
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        match self {
            Command::LoadPlugin { name } => write!(f, "{:?}", name)?,
            Command::NewCamera { id, type_name }
            | Command::NewLight { id, type_name }
            | Command::NewShader { id, type_name } => write!(f, "{:?}, {:?}", id, type_name)?,
            Command::NewTexture { id, path } | Command::NewMesh { id, path } => {
                write!(f, "{:?}, {:?}", id, path.display().to_string())?
            }
            Command::NewObjectInstance { id, mesh } => write!(f, "{:?}, {:?}", id, mesh)?,
            Command::NewObjectGroup { id } | Command::NewRenderer { id } => write!(f, "{:?}", id)?,
            Command::NewFrameBuffer { id, format } => write!(f, "{:?}, {:?}", id, format)?,
            Command::SetProperty { id, key, values } => {
                write!(f, "{:?}, {:?}", id, key)?;
                for value in values {
                    write!(f, ", {}", value)?;
                }
            }
            Command::AssignTexture { owner, slot, texture } => {
                write!(f, "{:?}, {:?}, {:?}", owner, slot, texture)?
            }
            Command::AssignShader { instance, group, shader } => {
                write!(f, "{:?}, {:?}, {:?}", instance, group, shader)?
            }
            Command::AddObjectToGroup { group, instance } => {
                write!(f, "{:?}, {:?}", group, instance)?
            }
            Command::AssignObjectGroup { instance, role, group } => {
                write!(f, "{:?}, {:?}, {:?}", instance, role, group)?
            }
            Command::AssignCamera { renderer, camera } => write!(f, "{:?}, {:?}", renderer, camera)?,
            Command::AssignFrameBuffer { renderer, framebuffer } => {
                write!(f, "{:?}, {:?}", renderer, framebuffer)?
            }
            Command::RenderScene { renderer } => write!(f, "{:?}", renderer)?,
            Command::SaveFrameBuffer { framebuffer, path } => {
                write!(f, "{:?}, {:?}", framebuffer, path.display().to_string())?
            }
        }
        f.write_str(")")
    }
}
