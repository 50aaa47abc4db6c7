//! Scene error types
//!
//! [`SceneError`] covers every way a scene operation can be rejected:
//! naming, typing, property arity, reference kinds, incomplete renderers,
//! plugins, and failures reported by external collaborators.

use std::io;

use thiserror::Error;

use crate::asset_error::AssetError;
use crate::entity::EntityKind;

/// Error raised by registry, property, resolver, and render operations
#[derive(Debug, Error)]
pub enum SceneError {
    /// An entity with this id already exists
    #[error("Duplicate entity id: '{0}'")]
    DuplicateId(String),

    /// The id is reserved and cannot name an entity
    #[error("Reserved id cannot name an entity: '{0}'")]
    ReservedId(String),

    /// No entity with this id exists
    #[error("Unknown entity: '{0}'")]
    UnknownEntity(String),

    /// The type name is neither built in nor provided by a loaded plugin
    #[error("Unknown {kind} type: '{type_name}'")]
    UnknownType {
        /// Kind being created
        kind: EntityKind,
        /// Offending type name
        type_name: String,
    },

    /// The entity's schema does not declare this property
    #[error("Unknown property '{key}' on entity '{entity}'")]
    UnknownProperty {
        /// Entity id
        entity: String,
        /// Property key
        key: String,
    },

    /// Wrong number of components for a property
    #[error("Property '{key}' on entity '{entity}' takes {expected} component(s), got {got}")]
    ArityMismatch {
        /// Entity id
        entity: String,
        /// Property key
        key: String,
        /// Declared arity
        expected: usize,
        /// Supplied component count
        got: usize,
    },

    /// An entity is not of the kind the operation expects
    #[error("Entity '{entity}' is a {actual}, expected {expected}")]
    KindMismatch {
        /// Entity id
        entity: String,
        /// Accepted kind(s)
        expected: &'static str,
        /// Actual kind
        actual: EntityKind,
    },

    /// A property holds a value the operation cannot use
    #[error("Invalid value for '{key}' on entity '{entity}': {reason}")]
    InvalidValue {
        /// Entity id
        entity: String,
        /// Property key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// The owner does not declare this texture slot
    #[error("Entity '{entity}' has no texture slot '{slot}'")]
    InvalidSlot {
        /// Owner id
        entity: String,
        /// Slot name
        slot: String,
    },

    /// Unrecognized object group role
    #[error("Invalid object group role: '{0}'")]
    InvalidRole(String),

    /// A renderer lacks a camera or framebuffer
    #[error("Renderer '{renderer}' has no {missing} assigned")]
    IncompleteRenderer {
        /// Renderer id
        renderer: String,
        /// Missing binding ("camera" or "framebuffer")
        missing: &'static str,
    },

    /// The plugin provider does not know this plugin
    #[error("Plugin not found: '{0}'")]
    PluginNotFound(String),

    /// IO failure while persisting data
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Mesh or texture could not be loaded
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// The render backend reported a failure
    #[error("Render backend error: {0}")]
    Backend(String),
}

impl SceneError {
    /// Short name of the error kind, stable for reporting
    pub fn kind_name(&self) -> &'static str {
        match self {
            SceneError::DuplicateId(_) => "DuplicateId",
            SceneError::ReservedId(_) => "ReservedId",
            SceneError::UnknownEntity(_) => "UnknownEntity",
            SceneError::UnknownType { .. } => "UnknownType",
            SceneError::UnknownProperty { .. } => "UnknownProperty",
            SceneError::ArityMismatch { .. } => "ArityMismatch",
            SceneError::KindMismatch { .. } => "KindMismatch",
            SceneError::InvalidValue { .. } => "InvalidValue",
            SceneError::InvalidSlot { .. } => "InvalidSlot",
            SceneError::InvalidRole(_) => "InvalidRole",
            SceneError::IncompleteRenderer { .. } => "IncompleteRenderer",
            SceneError::PluginNotFound(_) => "PluginNotFound",
            SceneError::Io(_) => "IOError",
            SceneError::Asset(_) => "AssetError",
            SceneError::Backend(_) => "BackendError",
        }
    }
}
