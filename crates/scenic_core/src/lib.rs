//! Core types for the scenic scene-assembly engine
//!
//! This crate holds the in-memory scene graph and every operation that
//! builds it:
//!
//! - [`EntityRegistry`] - Owner of all named entities, keyed by [`EntityKey`]
//! - [`Entity`] - A named, typed node with properties and references
//! - [`Value`] - Numeric property or reference value
//! - [`EntitySchema`] - Declared properties and texture slots of a type
//! - [`PluginRegistry`] - Loaded shader plugins
//! - [`AssetLibrary`] - Mesh and texture loaders with a path-keyed cache
//! - [`FrameBuffer`] - Pixel storage written by renderers
//! - [`GraphValidator`] - Non-fatal checks run before rendering
//! - [`GraphSnapshot`] - Name-resolved, comparable view of the graph
//!
//! Properties are set through [`EntityRegistry::set_property`] and
//! references through the `assign_*` methods of the resolver.

mod asset;
mod asset_cache;
mod asset_error;
mod entity;
mod error;
mod framebuffer;
mod plugin;
mod property;
mod registry;
mod resolver;
mod schema;
mod snapshot;
mod validator;
mod value;

pub use asset::{
    AssetLibrary, ImageTextureLoader, MeshAsset, MeshData, MeshLoader, ObjMeshLoader,
    TextureAsset, TextureData, TextureLoader,
};
pub use asset_cache::{AssetCache, AssetHandle, AssetId};
pub use asset_error::AssetError;
pub use entity::{
    Entity, EntityKind, Payload, ShadingGroup, Slot, TargetRole, DEFAULT_SHADING_GROUP,
};
pub use error::SceneError;
pub use framebuffer::{channels_for_format, sample_count, FrameBuffer, SizeOverflow};
pub use plugin::{BuiltinPlugins, PluginDescriptor, PluginProvider, PluginRegistry};
pub use registry::{EntityKey, EntityRegistry};
pub use schema::{BuiltinSchemas, EntitySchema, PropertySpec, CAMERA_TYPES, LIGHT_TYPES};
pub use snapshot::{EntitySnapshot, GraphSnapshot};
pub use validator::{GraphValidator, ValidationIssue};
pub use value::{Arity, Value};
