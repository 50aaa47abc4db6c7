//! Shader plugins
//!
//! A shader type becomes usable in `NewShader` only after its plugin has been
//! loaded into a [`PluginRegistry`]. Where plugins come from is decided by a
//! [`PluginProvider`]; [`BuiltinPlugins`] ships the standard shader set.
//!
//! The registry is an ordinary value: create it once per session, hand it to
//! [`EntityRegistry::new`](crate::EntityRegistry::new), and it is released
//! when the entity registry is dropped. Nothing is global.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SceneError;
use crate::schema::{EntitySchema, PropertySpec};

/// A loaded shader implementation
#[derive(Clone, Debug, PartialEq)]
pub struct PluginDescriptor {
    /// Type name used by `NewShader`
    pub name: String,
    /// Properties and texture slots of shaders of this type
    pub schema: Arc<EntitySchema>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, schema: EntitySchema) -> Self {
        Self {
            name: name.into(),
            schema: Arc::new(schema),
        }
    }
}

/// Source of plugin implementations
pub trait PluginProvider {
    /// Open the plugin named `name`, `None` if it does not exist
    fn open(&self, name: &str) -> Option<PluginDescriptor>;

    /// Names this provider can open
    fn available(&self) -> Vec<String>;
}

/// The standard shader plugins
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinPlugins;

impl BuiltinPlugins {
    const NAMES: [&'static str; 4] = ["ConstantShader", "PlasticShader", "GlassShader", "HairShader"];
}

impl PluginProvider for BuiltinPlugins {
    fn open(&self, name: &str) -> Option<PluginDescriptor> {
        let schema = match name {
            "ConstantShader" => EntitySchema::new(
                vec![PropertySpec::triple("diffuse", 1.0, 1.0, 1.0)],
                vec!["texture".to_string()],
            ),
            "PlasticShader" => EntitySchema::new(
                vec![
                    PropertySpec::triple("diffuse", 0.8, 0.8, 0.8),
                    PropertySpec::triple("specular", 1.0, 1.0, 1.0),
                    PropertySpec::triple("ambient", 0.0, 0.0, 0.0),
                    PropertySpec::scalar("roughness", 0.1),
                    PropertySpec::triple("reflect", 1.0, 1.0, 1.0),
                    PropertySpec::scalar("ior", 1.4),
                    PropertySpec::scalar("opacity", 1.0),
                ],
                vec!["diffuse_map".to_string(), "bump_map".to_string()],
            ),
            "GlassShader" => EntitySchema::new(
                vec![
                    PropertySpec::triple("diffuse", 0.0, 0.0, 0.0),
                    PropertySpec::triple("specular", 1.0, 1.0, 1.0),
                    PropertySpec::triple("ambient", 0.0, 0.0, 0.0),
                    PropertySpec::triple("filter_color", 1.0, 1.0, 1.0),
                    PropertySpec::scalar("roughness", 0.0),
                    PropertySpec::scalar("ior", 1.4),
                    PropertySpec::scalar("do_color_filter", 1.0),
                ],
                Vec::new(),
            ),
            "HairShader" => EntitySchema::new(
                vec![
                    PropertySpec::triple("diffuse", 0.8, 0.8, 0.8),
                    PropertySpec::triple("specular", 1.0, 1.0, 1.0),
                    PropertySpec::triple("ambient", 0.0, 0.0, 0.0),
                    PropertySpec::scalar("roughness", 0.05),
                    PropertySpec::triple("reflect", 1.0, 1.0, 1.0),
                ],
                Vec::new(),
            ),
            _ => return None,
        };
        Some(PluginDescriptor::new(name, schema))
    }

    fn available(&self) -> Vec<String> {
        Self::NAMES.iter().map(|n| n.to_string()).collect()
    }
}

/// Plugins loaded for one session
pub struct PluginRegistry {
    provider: Box<dyn PluginProvider>,
    loaded: HashMap<String, Arc<PluginDescriptor>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(Box::new(BuiltinPlugins))
    }
}

impl PluginRegistry {
    /// Create an empty registry that opens plugins through `provider`
    pub fn new(provider: Box<dyn PluginProvider>) -> Self {
        Self {
            provider,
            loaded: HashMap::new(),
        }
    }

    /// Load a plugin by name
    ///
    /// Loading an already-loaded plugin returns the existing descriptor.
    pub fn load(&mut self, name: &str) -> Result<Arc<PluginDescriptor>, SceneError> {
        if let Some(descriptor) = self.loaded.get(name) {
            return Ok(descriptor.clone());
        }
        let descriptor = self
            .provider
            .open(name)
            .map(Arc::new)
            .ok_or_else(|| SceneError::PluginNotFound(name.to_string()))?;
        log::info!("Loaded plugin '{}'", name);
        self.loaded.insert(name.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    /// Descriptor of a loaded plugin
    pub fn get(&self, name: &str) -> Option<Arc<PluginDescriptor>> {
        self.loaded.get(name).cloned()
    }

    /// Descriptor of a plugin, loaded or not
    ///
    /// Asks the provider for plugins not loaded yet, without loading them.
    pub fn describe(&self, name: &str) -> Option<Arc<PluginDescriptor>> {
        self.get(name)
            .or_else(|| self.provider.open(name).map(Arc::new))
    }

    /// Check whether a plugin is loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Names of loaded plugins, sorted
    pub fn loaded_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaded.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names the provider can open
    pub fn available(&self) -> Vec<String> {
        self.provider.available()
    }
}
