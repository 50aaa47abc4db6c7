//! Mesh and texture collaborators
//!
//! Parsing mesh and image files is delegated to a [`MeshLoader`] and a
//! [`TextureLoader`]. The scene only keeps the returned summary together
//! with the path it was loaded from. [`AssetLibrary`] pairs the loaders
//! with an [`AssetCache`] so each path is loaded once per session.

use std::path::Path;
use std::sync::Arc;

use crate::asset_cache::{AssetCache, AssetHandle};
use crate::asset_error::AssetError;

/// Summary of a loaded mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Named primitive groups a shader can bind to, in file order
    pub shading_groups: Vec<String>,
    /// Number of vertices
    pub vertex_count: usize,
    /// Number of triangles
    pub face_count: usize,
}

/// Summary of a loaded texture
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

/// Loads mesh files
pub trait MeshLoader {
    /// Load the mesh at `path`
    fn load_mesh(&self, path: &Path) -> Result<MeshData, AssetError>;
}

/// Loads texture and environment-map files
pub trait TextureLoader {
    /// Load the texture at `path`
    fn load_texture(&self, path: &Path) -> Result<TextureData, AssetError>;
}

/// Mesh payload stored on a Mesh entity
#[derive(Clone, Debug, PartialEq)]
pub struct MeshAsset {
    pub handle: AssetHandle,
    pub data: Arc<MeshData>,
}

impl MeshAsset {
    /// Path the mesh was loaded from
    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    /// Check whether the mesh declares a shading group
    pub fn has_shading_group(&self, name: &str) -> bool {
        self.data.shading_groups.iter().any(|g| g == name)
    }
}

/// Texture payload stored on a Texture entity
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAsset {
    pub handle: AssetHandle,
    pub data: Arc<TextureData>,
}

impl TextureAsset {
    /// Path the texture was loaded from
    pub fn path(&self) -> &Path {
        self.handle.path()
    }
}

/// Wavefront OBJ loader backed by `tobj`
///
/// Shading groups are the OBJ object/group names.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjMeshLoader;

impl MeshLoader for ObjMeshLoader {
    fn load_mesh(&self, path: &Path) -> Result<MeshData, AssetError> {
        let is_obj = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("obj"))
            .unwrap_or(false);
        if !is_obj {
            return Err(AssetError::Unsupported(path.display().to_string()));
        }

        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut data = MeshData::default();
        for model in &models {
            if !model.name.is_empty() && !data.shading_groups.contains(&model.name) {
                data.shading_groups.push(model.name.clone());
            }
            data.vertex_count += model.mesh.positions.len() / 3;
            data.face_count += model.mesh.indices.len() / 3;
        }
        Ok(data)
    }
}

/// Texture loader backed by the `image` crate (PNG, JPEG, HDR, EXR, ...)
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageTextureLoader;

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&self, path: &Path) -> Result<TextureData, AssetError> {
        let image = image::open(path)?;
        Ok(TextureData {
            width: image.width(),
            height: image.height(),
            channels: u32::from(image.color().channel_count()),
        })
    }
}

/// Loaders plus the cache that deduplicates them
pub struct AssetLibrary {
    cache: AssetCache,
    meshes: Box<dyn MeshLoader>,
    textures: Box<dyn TextureLoader>,
}

impl Default for AssetLibrary {
    fn default() -> Self {
        Self::new(Box::new(ObjMeshLoader), Box::new(ImageTextureLoader))
    }
}

impl AssetLibrary {
    /// Create a library from explicit loaders
    pub fn new(meshes: Box<dyn MeshLoader>, textures: Box<dyn TextureLoader>) -> Self {
        Self {
            cache: AssetCache::new(),
            meshes,
            textures,
        }
    }

    /// Load (or fetch from cache) the mesh at `path`
    pub fn load_mesh(&mut self, path: impl AsRef<Path>) -> Result<MeshAsset, AssetError> {
        let meshes = &self.meshes;
        let (handle, data) = self.cache.load_with(path, |p| meshes.load_mesh(p))?;
        Ok(MeshAsset { handle, data })
    }

    /// Load (or fetch from cache) the texture at `path`
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureAsset, AssetError> {
        let textures = &self.textures;
        let (handle, data) = self.cache.load_with(path, |p| textures.load_texture(p))?;
        Ok(TextureAsset { handle, data })
    }

    /// The underlying cache
    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }
}
