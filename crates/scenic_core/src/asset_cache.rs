//! Asset caching
//!
//! A type-erased cache for data returned by the mesh and texture loaders.
//! Loading the same path twice returns the cached data instead of calling
//! the loader again.
//!
//! - [`AssetId`] - Unique identifier for a cached asset (incrementing `u64`)
//! - [`AssetHandle`] - Lightweight handle returned to callers, containing id and path
//! - [`AssetCache`] - Main cache storing `Arc<dyn Any + Send + Sync>` internally

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_error::AssetError;

/// Unique identifier for an asset in the cache.
///
/// Asset IDs are assigned sequentially starting from 1. An ID of 0 is reserved
/// and never assigned to a valid asset.
pub type AssetId = u64;

/// A lightweight handle to a cached asset.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    /// Get the asset ID
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Get the file path this asset was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct CachedEntry {
    data: Arc<dyn Any + Send + Sync>,
}

/// A type-erased asset cache indexed by id and by file path
pub struct AssetCache {
    assets: HashMap<AssetId, CachedEntry>,
    path_index: HashMap<PathBuf, AssetId>,
    next_id: u64,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    /// Create a new empty asset cache.
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            path_index: HashMap::new(),
            next_id: 1, // 0 is reserved as "no asset"
        }
    }

    /// Load an asset with `loader`, or return the cached data if the path is
    /// already loaded.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, or [`AssetError::Parse`] when the path is
    /// cached with a different asset type.
    pub fn load_with<T, F>(
        &mut self,
        path: impl AsRef<Path>,
        loader: F,
    ) -> Result<(AssetHandle, Arc<T>), AssetError>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&Path) -> Result<T, AssetError>,
    {
        let path = path.as_ref().to_path_buf();

        if let Some(&id) = self.path_index.get(&path) {
            let handle = AssetHandle { id, path };
            return match self.get::<T>(&handle) {
                Some(data) => Ok((handle, data)),
                None => Err(AssetError::Parse(format!(
                    "{} is cached as a different asset type",
                    handle.path.display()
                ))),
            };
        }

        let data = Arc::new(loader(&path)?);
        let id = self.next_id;
        self.next_id += 1;

        self.assets.insert(
            id,
            CachedEntry {
                data: data.clone(),
            },
        );
        self.path_index.insert(path.clone(), id);
        log::debug!("Cached asset #{}: {}", id, path.display());

        Ok((AssetHandle { id, path }, data))
    }

    /// Retrieve a cached asset by its handle, downcasting to the requested type.
    ///
    /// Returns `None` if the handle is unknown or the stored type does not match `T`.
    pub fn get<T: Send + Sync + 'static>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let entry = self.assets.get(&handle.id)?;
        entry.data.clone().downcast::<T>().ok()
    }

    /// Get the number of assets currently in the cache.
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Check if an asset with the given handle is in the cache.
    pub fn contains(&self, handle: &AssetHandle) -> bool {
        self.assets.contains_key(&handle.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    struct TextAsset {
        content: String,
    }

    #[derive(Debug, PartialEq)]
    struct NumberAsset {
        value: u64,
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = AssetCache::new();
        assert_eq!(cache.asset_count(), 0);
        assert_eq!(AssetCache::default().asset_count(), 0);
    }

    #[test]
    fn test_load_and_retrieve() {
        let mut cache = AssetCache::new();
        let (handle, data) = cache
            .load_with("meshes/cube.obj", |_| {
                Ok(TextAsset {
                    content: "hello".to_string(),
                })
            })
            .unwrap();

        assert_eq!(cache.asset_count(), 1);
        assert_eq!(handle.id(), 1);
        assert_eq!(handle.path(), Path::new("meshes/cube.obj"));
        assert_eq!(data.content, "hello");
        assert_eq!(cache.get::<TextAsset>(&handle).unwrap().content, "hello");
        assert!(cache.contains(&handle));
    }

    #[test]
    fn test_same_path_loads_once() {
        let calls = Cell::new(0);
        let mut cache = AssetCache::new();
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(NumberAsset { value: 7 })
        };

        let (first, _) = cache.load_with("a.num", load).unwrap();
        let (second, data) = cache.load_with("a.num", load).unwrap();

        assert_eq!(first, second);
        assert_eq!(data.value, 7);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.asset_count(), 1);
    }

    #[test]
    fn test_distinct_paths_get_distinct_ids() {
        let mut cache = AssetCache::new();
        let (a, _) = cache.load_with("a.num", |_| Ok(NumberAsset { value: 1 })).unwrap();
        let (b, _) = cache.load_with("b.num", |_| Ok(NumberAsset { value: 2 })).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let mut cache = AssetCache::new();
        let (handle, _) = cache.load_with("x", |_| Ok(NumberAsset { value: 1 })).unwrap();
        assert!(cache.get::<TextAsset>(&handle).is_none());

        let result = cache.load_with("x", |_| {
            Ok(TextAsset {
                content: String::new(),
            })
        });
        assert!(matches!(result, Err(AssetError::Parse(_))));
    }

    #[test]
    fn test_loader_error_is_not_cached() {
        let mut cache = AssetCache::new();
        let result = cache.load_with::<NumberAsset, _>("missing", |_| {
            Err(AssetError::Unsupported("missing".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(cache.asset_count(), 0);
    }
}
