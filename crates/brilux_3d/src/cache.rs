//! Scene cache
//!
//! LRU cache of finished loads so revisiting the showcase does not refetch
//! the model. Entries are shared `Arc`s; viewers never mutate them.

use crate::format::ModelFormat;
use crate::scene::SceneAsset;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cache key: the full load request
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneKey {
    pub format: ModelFormat,
    pub model: String,
    pub material: Option<String>,
}

impl SceneKey {
    pub fn new(format: ModelFormat, model: &str, material: Option<&str>) -> Self {
        Self {
            format,
            model: model.to_string(),
            material: material.map(str::to_string),
        }
    }
}

/// Statistics about the scene cache
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub total_vertices: usize,
    pub total_triangles: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

/// LRU cache of loaded scenes
pub struct SceneCache {
    entries: LruCache<SceneKey, Arc<SceneAsset>>,
    hits: u64,
    misses: u64,
}

impl SceneCache {
    /// Create a cache holding up to `capacity` scenes (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a scene, marking it as recently used
    pub fn get(&mut self, key: &SceneKey) -> Option<Arc<SceneAsset>> {
        match self.entries.get(key) {
            Some(scene) => {
                self.hits += 1;
                Some(Arc::clone(scene))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a scene, evicting the least recently used one when full
    pub fn insert(&mut self, key: SceneKey, scene: Arc<SceneAsset>) {
        if let Some((evicted, _)) = self.entries.push(key, scene) {
            tracing::trace!(model = %evicted.model, "evicted cached scene");
        }
    }

    pub fn contains(&self, key: &SceneKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.entries.cap().get(),
            hits: self.hits,
            misses: self.misses,
            total_vertices: self.entries.iter().map(|(_, s)| s.total_vertices()).sum(),
            total_triangles: self.entries.iter().map(|(_, s)| s.total_triangles()).sum(),
        }
    }
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new(16)
    }
}
