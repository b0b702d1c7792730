//! Asynchronous model loading
//!
//! [`AssetLoader::load_model`] resolves a format tag, then runs the format's
//! pipeline against an [`AssetSource`]:
//!
//! - `obj`: material library first, geometry only once the library parsed
//! - `fbx`: geometry only
//!
//! [`AssetLoader::spawn_load`] runs the same pipeline as a tokio task behind
//! a [`LoadHandle`]. Dropping the handle aborts the task; a scene is only
//! ever observed once it is complete.

use crate::cache::{CacheStats, SceneCache, SceneKey};
use crate::error::LoadError;
use crate::format::ModelFormat;
use crate::scene::SceneAsset;
use crate::source::AssetSource;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Loads showcase models from an asset source
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    cache: Option<Mutex<SceneCache>>,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Keep up to `capacity` finished scenes
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = Some(Mutex::new(SceneCache::new(capacity)));
        self
    }

    pub fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache
            .as_ref()
            .map(|c| c.lock().unwrap_or_else(PoisonError::into_inner).stats())
    }

    /// Load a model
    ///
    /// `material` is the MTL path for `obj` models and ignored for `fbx`.
    pub async fn load_model(
        &self,
        model: &str,
        material: Option<&str>,
        format_tag: &str,
    ) -> Result<Arc<SceneAsset>, LoadError> {
        let format: ModelFormat = format_tag.parse()?;
        if !format.is_enabled() {
            return Err(LoadError::UnsupportedFormat(format_tag.to_string()));
        }

        let material = material.filter(|_| format.needs_material());
        let key = SceneKey::new(format, model, material);
        if let Some(scene) = self.cached(&key) {
            debug!(model, %format, "scene served from cache");
            return Ok(scene);
        }

        debug!(model, ?material, %format, source = self.source.name(), "loading model");
        let scene = Arc::new(self.run_pipeline(format, model, material).await?);
        info!(
            model,
            %format,
            meshes = scene.meshes.len(),
            triangles = scene.total_triangles(),
            "model loaded"
        );

        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, Arc::clone(&scene));
        }
        Ok(scene)
    }

    fn cached(&self, key: &SceneKey) -> Option<Arc<SceneAsset>> {
        self.cache
            .as_ref()?
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
    }

    async fn run_pipeline(
        &self,
        format: ModelFormat,
        model: &str,
        material: Option<&str>,
    ) -> Result<SceneAsset, LoadError> {
        match format {
            #[cfg(feature = "obj")]
            ModelFormat::Obj => {
                let material_path =
                    material.ok_or_else(|| LoadError::material("", "no material library given"))?;
                let mtl = self
                    .source
                    .fetch(material_path)
                    .await
                    .map_err(|e| LoadError::material(material_path, e))?;
                let library = crate::obj::parse_material_library(&mtl, material_path)?;

                let geometry = self
                    .source
                    .fetch(model)
                    .await
                    .map_err(|e| LoadError::geometry(model, e))?;
                crate::obj::parse_geometry(&geometry, model, &library)
            }
            #[cfg(feature = "fbx")]
            ModelFormat::Fbx => {
                let bytes = self
                    .source
                    .fetch(model)
                    .await
                    .map_err(|e| LoadError::geometry(model, e))?;
                crate::fbx::parse_scene(&bytes, model)
            }
            #[allow(unreachable_patterns)]
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Run [`load_model`](Self::load_model) on the tokio runtime
    ///
    /// Must be called from within a runtime.
    pub fn spawn_load(
        self: &Arc<Self>,
        model: impl Into<String>,
        material: Option<String>,
        format_tag: impl Into<String>,
    ) -> LoadHandle {
        let loader = Arc::clone(self);
        let model = model.into();
        let format_tag = format_tag.into();
        let task = tokio::spawn(async move {
            loader
                .load_model(&model, material.as_deref(), &format_tag)
                .await
        });
        LoadHandle { task }
    }
}

/// In-flight load; dropping it aborts the load
#[must_use = "dropping a LoadHandle cancels the load"]
pub struct LoadHandle {
    task: JoinHandle<Result<Arc<SceneAsset>, LoadError>>,
}

impl LoadHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Request cancellation; [`join`](Self::join) then yields `Cancelled`
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the load to finish
    pub async fn join(mut self) -> Result<Arc<SceneAsset>, LoadError> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(LoadError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            debug!("aborting model load");
            self.task.abort();
        }
    }
}

impl std::fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadHandle")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
