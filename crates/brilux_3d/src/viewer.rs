//! Model viewer state
//!
//! A viewer owns at most one in-flight load and the scene it produced.
//! Requesting a new model cancels the previous load; dropping the viewer
//! cancels whatever is still running.

use crate::error::LoadError;
use crate::loader::{AssetLoader, LoadHandle};
use crate::scene::SceneAsset;
use crate::showcase::{ModelPlacement, ShowcaseScene};
use std::sync::Arc;
use tracing::{debug, warn};

/// What the viewer currently shows
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerState {
    Idle,
    Loading { model: String },
    Ready(Arc<SceneAsset>),
    Failed(LoadError),
}

/// Owns the showcase scene and the model placed in it
pub struct ModelViewer {
    loader: Arc<AssetLoader>,
    showcase: ShowcaseScene,
    pending: Option<LoadHandle>,
    state: ViewerState,
    placement: Option<ModelPlacement>,
}

impl ModelViewer {
    pub fn new(loader: Arc<AssetLoader>) -> Self {
        Self {
            loader,
            showcase: ShowcaseScene::standard(),
            pending: None,
            state: ViewerState::Idle,
            placement: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn showcase(&self) -> &ShowcaseScene {
        &self.showcase
    }

    pub fn showcase_mut(&mut self) -> &mut ShowcaseScene {
        &mut self.showcase
    }

    pub fn scene(&self) -> Option<&Arc<SceneAsset>> {
        match &self.state {
            ViewerState::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    /// Where the loaded model sits in the showcase room
    pub fn placement(&self) -> Option<ModelPlacement> {
        self.placement
    }

    /// Start loading a model, cancelling any load in flight
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, model: &str, material: Option<&str>, format_tag: &str) {
        if self.pending.take().is_some() {
            debug!("replacing in-flight model load");
        }
        self.placement = None;
        self.pending = Some(self.loader.spawn_load(
            model,
            material.map(str::to_string),
            format_tag,
        ));
        self.state = ViewerState::Loading {
            model: model.to_string(),
        };
    }

    /// Cancel the in-flight load, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.state = ViewerState::Idle;
        }
    }

    /// Wait for the in-flight load and adopt its outcome
    pub async fn resolve(&mut self) -> &ViewerState {
        if let Some(handle) = self.pending.take() {
            self.state = match handle.join().await {
                Ok(scene) => {
                    self.placement = Some(self.showcase.place_model(&scene));
                    ViewerState::Ready(scene)
                }
                Err(err) => {
                    warn!(error = %err, "showcase model failed to load");
                    ViewerState::Failed(err)
                }
            };
        }
        &self.state
    }
}

#[cfg(all(test, feature = "fbx"))]
mod tests {
    use super::*;
    use crate::fbx::writer;
    use crate::source::MemorySource;
    use std::time::Duration;

    fn viewer(source: &MemorySource) -> ModelViewer {
        ModelViewer::new(Arc::new(AssetLoader::new(Arc::new(source.clone()))))
    }

    #[tokio::test]
    async fn test_resolves_to_ready_and_places_model() {
        let source = MemorySource::new();
        source.insert("lamp.fbx", writer::lamp(7400, false));
        let mut viewer = viewer(&source);

        viewer.request("lamp.fbx", None, "fbx");
        assert!(matches!(viewer.state(), ViewerState::Loading { .. }));

        assert!(matches!(viewer.resolve().await, ViewerState::Ready(_)));
        let placement = viewer.placement().unwrap();
        // Model base (y = 0) rests on the floor
        assert_eq!(placement.translation.y, viewer.showcase().floor.elevation);
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let source = MemorySource::new();
        let mut viewer = viewer(&source);

        viewer.request("lamp.obj", Some("lamp.mtl"), "obj");
        assert!(matches!(
            viewer.resolve().await,
            ViewerState::Failed(LoadError::MaterialLoad { .. })
        ));
        assert!(viewer.scene().is_none());
    }

    #[tokio::test]
    async fn test_new_request_cancels_previous() {
        let source = MemorySource::new().with_latency(Duration::from_millis(30));
        source.insert("a.fbx", writer::lamp(7400, false));
        source.insert("b.fbx", writer::lamp(7500, true));
        let mut viewer = viewer(&source);

        viewer.request("a.fbx", None, "fbx");
        tokio::task::yield_now().await;
        viewer.request("b.fbx", None, "fbx");
        viewer.resolve().await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(source.served(), vec!["b.fbx"]);
        assert_eq!(viewer.scene().unwrap().source_path, "b.fbx");
    }

    #[tokio::test]
    async fn test_dropping_viewer_cancels_load() {
        let source = MemorySource::new().with_latency(Duration::from_millis(30));
        source.insert("a.fbx", writer::lamp(7400, false));

        let mut viewer = viewer(&source);
        viewer.request("a.fbx", None, "fbx");
        tokio::task::yield_now().await;
        drop(viewer);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(source.served().is_empty());
    }
}
