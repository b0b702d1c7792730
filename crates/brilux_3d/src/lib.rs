//! BriLux 3D
//!
//! Model loading and the lit showcase room for the modularity section.
//!
//! # Features
//!
//! - `obj` (default): Wavefront OBJ geometry with an MTL material library
//! - `fbx` (default): binary FBX, including zlib-compressed arrays
//!
//! # Loading
//!
//! ```rust,no_run
//! use brilux_3d::{AssetLoader, FsSource};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), brilux_3d::LoadError> {
//! let loader = AssetLoader::new(Arc::new(FsSource::new("public"))).with_cache(8);
//! let scene = loader
//!     .load_model("/models/lamp.obj", Some("/models/lamp.mtl"), "obj")
//!     .await?;
//! println!("{} meshes", scene.meshes.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod format;
pub mod loader;
pub mod scene;
pub mod showcase;
pub mod source;
pub mod viewer;

#[cfg(feature = "fbx")]
pub mod fbx;
#[cfg(feature = "obj")]
pub mod obj;

pub use cache::{CacheStats, SceneCache, SceneKey};
pub use error::{LoadError, SourceError};
pub use format::ModelFormat;
pub use loader::{AssetLoader, LoadHandle};
pub use scene::{SceneAsset, SceneMaterial, SceneMesh, SceneNode, SceneVertex};
pub use showcase::{ModelPlacement, OrbitCamera, PointLight, ShowcaseScene};
pub use source::{AssetSource, FetchFuture, FsSource, MemorySource};
pub use viewer::{ModelViewer, ViewerState};
