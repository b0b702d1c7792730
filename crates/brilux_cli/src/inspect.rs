//! Model inspection

use anyhow::{Context, Result};
use brilux_3d::{AssetLoader, FsSource, ModelFormat, ModelPlacement, ModelViewer, ViewerState};
use brilux_core::Vec3;
use brilux_site::ShowcaseSettings;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MeshReport {
    pub name: String,
    pub vertices: usize,
    pub triangles: usize,
    pub material: Option<String>,
}

/// What the showcase would display for a model
#[derive(Debug, Serialize)]
pub struct ModelReport {
    pub name: String,
    pub format: ModelFormat,
    pub source: String,
    pub meshes: Vec<MeshReport>,
    pub materials: Vec<String>,
    pub vertices: usize,
    pub triangles: usize,
    /// Min and max corners
    pub bounds: Option<[Vec3; 2]>,
    pub placement: Option<ModelPlacement>,
}

/// Load the configured model through the showcase viewer
pub async fn inspect(settings: &ShowcaseSettings) -> Result<ModelReport> {
    let source = FsSource::new(&settings.asset_root);
    let loader = Arc::new(AssetLoader::new(Arc::new(source)).with_cache(settings.cache_entries));
    let mut viewer = ModelViewer::new(loader);

    info!(model = %settings.model, format = %settings.format, "loading model");
    viewer.request(&settings.model, settings.material.as_deref(), &settings.format);

    let scene = match viewer.resolve().await {
        ViewerState::Ready(scene) => Arc::clone(scene),
        ViewerState::Failed(err) => {
            return Err(err.clone())
                .with_context(|| format!("failed to load {}", settings.model));
        }
        other => anyhow::bail!("model load did not finish: {:?}", other),
    };

    let meshes = scene
        .meshes
        .iter()
        .map(|mesh| MeshReport {
            name: mesh.name.clone(),
            vertices: mesh.vertices.len(),
            triangles: mesh.triangle_count(),
            material: mesh
                .material_index
                .and_then(|i| scene.material(i))
                .map(|m| m.name.clone()),
        })
        .collect();

    Ok(ModelReport {
        name: scene.name.clone(),
        format: scene.format,
        source: scene.source_path.clone(),
        meshes,
        materials: scene.materials.iter().map(|m| m.name.clone()).collect(),
        vertices: scene.total_vertices(),
        triangles: scene.total_triangles(),
        bounds: scene.bounding_box().map(|(min, max)| [min, max]),
        placement: viewer.placement(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MTL: &str = "newmtl brass\nKd 0.8 0.6 0.2\n";
    const OBJ: &str = "\
mtllib lamp.mtl
o Base
v 0 0 0
v 2 0 0
v 2 0 2
v 0 0 2
usemtl brass
f 1 2 3 4
";

    fn settings(root: &std::path::Path) -> ShowcaseSettings {
        ShowcaseSettings {
            asset_root: root.to_path_buf(),
            ..ShowcaseSettings::default()
        }
    }

    #[tokio::test]
    async fn test_inspects_obj_model() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/lamp.obj"), OBJ).unwrap();
        fs::write(dir.path().join("models/lamp.mtl"), MTL).unwrap();

        let report = inspect(&settings(dir.path())).await.unwrap();
        assert_eq!(report.format, ModelFormat::Obj);
        assert_eq!(report.materials, vec!["brass"]);
        assert_eq!(report.meshes.len(), 1);
        assert_eq!(report.meshes[0].material.as_deref(), Some("brass"));
        assert_eq!(report.triangles, 2);
        assert!(report.placement.is_some());
    }

    #[tokio::test]
    async fn test_missing_material_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/lamp.obj"), OBJ).unwrap();

        let err = inspect(&settings(dir.path())).await.unwrap_err();
        let load = err.downcast_ref::<brilux_3d::LoadError>().unwrap();
        assert!(matches!(load, brilux_3d::LoadError::MaterialLoad { .. }));
    }

    #[tokio::test]
    async fn test_unknown_format_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.format = "gltf".to_string();

        let err = inspect(&settings).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<brilux_3d::LoadError>(),
            Some(brilux_3d::LoadError::UnsupportedFormat(tag)) if tag == "gltf"
        ));
    }
}
