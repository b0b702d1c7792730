//! Wavefront OBJ + MTL parsing
//!
//! Parsing is split in two so the loader can fail on the material library
//! before it ever fetches geometry. Both steps use `tobj` on in-memory
//! buffers; the OBJ's `mtllib` statement is answered from the library bytes
//! that were already fetched.

use crate::error::LoadError;
use crate::format::ModelFormat;
use crate::scene::{SceneAsset, SceneMaterial, SceneMesh, SceneVertex};
use brilux_core::{Color, Vec2, Vec3};
use std::io::BufReader;

/// Parsed MTL file
#[derive(Clone, Debug)]
pub struct MaterialLibrary {
    materials: Vec<tobj::Material>,
    source: Vec<u8>,
}

impl MaterialLibrary {
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name.as_str())
    }
}

/// Parse an MTL file; a library without materials is an error
pub fn parse_material_library(bytes: &[u8], path: &str) -> Result<MaterialLibrary, LoadError> {
    let mut reader = BufReader::new(bytes);
    let (materials, _) =
        tobj::load_mtl_buf(&mut reader).map_err(|e| LoadError::material(path, e))?;

    if materials.is_empty() {
        return Err(LoadError::material(path, "library defines no materials"));
    }

    tracing::debug!(path, materials = materials.len(), "parsed material library");
    Ok(MaterialLibrary {
        materials,
        source: bytes.to_vec(),
    })
}

/// Parse OBJ geometry against an already parsed material library
pub fn parse_geometry(
    bytes: &[u8],
    path: &str,
    library: &MaterialLibrary,
) -> Result<SceneAsset, LoadError> {
    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let mut reader = BufReader::new(bytes);
    let (models, _) = tobj::load_obj_buf(&mut reader, &load_options, |_| {
        tobj::load_mtl_buf(&mut BufReader::new(library.source.as_slice()))
    })
    .map_err(|e| LoadError::geometry(path, e))?;

    let mut scene = SceneAsset::new(ModelFormat::Obj, path);
    scene.materials = library.materials.iter().map(convert_material).collect();

    for model in &models {
        if let Some(mesh) = convert_model(model) {
            scene.push_mesh(mesh);
        }
    }

    if scene.meshes.is_empty() {
        return Err(LoadError::geometry(path, "file contains no geometry"));
    }

    tracing::debug!(
        path,
        meshes = scene.meshes.len(),
        triangles = scene.total_triangles(),
        "parsed obj geometry"
    );
    Ok(scene)
}

fn convert_model(model: &tobj::Model) -> Option<SceneMesh> {
    let mesh = &model.mesh;
    if mesh.positions.is_empty() || mesh.indices.is_empty() {
        return None;
    }

    let vertex_count = mesh.positions.len() / 3;
    let vertices = (0..vertex_count)
        .map(|i| {
            let normal = mesh.normals.get(i * 3..i * 3 + 3).map(|n| Vec3::new(n[0], n[1], n[2]));
            // OBJ texture space has v pointing up
            let uv = mesh
                .texcoords
                .get(i * 2..i * 2 + 2)
                .map(|t| Vec2::new(t[0], 1.0 - t[1]));
            SceneVertex {
                position: Vec3::new(
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ),
                normal,
                uv,
            }
        })
        .collect();

    let mut converted = SceneMesh {
        name: model.name.clone(),
        vertices,
        indices: mesh.indices.clone(),
        material_index: mesh.material_id,
    };
    converted.compute_flat_normals();
    Some(converted)
}

fn convert_material(material: &tobj::Material) -> SceneMaterial {
    let [r, g, b] = material.diffuse.unwrap_or([1.0, 1.0, 1.0]);
    let alpha = material.dissolve.unwrap_or(1.0);

    // Specular strength stands in for metalness, shininess for smoothness
    let metallic = material
        .specular
        .map(|s| (s[0] + s[1] + s[2]) / 3.0)
        .unwrap_or(0.0);
    let roughness = material
        .shininess
        .map(|s| 1.0 - (s / 1000.0).clamp(0.0, 1.0))
        .unwrap_or(0.5);

    SceneMaterial {
        name: material.name.clone(),
        base_color: Color::rgba(r, g, b, alpha),
        metallic,
        roughness,
        diffuse_texture: material.diffuse_texture.clone(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_material_library_names() {
        let library = parse_material_library(LAMP_MTL.as_bytes(), "lamp.mtl").unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["brass", "glass"]);
    }

    #[test]
    fn test_empty_library_is_material_error() {
        let err = parse_material_library(b"# nothing here\n", "empty.mtl").unwrap_err();
        assert!(matches!(err, LoadError::MaterialLoad { ref path, .. } if path == "empty.mtl"));
    }

    #[test]
    fn test_geometry_uses_library_materials() {
        let library = parse_material_library(LAMP_MTL.as_bytes(), "lamp.mtl").unwrap();
        let scene = parse_geometry(LAMP_OBJ.as_bytes(), "models/lamp.obj", &library).unwrap();

        assert_eq!(scene.format, ModelFormat::Obj);
        assert_eq!(scene.name, "lamp");
        assert_eq!(scene.meshes.len(), 2);
        // The quad base is triangulated
        assert_eq!(scene.meshes[0].triangle_count(), 2);
        assert_eq!(scene.total_triangles(), 3);

        let shade = &scene.meshes[1];
        let material = scene.material(shade.material_index.unwrap()).unwrap();
        assert_eq!(material.name, "glass");
        assert!((material.base_color.a - 0.4).abs() < 1e-6);
        assert!(shade.has_normals());
    }

    #[test]
    fn test_no_geometry_is_geometry_error() {
        let library = parse_material_library(LAMP_MTL.as_bytes(), "lamp.mtl").unwrap();
        let err = parse_geometry(b"mtllib lamp.mtl\n", "empty.obj", &library).unwrap_err();
        assert!(matches!(err, LoadError::GeometryLoad { .. }));
    }
}
