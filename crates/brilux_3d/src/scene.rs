//! Loaded scene data
//!
//! Format-independent representation of a showcase model, produced by the
//! OBJ and FBX parsers and handed to the viewer.

use crate::format::ModelFormat;
use brilux_core::{Color, Vec2, Vec3};

/// A fully loaded model
#[derive(Clone, Debug, PartialEq)]
pub struct SceneAsset {
    /// Scene name (file stem of the model)
    pub name: String,
    pub format: ModelFormat,
    /// Model path as requested
    pub source_path: String,
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<SceneMaterial>,
    /// Hierarchy nodes; every mesh hangs off one node
    pub nodes: Vec<SceneNode>,
    /// Root node indices
    pub root_nodes: Vec<usize>,
}

impl SceneAsset {
    pub fn new(format: ModelFormat, source_path: &str) -> Self {
        Self {
            name: file_stem(source_path).to_string(),
            format,
            source_path: source_path.to_string(),
            meshes: Vec::new(),
            materials: Vec::new(),
            nodes: Vec::new(),
            root_nodes: Vec::new(),
        }
    }

    /// Append a mesh under a new root node
    pub fn push_mesh(&mut self, mesh: SceneMesh) {
        self.nodes.push(SceneNode {
            name: mesh.name.clone(),
            mesh_index: Some(self.meshes.len()),
            children: Vec::new(),
        });
        self.root_nodes.push(self.nodes.len() - 1);
        self.meshes.push(mesh);
    }

    pub fn mesh(&self, index: usize) -> Option<&SceneMesh> {
        self.meshes.get(index)
    }

    pub fn material(&self, index: usize) -> Option<&SceneMaterial> {
        self.materials.get(index)
    }

    pub fn total_vertices(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }

    /// Axis-aligned bounds of all meshes
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self
            .meshes
            .iter()
            .flat_map(|m| m.vertices.iter().map(|v| v.position));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Triangle mesh
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMesh {
    pub name: String,
    pub vertices: Vec<SceneVertex>,
    /// Triangle list
    pub indices: Vec<u32>,
    /// Index into [`SceneAsset::materials`]
    pub material_index: Option<usize>,
}

impl SceneMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
            material_index: None,
        }
    }

    pub fn has_normals(&self) -> bool {
        self.vertices.first().is_some_and(|v| v.normal.is_some())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Fill in per-face normals when the source had none
    ///
    /// Vertices shared between faces take the normal of the last face.
    pub fn compute_flat_normals(&mut self) {
        if self.has_normals() {
            return;
        }

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(p0), Some(p1), Some(p2)) = (
                self.vertices.get(i0).map(|v| v.position),
                self.vertices.get(i1).map(|v| v.position),
                self.vertices.get(i2).map(|v| v.position),
            ) else {
                continue;
            };

            let normal = p1.sub(p0).cross(p2.sub(p0)).normalize();
            let normal = if normal == Vec3::ZERO { Vec3::UP } else { normal };
            for i in [i0, i1, i2] {
                self.vertices[i].normal = Some(normal);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneVertex {
    pub position: Vec3,
    pub normal: Option<Vec3>,
    pub uv: Option<Vec2>,
}

impl SceneVertex {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            normal: None,
            uv: None,
        }
    }
}

/// Surface description from a material library
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMaterial {
    pub name: String,
    pub base_color: Color,
    pub metallic: f32,
    pub roughness: f32,
    /// Diffuse texture path, relative to the material library
    pub diffuse_texture: Option<String>,
}

impl Default for SceneMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color: Color::WHITE,
            metallic: 0.0,
            roughness: 0.5,
            diffuse_texture: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub mesh_index: Option<usize>,
    pub children: Vec<usize>,
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> SceneMesh {
        let mut mesh = SceneMesh::new("tri");
        mesh.vertices = vec![
            SceneVertex::at(Vec3::new(0.0, 0.0, 0.0)),
            SceneVertex::at(Vec3::new(1.0, 0.0, 0.0)),
            SceneVertex::at(Vec3::new(0.0, 1.0, 0.0)),
        ];
        mesh.indices = vec![0, 1, 2];
        mesh
    }

    #[test]
    fn test_flat_normals_follow_winding() {
        let mut mesh = triangle();
        mesh.compute_flat_normals();
        assert!(mesh.has_normals());
        assert_eq!(mesh.vertices[0].normal, Some(Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_scene_totals_and_bounds() {
        let mut scene = SceneAsset::new(ModelFormat::Obj, "models/desk-lamp.obj");
        assert_eq!(scene.name, "desk-lamp");
        assert_eq!(scene.bounding_box(), None);

        scene.push_mesh(triangle());
        assert_eq!(scene.total_vertices(), 3);
        assert_eq!(scene.total_triangles(), 1);
        assert_eq!(scene.root_nodes, vec![0]);
        assert_eq!(scene.nodes[0].mesh_index, Some(0));
        assert_eq!(
            scene.bounding_box(),
            Some((Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)))
        );
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("a/b/lamp.fbx"), "lamp");
        assert_eq!(file_stem("lamp"), "lamp");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }
}
