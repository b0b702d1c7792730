//! Binary FBX parsing
//!
//! Reads the node-record tree of a binary FBX file and extracts mesh
//! geometry from `Objects/Geometry` nodes. Only what the showcase needs is
//! interpreted: vertex positions and polygon indices. Everything else is
//! parsed and kept as generic nodes.
//!
//! File layout:
//!
//! ```text
//! "Kaydara FBX Binary  \0" 0x1A 0x00  version:u32
//! node records...  null record  footer
//! ```
//!
//! A node record starts with its absolute end offset, property count and
//! property list length (u32 before version 7500, u64 from 7500 on),
//! followed by a length-prefixed name, the properties and nested records.
//! Array properties may be zlib-compressed.

use crate::error::LoadError;
use crate::format::ModelFormat;
use crate::scene::{SceneAsset, SceneMesh, SceneVertex};
use brilux_core::Vec3;
use flate2::read::ZlibDecoder;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::io::Read;
use thiserror::Error;

const MAGIC: &[u8] = b"Kaydara FBX Binary  \0";
/// Magic, 0x1A 0x00, version
const HEADER_LEN: usize = 27;
/// First version with 64-bit record headers
const WIDE_RECORD_VERSION: u32 = 7500;

/// Low-level FBX decoding failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FbxError {
    #[error("ASCII FBX is not supported, export as binary")]
    Ascii,

    #[error("not an FBX file")]
    BadMagic,

    #[error("unexpected end of data at offset {0}")]
    Truncated(usize),

    #[error("unknown property type {code:?} at offset {offset}")]
    UnknownProperty { code: char, offset: usize },

    #[error("unknown array encoding {0}")]
    UnknownEncoding(u32),

    #[error("failed to inflate array: {0}")]
    Inflate(String),

    #[error("record at offset {start} has invalid end offset {end}")]
    BadOffset { start: usize, end: u64 },

    #[error("polygon index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: i64, vertices: usize },

    #[error("file contains no geometry")]
    NoGeometry,
}

/// Property value of a node record
#[derive(Clone, Debug, PartialEq)]
pub enum FbxProperty {
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    BoolArray(Vec<bool>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
    String(String),
    Raw(Vec<u8>),
}

impl FbxProperty {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FbxProperty::String(s) => Some(s),
            _ => None,
        }
    }

    /// Floating point array, widened to f64
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            FbxProperty::F64Array(values) => Some(values.clone()),
            FbxProperty::F32Array(values) => Some(values.iter().map(|&v| f64::from(v)).collect()),
            _ => None,
        }
    }

    /// Integer array, widened to i64
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            FbxProperty::I64Array(values) => Some(values.clone()),
            FbxProperty::I32Array(values) => Some(values.iter().map(|&v| i64::from(v)).collect()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FbxNode {
    pub name: String,
    pub properties: Vec<FbxProperty>,
    pub children: Vec<FbxNode>,
}

impl FbxNode {
    pub fn child(&self, name: &str) -> Option<&FbxNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FbxNode> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parsed node tree of a binary FBX file
#[derive(Clone, Debug, PartialEq)]
pub struct FbxDocument {
    pub version: u32,
    pub nodes: Vec<FbxNode>,
}

impl FbxDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, FbxError> {
        if !bytes.starts_with(MAGIC) {
            return Err(if looks_like_ascii(bytes) {
                FbxError::Ascii
            } else {
                FbxError::BadMagic
            });
        }
        if bytes.len() < HEADER_LEN {
            return Err(FbxError::Truncated(bytes.len()));
        }

        let mut cursor = Cursor {
            data: bytes,
            pos: MAGIC.len() + 2,
        };
        let version = cursor.u32()?;
        let wide = version >= WIDE_RECORD_VERSION;

        let mut nodes = Vec::new();
        while cursor.pos < bytes.len() {
            match read_node(&mut cursor, wide)? {
                Some(node) => nodes.push(node),
                None => break,
            }
        }

        Ok(Self { version, nodes })
    }

    pub fn node(&self, name: &str) -> Option<&FbxNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

fn looks_like_ascii(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let head = &bytes[start..];
    head.starts_with(b";") || head.starts_with(b"FBXHeaderExtension")
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], FbxError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(FbxError::Truncated(self.pos))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], FbxError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, FbxError> {
        Ok(self.bytes::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, FbxError> {
        self.bytes().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> Result<u64, FbxError> {
        self.bytes().map(u64::from_le_bytes)
    }

    /// Record header field, sized by file version
    fn header_field(&mut self, wide: bool) -> Result<u64, FbxError> {
        if wide {
            self.u64()
        } else {
            self.u32().map(u64::from)
        }
    }
}

fn read_node(cursor: &mut Cursor<'_>, wide: bool) -> Result<Option<FbxNode>, FbxError> {
    let start = cursor.pos;
    let end_offset = cursor.header_field(wide)?;
    let property_count = cursor.header_field(wide)?;
    let _property_list_len = cursor.header_field(wide)?;
    let name_len = cursor.u8()? as usize;

    // Null record terminates a node list
    if end_offset == 0 {
        return Ok(None);
    }

    let bad_offset = FbxError::BadOffset {
        start,
        end: end_offset,
    };
    let end = usize::try_from(end_offset)
        .ok()
        .filter(|&end| end > start && end <= cursor.data.len())
        .ok_or_else(|| bad_offset.clone())?;

    let name = String::from_utf8_lossy(cursor.take(name_len)?).into_owned();
    let mut properties = Vec::new();
    for _ in 0..property_count {
        properties.push(read_property(cursor)?);
    }
    if cursor.pos > end {
        return Err(bad_offset);
    }

    let mut children = Vec::new();
    while cursor.pos < end {
        match read_node(cursor, wide)? {
            Some(child) => children.push(child),
            None => break,
        }
    }
    cursor.pos = end;

    Ok(Some(FbxNode {
        name,
        properties,
        children,
    }))
}

fn read_property(cursor: &mut Cursor<'_>) -> Result<FbxProperty, FbxError> {
    let offset = cursor.pos;
    let property = match cursor.u8()? {
        b'C' => FbxProperty::Bool(cursor.u8()? != 0),
        b'Y' => FbxProperty::I16(cursor.bytes().map(i16::from_le_bytes)?),
        b'I' => FbxProperty::I32(cursor.bytes().map(i32::from_le_bytes)?),
        b'L' => FbxProperty::I64(cursor.bytes().map(i64::from_le_bytes)?),
        b'F' => FbxProperty::F32(cursor.bytes().map(f32::from_le_bytes)?),
        b'D' => FbxProperty::F64(cursor.bytes().map(f64::from_le_bytes)?),
        b'b' => FbxProperty::BoolArray(read_array(cursor, |[b]: [u8; 1]| b != 0)?),
        b'i' => FbxProperty::I32Array(read_array(cursor, i32::from_le_bytes)?),
        b'l' => FbxProperty::I64Array(read_array(cursor, i64::from_le_bytes)?),
        b'f' => FbxProperty::F32Array(read_array(cursor, f32::from_le_bytes)?),
        b'd' => FbxProperty::F64Array(read_array(cursor, f64::from_le_bytes)?),
        b'S' => {
            let len = cursor.u32()? as usize;
            FbxProperty::String(String::from_utf8_lossy(cursor.take(len)?).into_owned())
        }
        b'R' => {
            let len = cursor.u32()? as usize;
            FbxProperty::Raw(cursor.take(len)?.to_vec())
        }
        code => {
            return Err(FbxError::UnknownProperty {
                code: code as char,
                offset,
            })
        }
    };
    Ok(property)
}

fn read_array<T, const N: usize>(
    cursor: &mut Cursor<'_>,
    decode: impl Fn([u8; N]) -> T,
) -> Result<Vec<T>, FbxError> {
    let offset = cursor.pos;
    let len = cursor.u32()? as usize;
    let encoding = cursor.u32()?;
    let stored_len = cursor.u32()? as usize;
    let payload = cursor.take(stored_len)?;

    let raw: Cow<'_, [u8]> = match encoding {
        0 => Cow::Borrowed(payload),
        1 => {
            let mut inflated = Vec::new();
            ZlibDecoder::new(payload)
                .read_to_end(&mut inflated)
                .map_err(|e| FbxError::Inflate(e.to_string()))?;
            Cow::Owned(inflated)
        }
        other => return Err(FbxError::UnknownEncoding(other)),
    };

    let needed = len.checked_mul(N).ok_or(FbxError::Truncated(offset))?;
    if raw.len() < needed {
        return Err(FbxError::Truncated(offset));
    }

    Ok(raw[..needed]
        .chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(chunk);
            decode(bytes)
        })
        .collect())
}

/// Parse a binary FBX file into a scene
///
/// Every failure, including ASCII input, is a geometry error.
pub fn parse_scene(bytes: &[u8], path: &str) -> Result<SceneAsset, LoadError> {
    let document = FbxDocument::parse(bytes).map_err(|e| LoadError::geometry(path, e))?;
    let scene = build_scene(&document, path).map_err(|e| LoadError::geometry(path, e))?;

    tracing::debug!(
        path,
        version = document.version,
        meshes = scene.meshes.len(),
        triangles = scene.total_triangles(),
        "parsed fbx geometry"
    );
    Ok(scene)
}

fn build_scene(document: &FbxDocument, path: &str) -> Result<SceneAsset, FbxError> {
    let mut scene = SceneAsset::new(ModelFormat::Fbx, path);

    let geometries = document
        .node("Objects")
        .into_iter()
        .flat_map(|objects| objects.children_named("Geometry"));

    for geometry in geometries {
        let positions = geometry
            .child("Vertices")
            .and_then(|n| n.properties.first())
            .and_then(FbxProperty::to_f64_vec);
        let polygons = geometry
            .child("PolygonVertexIndex")
            .and_then(|n| n.properties.first())
            .and_then(FbxProperty::to_i64_vec);
        let (Some(positions), Some(polygons)) = (positions, polygons) else {
            continue;
        };

        let name = geometry
            .properties
            .get(1)
            .and_then(FbxProperty::as_str)
            .map(object_name)
            .unwrap_or("Geometry");

        let mesh = build_mesh(name, &positions, &polygons)?;
        if mesh.triangle_count() > 0 {
            scene.push_mesh(mesh);
        }
    }

    if scene.meshes.is_empty() {
        return Err(FbxError::NoGeometry);
    }
    Ok(scene)
}

/// `"Lamp\0\x01Geometry"` → `"Lamp"`
fn object_name(raw: &str) -> &str {
    raw.split("\u{0}\u{1}").next().unwrap_or(raw)
}

/// Fan-triangulate polygons into unshared vertices
///
/// A negative index `i` marks the last vertex of a polygon and stands for
/// `!i` (`-i - 1`).
fn build_mesh(name: &str, positions: &[f64], polygons: &[i64]) -> Result<SceneMesh, FbxError> {
    let vertex_count = positions.len() / 3;
    let position = |index: i64| {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < vertex_count)
            .map(|i| {
                Vec3::new(
                    positions[i * 3] as f32,
                    positions[i * 3 + 1] as f32,
                    positions[i * 3 + 2] as f32,
                )
            })
            .ok_or(FbxError::IndexOutOfRange {
                index,
                vertices: vertex_count,
            })
    };

    let mut mesh = SceneMesh::new(name);
    let mut polygon: SmallVec<[Vec3; 8]> = SmallVec::new();
    for &raw in polygons {
        let (index, closes) = if raw < 0 { (!raw, true) } else { (raw, false) };
        polygon.push(position(index)?);
        if !closes {
            continue;
        }

        for i in 1..polygon.len().saturating_sub(1) {
            for corner in [polygon[0], polygon[i], polygon[i + 1]] {
                mesh.indices.push(mesh.vertices.len() as u32);
                mesh.vertices.push(SceneVertex::at(corner));
            }
        }
        polygon.clear();
    }

    mesh.compute_flat_normals();
    Ok(mesh)
}
