//! Model format tags

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported showcase model formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Wavefront OBJ geometry with an MTL material library
    Obj,
    /// Autodesk FBX, binary encoding
    Fbx,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Obj => "obj",
            ModelFormat::Fbx => "fbx",
        }
    }

    /// Whether loading needs a material library first
    pub fn needs_material(&self) -> bool {
        matches!(self, ModelFormat::Obj)
    }

    /// Whether this build can parse the format
    pub fn is_enabled(&self) -> bool {
        match self {
            ModelFormat::Obj => cfg!(feature = "obj"),
            ModelFormat::Fbx => cfg!(feature = "fbx"),
        }
    }
}

impl FromStr for ModelFormat {
    type Err = LoadError;

    /// Tags are matched exactly (`"obj"`, `"fbx"`)
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "obj" => Ok(ModelFormat::Obj),
            "fbx" => Ok(ModelFormat::Fbx),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
