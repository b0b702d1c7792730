//! Site configuration (`brilux.toml`)
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [navigation]
//! scroll_threshold = 50.0
//! section_margin = "-30% 0px -30% 0px"
//! smooth_scroll_ms = 600
//!
//! [animation]
//! trigger_margin = "-100px"
//!
//! [showcase]
//! asset_root = "public"
//! model = "/models/lamp.obj"
//! material = "/models/lamp.mtl"
//! format = "obj"
//! cache_entries = 16
//! ```

use crate::error::{ConfigError, Result};
use crate::viewport::DEFAULT_SCROLL_THRESHOLD;
use brilux_core::{MarginLength, RootMargin};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up by [`SiteConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "brilux.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
    #[serde(default)]
    pub showcase: ShowcaseSettings,
}

/// Navbar and active-section behavior
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NavigationSettings {
    /// Scroll offset past which the navbar turns compact
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f32,
    /// Root margin of the section observer
    #[serde(default = "default_section_margin")]
    pub section_margin: RootMargin,
    /// Duration of smooth scrolls to a section
    #[serde(default = "default_smooth_scroll_ms")]
    pub smooth_scroll_ms: u64,
}

fn default_scroll_threshold() -> f32 {
    DEFAULT_SCROLL_THRESHOLD
}

fn default_section_margin() -> RootMargin {
    RootMargin {
        top: MarginLength::Percent(-30.0),
        right: MarginLength::Px(0.0),
        bottom: MarginLength::Percent(-30.0),
        left: MarginLength::Px(0.0),
    }
}

fn default_smooth_scroll_ms() -> u64 {
    600
}

impl NavigationSettings {
    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            scroll_threshold: default_scroll_threshold(),
            section_margin: default_section_margin(),
            smooth_scroll_ms: default_smooth_scroll_ms(),
        }
    }
}

/// Viewport triggers of the animated sections
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnimationSettings {
    #[serde(default = "default_trigger_margin")]
    pub trigger_margin: RootMargin,
}

fn default_trigger_margin() -> RootMargin {
    RootMargin::uniform(MarginLength::Px(-100.0))
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            trigger_margin: default_trigger_margin(),
        }
    }
}

/// The model shown in the modularity section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShowcaseSettings {
    /// Directory model paths are resolved against
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default = "default_model")]
    pub model: String,
    /// Material library, used by `obj` models
    #[serde(default = "default_material")]
    pub material: Option<String>,
    /// Format tag, checked when the model is loaded
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_cache_entries")]
    pub cache_entries: usize,
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_model() -> String {
    "/models/lamp.obj".to_string()
}

fn default_material() -> Option<String> {
    Some("/models/lamp.mtl".to_string())
}

fn default_format() -> String {
    "obj".to_string()
}

fn default_cache_entries() -> usize {
    16
}

impl Default for ShowcaseSettings {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            model: default_model(),
            material: default_material(),
            format: default_format(),
            cache_entries: default_cache_entries(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `brilux.toml` from a directory, falling back to defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.navigation.scroll_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "navigation.scroll_threshold",
                reason: format!("expected a non-negative number, got {}", threshold),
            });
        }
        if self.showcase.cache_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "showcase.cache_entries",
                reason: "the cache must hold at least one scene".to_string(),
            });
        }
        if self.showcase.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "showcase.model",
                reason: "model path is empty".to_string(),
            });
        }
        Ok(())
    }
}
