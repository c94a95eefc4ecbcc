//! Viewer configuration.
//!
//! Read from a JSON file given with `--config`. Every field has a default, so
//! a partial file (or none at all) is fine.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use rtls_feed::FeedSettings;
use rtls_renderer::grid::DEFAULT_TARGET_SPACING;
use rtls_renderer::icons::DEFAULT_ICONS;
use rtls_renderer::marker::DEFAULT_ICON_SIZE;
use rtls_renderer::viewport::DEFAULT_ZOOM;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub feed: FeedSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_surface_side")]
    pub width: f64,
    #[serde(default = "default_surface_side")]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Pixel position of the real-world origin. Defaults to a third of the way
    /// in from the left and two thirds of the way down.
    #[serde(default)]
    pub offset: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Must lie in `(0, 1000]`; checked when the grid planner is built.
    #[serde(default = "default_target_spacing")]
    pub target_pixel_spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default = "default_icon_size")]
    pub icon_size: f64,
    #[serde(default = "default_icon_size")]
    pub border: f64,
    #[serde(default = "default_icons")]
    pub icons: Vec<String>,
}

fn default_surface_side() -> f64 {
    640.0
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_target_spacing() -> f64 {
    DEFAULT_TARGET_SPACING
}

fn default_icon_size() -> f64 {
    DEFAULT_ICON_SIZE
}

fn default_icons() -> Vec<String> {
    DEFAULT_ICONS.iter().map(|s| s.to_string()).collect()
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_surface_side(),
            height: default_surface_side(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            offset: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            target_pixel_spacing: default_target_spacing(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            icon_size: default_icon_size(),
            border: default_icon_size(),
            icons: default_icons(),
        }
    }
}

impl ViewerConfig {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
