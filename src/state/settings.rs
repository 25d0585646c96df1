use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_ACTIVE_LABEL, DEFAULT_PRECISION, DEFAULT_REGION_DURATION_SECONDS, DEFAULT_ZOOM,
    LABEL_PALETTE,
};
use crate::error::{EditorError, Result};

/// Editor-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Fine / coarse step in seconds for cursor moves and edge resizes
    #[serde(default = "default_precision")]
    pub precision: [f64; 2],
    /// Duration of regions created at the cursor
    #[serde(default = "default_duration")]
    pub default_duration: f64,
    /// Zoom level at session start
    #[serde(default = "default_zoom")]
    pub initial_zoom: i32,
    /// Active label key at session start
    #[serde(default = "default_label")]
    pub initial_label: String,
    /// Select the region under the cursor whenever the cursor moves
    #[serde(default)]
    pub auto_select: bool,
    /// Label colors, cycled in allocation order
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

fn default_precision() -> [f64; 2] {
    DEFAULT_PRECISION
}

fn default_duration() -> f64 {
    DEFAULT_REGION_DURATION_SECONDS
}

fn default_zoom() -> i32 {
    DEFAULT_ZOOM
}

fn default_label() -> String {
    DEFAULT_ACTIVE_LABEL.to_string()
}

fn default_palette() -> Vec<String> {
    LABEL_PALETTE.iter().map(|c| c.to_string()).collect()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            default_duration: default_duration(),
            initial_zoom: default_zoom(),
            initial_label: default_label(),
            auto_select: false,
            palette: default_palette(),
        }
    }
}

impl EditorSettings {
    /// Step size for the fine (`false`) or coarse (`true`) modifier.
    pub fn step(&self, coarse: bool) -> f64 {
        self.precision[usize::from(coarse)]
    }

    /// Reject settings the editor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.precision.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(EditorError::InvalidState(format!(
                "precision steps must be positive, got {:?}",
                self.precision
            )));
        }
        if !self.default_duration.is_finite() || self.default_duration <= 0.0 {
            return Err(EditorError::InvalidState(format!(
                "default duration must be positive, got {}",
                self.default_duration
            )));
        }
        if self.palette.is_empty() {
            return Err(EditorError::InvalidState("palette must not be empty".to_string()));
        }
        if self.initial_label.trim().is_empty() {
            return Err(EditorError::InvalidState("initial label must not be empty".to_string()));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings: EditorSettings = serde_json::from_str(&json)?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "loaded editor settings");
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
