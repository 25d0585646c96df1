//! Session state shared between commands.

use serde::Serialize;

use super::{EditorSettings, LabelKey, RegionId};

/// Cursor, transport and selection state of one editing session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    /// Region currently selected for edit commands.
    pub active_region: Option<RegionId>,
    /// Cursor position in seconds, never negative.
    pub cursor_time: f64,
    /// Whether playback is running.
    pub playing: bool,
    /// Unclamped zoom level.
    pub zoom: i32,
    /// Label used for new regions and mirrored from the active region.
    pub active_label: LabelKey,
}

impl SessionState {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            active_region: None,
            cursor_time: 0.0,
            playing: false,
            zoom: settings.initial_zoom,
            active_label: LabelKey::new(settings.initial_label.clone()),
        }
    }

    /// Replace the selection with a single region.
    pub fn select(&mut self, id: RegionId) {
        self.active_region = Some(id);
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.active_region = None;
    }

    pub fn is_active(&self, id: &RegionId) -> bool {
        self.active_region.as_ref() == Some(id)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}
