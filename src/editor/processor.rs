use tracing::{debug, info, warn};

use super::{Command, Direction, EditorSnapshot};
use crate::annotation::{self, Annotation};
use crate::constants::{AUTO_SELECT_TOLERANCE_SECONDS, RESIZE_CURSOR_PULLBACK_SECONDS};
use crate::core::overlap::OverlapLayout;
use crate::error::{EditorError, Result};
use crate::hotkeys::{HotkeyContext, HotkeyResult, KeyStroke};
use crate::state::{
    EditorSettings, LabelKey, Region, RegionId, RegionPatch, RegionStore, SessionState,
};

/// One editing session: settings, region store and session state, owned
/// together so independent sessions never share anything.
#[derive(Debug, Clone)]
pub struct Editor {
    settings: EditorSettings,
    store: RegionStore,
    session: SessionState,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        let store = RegionStore::with_palette(settings.palette.clone());
        let session = SessionState::new(&settings);
        Self {
            settings,
            store,
            session,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn regions(&self) -> &[Region] {
        self.store.regions()
    }

    pub fn layout(&self) -> &OverlapLayout {
        self.store.layout()
    }

    pub fn active_region(&self) -> Option<&Region> {
        self.session
            .active_region
            .as_ref()
            .and_then(|id| self.store.get(id))
    }

    // =========================================================================
    // Command dispatch
    // =========================================================================

    /// Apply one command, then reconcile. A rejected command leaves the
    /// store unchanged.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        debug!(?command, "applying command");
        let result = match command {
            Command::None => Ok(()),
            Command::TogglePlay => {
                self.session.playing = !self.session.playing;
                Ok(())
            }
            Command::NextRegion => {
                self.select_neighbor(Direction::Forward);
                Ok(())
            }
            Command::PrevRegion => {
                self.select_neighbor(Direction::Backward);
                Ok(())
            }
            Command::Deselect => {
                self.session.deselect();
                Ok(())
            }
            Command::SetActiveLabel(key) => self.set_active_label(key),
            Command::MoveCursor { direction, coarse } => self.move_cursor(direction, coarse),
            Command::ResizeActive {
                direction,
                coarse,
                end_edge,
            } => self.resize_active(direction, coarse, end_edge),
            Command::Nudge {
                direction,
                coarse,
                end_edge,
            } => {
                if self.session.active_region.is_some() {
                    self.resize_active(direction, coarse, end_edge)
                } else {
                    self.move_cursor(direction, coarse)
                }
            }
            Command::Zoom(delta) => {
                self.session.zoom = self.session.zoom.saturating_add(delta);
                Ok(())
            }
            Command::DeleteActive(direction) => {
                self.delete_active(direction);
                Ok(())
            }
            Command::InsertRegion => self.insert_region(),
            Command::SplitActive => self.split_active(),
        };

        self.reconcile();
        if let Err(err) = &result {
            warn!(%err, "command rejected");
        }
        result
    }

    /// Parse and apply a command token. `none` is always a no-op; unknown
    /// tokens fail with `UnsupportedCommand` and change nothing.
    pub fn apply_token(&mut self, token: &str) -> Result<()> {
        let command = Command::parse(token).inspect_err(|err| warn!(%err, "unknown token"))?;
        self.apply(command)
    }

    /// Decode and apply a key press. Returns whether a command was applied.
    pub fn handle_key(&mut self, stroke: &KeyStroke, context: &HotkeyContext) -> Result<bool> {
        match stroke.resolve(context) {
            HotkeyResult::Action(command) => {
                self.apply(command)?;
                Ok(true)
            }
            HotkeyResult::NoMatch | HotkeyResult::Suppressed => Ok(false),
        }
    }

    // =========================================================================
    // Direct setters
    // =========================================================================

    /// Move the cursor to `time` (clamped at zero). Rejected while playing.
    pub fn set_cursor_time(&mut self, time: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(EditorError::InvalidState(format!("cursor time must be finite, got {time}")));
        }
        self.ensure_paused()?;
        self.move_cursor_to(time);
        self.reconcile();
        Ok(())
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.session.playing = playing;
    }

    /// Select a region directly (e.g. a click on the timeline).
    pub fn select_region(&mut self, id: Option<RegionId>) -> Result<()> {
        if let Some(id) = &id {
            if !self.store.contains(id) {
                return Err(EditorError::NotFound { id: id.to_string() });
            }
        }
        self.session.active_region = id;
        self.reconcile();
        Ok(())
    }

    /// Partial update of a region from the host (e.g. an edge drag).
    pub fn update_region(&mut self, id: &RegionId, patch: &RegionPatch) -> Result<()> {
        let result = self.store.update(id, patch);
        self.reconcile();
        result
    }

    /// Register a label key with a display string before any region uses it.
    pub fn register_label(&mut self, key: LabelKey, display: impl Into<String>) -> bool {
        self.store.register_label(key, display)
    }

    pub fn rename_label(&mut self, key: &LabelKey, display: impl Into<String>) -> Result<()> {
        self.store.rename_label(key, display)
    }

    /// Drop all regions, labels and colors. Cursor, transport and zoom stay.
    pub fn reset(&mut self) {
        self.store.clear();
        self.session.deselect();
        self.reconcile();
        info!("editor reset");
    }

    // =========================================================================
    // Annotation bridge
    // =========================================================================

    /// Replace all regions with the annotation's tracks, atomically.
    pub fn import_annotation(&mut self, source: &Annotation) -> Result<()> {
        let result = annotation::import_into(&mut self.store, source);
        self.reconcile();
        match &result {
            Ok(()) => info!(
                tracks = source.len(),
                labels = self.store.labels().len(),
                "imported annotation"
            ),
            Err(err) => warn!(%err, "annotation import rejected"),
        }
        result
    }

    pub fn export_annotation(&self) -> Annotation {
        annotation::export(&self.store)
    }

    /// Consistent copy of every value the rendering surface mirrors.
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            regions: self.store.regions().to_vec(),
            labels: self.store.labels().labels().clone(),
            colors: self.store.labels().colors().clone(),
            overlap: self.store.layout().clone(),
            active_region: self.session.active_region.clone(),
            active_label: self.session.active_label.clone(),
            cursor_time: self.session.cursor_time,
            playing: self.session.playing,
            zoom: self.session.zoom,
        }
    }

    // =========================================================================
    // Command implementations
    // =========================================================================

    fn select_neighbor(&mut self, direction: Direction) {
        let ids = self.sorted_ids(direction);
        if ids.is_empty() {
            return;
        }

        let current = self
            .session
            .active_region
            .as_ref()
            .and_then(|active| ids.iter().position(|id| id == active));
        let target = match (current, direction) {
            (Some(index), _) => wrap(index, direction.offset(), ids.len()),
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => ids.len() - 1,
        };

        let id = ids[target].clone();
        let start = self.store.get(&id).map_or(self.session.cursor_time, |r| r.start);
        self.session.select(id);
        self.seek_paused(start);
    }

    fn set_active_label(&mut self, key: LabelKey) -> Result<()> {
        self.session.active_label = key.clone();
        if let Some(id) = self.session.active_region.clone() {
            if self.store.contains(&id) {
                self.store.update(&id, &RegionPatch::default().label(key))?;
            }
        }
        Ok(())
    }

    fn move_cursor(&mut self, direction: Direction, coarse: bool) -> Result<()> {
        if self.session.active_region.is_some() {
            warn!("move-cursor ignored while a region is active");
            return Ok(());
        }
        self.ensure_paused()?;
        let delta = self.settings.step(coarse) * direction.sign();
        self.move_cursor_to(self.session.cursor_time + delta);
        Ok(())
    }

    fn resize_active(&mut self, direction: Direction, coarse: bool, end_edge: bool) -> Result<()> {
        let Some(id) = self.session.active_region.clone() else {
            warn!("resize-active ignored without an active region");
            return Ok(());
        };
        let region = self
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| EditorError::NotFound { id: id.to_string() })?;
        let delta = self.settings.step(coarse) * direction.sign();

        let was_playing = self.session.playing;
        self.session.playing = false;
        let outcome = self.resize_edge(&region, delta, end_edge);
        self.session.playing = was_playing;
        outcome
    }

    fn resize_edge(&mut self, region: &Region, delta: f64, end_edge: bool) -> Result<()> {
        if end_edge {
            let end = region.end + delta;
            self.store.update(&region.id, &RegionPatch::default().end(end))?;
            if self.session.cursor_time > end {
                self.move_cursor_to(end - RESIZE_CURSOR_PULLBACK_SECONDS);
            }
        } else {
            let start = (region.start + delta).max(0.0);
            self.store.update(&region.id, &RegionPatch::default().start(start))?;
            self.move_cursor_to(start);
        }
        Ok(())
    }

    fn delete_active(&mut self, direction: Direction) {
        let Some(id) = self.session.active_region.clone() else {
            warn!("delete-active ignored without an active region");
            return;
        };
        let ids = self.sorted_ids(direction);
        let Some(index) = ids.iter().position(|candidate| *candidate == id) else {
            self.session.deselect();
            return;
        };
        let neighbor = ids[wrap(index, direction.offset(), ids.len())].clone();

        self.store.remove(&id);
        if neighbor == id || self.store.is_empty() {
            self.session.deselect();
        } else {
            self.session.select(neighbor);
        }
    }

    fn insert_region(&mut self) -> Result<()> {
        let start = self.session.cursor_time;
        let end = start + self.settings.default_duration;
        let id = self
            .store
            .create(start, end, self.session.active_label.clone())?;
        self.session.select(id);
        Ok(())
    }

    fn split_active(&mut self) -> Result<()> {
        let Some(id) = self.session.active_region.clone() else {
            warn!("split-active ignored without an active region");
            return Ok(());
        };
        let time = self.session.cursor_time;
        match self.store.get(&id) {
            Some(region) if region.contains_time(time) => {}
            _ => {
                warn!(time, "split-active ignored: cursor outside the active region");
                return Ok(());
            }
        }
        let second = self.store.split(&id, time)?;
        self.session.select(second);
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Region ids in navigation order: `(start, end)` going forward,
    /// `(end, start)` going backward.
    fn sorted_ids(&self, direction: Direction) -> Vec<RegionId> {
        let sorted = match direction {
            Direction::Forward => self.store.sorted_by_start(),
            Direction::Backward => self.store.sorted_by_end(),
        };
        sorted.into_iter().map(|r| r.id.clone()).collect()
    }

    fn ensure_paused(&self) -> Result<()> {
        if self.session.playing {
            return Err(EditorError::InvalidState(
                "setting the cursor while playing is not supported".to_string(),
            ));
        }
        Ok(())
    }

    /// Move the cursor with playback paused, then restore the transport.
    fn seek_paused(&mut self, time: f64) {
        let playing = self.session.playing;
        self.session.playing = false;
        self.move_cursor_to(time);
        self.session.playing = playing;
    }

    fn move_cursor_to(&mut self, time: f64) {
        self.session.cursor_time = time.max(0.0);
        self.auto_select();
    }

    /// Select the region under the cursor whose start is closest to it.
    /// An active region that already covers the cursor is kept.
    fn auto_select(&mut self) {
        if !self.settings.auto_select {
            return;
        }
        let time = self.session.cursor_time;
        let covers = |r: &Region| {
            r.start - AUTO_SELECT_TOLERANCE_SECONDS <= time
                && time <= r.end + AUTO_SELECT_TOLERANCE_SECONDS
        };
        if self.active_region().is_some_and(covers) {
            return;
        }
        let closest = self
            .store
            .regions()
            .iter()
            .filter(|r| covers(*r))
            .min_by(|a, b| (a.start - time).abs().total_cmp(&(b.start - time).abs()))
            .map(|r| r.id.clone());
        if let Some(id) = closest {
            self.session.select(id);
        }
    }

    /// Drop a dangling selection, then mirror the active region's label.
    fn reconcile(&mut self) {
        let Some(id) = self.session.active_region.as_ref() else {
            return;
        };
        match self.store.get(id) {
            Some(region) => self.session.active_label = region.label.clone(),
            None => {
                debug!(%id, "active region no longer exists");
                self.session.active_region = None;
            }
        }
    }
}

fn wrap(index: usize, offset: isize, len: usize) -> usize {
    (index as isize + offset).rem_euclid(len as isize) as usize
}
