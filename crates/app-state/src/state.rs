//! The editing session: one project plus the views derived from it.
//!
//! `EditorSession` is the single owner of a project's clips, the selection,
//! the playback clock, and the media library. Every mutation goes through a
//! `&mut self` method that re-establishes the cross-component invariants
//! before returning:
//!
//! - the selected clip, if any, exists in the project,
//! - the playhead lies inside `[0, duration]`.

use lc_common::{
    ClipId, EditError, EditResult, EditorConfig, EditorResult, ExportQuality, ProbeError,
    SourceId, TimeCode,
};
use lc_timeline::{Clip, ClipPatch, MediaAsset, PresentationSource, Project, RenderParams};

use crate::media::{probe_asset, MediaLibrary, MediaProbe};
use crate::playback::{PlaybackClock, TickOutcome};
use crate::selection::SelectionState;
use crate::snapshot::ProjectSnapshot;

/// Owned state of one editing session.
#[derive(Clone, Debug)]
pub struct EditorSession {
    project: Project,
    selection: SelectionState,
    playback: PlaybackClock,
    media: MediaLibrary,
    quality: ExportQuality,
    config: EditorConfig,
    is_dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create a session after validating `config`.
    pub fn try_new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a session with an empty project.
    ///
    /// Out-of-range playback or zoom settings are replaced by their defaults
    /// rather than rejected. Use [`try_new`](Self::try_new) to reject them.
    pub fn new(config: EditorConfig) -> Self {
        let project = Project::with_zoom_config(config.project_name.clone(), config.zoom.clone());
        tracing::info!(project = %project.name(), "Editing session created");
        Self {
            project,
            selection: SelectionState::new(),
            playback: PlaybackClock::new(&config.playback),
            media: MediaLibrary::new(),
            quality: config.default_quality,
            config,
            is_dirty: false,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn playback(&self) -> &PlaybackClock {
        &self.playback
    }

    pub fn media(&self) -> &MediaLibrary {
        &self.media
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn quality(&self) -> ExportQuality {
        self.quality
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn current_time(&self) -> TimeCode {
        self.playback.current_time
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selection
            .selected()
            .and_then(|id| self.project.clip(id))
    }

    /// Clip under the playhead.
    pub fn active_clip(&self) -> Option<&Clip> {
        self.project.active_clip_at(self.playback.current_secs())
    }

    /// Render parameters for the playhead position.
    pub fn frame_at_playhead(&self) -> Option<RenderParams> {
        self.project.render_params_at(self.playback.current_secs())
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::capture(self)
    }

    // -----------------------------------------------------------------------
    // Project metadata
    // -----------------------------------------------------------------------

    /// Mark the project as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        if !self.is_dirty {
            self.is_dirty = true;
            tracing::debug!(project = %self.project.name(), "Project marked as dirty");
        }
    }

    /// Mark the project as saved (no unsaved changes).
    pub fn mark_clean(&mut self) {
        if self.is_dirty {
            self.is_dirty = false;
            tracing::debug!(project = %self.project.name(), "Project marked as clean");
        }
    }

    pub fn rename_project(&mut self, name: impl Into<String>) {
        self.project.rename(name);
        self.mark_dirty();
    }

    pub fn set_quality(&mut self, quality: ExportQuality) {
        self.quality = quality;
        tracing::debug!(%quality, "Export quality set");
    }

    // -----------------------------------------------------------------------
    // Media
    // -----------------------------------------------------------------------

    /// Probe a source and record it in the media library.
    ///
    /// The probe runs while `self` is borrowed; when the session sits behind
    /// a `SessionHandle`, call [`probe_asset`] first and then
    /// [`register_media`](Self::register_media) so the lock is not held
    /// during I/O.
    pub fn import_media(
        &mut self,
        probe: &dyn MediaProbe,
        source_id: SourceId,
        name: impl Into<String>,
    ) -> Result<MediaAsset, ProbeError> {
        let asset = probe_asset(probe, source_id, name)?;
        self.register_media(&asset);
        Ok(asset)
    }

    pub fn register_media(&mut self, asset: &MediaAsset) {
        self.media.insert(asset);
    }

    /// Look up a library entry and place it on the timeline.
    pub fn add_media_clip(
        &mut self,
        source_id: &SourceId,
        position: f64,
    ) -> Result<ClipId, ProbeError> {
        let asset = self
            .media
            .find(source_id)
            .ok_or_else(|| ProbeError::Unavailable {
                source_id: source_id.clone(),
                reason: "not in media library".to_string(),
            })?
            .asset()?;
        Ok(self.add_clip(&asset, position))
    }

    // -----------------------------------------------------------------------
    // Clip editing
    // -----------------------------------------------------------------------

    pub fn add_clip(&mut self, asset: &MediaAsset, position: f64) -> ClipId {
        let clip_id = self.project.add_clip(asset, position);
        self.after_edit();
        clip_id
    }

    /// Place an asset at the playhead, or at the end of the timeline when
    /// the playhead is at 0.
    pub fn add_clip_at_playhead(&mut self, asset: &MediaAsset) -> ClipId {
        let playhead = self.playback.current_secs();
        let position = if playhead > 0.0 {
            playhead
        } else {
            self.project.duration()
        };
        self.add_clip(asset, position)
    }

    pub fn move_clip(&mut self, clip_id: ClipId, new_position: f64) -> EditResult<()> {
        self.project.move_clip(clip_id, new_position)?;
        self.after_edit();
        Ok(())
    }

    pub fn update_clip(&mut self, clip_id: ClipId, patch: &ClipPatch) -> EditResult<&Clip> {
        self.project.update_clip(clip_id, patch)?;
        self.mark_dirty();
        self.project
            .clip(clip_id)
            .ok_or(EditError::NotFound { clip_id })
    }

    /// Delete a clip. Clears the selection in the same call if it pointed at
    /// the deleted clip.
    pub fn delete_clip(&mut self, clip_id: ClipId) -> EditResult<Clip> {
        let clip = self.project.delete_clip(clip_id)?;
        if self.selection.is_selected(clip_id) {
            self.selection.clear();
        }
        self.after_edit();
        Ok(clip)
    }

    /// Delete the selected clip. `Ok(None)` when nothing is selected.
    pub fn delete_selected(&mut self) -> EditResult<Option<Clip>> {
        match self.selection.selected() {
            Some(clip_id) => self.delete_clip(clip_id).map(Some),
            None => Ok(None),
        }
    }

    /// Split a clip at timeline time `at`. A selected clip that gets split
    /// no longer exists, so the selection is cleared.
    pub fn split_clip(&mut self, clip_id: ClipId, at: f64) -> EditResult<(ClipId, ClipId)> {
        let halves = self.project.split_clip(clip_id, at)?;
        self.after_edit();
        Ok(halves)
    }

    /// Split the selected clip at the playhead. `Ok(None)` when nothing is
    /// selected.
    pub fn split_selected_at_playhead(&mut self) -> EditResult<Option<(ClipId, ClipId)>> {
        let Some(clip_id) = self.selection.selected() else {
            return Ok(None);
        };
        let at = self.playback.current_secs();
        self.split_clip(clip_id, at).map(Some)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn select_clip(&mut self, clip_id: Option<ClipId>) {
        self.selection.select(&self.project, clip_id);
    }

    pub fn toggle_clip_selection(&mut self, clip_id: ClipId) {
        self.selection.toggle(&self.project, clip_id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    pub fn play(&mut self) -> EditResult<()> {
        self.playback.play(self.project.len())
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_play_pause(&mut self) -> EditResult<()> {
        self.playback.toggle_play_pause(self.project.len())
    }

    /// Advance the clock by one step against the current duration.
    pub fn tick(&mut self) -> TickOutcome {
        self.playback.tick(self.project.duration())
    }

    pub fn seek(&mut self, time: f64) {
        self.playback.seek(time, self.project.duration());
    }

    /// Seek to the time under a horizontal timeline offset.
    pub fn seek_to_pixel(&mut self, x: f64) {
        let time = self.project.time_at_pixel(x);
        self.seek(time);
    }

    pub fn skip_back(&mut self) {
        self.playback.skip_back(self.project.duration());
    }

    pub fn skip_forward(&mut self) {
        self.playback.skip_forward(self.project.duration());
    }

    // -----------------------------------------------------------------------
    // Zoom
    // -----------------------------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.project.set_zoom(zoom)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.project.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.project.zoom_out()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn after_edit(&mut self) {
        self.selection.retain_valid(&self.project);
        self.playback.clamp_to(self.project.duration());
        self.mark_dirty();
    }
}
