//! The clip store: sole owner and mutator of a project's clip sequence.
//!
//! After every call the store guarantees:
//!
//! - clip ids are unique,
//! - every clip has a strictly positive duration,
//! - `duration()` equals the latest clip end (0 when empty),
//! - clips are ordered by non-decreasing `timeline_position`.
//!
//! Failed operations return an [`EditError`] and leave the store untouched.
//! Overlapping clips are allowed; see [`crate::presentation::active_clip_at`]
//! for how overlaps resolve during playback.

use std::collections::HashSet;

use lc_common::{ClipId, EditError, EditResult, ZoomConfig};
use serde::{Deserialize, Serialize};

use crate::asset::MediaAsset;
use crate::clip::{Clip, ClipPatch};

/// A single-track editing project.
///
/// Deserializing checks every clip, re-sorts them by position, and derives
/// `duration` and the clamped zoom instead of trusting the stored values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ProjectData")]
pub struct Project {
    name: String,
    clips: Vec<Clip>,
    duration: f64,
    zoom: f64,
    zoom_config: ZoomConfig,
}

impl Project {
    /// Create an empty project with default zoom bounds.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_zoom_config(name, ZoomConfig::default())
    }

    pub fn with_zoom_config(name: impl Into<String>, zoom_config: ZoomConfig) -> Self {
        let zoom = zoom_config.clamp(1.0);
        Self {
            name: name.into(),
            clips: Vec::new(),
            duration: 0.0,
            zoom,
            zoom_config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Clips in timeline order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn contains(&self, clip_id: ClipId) -> bool {
        self.clip(clip_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Project duration in seconds: the latest clip end, or 0 if empty.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Place a whole asset on the timeline. Negative or non-finite positions
    /// are clamped to 0.
    pub fn add_clip(&mut self, asset: &MediaAsset, position: f64) -> ClipId {
        let clip = Clip::from_asset(asset, sanitize_position(position));
        let clip_id = clip.id;
        tracing::debug!(
            clip_id = %clip_id,
            source = %clip.source_id,
            position = clip.timeline_position,
            "Adding clip"
        );
        self.clips.push(clip);
        self.reorder();
        clip_id
    }

    /// Move a clip to a new start position (clamped to >= 0).
    pub fn move_clip(&mut self, clip_id: ClipId, new_position: f64) -> EditResult<()> {
        let idx = self.index_of(clip_id)?;
        let position = sanitize_position(new_position);
        self.clips[idx].timeline_position = position;
        self.reorder();
        tracing::debug!(clip_id = %clip_id, position, duration = self.duration, "Moved clip");
        Ok(())
    }

    /// Merge a partial update into a clip. Out-of-range values are clamped.
    pub fn update_clip(&mut self, clip_id: ClipId, patch: &ClipPatch) -> EditResult<&Clip> {
        let idx = self.index_of(clip_id)?;
        self.clips[idx].apply(patch);
        tracing::debug!(clip_id = %clip_id, ?patch, "Updated clip");
        Ok(&self.clips[idx])
    }

    /// Remove a clip and return it.
    pub fn delete_clip(&mut self, clip_id: ClipId) -> EditResult<Clip> {
        let idx = self.index_of(clip_id)?;
        let clip = self.clips.remove(idx);
        self.recalculate_duration();
        tracing::debug!(clip_id = %clip_id, duration = self.duration, "Deleted clip");
        Ok(clip)
    }

    /// Split a clip at timeline time `at` into two contiguous clips.
    ///
    /// The split point must land strictly inside the clip. Both halves get
    /// fresh ids and inherit every audio/visual setting of the original.
    /// Returns `(first_id, second_id)`.
    pub fn split_clip(&mut self, clip_id: ClipId, at: f64) -> EditResult<(ClipId, ClipId)> {
        let idx = self.index_of(clip_id)?;
        let original = &self.clips[idx];

        let relative = at - original.timeline_position;
        let split_source = original.source_in + relative;
        // The second pair of comparisons also catches offsets too small to
        // move the source point, which would leave a zero-length half.
        let inside = relative > 0.0
            && relative < original.duration()
            && split_source > original.source_in
            && split_source < original.source_out;
        if !inside {
            return Err(EditError::InvalidSplitPoint {
                clip_id,
                at,
                start: original.timeline_position,
                end: original.timeline_end(),
            });
        }

        let first = Clip {
            id: ClipId::new(),
            source_out: split_source,
            ..original.clone()
        };
        let second = Clip {
            id: ClipId::new(),
            source_in: split_source,
            timeline_position: original.timeline_position + relative,
            ..original.clone()
        };
        let ids = (first.id, second.id);

        self.clips.splice(idx..=idx, [first, second]);
        self.reorder();

        tracing::debug!(
            clip_id = %clip_id,
            at,
            first = %ids.0,
            second = %ids.1,
            "Split clip"
        );
        Ok(ids)
    }

    // -----------------------------------------------------------------------
    // Zoom (presentation scale only)
    // -----------------------------------------------------------------------

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_config(&self) -> &ZoomConfig {
        &self.zoom_config
    }

    /// Set the zoom factor, clamped to the configured bounds. Returns the
    /// applied value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = self.zoom_config.clamp(zoom);
        tracing::debug!(zoom = self.zoom, "Zoom set");
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom * self.zoom_config.step_factor)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom / self.zoom_config.step_factor)
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.zoom_config.base_pixels_per_second * self.zoom
    }

    /// Convert a horizontal timeline offset to seconds, clamped to the
    /// project span.
    pub fn time_at_pixel(&self, x: f64) -> f64 {
        let time = x / self.pixels_per_second();
        if time.is_finite() {
            time.clamp(0.0, self.duration)
        } else {
            0.0
        }
    }

    pub fn pixel_at_time(&self, time: f64) -> f64 {
        time * self.pixels_per_second()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn index_of(&self, clip_id: ClipId) -> EditResult<usize> {
        self.clips
            .iter()
            .position(|c| c.id == clip_id)
            .ok_or(EditError::NotFound { clip_id })
    }

    /// Stable sort by position, then refresh the derived duration.
    fn reorder(&mut self) {
        self.clips
            .sort_by(|a, b| a.timeline_position.total_cmp(&b.timeline_position));
        self.recalculate_duration();
    }

    fn recalculate_duration(&mut self) {
        self.duration = self
            .clips
            .iter()
            .map(Clip::timeline_end)
            .fold(0.0_f64, f64::max);
    }
}

/// Serialized form of [`Project`]. The stored `duration` is ignored.
#[derive(Deserialize)]
struct ProjectData {
    name: String,
    #[serde(default)]
    clips: Vec<Clip>,
    #[serde(default = "unit_zoom")]
    zoom: f64,
    #[serde(default)]
    zoom_config: ZoomConfig,
}

fn unit_zoom() -> f64 {
    1.0
}

impl TryFrom<ProjectData> for Project {
    type Error = EditError;

    fn try_from(data: ProjectData) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(data.clips.len());
        for clip in &data.clips {
            check_stored_clip(clip)?;
            if !seen.insert(clip.id) {
                return Err(EditError::InvalidClip {
                    clip_id: clip.id,
                    reason: "duplicate clip id".to_string(),
                });
            }
        }

        let mut project = Self {
            name: data.name,
            clips: data.clips,
            duration: 0.0,
            zoom: data.zoom_config.clamp(data.zoom),
            zoom_config: data.zoom_config,
        };
        project.reorder();
        Ok(project)
    }
}

fn check_stored_clip(clip: &Clip) -> EditResult<()> {
    let invalid = |reason: &str| {
        Err(EditError::InvalidClip {
            clip_id: clip.id,
            reason: reason.to_string(),
        })
    };

    let times = [
        clip.source_duration,
        clip.source_in,
        clip.source_out,
        clip.timeline_position,
    ];
    if times.iter().any(|t| !t.is_finite()) {
        return invalid("times must be finite");
    }
    if !(clip.source_in >= 0.0
        && clip.source_in < clip.source_out
        && clip.source_out <= clip.source_duration)
    {
        return invalid("trim must satisfy 0 <= source_in < source_out <= source_duration");
    }
    if clip.timeline_position < 0.0 {
        return invalid("timeline_position must be >= 0");
    }
    Ok(())
}

fn sanitize_position(position: f64) -> f64 {
    if position.is_finite() {
        position.max(0.0)
    } else {
        0.0
    }
}
