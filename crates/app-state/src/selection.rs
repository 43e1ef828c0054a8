//! Single-clip selection tracking.

use lc_common::ClipId;
use lc_timeline::Project;
use serde::{Deserialize, Serialize};

/// Tracks which clip, if any, is currently selected.
///
/// Selection is only ever set to an id that exists in the project passed
/// alongside; unknown ids degrade to "nothing selected".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected_clip: Option<ClipId>,
}

impl SelectionState {
    /// Create a new empty selection state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `clip_id` if it is present in `project`, otherwise clear.
    pub fn select(&mut self, project: &Project, clip_id: Option<ClipId>) {
        self.selected_clip = clip_id.filter(|id| project.contains(*id));
        tracing::debug!(selected = ?self.selected_clip, "Selection changed");
    }

    /// Click behaviour: clicking the selected clip again deselects it.
    pub fn toggle(&mut self, project: &Project, clip_id: ClipId) {
        if self.is_selected(clip_id) {
            self.clear();
        } else {
            self.select(project, Some(clip_id));
        }
    }

    pub fn clear(&mut self) {
        if self.selected_clip.take().is_some() {
            tracing::debug!("Selection cleared");
        }
    }

    /// Drop the selection if it no longer refers to a clip in `project`.
    pub fn retain_valid(&mut self, project: &Project) {
        if let Some(id) = self.selected_clip {
            if !project.contains(id) {
                self.clear();
            }
        }
    }

    pub fn selected(&self) -> Option<ClipId> {
        self.selected_clip
    }

    pub fn is_selected(&self, clip_id: ClipId) -> bool {
        self.selected_clip == Some(clip_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_clip.is_none()
    }
}
