//! Read-only project snapshot handed to export and storage collaborators.
//!
//! A snapshot is a detached copy: later edits to the session do not affect
//! it, and the collaborator cannot reach back into session state through it.

use lc_common::ExportQuality;
use lc_timeline::Clip;
use serde::{Deserialize, Serialize};

use crate::state::EditorSession;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProjectSnapshot {
    /// Project name.
    pub name: String,
    /// Clips in timeline order.
    pub clips: Vec<Clip>,
    /// Timeline duration in seconds.
    pub duration: f64,
    /// Requested export quality.
    pub quality: ExportQuality,
}

impl ProjectSnapshot {
    /// Capture a snapshot from the current session.
    pub fn capture(session: &EditorSession) -> Self {
        let project = session.project();
        Self {
            name: project.name().to_string(),
            clips: project.clips().to_vec(),
            duration: project.duration(),
            quality: session.quality(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Suggested output file name, e.g. `"Trip_1080p.mp4"`.
    pub fn output_file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.name, self.quality, extension)
    }
}
