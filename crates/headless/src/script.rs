//! Edit script format.
//!
//! ```json
//! {
//!   "project": "Trip",
//!   "quality": "720p",
//!   "media": [
//!     { "source": "beach.mp4", "duration": 10.0 },
//!     { "source": "city.mp4", "duration": 5.0 }
//!   ],
//!   "commands": [
//!     { "op": "import", "source": "beach.mp4" },
//!     { "op": "add", "source": "beach.mp4", "at": 0.0, "label": "beach" },
//!     { "op": "split", "clip": "beach", "at": 4.0, "labels": ["intro", "rest"] },
//!     { "op": "update", "clip": "intro", "patch": { "muted": true } },
//!     { "op": "play" },
//!     { "op": "tick", "count": 5 }
//!   ]
//! }
//! ```
//!
//! Clips are addressed by the labels given when they were created.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use lc_app_state::MediaProbe;
use lc_common::{ExportQuality, ProbeError, SourceId};
use lc_timeline::ClipPatch;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditScript {
    /// Overrides the configured project name.
    pub project: Option<String>,
    pub quality: Option<ExportQuality>,
    /// Media the script may import, with the durations a probe reports.
    pub media: Vec<ScriptMedia>,
    pub commands: Vec<Command>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptMedia {
    pub source: String,
    #[serde(default)]
    pub name: Option<String>,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Import {
        source: String,
    },
    /// Place imported media. Without `at`, the clip goes to the playhead,
    /// or to the end of the timeline when the playhead is at 0.
    Add {
        source: String,
        #[serde(default)]
        at: Option<f64>,
        #[serde(default)]
        label: Option<String>,
    },
    Move {
        clip: String,
        to: f64,
    },
    Update {
        clip: String,
        patch: ClipPatch,
    },
    Delete {
        clip: String,
    },
    Split {
        clip: String,
        at: f64,
        #[serde(default)]
        labels: Option<[String; 2]>,
    },
    Select {
        #[serde(default)]
        clip: Option<String>,
    },
    Seek {
        to: f64,
    },
    Play,
    Pause,
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
    SkipBack,
    SkipForward,
    Zoom {
        level: f64,
    },
}

fn one() -> u32 {
    1
}

impl Command {
    /// Short name used in logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Import { .. } => "import",
            Command::Add { .. } => "add",
            Command::Move { .. } => "move",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Split { .. } => "split",
            Command::Select { .. } => "select",
            Command::Seek { .. } => "seek",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Tick { .. } => "tick",
            Command::SkipBack => "skip_back",
            Command::SkipForward => "skip_forward",
            Command::Zoom { .. } => "zoom",
        }
    }
}

impl EditScript {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse edit script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edit script {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid edit script {}", path.display()))
    }

    /// Probe answering from the script's `media` table.
    pub fn probe(&self) -> ScriptProbe {
        ScriptProbe {
            durations: self
                .media
                .iter()
                .map(|m| (SourceId::new(m.source.clone()), m.duration))
                .collect(),
        }
    }

    pub fn display_name(&self, source: &str) -> String {
        self.media
            .iter()
            .find(|m| m.source == source)
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| source.to_string())
    }
}

/// [`MediaProbe`] backed by the durations declared in a script.
#[derive(Clone, Debug, Default)]
pub struct ScriptProbe {
    durations: HashMap<SourceId, f64>,
}

impl MediaProbe for ScriptProbe {
    fn probe(&self, source_id: &SourceId) -> Result<f64, ProbeError> {
        self.durations
            .get(source_id)
            .copied()
            .ok_or_else(|| ProbeError::Unavailable {
                source_id: source_id.clone(),
                reason: "not declared in script media".to_string(),
            })
    }
}
