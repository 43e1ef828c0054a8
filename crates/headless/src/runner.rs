//! Replays an [`EditScript`] against an [`EditorSession`].

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use lc_app_state::{EditorSession, ProjectSnapshot, TickOutcome};
use lc_common::{ClipId, SourceId};
use serde::Serialize;
use tracing::{debug, info};

use crate::script::{Command, EditScript, ScriptProbe};

/// Session state after a script has run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub snapshot: ProjectSnapshot,
    pub playhead: f64,
    pub playing: bool,
    pub selected: Option<ClipId>,
    pub zoom: f64,
    /// Script labels of clips that still exist.
    pub labels: BTreeMap<String, ClipId>,
}

pub struct ScriptRunner<'a> {
    session: &'a mut EditorSession,
    script: &'a EditScript,
    probe: ScriptProbe,
    labels: HashMap<String, ClipId>,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(session: &'a mut EditorSession, script: &'a EditScript) -> Self {
        if let Some(name) = &script.project {
            session.rename_project(name.clone());
        }
        if let Some(quality) = script.quality {
            session.set_quality(quality);
        }
        Self {
            session,
            script,
            probe: script.probe(),
            labels: HashMap::new(),
        }
    }

    /// Run every command in order, stopping at the first failure.
    pub fn run(mut self) -> Result<RunReport> {
        let script = self.script;
        for (i, command) in script.commands.iter().enumerate() {
            debug!(index = i + 1, op = command.name(), "Running command");
            self.apply(command)
                .with_context(|| format!("Command #{} ({}) failed", i + 1, command.name()))?;
        }
        info!(
            commands = script.commands.len(),
            clips = self.session.project().len(),
            duration = self.session.project().duration(),
            "Script finished"
        );
        Ok(self.report())
    }

    fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Import { source } => {
                let name = self.script.display_name(source);
                self.session
                    .import_media(&self.probe, SourceId::new(source.clone()), name)?;
            }
            Command::Add { source, at, label } => {
                let source_id = SourceId::new(source.clone());
                let clip_id = match at {
                    Some(position) => self.session.add_media_clip(&source_id, *position)?,
                    None => {
                        let asset = self
                            .session
                            .media()
                            .find(&source_id)
                            .with_context(|| format!("Media '{source}' has not been imported"))?
                            .asset()?;
                        self.session.add_clip_at_playhead(&asset)
                    }
                };
                let label = label.clone().unwrap_or_else(|| source.clone());
                self.labels.insert(label, clip_id);
            }
            Command::Move { clip, to } => {
                let id = self.resolve(clip)?;
                self.session.move_clip(id, *to)?;
            }
            Command::Update { clip, patch } => {
                let id = self.resolve(clip)?;
                self.session.update_clip(id, patch)?;
            }
            Command::Delete { clip } => {
                let id = self.resolve(clip)?;
                self.session.delete_clip(id)?;
                self.labels.remove(clip);
            }
            Command::Split { clip, at, labels } => {
                let id = self.resolve(clip)?;
                let (first, second) = self.session.split_clip(id, *at)?;
                self.labels.remove(clip);
                let [first_label, second_label] = labels
                    .clone()
                    .unwrap_or_else(|| [format!("{clip}.1"), format!("{clip}.2")]);
                self.labels.insert(first_label, first);
                self.labels.insert(second_label, second);
            }
            Command::Select { clip } => {
                let id = clip.as_deref().map(|label| self.resolve(label)).transpose()?;
                self.session.select_clip(id);
            }
            Command::Seek { to } => self.session.seek(*to),
            Command::Play => self.session.play()?,
            Command::Pause => self.session.pause(),
            Command::Tick { count } => {
                for _ in 0..*count {
                    if self.session.tick() == TickOutcome::ReachedEnd {
                        info!("Playback reached the end of the timeline");
                    }
                }
            }
            Command::SkipBack => self.session.skip_back(),
            Command::SkipForward => self.session.skip_forward(),
            Command::Zoom { level } => {
                self.session.set_zoom(*level);
            }
        }
        Ok(())
    }

    fn resolve(&self, label: &str) -> Result<ClipId> {
        self.labels
            .get(label)
            .copied()
            .with_context(|| format!("Unknown clip label '{label}'"))
    }

    fn report(&self) -> RunReport {
        let project = self.session.project();
        RunReport {
            snapshot: self.session.snapshot(),
            playhead: self.session.current_time().as_secs(),
            playing: self.session.playback().is_playing(),
            selected: self.session.selection().selected(),
            zoom: project.zoom(),
            labels: self
                .labels
                .iter()
                .filter(|(_, id)| project.contains(**id))
                .map(|(label, id)| (label.clone(), *id))
                .collect(),
        }
    }
}
