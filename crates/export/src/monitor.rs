//! Export progress tracking on the editor side.
//!
//! An [`Exporter`] reports through a channel of [`ExportEvent`]s. The
//! [`ExportMonitor`] drains that channel without blocking and folds the
//! events into a display state. Once a terminal state is reached, later
//! events are ignored.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use lc_app_state::ProjectSnapshot;
use tracing::{debug, info, warn};

use crate::error::ExportError;

// ---------------------------------------------------------------------------
// Events / State
// ---------------------------------------------------------------------------

/// Message sent from an exporter to the editor.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportEvent {
    /// Percent complete. Values outside `0..=100` are clamped on receipt.
    Progress(f64),
    Completed { output: PathBuf },
    Failed(String),
    /// The exporter stopped early after a cancel request.
    Cancelled,
}

/// High-level state of an export operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExportState {
    /// No export in progress.
    #[default]
    Idle,
    /// The exporter is running.
    Exporting,
    /// Export completed successfully.
    Complete,
    /// Export failed with an error message.
    Failed(String),
    /// Export was cancelled by the user.
    Cancelled,
}

impl ExportState {
    /// Whether this state represents a terminal condition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExportState::Complete | ExportState::Failed(_) | ExportState::Cancelled
        )
    }

    /// Human-readable label for UI display.
    pub fn label(&self) -> &str {
        match self {
            ExportState::Idle => "Idle",
            ExportState::Exporting => "Exporting...",
            ExportState::Complete => "Complete",
            ExportState::Failed(_) => "Failed",
            ExportState::Cancelled => "Cancelled",
        }
    }
}

/// External component that turns a snapshot into an output file.
///
/// `start` must return promptly; long-running work belongs on the
/// exporter's own thread, reporting through `events`.
pub trait Exporter: Send {
    fn start(
        &mut self,
        snapshot: ProjectSnapshot,
        events: Sender<ExportEvent>,
    ) -> Result<(), ExportError>;

    /// Ask a running export to stop. The default does nothing.
    fn cancel(&mut self) {}
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ExportMonitor {
    state: ExportState,
    progress: f64,
    output: Option<PathBuf>,
    events: Option<Receiver<ExportEvent>>,
}

impl ExportMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExportState {
        &self.state
    }

    /// Last reported progress in percent, `0.0..=100.0`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Output path reported on completion.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.state == ExportState::Exporting
    }

    /// Reset for a new export and hand back the sender for the exporter.
    fn arm(&mut self) -> Sender<ExportEvent> {
        let (tx, rx) = channel::bounded::<ExportEvent>(64);
        self.state = ExportState::Exporting;
        self.progress = 0.0;
        self.output = None;
        self.events = Some(rx);
        tx
    }

    /// Drain pending events (non-blocking) and return the resulting state.
    pub fn poll(&mut self) -> &ExportState {
        loop {
            let next = match &self.events {
                Some(rx) => rx.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_disconnected();
                    break;
                }
            }
        }
        &self.state
    }

    /// Block until the export reaches a terminal state or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> &ExportState {
        let deadline = Instant::now() + timeout;
        while !self.state.is_terminal() {
            let Some(rx) = &self.events else { break };
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(event) => self.apply(event),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => self.on_disconnected(),
            }
        }
        &self.state
    }

    /// Mark the export cancelled and stop listening to the exporter.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() && self.state != ExportState::Idle {
            self.state = ExportState::Cancelled;
            info!("Export cancelled");
        }
        self.events = None;
    }

    fn apply(&mut self, event: ExportEvent) {
        if self.state.is_terminal() {
            debug!(?event, "Ignoring export event after terminal state");
            return;
        }
        match event {
            ExportEvent::Progress(percent) => {
                if percent.is_finite() {
                    self.progress = percent.clamp(0.0, 100.0);
                }
            }
            ExportEvent::Completed { output } => {
                info!(output = %output.display(), "Export complete");
                self.progress = 100.0;
                self.output = Some(output);
                self.state = ExportState::Complete;
                self.events = None;
            }
            ExportEvent::Failed(reason) => {
                warn!(%reason, "Export failed");
                self.state = ExportState::Failed(reason);
                self.events = None;
            }
            ExportEvent::Cancelled => {
                info!("Exporter reported cancellation");
                self.state = ExportState::Cancelled;
                self.events = None;
            }
        }
    }

    fn on_disconnected(&mut self) {
        self.events = None;
        if self.state == ExportState::Exporting {
            let reason = "exporter stopped without reporting completion".to_string();
            warn!(%reason, "Export failed");
            self.state = ExportState::Failed(reason);
        }
    }
}

/// Validate the snapshot and hand it to `exporter`, wiring its events into
/// `monitor`.
pub fn begin_export(
    exporter: &mut dyn Exporter,
    monitor: &mut ExportMonitor,
    snapshot: ProjectSnapshot,
) -> Result<(), ExportError> {
    if snapshot.is_empty() {
        return Err(ExportError::EmptyProject);
    }
    if monitor.is_running() {
        return Err(ExportError::AlreadyRunning);
    }

    info!(
        project = %snapshot.name,
        quality = %snapshot.quality,
        clips = snapshot.clips.len(),
        duration = snapshot.duration,
        "Starting export"
    );
    let events = monitor.arm();
    if let Err(err) = exporter.start(snapshot, events) {
        warn!(error = %err, "Exporter refused to start");
        monitor.state = ExportState::Failed(err.to_string());
        monitor.events = None;
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_app_state::EditorSession;
    use lc_common::SourceId;
    use lc_timeline::MediaAsset;

    /// Exporter that replays a fixed list of events synchronously.
    struct Scripted {
        events: Vec<ExportEvent>,
        started: usize,
    }

    impl Scripted {
        fn new(events: Vec<ExportEvent>) -> Self {
            Self { events, started: 0 }
        }
    }

    impl Exporter for Scripted {
        fn start(
            &mut self,
            _snapshot: ProjectSnapshot,
            events: Sender<ExportEvent>,
        ) -> Result<(), ExportError> {
            self.started += 1;
            for event in self.events.drain(..) {
                events
                    .send(event)
                    .map_err(|e| ExportError::Backend(e.to_string()))?;
            }
            Ok(())
        }
    }

    /// Holds on to the sender so the channel stays open.
    #[derive(Default)]
    struct Silent {
        events: Option<Sender<ExportEvent>>,
    }

    impl Exporter for Silent {
        fn start(
            &mut self,
            _snapshot: ProjectSnapshot,
            events: Sender<ExportEvent>,
        ) -> Result<(), ExportError> {
            self.events = Some(events);
            Ok(())
        }
    }

    fn snapshot(with_clip: bool) -> ProjectSnapshot {
        let mut session = EditorSession::default();
        if with_clip {
            let asset = MediaAsset::new(SourceId::new("a.mp4"), "a.mp4", 3.0).unwrap();
            session.add_clip(&asset, 0.0);
        }
        session.snapshot()
    }

    #[test]
    fn empty_project_is_rejected() {
        let mut exporter = Scripted::new(vec![]);
        let mut monitor = ExportMonitor::new();
        let err = begin_export(&mut exporter, &mut monitor, snapshot(false)).unwrap_err();
        assert_eq!(err, ExportError::EmptyProject);
        assert_eq!(exporter.started, 0);
        assert_eq!(monitor.state(), &ExportState::Idle);
    }

    #[test]
    fn second_export_while_running_is_rejected() {
        let mut exporter = Silent::default();
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        assert!(monitor.is_running());
        let err = begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap_err();
        assert_eq!(err, ExportError::AlreadyRunning);
    }

    #[test]
    fn progress_is_clamped() {
        let mut exporter = Scripted::new(vec![ExportEvent::Progress(140.0)]);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        monitor.poll();
        assert!((monitor.progress() - 100.0).abs() < f64::EPSILON);

        let mut exporter = Scripted::new(vec![
            ExportEvent::Progress(-5.0),
            ExportEvent::Progress(f64::NAN),
        ]);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        monitor.poll();
        assert_eq!(monitor.progress(), 0.0);
    }

    #[test]
    fn completion_is_sticky() {
        let mut exporter = Scripted::new(vec![
            ExportEvent::Progress(50.0),
            ExportEvent::Completed {
                output: PathBuf::from("out.mp4"),
            },
            ExportEvent::Progress(10.0),
            ExportEvent::Failed("late".into()),
        ]);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        assert_eq!(monitor.poll(), &ExportState::Complete);
        assert!((monitor.progress() - 100.0).abs() < f64::EPSILON);
        assert_eq!(monitor.output(), Some(Path::new("out.mp4")));
        assert_eq!(monitor.poll(), &ExportState::Complete);
    }

    #[test]
    fn failure_is_sticky() {
        let mut exporter = Scripted::new(vec![
            ExportEvent::Failed("disk full".into()),
            ExportEvent::Completed {
                output: PathBuf::from("out.mp4"),
            },
        ]);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        assert_eq!(monitor.poll(), &ExportState::Failed("disk full".into()));
        assert!(monitor.output().is_none());
    }

    #[test]
    fn exporter_cancellation_is_not_a_failure() {
        let mut exporter = Scripted::new(vec![
            ExportEvent::Progress(20.0),
            ExportEvent::Cancelled,
        ]);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        assert_eq!(monitor.poll(), &ExportState::Cancelled);
        assert!((monitor.progress() - 20.0).abs() < f64::EPSILON);
        assert!(monitor.output().is_none());
    }

    #[test]
    fn dropped_sender_without_completion_fails() {
        let mut exporter = Scripted::new(vec![ExportEvent::Progress(30.0)]);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        assert!(matches!(monitor.poll(), ExportState::Failed(_)));
        assert!((monitor.progress() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cancel_stops_listening() {
        let mut exporter = Silent::default();
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        monitor.cancel();
        assert_eq!(monitor.state(), &ExportState::Cancelled);
        assert!(!monitor.is_running());
        assert_eq!(monitor.poll(), &ExportState::Cancelled);
    }

    #[test]
    fn wait_times_out_while_silent() {
        let mut exporter = Silent::default();
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, snapshot(true)).unwrap();
        assert_eq!(
            monitor.wait(Duration::from_millis(10)),
            &ExportState::Exporting
        );
    }

    #[test]
    fn state_labels() {
        assert_eq!(ExportState::Idle.label(), "Idle");
        assert_eq!(ExportState::Failed("x".into()).label(), "Failed");
        assert!(!ExportState::Exporting.is_terminal());
        assert!(ExportState::Cancelled.is_terminal());
    }
}
