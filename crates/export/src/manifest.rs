//! Edit-decision manifest exporter.
//!
//! Writes the snapshot as a JSON edit list (clip order, source ranges, and
//! per-clip settings) next to the requested output settings, on a
//! background thread. Rendering the media itself is left to whatever
//! consumes the manifest.
//!
//! ```text
//! ManifestExporter::start
//! +-- export thread ("export-manifest")
//!     +-- for clip in snapshot.clips: build entry, report progress
//!     +-- write "{project}_{quality}.json"
//!     +-- Completed { output } | Failed(reason) | Cancelled
//! ```
//!
//! Progress is sent with `try_send`, so a monitor that stops polling never
//! stalls the thread. The terminal event waits for channel space, but gives
//! up once the export is cancelled.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{SendTimeoutError, Sender};
use lc_app_state::ProjectSnapshot;
use lc_common::{ExportQuality, Resolution, SourceId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::ExportError;
use crate::monitor::{ExportEvent, Exporter};

/// Output settings recorded in the manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub quality: ExportQuality,
    pub resolution: Resolution,
    pub bitrate_kbps: u32,
}

impl From<ExportQuality> for OutputSettings {
    fn from(quality: ExportQuality) -> Self {
        Self {
            quality,
            resolution: quality.resolution(),
            bitrate_kbps: quality.bitrate_kbps(),
        }
    }
}

/// One timeline entry of the edit list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source_id: SourceId,
    pub name: String,
    /// Timeline span, seconds.
    pub start: f64,
    pub end: f64,
    /// Source range, seconds.
    pub source_in: f64,
    pub source_out: f64,
    pub volume: f64,
    pub muted: bool,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub fade_in: f64,
    pub fade_out: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub project: String,
    pub duration: f64,
    pub output: OutputSettings,
    pub entries: Vec<ManifestEntry>,
}

/// Writes [`ExportManifest`] files into `output_dir`.
///
/// Dropping the exporter signals cancellation and joins the thread.
pub struct ManifestExporter {
    output_dir: PathBuf,
    cancel_flag: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl ManifestExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether the export thread is currently running.
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map_or(false, |h| !h.is_finished())
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Exporter for ManifestExporter {
    fn start(
        &mut self,
        snapshot: ProjectSnapshot,
        events: Sender<ExportEvent>,
    ) -> Result<(), ExportError> {
        if self.is_running() {
            return Err(ExportError::AlreadyRunning);
        }
        self.join();
        self.cancel_flag.store(false, Ordering::SeqCst);

        let output = self
            .output_dir
            .join(snapshot.output_file_name("json"));
        let cancel_flag = Arc::clone(&self.cancel_flag);

        let handle = thread::Builder::new()
            .name("export-manifest".into())
            .spawn(move || run_export(&snapshot, output, &cancel_flag, &events))?;

        self.thread_handle = Some(handle);
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        self.join();
    }
}

impl Drop for ManifestExporter {
    fn drop(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        self.join();
    }
}

/// Build the manifest from a snapshot.
pub fn build_manifest(snapshot: &ProjectSnapshot) -> ExportManifest {
    ExportManifest {
        project: snapshot.name.clone(),
        duration: snapshot.duration,
        output: snapshot.quality.into(),
        entries: snapshot.clips.iter().map(entry_for).collect(),
    }
}

fn entry_for(clip: &lc_timeline::Clip) -> ManifestEntry {
    ManifestEntry {
        source_id: clip.source_id.clone(),
        name: clip.name.clone(),
        start: clip.timeline_position,
        end: clip.timeline_end(),
        source_in: clip.source_in,
        source_out: clip.source_out,
        volume: clip.volume,
        muted: clip.muted,
        brightness: clip.brightness,
        contrast: clip.contrast,
        saturation: clip.saturation,
        fade_in: clip.fade_in,
        fade_out: clip.fade_out,
    }
}

/// Body of the export thread: write the manifest, then report the outcome.
fn run_export(
    snapshot: &ProjectSnapshot,
    output: PathBuf,
    cancel_flag: &AtomicBool,
    events: &Sender<ExportEvent>,
) {
    match write_manifest(snapshot, &output, cancel_flag, events) {
        Ok(true) => deliver(ExportEvent::Completed { output }, cancel_flag, events),
        Ok(false) => {
            debug!("Manifest export cancelled");
            // Lost if the channel is full. The monitor then reports the
            // disconnect, or has already been cancelled by its owner.
            let _ = events.try_send(ExportEvent::Cancelled);
        }
        Err(err) => {
            error!(error = %err, "Manifest export failed");
            deliver(ExportEvent::Failed(err.to_string()), cancel_flag, events);
        }
    }
}

/// Send a terminal event, waiting for channel space until the receiver
/// goes away or the export is cancelled.
fn deliver(event: ExportEvent, cancel_flag: &AtomicBool, events: &Sender<ExportEvent>) {
    let mut event = event;
    loop {
        match events.send_timeout(event, DELIVERY_RETRY) {
            Ok(()) | Err(SendTimeoutError::Disconnected(_)) => return,
            Err(SendTimeoutError::Timeout(pending)) => {
                if cancel_flag.load(Ordering::SeqCst) {
                    debug!("Export cancelled before the final event was read");
                    return;
                }
                event = pending;
            }
        }
    }
}

const DELIVERY_RETRY: Duration = Duration::from_millis(50);

/// Returns `false` when cancelled before the file was written.
fn write_manifest(
    snapshot: &ProjectSnapshot,
    output: &Path,
    cancel_flag: &AtomicBool,
    events: &Sender<ExportEvent>,
) -> Result<bool, ExportError> {
    let total = snapshot.clips.len().max(1) as f64;
    let mut entries = Vec::with_capacity(snapshot.clips.len());

    for (i, clip) in snapshot.clips.iter().enumerate() {
        if cancel_flag.load(Ordering::SeqCst) {
            return Ok(false);
        }
        entries.push(entry_for(clip));
        // Writing the file is the last 10%.
        let _ = events.try_send(ExportEvent::Progress((i + 1) as f64 / total * 90.0));
    }

    let manifest = ExportManifest {
        project: snapshot.name.clone(),
        duration: snapshot.duration,
        output: snapshot.quality.into(),
        entries,
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(output)?);
    serde_json::to_writer_pretty(&mut writer, &manifest)
        .map_err(|e| ExportError::Backend(e.to_string()))?;
    writer.flush()?;

    info!(output = %output.display(), entries = manifest.entries.len(), "Manifest written");
    Ok(true)
}
