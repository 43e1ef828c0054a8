//! Timer-driven playback on a background thread.
//!
//! ```text
//! PlaybackDriver
//! +-- driver thread ("playback-driver")
//!     +-- select! {
//!     |   recv(ticker) -> lock session, tick(), present frame
//!     |   recv(stop)   -> exit
//!     +-- }
//! ```
//!
//! Each tick runs under the session lock, so an edit made through another
//! clone of the [`SessionHandle`] lands either before or after a whole tick.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Sender};
use lc_timeline::RenderSurface;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::playback::TickOutcome;
use crate::state::EditorSession;

/// Shared, lock-protected access to one [`EditorSession`].
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<EditorSession>>,
}

impl SessionHandle {
    pub fn new(session: EditorSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session. Keep the guard short-lived; the driver thread
    /// blocks on the same lock.
    pub fn lock(&self) -> MutexGuard<'_, EditorSession> {
        self.inner.lock()
    }

    /// Run `f` with the session locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut EditorSession) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

/// Drives [`EditorSession::tick`] at a fixed interval.
///
/// The driver ticks regardless of playback mode; a stopped clock simply
/// reports [`TickOutcome::Idle`] and nothing is presented. Dropping the
/// driver stops and joins the thread.
pub struct PlaybackDriver {
    stop_tx: Option<Sender<()>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl PlaybackDriver {
    /// Start a driver using the session's configured tick interval.
    pub fn start(
        handle: SessionHandle,
        surface: Option<Box<dyn RenderSurface>>,
    ) -> std::io::Result<Self> {
        let interval_ms = handle.lock().config().playback.tick_interval_ms.max(1);
        Self::start_with_interval(handle, Duration::from_millis(interval_ms), surface)
    }

    pub fn start_with_interval(
        handle: SessionHandle,
        interval: Duration,
        mut surface: Option<Box<dyn RenderSurface>>,
    ) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let ticker = channel::tick(interval);

        let thread_handle = thread::Builder::new()
            .name("playback-driver".into())
            .spawn(move || {
                info!(interval_ms = interval.as_millis() as u64, "Playback driver started");
                loop {
                    crossbeam::select! {
                        recv(ticker) -> _ => {
                            let mut session = handle.lock();
                            let outcome = session.tick();
                            if outcome != TickOutcome::Idle {
                                if let Some(surface) = surface.as_mut() {
                                    let frame = session.frame_at_playhead();
                                    surface.present(session.current_time(), frame.as_ref());
                                }
                            }
                        }
                        recv(stop_rx) -> _ => break,
                    }
                }
                debug!("Playback driver exiting");
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            thread_handle: Some(thread_handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            info!("Playback driver stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map_or(false, |h| !h.is_finished())
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_common::{ClipId, SourceId, TimeCode};
    use lc_timeline::{MediaAsset, RenderParams};
    use std::time::Instant;

    struct Recorder {
        frames: Arc<Mutex<Vec<(TimeCode, Option<ClipId>)>>>,
    }

    impl RenderSurface for Recorder {
        fn present(&mut self, time: TimeCode, frame: Option<&RenderParams>) {
            self.frames.lock().push((time, frame.map(|f| f.clip_id)));
        }
    }

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    #[test]
    fn handle_with_runs_under_lock() {
        let handle = SessionHandle::default();
        let asset = MediaAsset::new(SourceId::new("a"), "a", 2.0).unwrap();
        let id = handle.with(|s| s.add_clip(&asset, 0.0));
        assert!(handle.lock().project().contains(id));
    }

    #[test]
    fn driver_plays_to_end_and_rewinds() {
        let handle = SessionHandle::default();
        let asset = MediaAsset::new(SourceId::new("a"), "a", 0.5).unwrap();
        let clip_id = handle.with(|s| {
            let id = s.add_clip(&asset, 0.0);
            s.play().unwrap();
            id
        });

        let frames = Arc::new(Mutex::new(Vec::new()));
        let surface = Recorder {
            frames: Arc::clone(&frames),
        };
        let mut driver = PlaybackDriver::start_with_interval(
            handle.clone(),
            Duration::from_millis(1),
            Some(Box::new(surface)),
        )
        .unwrap();

        assert!(wait_until(Duration::from_secs(5), || !handle
            .lock()
            .playback()
            .is_playing()));
        driver.stop();
        assert!(!driver.is_running());

        let session = handle.lock();
        assert_eq!(session.current_time(), TimeCode::ZERO);
        let frames = frames.lock();
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|(_, id)| *id == Some(clip_id)));
    }

    #[test]
    fn edits_interleave_with_ticks_without_breaking_invariants() {
        let handle = SessionHandle::default();
        let long = MediaAsset::new(SourceId::new("long"), "long", 50.0).unwrap();
        let short = MediaAsset::new(SourceId::new("short"), "short", 1.0).unwrap();
        let id = handle.with(|s| {
            let id = s.add_clip(&long, 0.0);
            s.select_clip(Some(id));
            s.play().unwrap();
            id
        });

        let _driver =
            PlaybackDriver::start_with_interval(handle.clone(), Duration::from_millis(1), None)
                .unwrap();

        for i in 0..50 {
            handle.with(|s| {
                s.move_clip(id, (i % 7) as f64).unwrap();
                s.add_clip(&short, i as f64);
            });
            let session = handle.lock();
            let duration = session.project().duration();
            let t = session.current_time().as_secs();
            assert!((0.0..=duration).contains(&t));
            let clips = session.project().clips();
            assert!(clips
                .windows(2)
                .all(|w| w[0].timeline_position <= w[1].timeline_position));
            assert!(session.selection().is_selected(id));
        }

        handle.with(|s| {
            s.delete_clip(id).unwrap();
        });
        assert!(handle.lock().selection().is_empty());
    }

    #[test]
    fn stopped_clock_presents_nothing() {
        let handle = SessionHandle::default();
        let frames = Arc::new(Mutex::new(Vec::new()));
        let surface = Recorder {
            frames: Arc::clone(&frames),
        };
        let mut driver = PlaybackDriver::start_with_interval(
            handle.clone(),
            Duration::from_millis(1),
            Some(Box::new(surface)),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        driver.stop();
        assert!(frames.lock().is_empty());
    }
}
