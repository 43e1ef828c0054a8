//! Playback clock: play/pause, fixed-step ticking, seek, and skip.

use lc_common::{EditError, EditResult, PlaybackConfig, TimeCode};
use serde::{Deserialize, Serialize};

/// Current playback mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Not advancing. The playhead stays where it was left.
    #[default]
    Stopped,
    /// Advancing one step per tick.
    Playing,
}

/// Result of a single clock tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The clock was stopped; nothing changed.
    Idle,
    /// The playhead moved to the contained time.
    Advanced(TimeCode),
    /// The playhead reached the end, playback stopped, and the playhead
    /// rewound to 0.
    ReachedEnd,
}

/// Playback clock for the timeline.
///
/// The clock does not own a timer. Whoever drives it calls [`tick`](Self::tick)
/// at the configured interval (see `PlaybackDriver`), passing the current
/// project duration each time so edits made between ticks are honoured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaybackClock {
    /// Current playback mode.
    pub mode: PlaybackMode,
    /// Current playhead position.
    pub current_time: TimeCode,
    /// Timeline seconds advanced per tick.
    pub tick_step: f64,
    /// Distance covered by skip back / skip forward.
    pub skip_secs: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

impl PlaybackClock {
    /// Create a stopped clock at time 0.
    ///
    /// A step that is not a positive number, or a negative skip distance,
    /// is replaced by the default.
    pub fn new(config: &PlaybackConfig) -> Self {
        let defaults = PlaybackConfig::default();
        let tick_step = if config.tick_step_secs.is_finite() && config.tick_step_secs > 0.0 {
            config.tick_step_secs
        } else {
            tracing::warn!(
                tick_step = config.tick_step_secs,
                fallback = defaults.tick_step_secs,
                "Unusable playback tick step"
            );
            defaults.tick_step_secs
        };
        let skip_secs = if config.skip_secs.is_finite() && config.skip_secs >= 0.0 {
            config.skip_secs
        } else {
            tracing::warn!(
                skip_secs = config.skip_secs,
                fallback = defaults.skip_secs,
                "Unusable skip distance"
            );
            defaults.skip_secs
        };
        Self {
            mode: PlaybackMode::Stopped,
            current_time: TimeCode::ZERO,
            tick_step,
            skip_secs,
        }
    }

    /// Start playback. Refused when the timeline has no clips.
    pub fn play(&mut self, clip_count: usize) -> EditResult<()> {
        if clip_count == 0 {
            tracing::warn!("Play requested on an empty timeline");
            return Err(EditError::EmptyProjectPlayback);
        }
        self.mode = PlaybackMode::Playing;
        tracing::debug!(time = %self.current_time, "Playback started");
        Ok(())
    }

    /// Stop advancing, keeping the playhead where it is.
    pub fn pause(&mut self) {
        if self.mode == PlaybackMode::Playing {
            self.mode = PlaybackMode::Stopped;
            tracing::debug!(time = %self.current_time, "Playback paused");
        }
    }

    pub fn toggle_play_pause(&mut self, clip_count: usize) -> EditResult<()> {
        match self.mode {
            PlaybackMode::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackMode::Stopped => self.play(clip_count),
        }
    }

    /// Advance one step if playing. Reaching `duration` stops playback and
    /// rewinds to 0.
    pub fn tick(&mut self, duration: f64) -> TickOutcome {
        if self.mode != PlaybackMode::Playing {
            return TickOutcome::Idle;
        }
        let next = self.current_time.as_secs() + self.tick_step;
        if next >= duration {
            self.mode = PlaybackMode::Stopped;
            self.current_time = TimeCode::ZERO;
            tracing::debug!(duration, "Playback reached end, rewound");
            return TickOutcome::ReachedEnd;
        }
        self.current_time = TimeCode::from_secs(next);
        TickOutcome::Advanced(self.current_time)
    }

    /// Move the playhead, clamped to `[0, duration]`. Mode is unchanged.
    pub fn seek(&mut self, time: f64, duration: f64) {
        self.current_time = TimeCode::from_secs(time).clamped(duration);
        tracing::debug!(time = %self.current_time, "Seeked");
    }

    pub fn skip_back(&mut self, duration: f64) {
        self.seek(self.current_time.as_secs() - self.skip_secs, duration);
    }

    pub fn skip_forward(&mut self, duration: f64) {
        self.seek(self.current_time.as_secs() + self.skip_secs, duration);
    }

    /// Pull the playhead back inside `[0, duration]` after an edit shrank
    /// the timeline.
    pub fn clamp_to(&mut self, duration: f64) {
        let clamped = self.current_time.clamped(duration);
        if clamped != self.current_time {
            tracing::debug!(from = %self.current_time, to = %clamped, "Playhead clamped");
            self.current_time = clamped;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    pub fn current_secs(&self) -> f64 {
        self.current_time.as_secs()
    }
}
