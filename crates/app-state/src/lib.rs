//! `lc-app-state` -- Editing session state for the LifeCloud editor.
//!
//! This crate provides:
//!
//! - **`EditorSession`**: owns the project, selection, playback clock, and media library;
//!   every mutation re-establishes the cross-component invariants before returning.
//! - **`SelectionState`**: single-clip selection, never pointing at a missing clip.
//! - **`PlaybackClock`**: play/pause, fixed-step ticking with auto-stop, seek, and skip.
//! - **`MediaLibrary`** / **`MediaProbe`**: two-phase media import (probe, then place).
//! - **`ProjectSnapshot`**: detached, serializable view for export and storage.
//! - **`SessionHandle`** / **`PlaybackDriver`**: lock-shared session and its tick thread.
//!
//! # Architecture
//!
//! ```text
//! SessionHandle (Arc<Mutex<..>>)
//! +-- EditorSession
//!     +-- project: Project            (clip store, lc-timeline)
//!     +-- selection: SelectionState   (what's selected)
//!     +-- playback: PlaybackClock     (transport state)
//!     +-- media: MediaLibrary         (probed sources)
//!     +-- quality, config, dirty flag
//!
//! PlaybackDriver
//! +-- background thread: tick() + RenderSurface::present under the lock
//! ```

pub mod driver;
pub mod media;
pub mod playback;
pub mod selection;
pub mod snapshot;
pub mod state;

// Re-export primary types at crate root for convenience.
pub use driver::{PlaybackDriver, SessionHandle};
pub use media::{probe_asset, MediaEntry, MediaLibrary, MediaProbe};
pub use playback::{PlaybackClock, PlaybackMode, TickOutcome};
pub use selection::SelectionState;
pub use snapshot::ProjectSnapshot;
pub use state::EditorSession;
