//! `lc-timeline` -- Single-track clip store for the LifeCloud editor.
//!
//! This crate owns the timeline data model and its editing algorithms:
//!
//! - **`Clip`** / **`ClipPatch`**: clip data and clamped partial updates
//! - **`MediaAsset`**: a probed source with a validated duration
//! - **`Project`**: the clip store (add, move, update, delete, split) with
//!   derived duration and timeline ordering
//! - **Presentation**: active-clip lookup, source-time mapping, and the
//!   `RenderParams` a surface applies
//!
//! # Usage
//!
//! ```rust
//! use lc_common::SourceId;
//! use lc_timeline::{MediaAsset, PresentationSource, Project};
//!
//! let mut project = Project::new("Demo");
//! let asset = MediaAsset::new(SourceId::new("beach.mp4"), "beach.mp4", 10.0).unwrap();
//! let clip_id = project.add_clip(&asset, 0.0);
//! let (first, _second) = project.split_clip(clip_id, 4.0).unwrap();
//!
//! assert_eq!(project.duration(), 10.0);
//! assert_eq!(project.active_clip_at(1.0).unwrap().id, first);
//! ```

pub mod asset;
pub mod clip;
pub mod presentation;
pub mod project;

// Re-export primary API
pub use asset::MediaAsset;
pub use clip::{Clip, ClipPatch, COLOR_RANGE, FADE_RANGE, NEUTRAL_COLOR, VOLUME_RANGE};
pub use presentation::{
    active_clip_at, effective_source_time, fade_gain, PresentationSource, RenderParams,
    RenderSurface, RESYNC_THRESHOLD_SECS,
};
pub use project::Project;
