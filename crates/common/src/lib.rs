//! `lc-common` -- Shared types, errors, and configuration for the LifeCloud
//! timeline engine.
//!
//! This crate is the foundation the other engine crates depend on:
//!
//! - **Types**: `TimeCode`, `ClipId`, `SourceId`, `Resolution` (newtypes for safety)
//! - **Quality**: `ExportQuality` presets handed to the export collaborator
//! - **Errors**: `EditError`, `ProbeError`, `ConfigError`, `EditorError` (thiserror-based)
//! - **Config**: `EditorConfig`, `PlaybackConfig`, `ZoomConfig`

pub mod config;
pub mod error;
pub mod quality;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{EditorConfig, PlaybackConfig, ZoomConfig};
pub use error::{ConfigError, EditError, EditResult, EditorError, EditorResult, ProbeError};
pub use quality::ExportQuality;
pub use types::{ClipId, Resolution, SourceId, TimeCode};
