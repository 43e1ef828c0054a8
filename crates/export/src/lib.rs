//! `lc-export` -- Export hand-off for the LifeCloud editor.
//!
//! The editor never renders media itself. It hands a detached
//! `ProjectSnapshot` to an [`Exporter`] and follows progress through an
//! [`ExportMonitor`]:
//!
//! ```text
//! EditorSession::snapshot()
//!     |
//!     v
//! begin_export(exporter, monitor, snapshot)
//!     +-- Exporter::start(snapshot, Sender<ExportEvent>)   (own thread)
//!     +-- ExportMonitor::poll() / wait()                   (editor side)
//! ```
//!
//! [`ManifestExporter`] is the built-in exporter: it writes the edit list
//! as JSON for a downstream renderer.

pub mod error;
pub mod manifest;
pub mod monitor;

pub use error::ExportError;
pub use manifest::{build_manifest, ExportManifest, ManifestEntry, ManifestExporter, OutputSettings};
pub use monitor::{begin_export, ExportEvent, ExportMonitor, ExportState, Exporter};
