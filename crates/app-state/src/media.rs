//! Media library and the asset-probing contract.
//!
//! Placing media on the timeline is two-phase: a [`MediaProbe`] reports the
//! asset's duration first, and only a successfully probed [`MediaAsset`] can
//! be handed to the clip store. The store itself never waits on I/O.

use lc_common::{ProbeError, SourceId};
use lc_timeline::MediaAsset;
use serde::{Deserialize, Serialize};

/// Reports the duration of an external media asset.
///
/// Implementations may block (decoder metadata, network); callers should
/// probe before taking the session lock.
pub trait MediaProbe {
    fn probe(&self, source_id: &SourceId) -> Result<f64, ProbeError>;
}

impl<F> MediaProbe for F
where
    F: Fn(&SourceId) -> Result<f64, ProbeError>,
{
    fn probe(&self, source_id: &SourceId) -> Result<f64, ProbeError> {
        self(source_id)
    }
}

/// Probe `source_id` and wrap the result as a validated asset.
pub fn probe_asset(
    probe: &dyn MediaProbe,
    source_id: SourceId,
    name: impl Into<String>,
) -> Result<MediaAsset, ProbeError> {
    let duration = probe.probe(&source_id)?;
    MediaAsset::new(source_id, name, duration)
}

/// An entry in the media library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub source_id: SourceId,
    /// Display name.
    pub name: String,
    /// Probed duration in seconds.
    pub duration: f64,
}

impl MediaEntry {
    /// Rebuild the validated asset this entry was created from.
    pub fn asset(&self) -> Result<MediaAsset, ProbeError> {
        MediaAsset::new(self.source_id.clone(), self.name.clone(), self.duration)
    }
}

/// Imported media, in import order. Re-importing a source replaces its
/// entry in place.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MediaLibrary {
    entries: Vec<MediaEntry>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: &MediaAsset) {
        let entry = MediaEntry {
            source_id: asset.source_id().clone(),
            name: asset.name().to_string(),
            duration: asset.duration(),
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.source_id == entry.source_id)
        {
            Some(existing) => *existing = entry,
            None => {
                tracing::debug!(source = %entry.source_id, name = %entry.name, "Adding media entry");
                self.entries.push(entry);
            }
        }
    }

    pub fn find(&self, source_id: &SourceId) -> Option<&MediaEntry> {
        self.entries.iter().find(|e| &e.source_id == source_id)
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_probe(source_id: &SourceId) -> Result<f64, ProbeError> {
        match source_id.as_str() {
            "ten.mp4" => Ok(10.0),
            "broken.mp4" => Ok(f64::NAN),
            other => Err(ProbeError::Unavailable {
                source_id: SourceId::new(other),
                reason: "no such file".into(),
            }),
        }
    }

    #[test]
    fn probe_asset_success() {
        let asset = probe_asset(&fixed_probe, SourceId::new("ten.mp4"), "Ten").unwrap();
        assert_eq!(asset.name(), "Ten");
        assert!((asset.duration() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn probe_asset_rejects_bad_duration() {
        let err = probe_asset(&fixed_probe, SourceId::new("broken.mp4"), "Broken").unwrap_err();
        assert!(matches!(err, ProbeError::InvalidDuration { .. }));
    }

    #[test]
    fn probe_asset_propagates_unavailable() {
        let err = probe_asset(&fixed_probe, SourceId::new("gone.mp4"), "Gone").unwrap_err();
        assert!(matches!(err, ProbeError::Unavailable { .. }));
    }

    #[test]
    fn library_insert_and_find() {
        let mut library = MediaLibrary::new();
        let asset = probe_asset(&fixed_probe, SourceId::new("ten.mp4"), "Ten").unwrap();
        library.insert(&asset);
        library.insert(&asset);
        assert_eq!(library.len(), 1);

        let entry = library.find(asset.source_id()).unwrap();
        assert_eq!(entry.asset().unwrap(), asset);
        assert!(library.find(&SourceId::new("other.mp4")).is_none());
        assert!(!library.is_empty());
    }
}
