//! Probed media assets, the only input `Project::add_clip` accepts.

use lc_common::{ProbeError, SourceId};
use serde::Serialize;

/// A media asset whose duration has already been probed and validated.
///
/// Construction goes through [`MediaAsset::new`], so every asset carries a
/// finite, strictly positive duration and a clip created from it always
/// has a non-empty source range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MediaAsset {
    source_id: SourceId,
    name: String,
    duration: f64,
}

impl MediaAsset {
    pub fn new(
        source_id: SourceId,
        name: impl Into<String>,
        duration: f64,
    ) -> Result<Self, ProbeError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ProbeError::InvalidDuration {
                source_id,
                duration,
            });
        }
        Ok(Self {
            source_id,
            name: name.into(),
            duration,
        })
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total source length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }
}
