//! Export quality presets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Resolution;

/// Output quality offered to the export collaborator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportQuality {
    #[serde(rename = "480p")]
    Sd480,
    #[serde(rename = "720p")]
    Hd720,
    #[default]
    #[serde(rename = "1080p")]
    Hd1080,
}

impl ExportQuality {
    pub fn resolution(self) -> Resolution {
        match self {
            Self::Sd480 => Resolution::SD,
            Self::Hd720 => Resolution::HD_720,
            Self::Hd1080 => Resolution::HD,
        }
    }

    /// Target video bitrate in kilobits per second.
    pub fn bitrate_kbps(self) -> u32 {
        match self {
            Self::Sd480 => 1000,
            Self::Hd720 => 2500,
            Self::Hd1080 => 5000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sd480 => "480p",
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }
}

impl fmt::Display for ExportQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_dialog_settings() {
        assert_eq!(ExportQuality::Sd480.resolution(), Resolution::new(854, 480));
        assert_eq!(ExportQuality::Hd720.bitrate_kbps(), 2500);
        assert_eq!(ExportQuality::default(), ExportQuality::Hd1080);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&ExportQuality::Hd720).unwrap();
        assert_eq!(json, "\"720p\"");
        let back: ExportQuality = serde_json::from_str("\"480p\"").unwrap();
        assert_eq!(back, ExportQuality::Sd480);
    }
}
