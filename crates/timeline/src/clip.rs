//! Clip data model and partial updates.
//!
//! A [`Clip`] is a trimmed reference to a source asset placed on the single
//! timeline track. Clips are only ever mutated through [`Project`](crate::Project),
//! which hands out shared references, so the trim and ordering invariants
//! cannot be broken from outside the store.

use std::ops::RangeInclusive;

use lc_common::{ClipId, SourceId};
use serde::{Deserialize, Serialize};

use crate::asset::MediaAsset;

/// Allowed volume multiplier (1.0 = unity gain).
pub const VOLUME_RANGE: RangeInclusive<f64> = 0.0..=2.0;
/// Allowed brightness/contrast/saturation percentage (100 = neutral).
pub const COLOR_RANGE: RangeInclusive<f64> = 0.0..=200.0;
/// Allowed fade length in seconds.
pub const FADE_RANGE: RangeInclusive<f64> = 0.0..=5.0;

/// Neutral value for brightness, contrast, and saturation.
pub const NEUTRAL_COLOR: f64 = 100.0;

/// A clip placed on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier.
    pub id: ClipId,
    /// Source media handle. Never opened by the engine.
    pub source_id: SourceId,
    /// Display label, taken from the media asset.
    pub name: String,
    /// Total length of the source asset in seconds.
    pub source_duration: f64,
    /// Source in-point (seconds into the source).
    pub source_in: f64,
    /// Source out-point (seconds into the source).
    pub source_out: f64,
    /// Start offset on the timeline in seconds.
    pub timeline_position: f64,
    pub volume: f64,
    pub muted: bool,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    /// Fade-in length in seconds.
    pub fade_in: f64,
    /// Fade-out length in seconds.
    pub fade_out: f64,
}

impl Clip {
    /// Create a clip covering the whole asset with neutral appearance.
    pub(crate) fn from_asset(asset: &MediaAsset, position: f64) -> Self {
        Self {
            id: ClipId::new(),
            source_id: asset.source_id().clone(),
            name: asset.name().to_string(),
            source_duration: asset.duration(),
            source_in: 0.0,
            source_out: asset.duration(),
            timeline_position: position,
            volume: 1.0,
            muted: false,
            brightness: NEUTRAL_COLOR,
            contrast: NEUTRAL_COLOR,
            saturation: NEUTRAL_COLOR,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }

    /// Length of the trimmed source range, which is also the clip's span
    /// on the timeline.
    pub fn duration(&self) -> f64 {
        self.source_out - self.source_in
    }

    /// End of the clip on the timeline (exclusive).
    pub fn timeline_end(&self) -> f64 {
        self.timeline_position + self.duration()
    }

    /// Whether `time` falls inside `[timeline_position, timeline_end)`.
    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.timeline_position && time < self.timeline_end()
    }

    /// Map a timeline time to the corresponding source time.
    pub fn source_time_at(&self, time: f64) -> f64 {
        self.source_in + (time - self.timeline_position)
    }

    /// Merge the supplied fields of `patch`, clamping numbers into range.
    pub(crate) fn apply(&mut self, patch: &ClipPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(muted) = patch.muted {
            self.muted = muted;
        }
        apply_clamped(&mut self.volume, patch.volume, &VOLUME_RANGE);
        apply_clamped(&mut self.brightness, patch.brightness, &COLOR_RANGE);
        apply_clamped(&mut self.contrast, patch.contrast, &COLOR_RANGE);
        apply_clamped(&mut self.saturation, patch.saturation, &COLOR_RANGE);
        apply_clamped(&mut self.fade_in, patch.fade_in, &FADE_RANGE);
        apply_clamped(&mut self.fade_out, patch.fade_out, &FADE_RANGE);
    }
}

/// Non-finite input leaves the field unchanged.
fn apply_clamped(field: &mut f64, value: Option<f64>, range: &RangeInclusive<f64>) {
    if let Some(v) = value {
        if v.is_finite() {
            *field = v.clamp(*range.start(), *range.end());
        }
    }
}

/// Partial clip update. Only `Some` fields are merged.
///
/// Timing is not patchable: positions change through `move_clip` and
/// source ranges through `split_clip`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub volume: Option<f64>,
    pub muted: Option<bool>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub saturation: Option<f64>,
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
}

impl ClipPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brightness, contrast, and saturation back to neutral.
    pub fn reset_visuals() -> Self {
        Self {
            brightness: Some(NEUTRAL_COLOR),
            contrast: Some(NEUTRAL_COLOR),
            saturation: Some(NEUTRAL_COLOR),
            ..Self::default()
        }
    }

    /// Flip the mute flag of `clip`.
    pub fn toggle_mute(clip: &Clip) -> Self {
        Self::new().muted(!clip.muted)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = Some(muted);
        self
    }

    pub fn brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn contrast(mut self, contrast: f64) -> Self {
        self.contrast = Some(contrast);
        self
    }

    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = Some(saturation);
        self
    }

    pub fn fade_in(mut self, secs: f64) -> Self {
        self.fade_in = Some(secs);
        self
    }

    pub fn fade_out(mut self, secs: f64) -> Self {
        self.fade_out = Some(secs);
        self
    }

    /// True if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_clip(position: f64, source_in: f64, source_out: f64) -> Clip {
        let asset = MediaAsset::new(SourceId::new("src_1"), "src_1", 30.0).unwrap();
        let mut clip = Clip::from_asset(&asset, position);
        clip.source_in = source_in;
        clip.source_out = source_out;
        clip
    }

    #[test]
    fn from_asset_defaults() {
        let asset = MediaAsset::new(SourceId::new("a.mp4"), "Holiday", 8.0).unwrap();
        let clip = Clip::from_asset(&asset, 2.0);
        assert_eq!(clip.name, "Holiday");
        assert_eq!(clip.source_in, 0.0);
        assert_eq!(clip.source_out, 8.0);
        assert!((clip.volume - 1.0).abs() < f64::EPSILON);
        assert!(!clip.muted);
        assert_eq!(clip.brightness, NEUTRAL_COLOR);
        assert_eq!(clip.fade_in, 0.0);
    }

    #[test]
    fn duration_and_end() {
        let clip = make_clip(2.0, 10.0, 17.5);
        assert!((clip.duration() - 7.5).abs() < f64::EPSILON);
        assert!((clip.timeline_end() - 9.5).abs() < f64::EPSILON);
    }

    #[test]
    fn contains_time_is_half_open() {
        let clip = make_clip(2.0, 0.0, 3.0);
        assert!(!clip.contains_time(1.99));
        assert!(clip.contains_time(2.0));
        assert!(clip.contains_time(4.99));
        assert!(!clip.contains_time(5.0));
    }

    #[test]
    fn source_time_mapping() {
        let clip = make_clip(4.0, 10.0, 20.0);
        assert!((clip.source_time_at(6.5) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn patch_merges_only_supplied_fields() {
        let mut clip = make_clip(0.0, 0.0, 5.0);
        clip.apply(&ClipPatch::new().brightness(150.0).muted(true));
        assert_eq!(clip.brightness, 150.0);
        assert!(clip.muted);
        assert_eq!(clip.contrast, NEUTRAL_COLOR);
        assert!((clip.volume - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn patch_clamps_out_of_range_values() {
        let mut clip = make_clip(0.0, 0.0, 5.0);
        clip.apply(
            &ClipPatch::new()
                .volume(3.0)
                .brightness(-20.0)
                .saturation(400.0)
                .fade_in(9.0)
                .fade_out(-1.0),
        );
        assert_eq!(clip.volume, 2.0);
        assert_eq!(clip.brightness, 0.0);
        assert_eq!(clip.saturation, 200.0);
        assert_eq!(clip.fade_in, 5.0);
        assert_eq!(clip.fade_out, 0.0);
    }

    #[test]
    fn patch_ignores_non_finite_numbers() {
        let mut clip = make_clip(0.0, 0.0, 5.0);
        clip.apply(&ClipPatch::new().volume(f64::NAN).contrast(f64::INFINITY));
        assert!((clip.volume - 1.0).abs() < f64::EPSILON);
        assert_eq!(clip.contrast, NEUTRAL_COLOR);
    }

    #[test]
    fn reset_visuals_patch() {
        let mut clip = make_clip(0.0, 0.0, 5.0);
        clip.apply(&ClipPatch::new().brightness(20.0).contrast(180.0).volume(0.5));
        clip.apply(&ClipPatch::reset_visuals());
        assert_eq!(clip.brightness, NEUTRAL_COLOR);
        assert_eq!(clip.contrast, NEUTRAL_COLOR);
        assert_eq!(clip.saturation, NEUTRAL_COLOR);
        assert!((clip.volume - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn toggle_mute_patch() {
        let clip = make_clip(0.0, 0.0, 5.0);
        assert_eq!(ClipPatch::toggle_mute(&clip).muted, Some(true));
    }

    #[test]
    fn empty_patch() {
        assert!(ClipPatch::new().is_empty());
        assert!(!ClipPatch::new().fade_in(1.0).is_empty());
    }

    #[test]
    fn patch_deserializes_sparse_json() {
        let patch: ClipPatch = serde_json::from_str(r#"{ "volume": 0.25 }"#).unwrap();
        assert_eq!(patch.volume, Some(0.25));
        assert!(patch.brightness.is_none());
    }
}
