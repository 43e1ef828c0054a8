//! Presentation adapter: what a rendering surface should show at time T.
//!
//! The engine never decodes or draws anything. A surface asks for the
//! active clip at the playhead, seeks its decoder to the effective source
//! time, and applies the clip's audio/visual parameters itself.

use lc_common::{ClipId, SourceId, TimeCode};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::project::Project;

/// Decoder drift tolerated before a surface should re-seek.
pub const RESYNC_THRESHOLD_SECS: f64 = 0.2;

/// Return the first clip, in stored order, whose span contains `time`.
///
/// Overlapping clips resolve to whichever comes first in timeline order
/// (earlier start, then earlier insertion), never to the most recently
/// added one.
pub fn active_clip_at(clips: &[Clip], time: f64) -> Option<&Clip> {
    clips.iter().find(|clip| clip.contains_time(time))
}

/// Source time a decoder should be positioned at for timeline `time`.
pub fn effective_source_time(clip: &Clip, time: f64) -> f64 {
    clip.source_time_at(time)
}

/// Linear fade multiplier in `[0, 1]` at timeline `time`.
///
/// Overlapping fade-in and fade-out windows take the smaller of the two
/// ramps.
pub fn fade_gain(clip: &Clip, time: f64) -> f64 {
    let local = time - clip.timeline_position;
    let remaining = clip.duration() - local;
    let mut gain: f64 = 1.0;
    if clip.fade_in > 0.0 && local < clip.fade_in {
        gain = gain.min(local / clip.fade_in);
    }
    if clip.fade_out > 0.0 && remaining < clip.fade_out {
        gain = gain.min(remaining / clip.fade_out);
    }
    gain.clamp(0.0, 1.0)
}

/// Everything a surface needs to render one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    pub clip_id: ClipId,
    pub source_id: SourceId,
    /// Where the decoder should be, in source seconds.
    pub source_time: f64,
    /// Audio volume to apply (0 when the clip is muted).
    pub volume: f64,
    pub muted: bool,
    /// CSS-style percentages, 100 = unchanged.
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub fade_in: f64,
    pub fade_out: f64,
    /// Fade multiplier at this instant.
    pub fade_gain: f64,
}

impl RenderParams {
    pub fn for_clip(clip: &Clip, time: f64) -> Self {
        Self {
            clip_id: clip.id,
            source_id: clip.source_id.clone(),
            source_time: effective_source_time(clip, time),
            volume: if clip.muted { 0.0 } else { clip.volume },
            muted: clip.muted,
            brightness: clip.brightness,
            contrast: clip.contrast,
            saturation: clip.saturation,
            fade_in: clip.fade_in,
            fade_out: clip.fade_out,
            fade_gain: fade_gain(clip, time),
        }
    }

    /// Output gain combining volume, mute, and fades.
    pub fn audio_gain(&self) -> f64 {
        self.volume * self.fade_gain
    }

    /// Whether a decoder currently at `decoder_time` has drifted far enough
    /// that it should seek to `source_time`.
    pub fn needs_resync(&self, decoder_time: f64) -> bool {
        (decoder_time - self.source_time).abs() > RESYNC_THRESHOLD_SECS
    }

    /// Whether the surface must switch sources compared to the last frame.
    pub fn is_clip_change(&self, previous: Option<&RenderParams>) -> bool {
        previous.map_or(true, |prev| prev.clip_id != self.clip_id)
    }
}

/// Read side consumed by playback and rendering code.
pub trait PresentationSource {
    fn active_clip_at(&self, time: f64) -> Option<&Clip>;

    fn effective_source_time(&self, clip: &Clip, time: f64) -> f64 {
        effective_source_time(clip, time)
    }

    fn render_params_at(&self, time: f64) -> Option<RenderParams> {
        self.active_clip_at(time)
            .map(|clip| RenderParams::for_clip(clip, time))
    }
}

impl PresentationSource for Project {
    fn active_clip_at(&self, time: f64) -> Option<&Clip> {
        active_clip_at(self.clips(), time)
    }
}

/// Implemented by external renderers that want a frame pushed every tick.
pub trait RenderSurface: Send {
    /// `frame` is `None` when no clip covers the playhead (gap or empty
    /// timeline).
    fn present(&mut self, time: TimeCode, frame: Option<&RenderParams>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MediaAsset;
    use crate::clip::ClipPatch;

    fn asset(name: &str, duration: f64) -> MediaAsset {
        MediaAsset::new(SourceId::new(name), name, duration).unwrap()
    }

    #[test]
    fn active_clip_in_gap_is_none() {
        let mut project = Project::new("p");
        project.add_clip(&asset("a", 2.0), 0.0);
        project.add_clip(&asset("b", 2.0), 5.0);
        assert!(project.active_clip_at(3.0).is_none());
        assert!(project.active_clip_at(7.0).is_none());
        assert_eq!(
            project.active_clip_at(5.0).unwrap().source_id,
            SourceId::new("b")
        );
    }

    #[test]
    fn overlap_resolves_to_first_in_order() {
        let mut project = Project::new("p");
        let a = project.add_clip(&asset("a", 10.0), 0.0);
        project.add_clip(&asset("b", 10.0), 4.0);
        assert_eq!(project.active_clip_at(6.0).unwrap().id, a);
        assert_eq!(project.active_clip_at(11.0).unwrap().source_id.as_str(), "b");
    }

    #[test]
    fn effective_source_time_uses_in_point() {
        let mut project = Project::new("p");
        let a = project.add_clip(&asset("a", 10.0), 0.0);
        let (_, right) = project.split_clip(a, 4.0).unwrap();
        project.move_clip(right, 20.0).unwrap();
        let clip = project.active_clip_at(21.5).unwrap();
        assert_eq!(clip.id, right);
        assert!((project.effective_source_time(clip, 21.5) - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn render_params_reflect_clip_settings() {
        let mut project = Project::new("p");
        let a = project.add_clip(&asset("a", 10.0), 0.0);
        project
            .update_clip(a, &ClipPatch::new().volume(1.5).brightness(120.0).muted(true))
            .unwrap();
        let params = project.render_params_at(2.0).unwrap();
        assert_eq!(params.clip_id, a);
        assert_eq!(params.volume, 0.0);
        assert!(params.muted);
        assert_eq!(params.brightness, 120.0);
        assert_eq!(params.audio_gain(), 0.0);
        assert!(project.render_params_at(10.0).is_none());
    }

    #[test]
    fn fade_gain_ramps() {
        let mut project = Project::new("p");
        let a = project.add_clip(&asset("a", 10.0), 0.0);
        project
            .update_clip(a, &ClipPatch::new().fade_in(2.0).fade_out(4.0))
            .unwrap();
        let clip = project.clip(a).unwrap();
        assert!((fade_gain(clip, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((fade_gain(clip, 1.0) - 0.5).abs() < f64::EPSILON);
        assert!((fade_gain(clip, 4.0) - 1.0).abs() < f64::EPSILON);
        assert!((fade_gain(clip, 8.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn fade_gain_without_fades_is_unity() {
        let mut project = Project::new("p");
        let a = project.add_clip(&asset("a", 3.0), 0.0);
        assert_eq!(fade_gain(project.clip(a).unwrap(), 0.0), 1.0);
    }

    #[test]
    fn resync_threshold() {
        let mut project = Project::new("p");
        project.add_clip(&asset("a", 10.0), 0.0);
        let params = project.render_params_at(5.0).unwrap();
        assert!(!params.needs_resync(5.1));
        assert!(params.needs_resync(5.5));
    }

    #[test]
    fn clip_change_detection() {
        let mut project = Project::new("p");
        project.add_clip(&asset("a", 2.0), 0.0);
        project.add_clip(&asset("b", 2.0), 2.0);
        let first = project.render_params_at(1.0).unwrap();
        let same = project.render_params_at(1.5).unwrap();
        let next = project.render_params_at(2.5).unwrap();
        assert!(first.is_clip_change(None));
        assert!(!same.is_clip_change(Some(&first)));
        assert!(next.is_clip_change(Some(&same)));
    }
}
