//! Core types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use uuid::Uuid;

/// Time code in seconds (f64 precision).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeCode(pub f64);

impl TimeCode {
    pub const ZERO: Self = Self(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    /// Clamp into `[0, max]`. Non-finite values collapse to zero.
    pub fn clamped(self, max: f64) -> Self {
        if !self.0.is_finite() {
            return Self::ZERO;
        }
        Self(self.0.clamp(0.0, max.max(0.0)))
    }
}

impl Add for TimeCode {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeCode {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0.max(0.0);
        let mins = (total_secs / 60.0) as u32;
        let secs = (total_secs % 60.0) as u32;
        let tenths = ((total_secs % 1.0) * 10.0) as u32;
        write!(f, "{mins}:{secs:02}.{tenths}")
    }
}

/// Video/image resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const SD: Self = Self {
        width: 854,
        height: 480,
    };
    pub const HD_720: Self = Self {
        width: 1280,
        height: 720,
    };
    pub const HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Opaque handle to a media asset owned outside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique clip identifier. Freshly generated for every clip, including
/// both halves of a split, so an id is never handed out twice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_display() {
        assert_eq!(TimeCode::from_secs(0.0).to_string(), "0:00.0");
        assert_eq!(TimeCode::from_secs(75.25).to_string(), "1:15.2");
    }

    #[test]
    fn timecode_clamped() {
        assert_eq!(TimeCode::from_secs(-3.0).clamped(10.0), TimeCode::ZERO);
        assert_eq!(TimeCode::from_secs(12.0).clamped(10.0).as_secs(), 10.0);
        assert_eq!(TimeCode::from_secs(f64::NAN).clamped(10.0), TimeCode::ZERO);
        assert_eq!(TimeCode::from_secs(4.0).clamped(-1.0), TimeCode::ZERO);
    }

    #[test]
    fn clip_ids_are_distinct() {
        let a = ClipId::new();
        let b = ClipId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn resolution_display() {
        assert_eq!(Resolution::HD.to_string(), "1920x1080");
        assert_eq!(Resolution::SD.pixel_count(), 854 * 480);
    }
}
