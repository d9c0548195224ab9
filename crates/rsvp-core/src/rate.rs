//! Words-per-minute playback rate.
//!
//! The rate is the only tunable timing parameter. Every value that reaches
//! the engine is forced into `[MIN_WPM, MAX_WPM]` on a `WPM_STEP` grid, so
//! callers can hand over raw slider or config input without validating it.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

pub const MIN_WPM: u16 = 100;
pub const MAX_WPM: u16 = 1000;
pub const DEFAULT_WPM: u16 = 300;
pub const WPM_STEP: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ReadingRate(u16);

impl ReadingRate {
    pub const MIN: Self = Self(MIN_WPM);
    pub const MAX: Self = Self(MAX_WPM);

    /// Clamp to the valid range and snap to the nearest step (ties round up).
    pub fn clamped(wpm: i64) -> Self {
        let step = i64::from(WPM_STEP);
        let bounded = wpm.clamp(i64::from(MIN_WPM), i64::from(MAX_WPM));
        let snapped = ((bounded + step / 2) / step) * step;
        let snapped = snapped.clamp(i64::from(MIN_WPM), i64::from(MAX_WPM));
        Self(snapped as u16)
    }

    pub fn wpm(self) -> u16 {
        self.0
    }

    /// Milliseconds a plain word stays visible at this rate.
    pub fn base_delay_ms(self) -> f64 {
        60_000.0 / f64::from(self.0)
    }

    pub fn step_up(self) -> Self {
        Self(self.0.saturating_add(WPM_STEP).min(MAX_WPM))
    }

    pub fn step_down(self) -> Self {
        Self(self.0.saturating_sub(WPM_STEP).max(MIN_WPM))
    }
}

impl Default for ReadingRate {
    fn default() -> Self {
        Self(DEFAULT_WPM)
    }
}

impl<'de> Deserialize<'de> for ReadingRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Self::clamped)
    }
}

impl From<u16> for ReadingRate {
    fn from(wpm: u16) -> Self {
        Self::clamped(i64::from(wpm))
    }
}

impl From<ReadingRate> for u16 {
    fn from(rate: ReadingRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for ReadingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} WPM", self.0)
    }
}
