//! Per-word dwell time.
//!
//! A word stays on screen for one base slot (`60000 / wpm` ms) plus two
//! independent bonuses: half a slot for long words and 0.8 of a slot for
//! words ending in clause or sentence punctuation. A long word ending in
//! punctuation gets both.

use crate::rate::ReadingRate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LONG_WORD_THRESHOLD: usize = 8;
pub const LONG_WORD_FACTOR: f64 = 0.5;
pub const PUNCTUATION_FACTOR: f64 = 0.8;
pub const PAUSE_PUNCTUATION: &str = ".,;!?";

/// Delay in milliseconds for `token` at `rate`, using the standard profile.
pub fn calculate_delay_ms(token: &str, rate: ReadingRate) -> f64 {
    dwell_ms(
        token,
        rate,
        LONG_WORD_THRESHOLD,
        LONG_WORD_FACTOR,
        PUNCTUATION_FACTOR,
        PAUSE_PUNCTUATION,
    )
}

pub fn calculate_delay(token: &str, rate: ReadingRate) -> Duration {
    duration_from_ms(calculate_delay_ms(token, rate))
}

/// Tunable variant of the pacing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingProfile {
    pub long_word_threshold: usize,
    pub long_word_factor: f64,
    pub punctuation_factor: f64,
    pub punctuation: String,
}

impl Default for PacingProfile {
    fn default() -> Self {
        Self {
            long_word_threshold: LONG_WORD_THRESHOLD,
            long_word_factor: LONG_WORD_FACTOR,
            punctuation_factor: PUNCTUATION_FACTOR,
            punctuation: PAUSE_PUNCTUATION.to_string(),
        }
    }
}

impl PacingProfile {
    /// Negative or non-finite factors would shorten a word below its base
    /// slot; they are reset to zero.
    pub fn sanitized(mut self) -> Self {
        if !self.long_word_factor.is_finite() || self.long_word_factor < 0.0 {
            self.long_word_factor = 0.0;
        }
        if !self.punctuation_factor.is_finite() || self.punctuation_factor < 0.0 {
            self.punctuation_factor = 0.0;
        }
        self
    }

    pub fn delay_ms(&self, token: &str, rate: ReadingRate) -> f64 {
        dwell_ms(
            token,
            rate,
            self.long_word_threshold,
            self.long_word_factor,
            self.punctuation_factor,
            &self.punctuation,
        )
    }

    pub fn delay(&self, token: &str, rate: ReadingRate) -> Duration {
        duration_from_ms(self.delay_ms(token, rate))
    }
}

fn dwell_ms(
    token: &str,
    rate: ReadingRate,
    long_word_threshold: usize,
    long_word_factor: f64,
    punctuation_factor: f64,
    punctuation: &str,
) -> f64 {
    let base = rate.base_delay_ms();
    let mut extra = 0.0;
    if token.chars().count() > long_word_threshold {
        extra += long_word_factor * base;
    }
    if token
        .chars()
        .next_back()
        .is_some_and(|last| punctuation.contains(last))
    {
        extra += punctuation_factor * base;
    }
    base + extra
}

fn duration_from_ms(ms: f64) -> Duration {
    Duration::from_micros((ms * 1_000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::{MAX_WPM, MIN_WPM, WPM_STEP};

    fn rate(wpm: u16) -> ReadingRate {
        ReadingRate::from(wpm)
    }

    #[test]
    fn short_plain_word_gets_base_slot() {
        assert!((calculate_delay_ms("quick", rate(600)) - 100.0).abs() < 1e-9);
        assert_eq!(calculate_delay("quick", rate(600)), Duration::from_millis(100));
    }

    #[test]
    fn trailing_punctuation_adds_clause_pause() {
        assert!((calculate_delay_ms("fox.", rate(600)) - 180.0).abs() < 1e-9);
        assert_eq!(calculate_delay("fox.", rate(600)), Duration::from_millis(180));
        for token in ["a,", "b;", "c!", "d?"] {
            assert!((calculate_delay_ms(token, rate(600)) - 180.0).abs() < 1e-9);
        }
    }

    #[test]
    fn colon_and_inner_punctuation_do_not_count() {
        assert!((calculate_delay_ms("note:", rate(600)) - 100.0).abs() < 1e-9);
        assert!((calculate_delay_ms("e.g", rate(600)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn long_word_bonus_starts_after_eight_chars() {
        assert!((calculate_delay_ms("abcdefgh", rate(300)) - 200.0).abs() < 1e-9);
        assert!((calculate_delay_ms("abcdefghi", rate(300)) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn long_punctuated_word_gets_both_bonuses() {
        // 200 base + 100 long + 160 punctuation
        assert!((calculate_delay_ms("extraordinary,", rate(300)) - 460.0).abs() < 1e-9);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // 8 chars, 10 bytes
        assert!((calculate_delay_ms("déjàvues", rate(300)) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn delay_never_drops_below_base_and_bonuses_are_monotonic() {
        let samples = ["a", "hi", "world!", "abcdefghij", "abcdefghij.", "x?"];
        let mut wpm = MIN_WPM;
        while wpm <= MAX_WPM {
            let r = rate(wpm);
            let base = 60_000.0 / f64::from(wpm);
            for token in samples {
                assert!(calculate_delay_ms(token, r) >= base);
            }
            assert!(
                calculate_delay_ms("abcdefghij.", r) >= calculate_delay_ms("abc", r),
                "long punctuated word must not be faster at {wpm} wpm"
            );
            wpm += WPM_STEP;
        }
    }

    #[test]
    fn tuned_profile_changes_bonuses() {
        let profile = PacingProfile {
            long_word_threshold: 3,
            long_word_factor: 1.0,
            punctuation_factor: 0.0,
            punctuation: ":".to_string(),
        };
        assert!((profile.delay_ms("four", rate(600)) - 200.0).abs() < 1e-9);
        assert!((profile.delay_ms("a:", rate(600)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sanitizing_resets_negative_factors() {
        let profile = PacingProfile {
            long_word_factor: -2.0,
            punctuation_factor: f64::NAN,
            ..PacingProfile::default()
        }
        .sanitized();
        assert_eq!(profile.long_word_factor, 0.0);
        assert_eq!(profile.punctuation_factor, 0.0);
        assert_eq!(PacingProfile::default().sanitized(), PacingProfile::default());
    }
}
