//! Playback state machine.
//!
//! Holds the cursor, status and rate for one loaded document and defines the
//! legal transitions between them. It knows nothing about time: the session
//! asks it for the delay of the current word and tells it when that delay
//! has elapsed.

use crate::error::{LoadError, PlaybackError};
use crate::pace::PacingProfile;
use crate::rate::ReadingRate;
use crate::source::TokenList;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ts_rs::TS;

pub const EMPTY_DOCUMENT_MESSAGE: &str = "Document is empty or could not be parsed.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Finished,
    Error,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Finished => "finished",
            PlaybackStatus::Error => "error",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FailureKind {
    LoadFailure,
    EmptyDocument,
}

/// Why a session sits in the `Error` state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct SessionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&LoadError> for SessionFailure {
    fn from(err: &LoadError) -> Self {
        match err {
            LoadError::EmptyContent => Self {
                kind: FailureKind::EmptyDocument,
                message: EMPTY_DOCUMENT_MESSAGE.to_string(),
            },
            other => Self {
                kind: FailureKind::LoadFailure,
                message: other.to_string(),
            },
        }
    }
}

/// Observable state handed to the UI after every transition.
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export)]
pub struct PlaybackSnapshot {
    pub current_word: String,
    pub cursor: usize,
    pub total: usize,
    pub status: PlaybackStatus,
    pub rate: u16,
    pub progress_fraction: f64,
    pub loading: bool,
    pub error: Option<SessionFailure>,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        PlaybackMachine::new(TokenList::default(), ReadingRate::default()).snapshot(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { cursor: usize },
    Finished,
}

#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    tokens: TokenList,
    cursor: usize,
    status: PlaybackStatus,
    rate: ReadingRate,
    failure: Option<SessionFailure>,
}

impl PlaybackMachine {
    pub fn new(tokens: TokenList, rate: ReadingRate) -> Self {
        Self {
            tokens,
            cursor: 0,
            status: PlaybackStatus::Idle,
            rate,
            failure: None,
        }
    }

    /// Machine for a document that could not be loaded.
    pub fn failed(err: &LoadError, rate: ReadingRate) -> Self {
        Self {
            tokens: TokenList::default(),
            cursor: 0,
            status: PlaybackStatus::Error,
            rate,
            failure: Some(SessionFailure::from(err)),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.tokens.len()
    }

    pub fn rate(&self) -> ReadingRate {
        self.rate
    }

    pub fn failure(&self) -> Option<&SessionFailure> {
        self.failure.as_ref()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.tokens.get(self.cursor)
    }

    /// Enter `Playing` from `Idle` or `Paused`. Returns `false` when the
    /// command is a no-op (no words, finished, failed, already playing).
    pub fn play(&mut self) -> bool {
        match self.status {
            PlaybackStatus::Idle | PlaybackStatus::Paused if !self.tokens.is_empty() => {
                self.status = PlaybackStatus::Playing;
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        self.status = PlaybackStatus::Paused;
        true
    }

    /// Move past the word whose dwell time just elapsed. At the last word
    /// the run finishes and the cursor stays put.
    pub fn advance(&mut self) -> Result<Advance, PlaybackError> {
        if self.status != PlaybackStatus::Playing {
            return Err(PlaybackError::AdvanceWhileNotPlaying(self.status));
        }
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
            Ok(Advance::Moved {
                cursor: self.cursor,
            })
        } else {
            self.status = PlaybackStatus::Finished;
            Ok(Advance::Finished)
        }
    }

    /// Legal in every state; only delays computed afterwards see the change.
    pub fn set_rate(&mut self, wpm: i64) -> ReadingRate {
        self.rate = ReadingRate::clamped(wpm);
        self.rate
    }

    pub fn nudge_rate(&mut self, faster: bool) -> ReadingRate {
        self.rate = if faster {
            self.rate.step_up()
        } else {
            self.rate.step_down()
        };
        self.rate
    }

    /// Dwell time for the word at the cursor at the current rate.
    pub fn current_delay(&self, pacing: &PacingProfile) -> Option<Duration> {
        self.current_word()
            .map(|word| pacing.delay(word, self.rate))
    }

    /// `cursor / total`; the last word reports `(N-1)/N`, not 1.0.
    pub fn progress_fraction(&self) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.tokens.len() as f64
    }

    pub fn snapshot(&self, loading: bool) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_word: self.current_word().unwrap_or_default().to_string(),
            cursor: self.cursor,
            total: self.tokens.len(),
            status: self.status,
            rate: self.rate.wpm(),
            progress_fraction: self.progress_fraction(),
            loading,
            error: self.failure.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(words: &[&str]) -> PlaybackMachine {
        PlaybackMachine::new(
            TokenList::from_words(words.iter().copied()),
            ReadingRate::default(),
        )
    }

    #[test]
    fn starts_idle_at_first_word() {
        let m = machine(&["The", "quick"]);
        assert_eq!(m.status(), PlaybackStatus::Idle);
        assert_eq!(m.cursor(), 0);
        assert_eq!(m.current_word(), Some("The"));
    }

    #[test]
    fn play_on_empty_document_is_a_noop() {
        let mut m = machine(&[]);
        assert!(!m.play());
        assert_eq!(m.status(), PlaybackStatus::Idle);
        assert_eq!(m.current_delay(&PacingProfile::default()), None);
    }

    #[test]
    fn full_run_visits_every_index_once_then_finishes() {
        let words = ["The", "quick", "brown", "fox."];
        let mut m = machine(&words);
        assert!(m.play());

        let mut visited = vec![m.cursor()];
        loop {
            match m.advance().unwrap() {
                Advance::Moved { cursor } => visited.push(cursor),
                Advance::Finished => break,
            }
        }

        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert_eq!(m.status(), PlaybackStatus::Finished);
        assert_eq!(m.cursor(), 3);
        assert_eq!(m.current_word(), Some("fox."));
    }

    #[test]
    fn single_word_document_finishes_on_first_advance() {
        let mut m = machine(&["Hi."]);
        assert!(m.play());
        assert_eq!(m.advance(), Ok(Advance::Finished));
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn pause_and_resume_keep_the_cursor() {
        let mut m = machine(&["a", "b", "c"]);
        m.play();
        m.advance().unwrap();
        assert!(m.pause());
        assert_eq!(m.current_word(), Some("b"));
        assert!(!m.pause());
        assert!(m.play());
        assert_eq!(m.current_word(), Some("b"));
        assert_eq!(m.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn play_after_finish_changes_nothing() {
        let mut m = machine(&["a", "b"]);
        m.play();
        m.advance().unwrap();
        m.advance().unwrap();
        assert_eq!(m.status(), PlaybackStatus::Finished);

        assert!(!m.play());
        assert_eq!(m.status(), PlaybackStatus::Finished);
        assert_eq!(m.cursor(), 1);
    }

    #[test]
    fn advance_outside_playing_is_rejected_without_mutation() {
        let mut m = machine(&["a", "b"]);
        assert_eq!(
            m.advance(),
            Err(PlaybackError::AdvanceWhileNotPlaying(PlaybackStatus::Idle))
        );
        m.play();
        m.pause();
        assert_eq!(
            m.advance(),
            Err(PlaybackError::AdvanceWhileNotPlaying(PlaybackStatus::Paused))
        );
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn progress_fraction_uses_cursor_over_total() {
        let mut m = machine(&["a", "b", "c", "d"]);
        assert_eq!(m.progress_fraction(), 0.0);
        m.play();
        for _ in 0..3 {
            m.advance().unwrap();
        }
        assert_eq!(m.cursor(), 3);
        assert!((m.progress_fraction() - 0.75).abs() < f64::EPSILON);
        m.advance().unwrap();
        assert!((m.progress_fraction() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn set_rate_clamps_in_any_state() {
        let mut m = machine(&["a"]);
        assert_eq!(m.set_rate(42).wpm(), 100);
        m.play();
        assert_eq!(m.set_rate(615).wpm(), 620);
        assert_eq!(m.nudge_rate(true).wpm(), 630);
        assert_eq!(m.nudge_rate(false).wpm(), 620);
        assert_eq!(m.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn current_delay_follows_word_and_rate() {
        let mut m = machine(&["The", "quick", "brown", "fox."]);
        m.set_rate(600);
        let pacing = PacingProfile::default();
        assert_eq!(m.current_delay(&pacing), Some(Duration::from_millis(100)));
        m.play();
        for _ in 0..3 {
            m.advance().unwrap();
        }
        assert_eq!(m.current_delay(&pacing), Some(Duration::from_millis(180)));
    }

    #[test]
    fn failed_machine_exposes_reason_and_refuses_play() {
        let mut m = PlaybackMachine::failed(
            &LoadError::NotFound("doc-9".to_string()),
            ReadingRate::default(),
        );
        assert_eq!(m.status(), PlaybackStatus::Error);
        assert!(!m.play());
        let failure = m.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::LoadFailure);
        assert!(failure.message.contains("doc-9"));
    }

    #[test]
    fn empty_content_maps_to_empty_document_message() {
        let m = PlaybackMachine::failed(&LoadError::EmptyContent, ReadingRate::default());
        let snapshot = m.snapshot(false);
        assert_eq!(
            snapshot.error,
            Some(SessionFailure {
                kind: FailureKind::EmptyDocument,
                message: EMPTY_DOCUMENT_MESSAGE.to_string(),
            })
        );
        assert_eq!(snapshot.current_word, "");
        assert_eq!(snapshot.progress_fraction, 0.0);
    }

    #[test]
    fn snapshot_serializes_with_snake_case_status() {
        let mut m = machine(&["hi", "world!"]);
        m.play();
        let json = serde_json::to_value(m.snapshot(false)).unwrap();
        assert_eq!(json["status"], "playing");
        assert_eq!(json["current_word"], "hi");
        assert_eq!(json["rate"], 300);
        assert_eq!(json["total"], 2);
        assert!(json["error"].is_null());
    }
}
