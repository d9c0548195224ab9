use rsvp_core::{PacingProfile, ReadingRate};
use serde::Deserialize;
use std::time::Duration;

/// High-level app configuration, flattened from the TOML tables.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_initial_wpm")]
    pub initial_wpm: u16,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default = "crate::config::defaults::default_long_word_threshold")]
    pub long_word_threshold: usize,
    #[serde(default = "crate::config::defaults::default_long_word_factor")]
    pub long_word_factor: f64,
    #[serde(default = "crate::config::defaults::default_punctuation_factor")]
    pub punctuation_factor: f64,
    #[serde(default = "crate::config::defaults::default_punctuation")]
    pub punctuation: String,
    #[serde(default = "crate::config::defaults::default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "crate::config::defaults::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            initial_wpm: crate::config::defaults::default_initial_wpm(),
            autoplay: false,
            long_word_threshold: crate::config::defaults::default_long_word_threshold(),
            long_word_factor: crate::config::defaults::default_long_word_factor(),
            punctuation_factor: crate::config::defaults::default_punctuation_factor(),
            punctuation: crate::config::defaults::default_punctuation(),
            api_url: crate::config::defaults::default_api_url(),
            auth_token: None,
            timeout_secs: crate::config::defaults::default_timeout_secs(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn initial_rate(&self) -> ReadingRate {
        ReadingRate::from(self.initial_wpm)
    }

    pub fn pacing(&self) -> PacingProfile {
        PacingProfile {
            long_word_threshold: self.long_word_threshold,
            long_word_factor: self.long_word_factor,
            punctuation_factor: self.punctuation_factor,
            punctuation: self.punctuation.clone(),
        }
        .sanitized()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
