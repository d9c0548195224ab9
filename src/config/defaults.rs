use rsvp_core::pace;
use rsvp_core::rate::DEFAULT_WPM;

pub(crate) fn default_initial_wpm() -> u16 {
    DEFAULT_WPM
}

pub(crate) fn default_long_word_threshold() -> usize {
    pace::LONG_WORD_THRESHOLD
}

pub(crate) fn default_long_word_factor() -> f64 {
    pace::LONG_WORD_FACTOR
}

pub(crate) fn default_punctuation_factor() -> f64 {
    pace::PUNCTUATION_FACTOR
}

pub(crate) fn default_punctuation() -> String {
    pace::PAUSE_PUNCTUATION.to_string()
}

pub(crate) fn default_api_url() -> String {
    "http://localhost:5001/api".to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
