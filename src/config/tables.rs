use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    reading: ReadingConfig,
    #[serde(default)]
    pacing: PacingConfig,
    #[serde(default)]
    backend: BackendConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            initial_wpm: tables.reading.initial_wpm,
            autoplay: tables.reading.autoplay,
            long_word_threshold: tables.pacing.long_word_threshold,
            long_word_factor: tables.pacing.long_word_factor,
            punctuation_factor: tables.pacing.punctuation_factor,
            punctuation: tables.pacing.punctuation,
            api_url: tables.backend.api_url,
            auth_token: tables.backend.auth_token,
            timeout_secs: tables.backend.timeout_secs,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            reading: ReadingConfig {
                initial_wpm: config.initial_wpm,
                autoplay: config.autoplay,
            },
            pacing: PacingConfig {
                long_word_threshold: config.long_word_threshold,
                long_word_factor: config.long_word_factor,
                punctuation_factor: config.punctuation_factor,
                punctuation: config.punctuation.clone(),
            },
            backend: BackendConfig {
                api_url: config.api_url.clone(),
                auth_token: config.auth_token.clone(),
                timeout_secs: config.timeout_secs,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ReadingConfig {
    #[serde(default = "defaults::default_initial_wpm")]
    initial_wpm: u16,
    #[serde(default)]
    autoplay: bool,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        ReadingConfig {
            initial_wpm: defaults::default_initial_wpm(),
            autoplay: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PacingConfig {
    #[serde(default = "defaults::default_long_word_threshold")]
    long_word_threshold: usize,
    #[serde(default = "defaults::default_long_word_factor")]
    long_word_factor: f64,
    #[serde(default = "defaults::default_punctuation_factor")]
    punctuation_factor: f64,
    #[serde(default = "defaults::default_punctuation")]
    punctuation: String,
}

impl Default for PacingConfig {
    fn default() -> Self {
        PacingConfig {
            long_word_threshold: defaults::default_long_word_threshold(),
            long_word_factor: defaults::default_long_word_factor(),
            punctuation_factor: defaults::default_punctuation_factor(),
            punctuation: defaults::default_punctuation(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct BackendConfig {
    #[serde(default = "defaults::default_api_url")]
    api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default = "defaults::default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            api_url: defaults::default_api_url(),
            auth_token: None,
            timeout_secs: defaults::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
