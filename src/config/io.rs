use super::models::AppConfig;
use super::tables::ConfigTables;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable that overrides `[backend] auth_token`.
pub const AUTH_TOKEN_ENV: &str = "RSVP_AUTH_TOKEN";

fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str::<ConfigTables>(contents).map(AppConfig::from)
}

pub fn serialize_config(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&ConfigTables::from(config))
}

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let config = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            match parse_config(&data) {
                Ok(cfg) => {
                    debug!("Parsed configuration from disk");
                    cfg
                }
                Err(err) => {
                    warn!(path = %path.display(), "Invalid config TOML: {err}");
                    AppConfig::default()
                }
            }
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            AppConfig::default()
        }
    };
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    if let Some(token) = lookup(AUTH_TOKEN_ENV).filter(|token| !token.trim().is_empty()) {
        debug!(var = AUTH_TOKEN_ENV, "Using auth token from environment");
        config.auth_token = Some(token);
    }
    config
}
