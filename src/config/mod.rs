//! Configuration loading for the RSVP reader.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! defaults so a document can still be read.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{AUTH_TOKEN_ENV, load_config, serialize_config};
pub use models::{AppConfig, LogLevel};
