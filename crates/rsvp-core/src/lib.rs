//! Word-at-a-time playback engine for RSVP reading.

pub mod error;
pub mod navigation;
pub mod pace;
pub mod playback;
pub mod rate;
pub mod scheduler;
pub mod session;
pub mod source;
mod text_utils;

pub use error::{LoadError, PlaybackError, SchedulerError};
pub use navigation::Navigation;
pub use pace::{PacingProfile, calculate_delay, calculate_delay_ms};
pub use playback::{
    FailureKind, PlaybackMachine, PlaybackSnapshot, PlaybackStatus, SessionFailure,
};
pub use rate::ReadingRate;
pub use session::{ReaderSession, SessionCommand, SessionEvent, SessionOptions};
pub use source::{DocumentWordSource, TokenList};

use std::fs;
use std::path::Path;
use ts_rs::TS;

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<(), String> {
    T::export_all_to(out_dir).map_err(|err| err.to_string())
}

pub fn export_ts_bindings(out_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .map_err(|err| format!("Failed to list {}: {err}", out_dir.display()))?
    {
        let entry = entry.map_err(|err| format!("Failed to read entry: {err}"))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .map_err(|err| format!("Failed to remove {}: {err}", path.display()))?;
        }
    }

    export_single_type::<PlaybackStatus>(out_dir)?;
    export_single_type::<FailureKind>(out_dir)?;
    export_single_type::<SessionFailure>(out_dir)?;
    export_single_type::<PlaybackSnapshot>(out_dir)?;
    export_single_type::<ReadingRate>(out_dir)?;
    export_single_type::<SessionCommand>(out_dir)?;

    let index_content = r#"export type { PlaybackStatus } from "./PlaybackStatus";
export type { FailureKind } from "./FailureKind";
export type { SessionFailure } from "./SessionFailure";
export type { PlaybackSnapshot } from "./PlaybackSnapshot";
export type { ReadingRate } from "./ReadingRate";
export type { SessionCommand } from "./SessionCommand";
"#;

    fs::write(out_dir.join("index.ts"), index_content).map_err(|err| {
        format!(
            "Failed to write {}: {err}",
            out_dir.join("index.ts").display()
        )
    })?;

    Ok(())
}
