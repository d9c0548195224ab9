//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "rsvp-reader", about = "Read a document one word at a time")]
pub struct Args {
    /// Document id on the back end, or a text file path with --file
    #[arg(required_unless_present = "print_config")]
    pub document: Option<String>,

    /// Treat the document argument as a local plain-text file
    #[arg(long)]
    pub file: bool,

    /// Starting rate in words per minute (clamped to 100..=1000)
    #[arg(long)]
    pub wpm: Option<u16>,

    /// Configuration file
    #[arg(long, default_value = "conf/config.toml")]
    pub config: PathBuf,

    /// Override the back-end base URL from the config file
    #[arg(long)]
    pub api_url: Option<String>,

    /// Start playing as soon as the document is loaded
    #[arg(long)]
    pub autoplay: bool,

    /// Print every snapshot as a JSON line instead of a status line
    #[arg(long)]
    pub json: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
