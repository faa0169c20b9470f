use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use thiserror::Error;

use crate::config::Settings;
use crate::event::Event;

/// Longest excerpt of free text (comments, commit messages) put in a log line.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level `{0}`")]
    InvalidLevel(String),

    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("logger already initialized")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Install the global logger described by `settings`.
///
/// Appends to `settings.log_file` when set, otherwise writes to stderr
/// (stdout carries decisions).
pub fn init(settings: &Settings) -> Result<(), LoggingError> {
    let level = LevelFilter::from_str(&settings.log_level)
        .map_err(|_| LoggingError::InvalidLevel(settings.log_level.clone()))?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match settings.log_file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::Open {
                    path: path.clone(),
                    source,
                })?;
            WriteLogger::init(level, config, file)?;
        }
        None => {
            TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

/// Record one trigger decision. Never includes comment text.
pub fn log_decision(event: &Event, triggered: bool) {
    let change = event
        .change()
        .map_or_else(|| "-".to_string(), |c| c.number.to_string());
    let patch_set = event
        .patch_set()
        .map_or_else(|| "-".to_string(), |p| p.number.to_string());
    log::info!(
        "{kind}\t{project}\t{change}\t{patch_set}\t{decision}",
        kind = event.kind(),
        project = event.project(),
        decision = if triggered { "trigger" } else { "skip" },
    );
}

/// Single-line, truncated rendering of free text for debug output.
pub fn excerpt(text: &str) -> String {
    let mut out: String = text
        .chars()
        .take(EXCERPT_CHARS)
        .collect::<String>()
        .replace('\n', "\\n");
    if text.chars().nth(EXCERPT_CHARS).is_some() {
        out.push_str("...");
    }
    out
}
