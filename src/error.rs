//! Error types for configuration, registration, and event ingestion.
//!
//! Everything that can go wrong happens before matching starts: a bad
//! pattern or unknown criterion is reported while the trigger configuration
//! is loaded, and a malformed event is rejected while it is parsed. The
//! match path itself has no error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::EventKind;

/// Errors raised while turning persisted configuration into live criteria.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid regular expression for `{field}` ({pattern:?}): {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown criterion type `{0}`")]
    UnknownCriterion(String),

    #[error("invalid options for criterion `{tag}`: {message}")]
    InvalidOptions { tag: String, message: String },

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while populating or installing a criterion registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("criterion type `{0}` is already registered")]
    DuplicateTag(&'static str),

    #[error("the process-wide criterion registry is already installed")]
    AlreadyInstalled,
}

/// Errors raised while decoding an event from the review service.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Well-formed JSON whose `type` is not one of the modelled kinds.
    #[error("unhandled event type `{0}`")]
    UnknownType(String),
}

/// A typed accessor was called on an event of another kind.
///
/// This is a broken internal contract, not a runtime condition: callers
/// check [`Event::kind`](crate::event::Event::kind) first.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid event access: expected {expected}, found {found}")]
pub struct InvalidEventAccess {
    pub expected: EventKind,
    pub found: EventKind,
}
