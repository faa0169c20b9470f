//! gerrit-trigger-events: decides whether a code-review event should start a build.
//!
//! Events from Gerrit's stream (patch sets uploaded, comments added, votes
//! removed, topics changed, ...) are matched against the criteria a job is
//! configured with. Each criterion is bound to one event kind and carries
//! its own predicate, usually a regex searched for in one field. A job
//! triggers when any of its criteria matches.
//!
//! # Architecture
//!
//! - **[`event`]**: Typed events and their Gerrit JSON form.
//! - **[`criteria`]**: The [`Criterion`](criteria::Criterion) trait and one implementation per event kind.
//! - **[`registry`]**: Descriptors: tag → factory lookup for persisted criteria.
//! - **[`dispatch`]**: OR-combination of a job's criteria for one event.
//! - **[`config`]**: Trigger configuration: embedded defaults + user overlay merge.
//! - **[`logging`]**: `simplelog` setup and decision logging.

/// Criterion trait and per-kind implementations.
pub mod criteria;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Trigger decisions over a job's configured criteria.
pub mod dispatch;
/// Error types for configuration, registration, and ingestion.
pub mod error;
/// Typed review events.
pub mod event;
/// Logger setup and decision logging.
pub mod logging;
/// Criterion descriptors and the tag → factory registry.
pub mod registry;

pub use dispatch::{TriggerConfiguration, should_trigger};
pub use error::ConfigError;
pub use event::{Event, EventKind};

/// Layer `overlay_toml` on the default configuration and build it with the
/// process-wide registry.
///
/// This is the main entry point for tests and simple usage. Long-running
/// callers load a [`config::TriggerConfig`] once and keep the result.
pub fn configure(overlay_toml: &str) -> Result<TriggerConfiguration, ConfigError> {
    let mut config = config::TriggerConfig::default_config();
    config.apply_overlay_str(overlay_toml)?;
    TriggerConfiguration::from_config(&config, registry::global())
}
