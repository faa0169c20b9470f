use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::registry::CriterionConfig;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriggerConfig {
    #[serde(default)]
    pub settings: Settings,
    /// Criteria in evaluation order.
    #[serde(default)]
    pub events: Vec<CriterionConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// `off`, `error`, `warn`, `info`, `debug`, or `trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Append log lines here instead of writing to stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    replace_events: bool,
    #[serde(default)]
    remove_events: Vec<String>,
    #[serde(default)]
    events: Vec<CriterionConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

// ── Merge logic ──

/// Merge user criteria into the default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: drop defaults whose tag is listed in `remove`, then
/// append additions (exact duplicates skipped).
fn merge_events(
    base: &mut Vec<CriterionConfig>,
    add: Vec<CriterionConfig>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(&item.tag));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl TriggerConfig {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Parse a complete configuration, without merging defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the overlay at `path`, or at
    ///    ~/.config/gerrit-trigger-events/config.toml when `path` is `None`
    ///    and that file exists
    ///
    /// An explicit `path` must exist. Parse errors are returned, never
    /// skipped: a half-read trigger config would silently change which
    /// builds run.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default_config();
        let overlay = match path {
            Some(p) => Some(read_overlay(p)?),
            None => match user_config_path() {
                Some(p) if p.is_file() => Some(read_overlay(&p)?),
                _ => None,
            },
        };
        if let Some(overlay) = overlay {
            config.apply_overlay(overlay);
        }
        Ok(config)
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        if let Some(v) = overlay.settings.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = overlay.settings.log_file {
            self.settings.log_file = Some(v);
        }

        merge_events(
            &mut self.events,
            overlay.events,
            &overlay.remove_events,
            overlay.replace_events,
        );
    }

    /// Apply an overlay from a TOML string.
    pub fn apply_overlay_str(&mut self, toml_str: &str) -> Result<(), ConfigError> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        self.apply_overlay(overlay);
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(Path::new(&home).join(".config/gerrit-trigger-events/config.toml"))
}

fn read_overlay(path: &Path) -> Result<ConfigOverlay, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}
