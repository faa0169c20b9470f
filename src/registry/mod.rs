//! Catalogue of criterion variants, keyed by tag.
//!
//! A registry is populated through [`RegistryBuilder`] and frozen into an
//! immutable [`CriterionRegistry`]. One process-wide instance can be
//! installed at startup; if none is, [`global`] falls back to the
//! built-in variants.

pub mod descriptor;

pub use descriptor::{Descriptor, Factory};

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::criteria::{self, Criterion, Precondition};
use crate::error::{ConfigError, RegistryError};
use crate::event::EventKind;

static GLOBAL: OnceLock<CriterionRegistry> = OnceLock::new();

/// One persisted criterion: its variant tag plus variant options.
///
/// In TOML this is a table like
/// `{ type = "voteDeletedContains", vote_deleted_comment_contains = "^retrigger$" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionConfig {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(flatten)]
    pub options: toml::Table,
}

impl CriterionConfig {
    /// A config with no options.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            options: toml::Table::new(),
        }
    }

    /// Add one option.
    pub fn with(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }
}

/// Append-only builder for a [`CriterionRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    descriptors: Vec<&'static Descriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with every built-in variant.
    pub fn with_builtin() -> Self {
        Self {
            descriptors: criteria::BUILTIN.to_vec(),
        }
    }

    /// Append a variant. Tags must be unique.
    pub fn register(&mut self, descriptor: &'static Descriptor) -> Result<&mut Self, RegistryError> {
        if self.descriptors.iter().any(|d| d.tag == descriptor.tag) {
            return Err(RegistryError::DuplicateTag(descriptor.tag));
        }
        self.descriptors.push(descriptor);
        Ok(self)
    }

    pub fn freeze(self) -> CriterionRegistry {
        let by_tag = self
            .descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.tag, i))
            .collect();
        CriterionRegistry {
            descriptors: self.descriptors,
            by_tag,
        }
    }
}

/// Immutable lookup from tag to [`Descriptor`]; safe to share across threads.
#[derive(Debug)]
pub struct CriterionRegistry {
    descriptors: Vec<&'static Descriptor>,
    by_tag: HashMap<&'static str, usize>,
}

impl CriterionRegistry {
    /// All built-in variants.
    pub fn builtin() -> Self {
        RegistryBuilder::with_builtin().freeze()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[&'static Descriptor] {
        &self.descriptors
    }

    pub fn lookup(&self, tag: &str) -> Option<&'static Descriptor> {
        self.by_tag.get(tag).map(|&i| self.descriptors[i])
    }

    /// `(display_name, event_kind)` for every variant, for configuration UIs.
    pub fn enumerate(&self) -> Vec<(&'static str, EventKind)> {
        self.descriptors
            .iter()
            .map(|d| (d.display_name, d.event_kind))
            .collect()
    }

    /// Variants that evaluate `kind`.
    pub fn for_kind(&self, kind: EventKind) -> impl Iterator<Item = &'static Descriptor> + '_ {
        self.descriptors
            .iter()
            .copied()
            .filter(move |d| d.event_kind == kind)
    }

    /// Resolve a persisted config to a live criterion.
    pub fn build(&self, config: &CriterionConfig) -> Result<Box<dyn Criterion>, ConfigError> {
        let descriptor = self
            .lookup(&config.tag)
            .ok_or_else(|| ConfigError::UnknownCriterion(config.tag.clone()))?;
        let mut options = config.options.clone();
        let precondition = Precondition::take_from(descriptor.tag, &mut options)?;
        descriptor.build(options, precondition)
    }
}

/// Install the process-wide registry. Only the first call succeeds, and
/// only if [`global`] has not been called yet.
pub fn install(registry: CriterionRegistry) -> Result<(), RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)
}

/// The process-wide registry; the built-in one unless [`install`] ran first.
pub fn global() -> &'static CriterionRegistry {
    GLOBAL.get_or_init(CriterionRegistry::builtin)
}
