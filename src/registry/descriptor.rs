use std::fmt;

use crate::criteria::{Criterion, Precondition};
use crate::error::ConfigError;
use crate::event::EventKind;

/// Builds a criterion from its variant-specific options.
///
/// The shared precondition keys have already been removed from `options`.
pub type Factory = fn(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError>;

/// Static metadata and factory for one criterion variant.
pub struct Descriptor {
    /// Stable identifier used as `type` in persisted configuration.
    pub tag: &'static str,
    /// Label shown by configuration front-ends.
    pub display_name: &'static str,
    /// The event kind this variant evaluates.
    pub event_kind: EventKind,
    pub factory: Factory,
}

impl Descriptor {
    /// Construct a criterion of this variant.
    pub fn build(
        &'static self,
        options: toml::Table,
        precondition: Precondition,
    ) -> Result<Box<dyn Criterion>, ConfigError> {
        (self.factory)(self, options, precondition)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("tag", &self.tag)
            .field("display_name", &self.display_name)
            .field("event_kind", &self.event_kind)
            .finish_non_exhaustive()
    }
}
