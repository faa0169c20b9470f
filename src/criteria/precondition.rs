//! Filters shared by every criterion variant, checked before the kind.

use crate::criteria::pattern::ContainsPattern;
use crate::error::ConfigError;
use crate::event::Event;

/// Option key for the actor filter, accepted by every criterion type.
pub const ACTOR_CONTAINS: &str = "actor_contains";

/// Shared precondition evaluated ahead of a criterion's own predicate.
///
/// The default admits every event.
#[derive(Debug, Clone, Default)]
pub struct Precondition {
    actor: Option<ContainsPattern>,
}

impl Precondition {
    /// Only admit events whose actor's name, email, or username contains `pattern`.
    pub fn actor_contains(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            actor: Some(ContainsPattern::new(ACTOR_CONTAINS, pattern)?),
        })
    }

    /// Take the shared keys out of a criterion's option table.
    ///
    /// What remains in `options` belongs to the variant.
    pub fn take_from(tag: &str, options: &mut toml::Table) -> Result<Self, ConfigError> {
        match options.remove(ACTOR_CONTAINS) {
            None => Ok(Self::default()),
            Some(toml::Value::String(pattern)) => Self::actor_contains(&pattern),
            Some(other) => Err(ConfigError::InvalidOptions {
                tag: tag.to_string(),
                message: format!(
                    "`{ACTOR_CONTAINS}` must be a string, found {}",
                    other.type_str()
                ),
            }),
        }
    }

    pub fn admits(&self, event: &Event) -> bool {
        let Some(ref pattern) = self.actor else {
            return true;
        };
        event
            .actor()
            .is_some_and(|actor| actor.identities().any(|id| pattern.is_found_in(Some(id))))
    }
}
