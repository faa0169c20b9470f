//! Trigger on a specific vote being cast, e.g. `Code-Review +2`.

use serde::Deserialize;

use crate::criteria::{Criterion, Precondition, decode_options};
use crate::error::ConfigError;
use crate::event::{Approval, Event, EventKind};
use crate::registry::Descriptor;

pub static DESCRIPTOR: Descriptor = Descriptor {
    tag: "commentAdded",
    display_name: "Comment Added",
    event_kind: EventKind::CommentAdded,
    factory: build,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    verdict_category: String,
    comment_added_trigger_approval_value: String,
}

/// Matches a `comment-added` event carrying a vote of the configured label
/// and value that was cast by this comment.
///
/// Labels compare ASCII case-insensitively; a leading `+` on the value is
/// ignored on both sides. Gerrit only sets `old_value` on a label this
/// comment changed; an approval without it, or with an unchanged value, was
/// carried over from an earlier comment and does not count.
#[derive(Debug)]
pub struct CommentAddedCriterion {
    category: String,
    value: String,
    precondition: Precondition,
}

impl CommentAddedCriterion {
    pub fn new(category: &str, value: &str) -> Result<Self, ConfigError> {
        let category = category.trim();
        let value = normalize_value(value);
        if category.is_empty() || value.is_empty() {
            return Err(ConfigError::InvalidOptions {
                tag: DESCRIPTOR.tag.to_string(),
                message: "verdict category and approval value must not be empty".into(),
            });
        }
        Ok(Self {
            category: category.to_string(),
            value: value.to_string(),
            precondition: Precondition::default(),
        })
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = precondition;
        self
    }

    fn is_cast(&self, approval: &Approval) -> bool {
        if !approval.category.eq_ignore_ascii_case(&self.category) {
            return false;
        }
        let value = normalize_value(&approval.value);
        if value != self.value {
            return false;
        }
        approval
            .old_value
            .as_deref()
            .is_some_and(|old| normalize_value(old) != value)
    }
}

fn normalize_value(value: &str) -> &str {
    let value = value.trim();
    value.strip_prefix('+').unwrap_or(value)
}

impl Criterion for CommentAddedCriterion {
    fn descriptor(&self) -> &'static Descriptor {
        &DESCRIPTOR
    }

    fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    fn accepts(&self, event: &Event) -> bool {
        let Event::CommentAdded(added) = event else {
            return false;
        };
        added.approvals.iter().any(|a| self.is_cast(a))
    }
}

fn build(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError> {
    let options: Options = decode_options(descriptor.tag, options)?;
    let criterion = CommentAddedCriterion::new(
        &options.verdict_category,
        &options.comment_added_trigger_approval_value,
    )?;
    Ok(Box::new(criterion.with_precondition(precondition)))
}
