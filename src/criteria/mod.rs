//! Trigger criteria: one variant per event kind.
//!
//! Each variant implements [`Criterion`] and publishes a `'static`
//! [`Descriptor`] that the registry uses to list and construct it. Variants
//! that only care about the event kind share [`simple::KindCriterion`];
//! the rest match a configured pattern or literal against one field.

/// Approval-value match on `comment-added`.
pub mod comment_added;
/// Comment-text pattern on `comment-added`.
pub mod comment_contains;
/// Exclusion flags and patterns on `patchset-created`.
pub mod patchset_created;
/// Validated multi-line search patterns.
pub mod pattern;
/// Shared actor filter applied before the kind check.
pub mod precondition;
/// Kind-only criteria (merged, abandoned, restored, ...).
pub mod simple;
/// Optional topic pattern on `topic-changed`.
pub mod topic_changed;
/// Comment-text pattern on `vote-deleted`.
pub mod vote_deleted;

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::event::{Event, EventKind};
use crate::registry::Descriptor;

pub use comment_added::CommentAddedCriterion;
pub use comment_contains::CommentAddedContainsCriterion;
pub use patchset_created::{PatchsetCreatedCriterion, PatchsetCreatedOptions};
pub use pattern::ContainsPattern;
pub use precondition::Precondition;
pub use simple::KindCriterion;
pub use topic_changed::TopicChangedCriterion;
pub use vote_deleted::VoteDeletedCriterion;

/// A configured trigger rule bound to one event kind.
///
/// Implementations are immutable after construction, so a single instance
/// can be evaluated from many threads at once.
pub trait Criterion: Send + Sync + fmt::Debug {
    /// Metadata for this criterion's variant.
    fn descriptor(&self) -> &'static Descriptor;

    /// Filters shared by all variants.
    fn precondition(&self) -> &Precondition;

    /// The variant's own predicate.
    ///
    /// Only called with events of [`event_kind`](Criterion::event_kind).
    fn accepts(&self, event: &Event) -> bool;

    /// The only kind of event this criterion evaluates.
    fn event_kind(&self) -> EventKind {
        self.descriptor().event_kind
    }

    /// Precondition, then kind check, then the variant predicate.
    ///
    /// Events of any other kind yield `false`.
    fn matches(&self, event: &Event) -> bool {
        if !self.precondition().admits(event) {
            return false;
        }
        if event.kind() != self.event_kind() {
            return false;
        }
        self.accepts(event)
    }
}

/// Every built-in criterion variant, in display order.
pub static BUILTIN: &[&Descriptor] = &[
    &patchset_created::DESCRIPTOR,
    &simple::DRAFT_PUBLISHED,
    &simple::CHANGE_ABANDONED,
    &simple::CHANGE_MERGED,
    &simple::CHANGE_RESTORED,
    &comment_added::DESCRIPTOR,
    &comment_contains::DESCRIPTOR,
    &simple::REF_UPDATED,
    &topic_changed::DESCRIPTOR,
    &vote_deleted::DESCRIPTOR,
    &simple::PRIVATE_STATE_CHANGED,
    &simple::WIP_STATE_CHANGED,
];

/// Decode a variant's option table into its typed options.
pub(crate) fn decode_options<T: DeserializeOwned>(
    tag: &str,
    options: toml::Table,
) -> Result<T, ConfigError> {
    toml::Value::Table(options)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidOptions {
            tag: tag.to_string(),
            message: e.message().to_string(),
        })
}
