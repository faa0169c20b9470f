//! Trigger when a vote is removed and the removal comment matches a regex.

use serde::Deserialize;

use crate::criteria::{ContainsPattern, Criterion, Precondition, decode_options};
use crate::error::ConfigError;
use crate::event::{Event, EventKind};
use crate::logging::excerpt;
use crate::registry::Descriptor;

const FIELD: &str = "vote_deleted_comment_contains";

pub static DESCRIPTOR: Descriptor = Descriptor {
    tag: "voteDeletedContains",
    display_name: "Vote Deleted",
    event_kind: EventKind::VoteDeleted,
    factory: build,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    vote_deleted_comment_contains: String,
}

/// Searches the comment accompanying a vote removal.
#[derive(Debug)]
pub struct VoteDeletedCriterion {
    comment: ContainsPattern,
    precondition: Precondition,
}

impl VoteDeletedCriterion {
    pub fn new(comment_contains: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            comment: ContainsPattern::new(FIELD, comment_contains)?,
            precondition: Precondition::default(),
        })
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = precondition;
        self
    }

    pub fn comment_contains(&self) -> &str {
        self.comment.as_str()
    }
}

impl Criterion for VoteDeletedCriterion {
    fn descriptor(&self) -> &'static Descriptor {
        &DESCRIPTOR
    }

    fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    fn accepts(&self, event: &Event) -> bool {
        let Event::VoteDeleted(vote) = event else {
            return false;
        };
        let comment = vote.comment.as_deref();
        log::debug!("vote-deleted comment: '{}'", excerpt(comment.unwrap_or("")));
        self.comment.is_found_in(comment)
    }
}

fn build(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError> {
    let options: Options = decode_options(descriptor.tag, options)?;
    let criterion = VoteDeletedCriterion::new(&options.vote_deleted_comment_contains)?;
    Ok(Box::new(criterion.with_precondition(precondition)))
}
