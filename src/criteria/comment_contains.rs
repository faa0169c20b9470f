//! Trigger when a new comment on a change matches a regex.

use serde::Deserialize;

use crate::criteria::{ContainsPattern, Criterion, Precondition, decode_options};
use crate::error::ConfigError;
use crate::event::{Event, EventKind};
use crate::logging::excerpt;
use crate::registry::Descriptor;

const FIELD: &str = "comment_added_comment_contains";

pub static DESCRIPTOR: Descriptor = Descriptor {
    tag: "commentAddedContains",
    display_name: "Comment Added Contains Regular Expression",
    event_kind: EventKind::CommentAdded,
    factory: build,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    comment_added_comment_contains: String,
}

/// Triggers when a posted review comment matches a regex, e.g. `(?i)^recheck$`.
#[derive(Debug)]
pub struct CommentAddedContainsCriterion {
    comment: ContainsPattern,
    precondition: Precondition,
}

impl CommentAddedContainsCriterion {
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
}

impl Criterion for CommentAddedContainsCriterion {
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
        let comment = added.comment.as_deref();
        log::debug!("comment-added comment: '{}'", excerpt(comment.unwrap_or("")));
        self.comment.is_found_in(comment)
    }
}

fn build(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError> {
    let options: Options = decode_options(descriptor.tag, options)?;
    let criterion = CommentAddedContainsCriterion::new(&options.comment_added_comment_contains)?;
    Ok(Box::new(criterion.with_precondition(precondition)))
}
