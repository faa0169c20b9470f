//! Trigger when a change's topic is set or changed, optionally matching a regex.

use serde::Deserialize;

use crate::criteria::{ContainsPattern, Criterion, Precondition, decode_options};
use crate::error::ConfigError;
use crate::event::{Event, EventKind};
use crate::registry::Descriptor;

const FIELD: &str = "topic_contains";

pub static DESCRIPTOR: Descriptor = Descriptor {
    tag: "topicChanged",
    display_name: "Topic Changed",
    event_kind: EventKind::TopicChanged,
    factory: build,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default)]
    topic_contains: Option<String>,
}

/// Any topic change, or only those whose new topic matches a pattern.
///
/// A cleared topic is the empty string.
#[derive(Debug)]
pub struct TopicChangedCriterion {
    topic: Option<ContainsPattern>,
    precondition: Precondition,
}

impl TopicChangedCriterion {
    pub fn new(topic_contains: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            topic: ContainsPattern::optional(FIELD, topic_contains)?,
            precondition: Precondition::default(),
        })
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = precondition;
        self
    }
}

impl Criterion for TopicChangedCriterion {
    fn descriptor(&self) -> &'static Descriptor {
        &DESCRIPTOR
    }

    fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    fn accepts(&self, event: &Event) -> bool {
        let Event::TopicChanged(changed) = event else {
            return false;
        };
        match self.topic {
            None => true,
            Some(ref pattern) => {
                let topic = changed.change.topic.as_deref();
                log::debug!("topic-changed new topic: {topic:?}");
                pattern.is_found_in(topic)
            }
        }
    }
}

fn build(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError> {
    let options: Options = decode_options(descriptor.tag, options)?;
    let criterion = TopicChangedCriterion::new(options.topic_contains.as_deref())?;
    Ok(Box::new(criterion.with_precondition(precondition)))
}
