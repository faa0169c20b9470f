//! Data-driven criterion for event kinds that carry no match options.

use serde::Deserialize;

use crate::criteria::{Criterion, Precondition, decode_options};
use crate::error::ConfigError;
use crate::event::{Event, EventKind};
use crate::registry::Descriptor;

/// A criterion satisfied by every event of its kind that passes the
/// shared precondition.
///
/// The kind comes from the descriptor, so one type serves merged,
/// abandoned, restored, draft-published, ref-updated, and the
/// private/WIP state changes.
#[derive(Debug)]
pub struct KindCriterion {
    descriptor: &'static Descriptor,
    precondition: Precondition,
}

impl KindCriterion {
    /// Create a kind-only criterion for `descriptor`'s event kind.
    pub fn new(descriptor: &'static Descriptor, precondition: Precondition) -> Self {
        Self {
            descriptor,
            precondition,
        }
    }
}

impl Criterion for KindCriterion {
    fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    fn accepts(&self, _event: &Event) -> bool {
        true
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

fn build(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError> {
    let NoOptions {} = decode_options(descriptor.tag, options)?;
    Ok(Box::new(KindCriterion::new(descriptor, precondition)))
}

pub static DRAFT_PUBLISHED: Descriptor = Descriptor {
    tag: "draftPublished",
    display_name: "Draft Published",
    event_kind: EventKind::DraftPublished,
    factory: build,
};
pub static CHANGE_ABANDONED: Descriptor = Descriptor {
    tag: "changeAbandoned",
    display_name: "Change Abandoned",
    event_kind: EventKind::ChangeAbandoned,
    factory: build,
};
pub static CHANGE_MERGED: Descriptor = Descriptor {
    tag: "changeMerged",
    display_name: "Change Merged",
    event_kind: EventKind::ChangeMerged,
    factory: build,
};
pub static CHANGE_RESTORED: Descriptor = Descriptor {
    tag: "changeRestored",
    display_name: "Change Restored",
    event_kind: EventKind::ChangeRestored,
    factory: build,
};
pub static REF_UPDATED: Descriptor = Descriptor {
    tag: "refUpdated",
    display_name: "Ref Updated",
    event_kind: EventKind::RefUpdated,
    factory: build,
};
pub static PRIVATE_STATE_CHANGED: Descriptor = Descriptor {
    tag: "privateStateChanged",
    display_name: "Private State Changed",
    event_kind: EventKind::PrivateStateChanged,
    factory: build,
};
pub static WIP_STATE_CHANGED: Descriptor = Descriptor {
    tag: "wipStateChanged",
    display_name: "WIP State Changed",
    event_kind: EventKind::WipStateChanged,
    factory: build,
};
