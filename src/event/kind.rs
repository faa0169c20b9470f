use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a review event, one per [`Event`](super::Event) variant.
///
/// The string form is the `type` field of Gerrit's stream-events JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    PatchsetCreated,
    DraftPublished,
    CommentAdded,
    ChangeMerged,
    ChangeAbandoned,
    ChangeRestored,
    RefUpdated,
    TopicChanged,
    VoteDeleted,
    PrivateStateChanged,
    WipStateChanged,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 11] = [
        EventKind::PatchsetCreated,
        EventKind::DraftPublished,
        EventKind::CommentAdded,
        EventKind::ChangeMerged,
        EventKind::ChangeAbandoned,
        EventKind::ChangeRestored,
        EventKind::RefUpdated,
        EventKind::TopicChanged,
        EventKind::VoteDeleted,
        EventKind::PrivateStateChanged,
        EventKind::WipStateChanged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::PatchsetCreated => "patchset-created",
            EventKind::DraftPublished => "draft-published",
            EventKind::CommentAdded => "comment-added",
            EventKind::ChangeMerged => "change-merged",
            EventKind::ChangeAbandoned => "change-abandoned",
            EventKind::ChangeRestored => "change-restored",
            EventKind::RefUpdated => "ref-updated",
            EventKind::TopicChanged => "topic-changed",
            EventKind::VoteDeleted => "vote-deleted",
            EventKind::PrivateStateChanged => "private-state-changed",
            EventKind::WipStateChanged => "wip-state-changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string is not the wire name of any known event kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown event kind `{0}`")]
pub struct ParseEventKindError(pub String);

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseEventKindError(s.to_string()))
    }
}
