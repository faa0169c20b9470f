//! Typed review events, as produced by the ingestion layer.
//!
//! An [`Event`] is a tagged union: the variant *is* the kind, so the kind
//! cannot change after construction. Common metadata (change, patch set,
//! project, branch, actor) is reachable from any variant through accessors
//! that return `Option` where a kind doesn't carry the field.

pub mod kind;
pub mod types;

pub use kind::{EventKind, ParseEventKindError};
pub use types::{Account, Approval, Change, PatchSet, PatchSetKind, RefUpdate};

use serde::{Deserialize, Serialize};

use crate::error::{EventError, InvalidEventAccess};

/// A new patch set was uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchsetCreated {
    pub change: Change,
    pub patch_set: PatchSet,
    #[serde(default)]
    pub uploader: Option<Account>,
    /// Set by the ingestion side when a user re-triggers a patch set by hand.
    #[serde(default)]
    pub manual: bool,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

/// A draft patch set was published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPublished {
    pub change: Change,
    pub patch_set: PatchSet,
    #[serde(default)]
    pub uploader: Option<Account>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

/// A review comment (optionally with votes) was posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAdded {
    pub change: Change,
    pub patch_set: PatchSet,
    #[serde(default)]
    pub author: Option<Account>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMerged {
    pub change: Change,
    pub patch_set: PatchSet,
    #[serde(default)]
    pub submitter: Option<Account>,
    #[serde(default)]
    pub new_rev: Option<String>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAbandoned {
    pub change: Change,
    #[serde(default)]
    pub patch_set: Option<PatchSet>,
    #[serde(default)]
    pub abandoner: Option<Account>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRestored {
    pub change: Change,
    #[serde(default)]
    pub patch_set: Option<PatchSet>,
    #[serde(default)]
    pub restorer: Option<Account>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

/// A ref was moved directly (push bypassing review, tag creation, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdated {
    #[serde(default)]
    pub submitter: Option<Account>,
    pub ref_update: RefUpdate,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

/// The change's topic was set, changed, or cleared.
///
/// The new topic is `change.topic`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicChanged {
    pub change: Change,
    #[serde(default)]
    pub changer: Option<Account>,
    #[serde(default)]
    pub old_topic: Option<String>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

/// A reviewer's vote was removed, usually with a comment explaining why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDeleted {
    pub change: Change,
    pub patch_set: PatchSet,
    #[serde(default)]
    pub reviewer: Option<Account>,
    #[serde(default)]
    pub remover: Option<Account>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateStateChanged {
    pub change: Change,
    #[serde(default)]
    pub patch_set: Option<PatchSet>,
    #[serde(default)]
    pub changer: Option<Account>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipStateChanged {
    pub change: Change,
    #[serde(default)]
    pub patch_set: Option<PatchSet>,
    #[serde(default)]
    pub changer: Option<Account>,
    #[serde(default)]
    pub event_created_on: Option<u64>,
}

/// A single notification from the review service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    PatchsetCreated(PatchsetCreated),
    DraftPublished(DraftPublished),
    CommentAdded(CommentAdded),
    ChangeMerged(ChangeMerged),
    ChangeAbandoned(ChangeAbandoned),
    ChangeRestored(ChangeRestored),
    RefUpdated(RefUpdated),
    TopicChanged(TopicChanged),
    VoteDeleted(VoteDeleted),
    PrivateStateChanged(PrivateStateChanged),
    WipStateChanged(WipStateChanged),
}

/// Generates `try_as_*` (returns [`InvalidEventAccess`]) and `as_*`
/// (panics on a kind mismatch) for each variant.
macro_rules! typed_accessors {
    ($($variant:ident => $try_fn:ident, $fn:ident;)*) => {
        $(
            pub fn $try_fn(&self) -> Result<&$variant, InvalidEventAccess> {
                match self {
                    Event::$variant(e) => Ok(e),
                    other => Err(InvalidEventAccess {
                        expected: EventKind::$variant,
                        found: other.kind(),
                    }),
                }
            }

            #[track_caller]
            pub fn $fn(&self) -> &$variant {
                match self.$try_fn() {
                    Ok(e) => e,
                    Err(err) => panic!("{err}"),
                }
            }
        )*
    };
}

/// Just the discriminator of a stream-events object.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
}

impl Event {
    /// Decode one stream-events JSON object.
    ///
    /// Gerrit emits more event types than are modelled here; those come back
    /// as [`EventError::UnknownType`] rather than `Malformed`.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        serde_json::from_str(json).map_err(|err| {
            match serde_json::from_str::<Envelope>(json) {
                Ok(envelope) if envelope.kind.parse::<EventKind>().is_err() => {
                    EventError::UnknownType(envelope.kind)
                }
                _ => EventError::Malformed(err),
            }
        })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::PatchsetCreated(_) => EventKind::PatchsetCreated,
            Event::DraftPublished(_) => EventKind::DraftPublished,
            Event::CommentAdded(_) => EventKind::CommentAdded,
            Event::ChangeMerged(_) => EventKind::ChangeMerged,
            Event::ChangeAbandoned(_) => EventKind::ChangeAbandoned,
            Event::ChangeRestored(_) => EventKind::ChangeRestored,
            Event::RefUpdated(_) => EventKind::RefUpdated,
            Event::TopicChanged(_) => EventKind::TopicChanged,
            Event::VoteDeleted(_) => EventKind::VoteDeleted,
            Event::PrivateStateChanged(_) => EventKind::PrivateStateChanged,
            Event::WipStateChanged(_) => EventKind::WipStateChanged,
        }
    }

    /// The change this event refers to; `None` for `ref-updated`.
    pub fn change(&self) -> Option<&Change> {
        match self {
            Event::PatchsetCreated(e) => Some(&e.change),
            Event::DraftPublished(e) => Some(&e.change),
            Event::CommentAdded(e) => Some(&e.change),
            Event::ChangeMerged(e) => Some(&e.change),
            Event::ChangeAbandoned(e) => Some(&e.change),
            Event::ChangeRestored(e) => Some(&e.change),
            Event::RefUpdated(_) => None,
            Event::TopicChanged(e) => Some(&e.change),
            Event::VoteDeleted(e) => Some(&e.change),
            Event::PrivateStateChanged(e) => Some(&e.change),
            Event::WipStateChanged(e) => Some(&e.change),
        }
    }

    pub fn patch_set(&self) -> Option<&PatchSet> {
        match self {
            Event::PatchsetCreated(e) => Some(&e.patch_set),
            Event::DraftPublished(e) => Some(&e.patch_set),
            Event::CommentAdded(e) => Some(&e.patch_set),
            Event::ChangeMerged(e) => Some(&e.patch_set),
            Event::ChangeAbandoned(e) => e.patch_set.as_ref(),
            Event::ChangeRestored(e) => e.patch_set.as_ref(),
            Event::RefUpdated(_) | Event::TopicChanged(_) => None,
            Event::VoteDeleted(e) => Some(&e.patch_set),
            Event::PrivateStateChanged(e) => e.patch_set.as_ref(),
            Event::WipStateChanged(e) => e.patch_set.as_ref(),
        }
    }

    pub fn project(&self) -> &str {
        match self {
            Event::RefUpdated(e) => &e.ref_update.project,
            other => other.change().map_or("", |c| c.project.as_str()),
        }
    }

    pub fn branch(&self) -> &str {
        match self {
            Event::RefUpdated(e) => e.ref_update.branch(),
            other => other.change().map_or("", |c| c.branch.as_str()),
        }
    }

    /// The account whose action produced this event.
    pub fn actor(&self) -> Option<&Account> {
        match self {
            Event::PatchsetCreated(e) => e.uploader.as_ref(),
            Event::DraftPublished(e) => e.uploader.as_ref(),
            Event::CommentAdded(e) => e.author.as_ref(),
            Event::ChangeMerged(e) => e.submitter.as_ref(),
            Event::ChangeAbandoned(e) => e.abandoner.as_ref(),
            Event::ChangeRestored(e) => e.restorer.as_ref(),
            Event::RefUpdated(e) => e.submitter.as_ref(),
            Event::TopicChanged(e) => e.changer.as_ref(),
            Event::VoteDeleted(e) => e.remover.as_ref(),
            Event::PrivateStateChanged(e) => e.changer.as_ref(),
            Event::WipStateChanged(e) => e.changer.as_ref(),
        }
    }

    pub fn event_created_on(&self) -> Option<u64> {
        match self {
            Event::PatchsetCreated(e) => e.event_created_on,
            Event::DraftPublished(e) => e.event_created_on,
            Event::CommentAdded(e) => e.event_created_on,
            Event::ChangeMerged(e) => e.event_created_on,
            Event::ChangeAbandoned(e) => e.event_created_on,
            Event::ChangeRestored(e) => e.event_created_on,
            Event::RefUpdated(e) => e.event_created_on,
            Event::TopicChanged(e) => e.event_created_on,
            Event::VoteDeleted(e) => e.event_created_on,
            Event::PrivateStateChanged(e) => e.event_created_on,
            Event::WipStateChanged(e) => e.event_created_on,
        }
    }

    typed_accessors! {
        PatchsetCreated => try_as_patchset_created, as_patchset_created;
        DraftPublished => try_as_draft_published, as_draft_published;
        CommentAdded => try_as_comment_added, as_comment_added;
        ChangeMerged => try_as_change_merged, as_change_merged;
        ChangeAbandoned => try_as_change_abandoned, as_change_abandoned;
        ChangeRestored => try_as_change_restored, as_change_restored;
        RefUpdated => try_as_ref_updated, as_ref_updated;
        TopicChanged => try_as_topic_changed, as_topic_changed;
        VoteDeleted => try_as_vote_deleted, as_vote_deleted;
        PrivateStateChanged => try_as_private_state_changed, as_private_state_changed;
        WipStateChanged => try_as_wip_state_changed, as_wip_state_changed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOTE_DELETED: &str = r#"{
        "type": "vote-deleted",
        "change": {"project": "tools/ci", "branch": "master", "number": 1234,
                   "id": "I0123", "isPrivate": false},
        "patchSet": {"number": 3, "revision": "abc123"},
        "reviewer": {"name": "Rev Iewer"},
        "remover": {"name": "Re Mover", "email": "remover@example.com"},
        "approvals": [{"type": "Verified", "value": "0", "oldValue": "-1"}],
        "comment": "Removed Verified-1 by CI\n\nretrigger",
        "eventCreatedOn": 1700000000
    }"#;

    #[test]
    fn parses_vote_deleted() {
        let event = Event::from_json(VOTE_DELETED).unwrap();
        assert_eq!(event.kind(), EventKind::VoteDeleted);
        let vd = event.as_vote_deleted();
        assert_eq!(vd.change.number, 1234);
        assert_eq!(vd.patch_set.number, 3);
        assert_eq!(vd.approvals.len(), 1);
        assert!(vd.comment.as_deref().unwrap().contains("retrigger"));
        assert_eq!(event.project(), "tools/ci");
        assert_eq!(event.branch(), "master");
        assert_eq!(
            event.actor().and_then(|a| a.email.as_deref()),
            Some("remover@example.com")
        );
        assert_eq!(event.event_created_on(), Some(1_700_000_000));
    }

    #[test]
    fn missing_comment_is_none_not_empty() {
        let event = Event::from_json(
            r#"{"type":"vote-deleted","change":{"project":"p","branch":"b","number":1},
                "patchSet":{"number":1}}"#,
        )
        .unwrap();
        assert_eq!(event.as_vote_deleted().comment, None);
    }

    #[test]
    fn ref_updated_derives_project_and_branch() {
        let event = Event::from_json(
            r#"{"type":"ref-updated","submitter":{"username":"bot"},
                "refUpdate":{"oldRev":"0","newRev":"1","refName":"refs/heads/main","project":"core"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind(), EventKind::RefUpdated);
        assert_eq!(event.project(), "core");
        assert_eq!(event.branch(), "main");
        assert!(event.change().is_none());
        assert!(event.patch_set().is_none());
    }

    #[test]
    fn unmodelled_type_reported_by_name() {
        let err = Event::from_json(r#"{"type":"ref-replicated","project":"p"}"#).unwrap_err();
        assert!(matches!(err, EventError::UnknownType(ref t) if t == "ref-replicated"));
    }

    #[test]
    fn broken_json_is_malformed() {
        for json in [
            r#"{"type":"vote-deleted""#,
            r#"{"change":{"number":1}}"#,
            r#"{"type":"vote-deleted","change":"oops"}"#,
        ] {
            let err = Event::from_json(json).unwrap_err();
            assert!(matches!(err, EventError::Malformed(_)), "{json}: {err}");
        }
    }

    #[test]
    fn try_accessor_reports_mismatch() {
        let event = Event::ChangeMerged(ChangeMerged::default());
        let err = event.try_as_vote_deleted().unwrap_err();
        assert_eq!(err.expected, EventKind::VoteDeleted);
        assert_eq!(err.found, EventKind::ChangeMerged);
    }

    #[test]
    #[should_panic(expected = "invalid event access: expected comment-added, found topic-changed")]
    fn accessor_panics_on_mismatch() {
        let event = Event::TopicChanged(TopicChanged::default());
        let _ = event.as_comment_added();
    }

    #[test]
    fn kind_agrees_with_serde_tag() {
        let event = Event::WipStateChanged(WipStateChanged::default());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.kind().as_str());
    }
}
