//! Payload types shared by the event variants.
//!
//! Field names follow Gerrit's stream-events JSON (camelCase on the wire).
//! Anything the service may leave out is an `Option`; unknown fields are
//! ignored so newer server versions don't break ingestion.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// A Gerrit account as it appears in events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Account {
    /// The identities present on this account: name, email, username.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        [&self.name, &self.email, &self.username]
            .into_iter()
            .filter_map(|s| s.as_deref())
    }
}

/// The change an event refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub project: String,
    pub branch: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub number: u64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub owner: Option<Account>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "isPrivate")]
    pub private: bool,
    #[serde(default)]
    pub wip: bool,
}

/// How a patch set relates to its predecessor, as classified by Gerrit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchSetKind {
    Rework,
    TrivialRebase,
    MergeFirstParentUpdate,
    NoCodeChange,
    NoChange,
    #[serde(other)]
    Unknown,
}

/// A single patch set of a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSet {
    #[serde(deserialize_with = "number_or_string")]
    pub number: u64,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub uploader: Option<Account>,
    #[serde(default)]
    pub author: Option<Account>,
    #[serde(default)]
    pub kind: Option<PatchSetKind>,
    #[serde(default, rename = "isDraft")]
    pub draft: bool,
    #[serde(default)]
    pub created_on: Option<u64>,
}

/// A vote on a label, e.g. `Code-Review: +2`.
///
/// Gerrit sends values as strings (`"-1"`, `"2"`); numbers are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    #[serde(rename = "type")]
    pub category: String,
    #[serde(deserialize_with = "text_or_number")]
    pub value: String,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    pub old_value: Option<String>,
    #[serde(default)]
    pub by: Option<Account>,
}

/// The ref movement carried by a `ref-updated` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdate {
    pub old_rev: String,
    pub new_rev: String,
    pub ref_name: String,
    pub project: String,
}

impl RefUpdate {
    /// The branch name for `refs/heads/*` refs, otherwise the full ref name.
    pub fn branch(&self) -> &str {
        self.ref_name
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.ref_name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(i64),
    Text(String),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Text(s) => s,
        }
    }
}

fn number_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match RawScalar::deserialize(d)? {
        RawScalar::Number(n) => u64::try_from(n).map_err(D::Error::custom),
        RawScalar::Text(s) => s.trim().parse().map_err(D::Error::custom),
    }
}

fn text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawScalar::deserialize(d).map(RawScalar::into_text)
}

fn opt_text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Option::<RawScalar>::deserialize(d).map(|v| v.map(RawScalar::into_text))
}
