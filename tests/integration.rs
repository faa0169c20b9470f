use gerrit_trigger_events::config::TriggerConfig;
use gerrit_trigger_events::error::ConfigError;
use gerrit_trigger_events::registry::{self, CriterionRegistry};
use gerrit_trigger_events::{Event, EventKind, TriggerConfiguration, configure, should_trigger};

/// Only these criteria, none of the defaults.
const JOB: &str = r#"
replace_events = true

[[events]]
type = "patchsetCreated"
exclude_drafts = true
exclude_trivial_rebase = true
exclude_wip_state = true

[[events]]
type = "commentAdded"
verdict_category = "Code-Review"
comment_added_trigger_approval_value = "+2"

[[events]]
type = "commentAddedContains"
comment_added_comment_contains = "^(recheck|reverify)$"

[[events]]
type = "voteDeletedContains"
vote_deleted_comment_contains = "^retrigger$"

[[events]]
type = "changeMerged"
actor_contains = "^release-bot$"

[[events]]
type = "topicChanged"
topic_contains = "^release/"

[[events]]
type = "refUpdated"
"#;

fn job() -> TriggerConfiguration {
    configure(JOB).expect("job config must build")
}

fn triggers(json: &str) -> bool {
    let event = Event::from_json(json).expect("event must parse");
    job().should_trigger(&event)
}

const CHANGE: &str = r#"{"project":"platform/core","branch":"main","number":"4711","id":"I4711"}"#;

fn event(kind: &str, body: &str) -> String {
    format!(r#"{{"type":"{kind}","change":{CHANGE},"patchSet":{{"number":2}}{body}}}"#)
}

macro_rules! trigger_test {
    ($name:ident, $json:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let json: String = $json;
            assert_eq!(triggers(&json), $expected, "event: {json}");
        }
    };
}

// ── patchset-created ──

trigger_test!(patchset_plain, event("patchset-created", ""), true);
trigger_test!(
    patchset_draft_excluded,
    r#"{"type":"patchset-created","change":{"project":"p","branch":"main","number":1},
        "patchSet":{"number":1,"isDraft":true}}"#
        .to_string(),
    false
);
trigger_test!(
    patchset_trivial_rebase_excluded,
    r#"{"type":"patchset-created","change":{"project":"p","branch":"main","number":1},
        "patchSet":{"number":2,"kind":"TRIVIAL_REBASE"}}"#
        .to_string(),
    false
);
trigger_test!(
    patchset_wip_excluded,
    r#"{"type":"patchset-created","change":{"project":"p","branch":"main","number":1,"wip":true},
        "patchSet":{"number":2,"kind":"REWORK"}}"#
        .to_string(),
    false
);
trigger_test!(
    patchset_no_code_change_not_excluded,
    r#"{"type":"patchset-created","change":{"project":"p","branch":"main","number":1},
        "patchSet":{"number":2,"kind":"NO_CODE_CHANGE"}}"#
        .to_string(),
    true
);

// ── patchset-created, Gerrit stream-events shape ──

/// Every exclusion enabled.
const STRICT_PATCHSETS: &str = r#"
replace_events = true

[[events]]
type = "patchsetCreated"
exclude_drafts = true
exclude_trivial_rebase = true
exclude_no_code_change = true
exclude_private_state = true
exclude_wip_state = true
"#;

/// A patchset-created line as `gerrit stream-events` prints it, with extra
/// `change` and `patchSet` members spliced in.
fn gerrit_patchset(change_extra: &str, patch_set_extra: &str) -> String {
    format!(
        r#"{{"uploader":{{"name":"Jane Dev","email":"jane@example.com","username":"jane"}},
        "patchSet":{{"number":2,"revision":"9f2c1e0d","parents":["4b1a7c3e"],
            "ref":"refs/changes/11/4711/2",
            "uploader":{{"name":"Jane Dev","email":"jane@example.com","username":"jane"}},
            "createdOn":1700000000,
            "author":{{"name":"Jane Dev","email":"jane@example.com","username":"jane"}},
            "sizeInsertions":12,"sizeDeletions":-3{patch_set_extra}}},
        "change":{{"project":"platform/core","branch":"main","id":"I4711aa","number":4711,
            "subject":"Fix flaky retry","owner":{{"name":"Jane Dev","email":"jane@example.com"}},
            "url":"https://review.example.com/c/platform/core/+/4711",
            "commitMessage":"Fix flaky retry\n\nChange-Id: I4711aa\n",
            "createdOn":1699990000,"status":"NEW"{change_extra}}},
        "project":"platform/core","refName":"refs/heads/main",
        "changeKey":{{"id":"I4711aa"}},"type":"patchset-created","eventCreatedOn":1700000001}}"#
    )
}

fn strict_triggers(json: &str) -> bool {
    let event = Event::from_json(json).expect("event must parse");
    configure(STRICT_PATCHSETS)
        .expect("strict config must build")
        .should_trigger(&event)
}

macro_rules! strict_test {
    ($name:ident, $change:expr, $patch_set:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let json = gerrit_patchset($change, $patch_set);
            assert_eq!(strict_triggers(&json), $expected, "event: {json}");
        }
    };
}

strict_test!(gerrit_rework_triggers, "", r#","kind":"REWORK""#, true);
strict_test!(gerrit_private_excluded, r#","isPrivate":true"#, r#","kind":"REWORK""#, false);
strict_test!(gerrit_public_not_excluded, r#","isPrivate":false"#, r#","kind":"REWORK""#, true);
strict_test!(gerrit_wip_excluded, r#","wip":true"#, r#","kind":"REWORK""#, false);
strict_test!(gerrit_draft_excluded, "", r#","kind":"REWORK","isDraft":true"#, false);
strict_test!(gerrit_trivial_rebase_excluded, "", r#","kind":"TRIVIAL_REBASE""#, false);
strict_test!(gerrit_no_code_change_excluded, "", r#","kind":"NO_CODE_CHANGE""#, false);
strict_test!(gerrit_unknown_kind_not_excluded, "", r#","kind":"SOMETHING_NEW""#, true);

#[test]
fn gerrit_patchset_fields_decoded() {
    let json = gerrit_patchset(r#","isPrivate":true,"wip":true"#, r#","kind":"TRIVIAL_REBASE""#);
    let event = Event::from_json(&json).unwrap();
    let change = event.change().unwrap();
    assert!(change.private);
    assert!(change.wip);
    assert_eq!(change.number, 4711);
    let patch_set = event.patch_set().unwrap();
    assert_eq!(patch_set.uploader.as_ref().and_then(|a| a.username.as_deref()), Some("jane"));
    assert_eq!(event.branch(), "main");
}

// ── comment-added ──

trigger_test!(
    comment_code_review_plus_two,
    event(
        "comment-added",
        r#","approvals":[{"type":"Code-Review","value":"2","oldValue":"1"}],"comment":"LGTM""#
    ),
    true
);
trigger_test!(
    comment_code_review_plus_one,
    event(
        "comment-added",
        r#","approvals":[{"type":"Code-Review","value":"1"}],"comment":"LGTM""#
    ),
    false
);
trigger_test!(
    comment_carried_code_review_plus_two,
    event(
        "comment-added",
        r#","approvals":[{"type":"Code-Review","value":"2"}],"comment":"nit: typo""#
    ),
    false
);
trigger_test!(
    comment_recheck,
    event("comment-added", r#","comment":"Patch Set 2:\n\nrecheck""#),
    true
);
trigger_test!(
    comment_recheck_inline_only,
    event("comment-added", r#","comment":"Patch Set 2:\n\nno need to recheck""#),
    false
);
trigger_test!(comment_without_text, event("comment-added", ""), false);

// ── vote-deleted ──

trigger_test!(
    vote_deleted_retrigger,
    event(
        "vote-deleted",
        r#","remover":{"name":"Dev"},"comment":"Removed Verified-1 by CI\n\nretrigger""#
    ),
    true
);
trigger_test!(
    vote_deleted_other_comment,
    event("vote-deleted", r#","comment":"Removed Code-Review+2""#),
    false
);
trigger_test!(vote_deleted_no_comment, event("vote-deleted", ""), false);

// ── change-merged with actor filter ──

trigger_test!(
    merged_by_release_bot,
    event("change-merged", r#","submitter":{"username":"release-bot"}"#),
    true
);
trigger_test!(
    merged_by_human,
    event("change-merged", r#","submitter":{"name":"Jane","username":"jane"}"#),
    false
);
trigger_test!(merged_by_nobody, event("change-merged", ""), false);

// ── topic-changed ──

trigger_test!(
    topic_to_release,
    r#"{"type":"topic-changed","change":{"project":"p","branch":"main","number":9,"topic":"release/3.0"},"oldTopic":"wip"}"#
        .to_string(),
    true
);
trigger_test!(
    topic_to_feature,
    r#"{"type":"topic-changed","change":{"project":"p","branch":"main","number":9,"topic":"feature/x"}}"#
        .to_string(),
    false
);

// ── ref-updated / unconfigured kinds ──

trigger_test!(
    ref_updated,
    r#"{"type":"ref-updated","refUpdate":{"oldRev":"a","newRev":"b","refName":"refs/heads/main","project":"p"}}"#
        .to_string(),
    true
);
trigger_test!(abandoned_not_configured, event("change-abandoned", ""), false);
trigger_test!(restored_not_configured, event("change-restored", ""), false);

// ── Properties ──

#[test]
fn default_config_triggers_on_patchsets_only() {
    let config = configure("").unwrap();
    assert_eq!(config.len(), 1);
    assert!(config.is_interested_in(EventKind::PatchsetCreated));
    let merged = Event::from_json(&event("change-merged", "")).unwrap();
    assert!(!config.should_trigger(&merged));
}

#[test]
fn empty_configuration_never_triggers() {
    let config = configure("replace_events = true").unwrap();
    assert!(config.is_empty());
    let e = Event::from_json(&event("patchset-created", "")).unwrap();
    assert!(!config.should_trigger(&e));
}

#[test]
fn invalid_pattern_blocks_activation() {
    let err = configure(
        r#"
        [[events]]
        type = "voteDeletedContains"
        vote_deleted_comment_contains = "("
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }), "{err}");
}

#[test]
fn unknown_criterion_blocks_activation() {
    let err = configure(
        r#"
        [[events]]
        type = "reviewerAdded"
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownCriterion(_)), "{err}");
}

#[test]
fn configuration_order_does_not_change_outcome() {
    let forward = TriggerConfig::from_toml(JOB).unwrap();
    let mut reversed = forward.clone();
    reversed.events.reverse();
    let registry = CriterionRegistry::builtin();
    let a = TriggerConfiguration::from_config(&forward, &registry).unwrap();
    let b = TriggerConfiguration::from_config(&reversed, &registry).unwrap();
    let events = [
        event("comment-added", r#","comment":"recheck""#),
        event("vote-deleted", r#","comment":"retrigger""#),
        event("change-merged", ""),
        event("patchset-created", ""),
    ];
    for json in &events {
        let e = Event::from_json(json).unwrap();
        assert_eq!(a.should_trigger(&e), b.should_trigger(&e), "{json}");
    }
}

#[test]
fn prefiltered_dispatch_matches_offer_all() {
    let config = job();
    let events = [
        event("comment-added", r#","comment":"recheck""#),
        event("comment-added", r#","comment":"nope""#),
        event("vote-deleted", r#","comment":"retrigger""#),
        event("private-state-changed", ""),
        event("wip-state-changed", ""),
    ];
    for json in &events {
        let e = Event::from_json(json).unwrap();
        assert_eq!(config.should_trigger(&e), should_trigger(&e, config.criteria()));
    }
}

#[test]
fn evaluation_is_idempotent() {
    let config = job();
    let e = Event::from_json(&event("vote-deleted", r#","comment":"retrigger""#)).unwrap();
    let first = config.should_trigger(&e);
    assert_eq!(first, config.should_trigger(&e));
    assert!(first);
}

#[test]
fn descriptor_enumeration_covers_every_kind() {
    let listed = registry::global().enumerate();
    for kind in EventKind::ALL {
        assert!(listed.iter().any(|(_, k)| *k == kind), "missing {kind}");
    }
}

#[test]
fn concurrent_jobs_share_one_configuration() {
    let config = job();
    let comments: Vec<String> = (0..100)
        .map(|i| if i % 3 == 0 { "retrigger".to_string() } else { format!("note {i}") })
        .collect();
    let events: Vec<Event> = comments
        .iter()
        .map(|c| {
            let body = format!(r#","comment":{}"#, serde_json::to_string(c).unwrap());
            Event::from_json(&event("vote-deleted", &body)).unwrap()
        })
        .collect();
    let sequential: Vec<bool> = events.iter().map(|e| config.should_trigger(e)).collect();
    let concurrent: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = events
            .iter()
            .map(|e| {
                let config = &config;
                s.spawn(move || config.should_trigger(e))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, concurrent);
    assert_eq!(sequential.iter().filter(|t| **t).count(), 34);
}
