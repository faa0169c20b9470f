//! Trigger on new patch sets, with opt-in exclusions.

use serde::Deserialize;

use crate::criteria::{ContainsPattern, Criterion, Precondition, decode_options};
use crate::error::ConfigError;
use crate::event::{Event, EventKind, PatchSetKind};
use crate::logging::excerpt;
use crate::registry::Descriptor;

pub static DESCRIPTOR: Descriptor = Descriptor {
    tag: "patchsetCreated",
    display_name: "Patchset Created",
    event_kind: EventKind::PatchsetCreated,
    factory: build,
};

/// Configuration for [`PatchsetCreatedCriterion`]. Every exclusion is off
/// by default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchsetCreatedOptions {
    pub exclude_drafts: bool,
    pub exclude_trivial_rebase: bool,
    pub exclude_no_code_change: bool,
    pub exclude_private_state: bool,
    pub exclude_wip_state: bool,
    pub commit_message_contains_regex: Option<String>,
    pub uploader_name_contains_regex: Option<String>,
}

#[derive(Debug)]
pub struct PatchsetCreatedCriterion {
    exclude_drafts: bool,
    exclude_trivial_rebase: bool,
    exclude_no_code_change: bool,
    exclude_private_state: bool,
    exclude_wip_state: bool,
    commit_message: Option<ContainsPattern>,
    uploader_name: Option<ContainsPattern>,
    precondition: Precondition,
}

impl PatchsetCreatedCriterion {
    pub fn new(options: &PatchsetCreatedOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            exclude_drafts: options.exclude_drafts,
            exclude_trivial_rebase: options.exclude_trivial_rebase,
            exclude_no_code_change: options.exclude_no_code_change,
            exclude_private_state: options.exclude_private_state,
            exclude_wip_state: options.exclude_wip_state,
            commit_message: ContainsPattern::optional(
                "commit_message_contains_regex",
                options.commit_message_contains_regex.as_deref(),
            )?,
            uploader_name: ContainsPattern::optional(
                "uploader_name_contains_regex",
                options.uploader_name_contains_regex.as_deref(),
            )?,
            precondition: Precondition::default(),
        })
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = precondition;
        self
    }
}

impl Criterion for PatchsetCreatedCriterion {
    fn descriptor(&self) -> &'static Descriptor {
        &DESCRIPTOR
    }

    fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    fn accepts(&self, event: &Event) -> bool {
        let Event::PatchsetCreated(created) = event else {
            return false;
        };
        // A manual re-trigger bypasses every exclusion
        if created.manual {
            return true;
        }

        let patch_set = &created.patch_set;
        let change = &created.change;
        if self.exclude_drafts && patch_set.draft {
            return false;
        }
        if self.exclude_trivial_rebase && patch_set.kind == Some(PatchSetKind::TrivialRebase) {
            return false;
        }
        if self.exclude_no_code_change && patch_set.kind == Some(PatchSetKind::NoCodeChange) {
            return false;
        }
        if self.exclude_private_state && change.private {
            return false;
        }
        if self.exclude_wip_state && change.wip {
            return false;
        }

        if let Some(ref pattern) = self.commit_message {
            let message = change.commit_message.as_deref();
            log::debug!("commit message: '{}'", excerpt(message.unwrap_or("")));
            if !pattern.is_found_in(message) {
                return false;
            }
        }

        if let Some(ref pattern) = self.uploader_name {
            let uploader = patch_set
                .uploader
                .as_ref()
                .or(created.uploader.as_ref())
                .and_then(|a| a.name.as_deref());
            if !pattern.is_found_in(uploader) {
                return false;
            }
        }

        true
    }
}

fn build(
    descriptor: &'static Descriptor,
    options: toml::Table,
    precondition: Precondition,
) -> Result<Box<dyn Criterion>, ConfigError> {
    let options: PatchsetCreatedOptions = decode_options(descriptor.tag, options)?;
    Ok(Box::new(
        PatchsetCreatedCriterion::new(&options)?.with_precondition(precondition),
    ))
}
