//! Trigger decisions: OR over the configured criteria.

use std::collections::HashMap;

use crate::config::TriggerConfig;
use crate::criteria::Criterion;
use crate::error::ConfigError;
use crate::event::{Event, EventKind};
use crate::registry::CriterionRegistry;

/// Offer `event` to every criterion in order; true on the first match.
///
/// Criteria built for other kinds simply return `false`, so no
/// pre-filtering is needed for correctness. An empty slice never triggers.
pub fn should_trigger<C>(event: &Event, criteria: &[C]) -> bool
where
    C: AsRef<dyn Criterion>,
{
    criteria.iter().any(|c| c.as_ref().matches(event))
}

/// The ordered criteria configured for one job.
///
/// Built once when the job is loaded and read-only afterwards; share it
/// between worker threads behind an `Arc` or a plain reference.
#[derive(Debug, Default)]
pub struct TriggerConfiguration {
    criteria: Vec<Box<dyn Criterion>>,
    /// Positions in `criteria` per event kind, in configured order.
    by_kind: HashMap<EventKind, Vec<usize>>,
}

impl TriggerConfiguration {
    pub fn new(criteria: Vec<Box<dyn Criterion>>) -> Self {
        let mut by_kind: HashMap<EventKind, Vec<usize>> = HashMap::new();
        for (i, c) in criteria.iter().enumerate() {
            by_kind.entry(c.event_kind()).or_default().push(i);
        }
        Self { criteria, by_kind }
    }

    /// Build every `[[events]]` entry of `config`, stopping at the first
    /// invalid one.
    pub fn from_config(
        config: &TriggerConfig,
        registry: &CriterionRegistry,
    ) -> Result<Self, ConfigError> {
        let criteria = config
            .events
            .iter()
            .map(|c| registry.build(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(criteria))
    }

    pub fn criteria(&self) -> &[Box<dyn Criterion>] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Whether any configured criterion evaluates events of `kind`.
    pub fn is_interested_in(&self, kind: EventKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Same answer as [`should_trigger`] over all criteria, but only the
    /// criteria for the event's kind are consulted.
    pub fn should_trigger(&self, event: &Event) -> bool {
        let kind = event.kind();
        let Some(indices) = self.by_kind.get(&kind) else {
            log::debug!("no criteria for {kind}");
            return false;
        };
        let matched = indices
            .iter()
            .map(|&i| &self.criteria[i])
            .find(|c| c.matches(event));
        match matched {
            Some(c) => {
                log::debug!(
                    "{kind} on change {} matched {}",
                    change_label(event),
                    c.descriptor().tag
                );
                true
            }
            None => {
                log::debug!(
                    "{kind} on change {} matched none of {} criteria",
                    change_label(event),
                    indices.len()
                );
                false
            }
        }
    }
}

fn change_label(event: &Event) -> String {
    match event.change() {
        Some(change) => format!("{}/{}", change.project, change.number),
        None => event.project().to_string(),
    }
}
