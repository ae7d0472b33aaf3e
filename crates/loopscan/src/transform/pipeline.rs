//! The ordered, filterable transform pipeline.

use std::collections::{btree_map, BTreeMap};
use std::fmt;

use indexmap::IndexMap;
use regex::Regex;

use crate::curve::Curve;
use crate::error::{LoopscanError, Result};
use crate::glean::Gleaner;

use super::TransformOptions;

/// A boxed transform callable, as stored by the pipeline.
pub type TransformFn =
    Box<dyn Fn(&mut Curve, &TransformOptions, &mut RunState) -> Result<()> + Send + Sync>;

/// Mutable state shared by every transform invocation of a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunState {
    /// Accumulator for the `vertical_offset` transform.
    pub vertical_offset: f64,
}

/// Decides whether a pipeline entry applies to a given target.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Applies to every target.
    Any,
    /// Applies when the pattern matches the target identifier from its
    /// start. The pattern is anchored at registration, so `"a"` matches
    /// `"abc"` but not `"bac"`.
    Path(Regex),
    /// Applies when every listed field equals the value the pipeline's
    /// gleaner extracts for the target. A field the gleaner does not produce
    /// never matches.
    Metadata(IndexMap<String, String>),
}

impl Filter {
    /// A prefix-anchored path filter.
    pub fn path(pattern: &str) -> Result<Self> {
        Ok(Filter::Path(Regex::new(&format!("^(?:{pattern})"))?))
    }

    /// A metadata-equality filter over one field.
    pub fn field(field: &str, value: &str) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(field.to_string(), value.to_string());
        Filter::Metadata(fields)
    }

    /// A metadata-equality filter over several fields; all must match.
    pub fn fields(pairs: &[(&str, &str)]) -> Self {
        Filter::Metadata(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn matches(&self, target: &str, gleaner: Option<&dyn Gleaner>) -> bool {
        match self {
            Filter::Any => true,
            Filter::Path(pattern) => pattern.is_match(target),
            Filter::Metadata(wanted) => {
                let Some(gleaner) = gleaner else {
                    return false;
                };
                let fields = gleaner.glean(target);
                wanted
                    .iter()
                    .all(|(k, v)| fields.get(k).is_some_and(|got| got == v))
            }
        }
    }
}

struct Entry {
    name: String,
    transform: TransformFn,
    options: TransformOptions,
    filter: Filter,
}

/// An ordered collection of transforms, applied to curves in slot order.
///
/// Each transform occupies an integer slot; application order is slot order,
/// independent of registration order, so a caller can reserve gaps and
/// splice steps in later. Entries carry a [`Filter`]; on each
/// [`apply`](Transformer::apply) only the entries whose filter accepts the
/// target run.
pub struct Transformer {
    entries: BTreeMap<i64, Entry>,
    gleaner: Option<Box<dyn Gleaner>>,
    run: RunState,
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            gleaner: None,
            run: RunState::default(),
        }
    }

    /// Attach the gleaner consulted by metadata filters.
    pub fn with_gleaner<G: Gleaner + 'static>(mut self, gleaner: G) -> Self {
        self.gleaner = Some(Box::new(gleaner));
        self
    }

    /// Register `transform` at `slot`.
    ///
    /// Fails if the slot is already occupied, or if the filter needs
    /// metadata but no gleaner is attached.
    pub fn add<F>(
        &mut self,
        slot: i64,
        name: &str,
        transform: F,
        options: TransformOptions,
        filter: Filter,
    ) -> Result<()>
    where
        F: Fn(&mut Curve, &TransformOptions, &mut RunState) -> Result<()> + Send + Sync + 'static,
    {
        if matches!(filter, Filter::Metadata(_)) && self.gleaner.is_none() {
            return Err(LoopscanError::Config(format!(
                "transform '{name}' at slot {slot} has a metadata filter but no gleaner is attached"
            )));
        }
        match self.entries.entry(slot) {
            btree_map::Entry::Occupied(occupied) => Err(LoopscanError::Config(format!(
                "slot {slot} is already occupied by '{}'",
                occupied.get().name
            ))),
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(Entry {
                    name: name.to_string(),
                    transform: Box::new(transform),
                    options,
                    filter,
                });
                Ok(())
            }
        }
    }

    /// Remove the entry at `slot`, if any.
    pub fn remove(&mut self, slot: i64) -> bool {
        self.entries.remove(&slot).is_some()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the pipeline over `curve` for the target identified by `target`.
    ///
    /// Entries run in ascending slot order; entries whose filter rejects the
    /// target are skipped. The first transform error aborts the run.
    pub fn apply(&mut self, mut curve: Curve, target: &str) -> Result<Curve> {
        for (slot, entry) in &self.entries {
            if !entry.filter.matches(target, self.gleaner.as_deref()) {
                log::debug!("slot {slot}: '{}' skipped for {target}", entry.name);
                continue;
            }
            log::debug!("slot {slot}: applying '{}' to {target}", entry.name);
            let mut options = entry.options.clone();
            options.target = Some(target.to_string());
            (entry.transform)(&mut curve, &options, &mut self.run)?;
        }
        Ok(curve)
    }

    /// Reset the per-run state. Call between independent batches.
    pub fn reset_run(&mut self) {
        self.run = RunState::default();
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<(i64, &str)> = self
            .entries
            .iter()
            .map(|(slot, entry)| (*slot, entry.name.as_str()))
            .collect();
        f.debug_struct("Transformer")
            .field("entries", &slots)
            .field("has_gleaner", &self.gleaner.is_some())
            .field("run", &self.run)
            .finish()
    }
}
