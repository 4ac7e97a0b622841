//! Request validation: declarative rule sets evaluated against JSON payloads.
//!
//! A [`Validator`] describes a payload as a field → constraint mapping
//! ([`RuleSet`]). Evaluation collects every failure per field; callers either
//! get `Ok(())` or the full error map, never a partial result.

mod departments;
mod engine;
mod modules;
mod roles;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

pub use departments::{StoreDepartment, UpdateDepartment};
pub use engine::evaluate;
pub use modules::StoreModule;
pub use roles::{StoreRole, UpdateRole};

/// A single constraint on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Present, non-null, and not blank/empty.
    Required,
    /// `null` is accepted and skips the remaining rules.
    Nullable,
    String,
    Array,
    /// Upper bound: characters for strings, items for arrays.
    Max(usize),
    /// No other record holds this value. `ignore` exempts the record being
    /// edited.
    Unique { ignore: Option<u64> },
    /// Value must be one of the given strings.
    In(BTreeSet<String>),
}

/// Ordered field → constraints mapping.
///
/// Field keys ending in `.*` apply to every element of the array at the
/// prefix; failures are reported under the concrete index (`module_codes.1`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.fields.push((name.into(), rules));
        self
    }

    pub fn get(&self, name: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Validation capability for one request kind.
pub trait Validator {
    /// Build the constraint mapping for this request. May read reference data
    /// (e.g. module codes); called once per [`Validator::validate`].
    fn rules(&self) -> RuleSet;

    /// Id of the record currently holding `value` for a `Unique` field.
    fn unique_holder(&self, _field: &str, _value: &str) -> Option<u64> {
        None
    }

    fn validate(&self, payload: &serde_json::Value) -> Result<(), ValidationErrors> {
        let rules = self.rules();
        evaluate(&rules, payload, &|field: &str, value: &str| {
            self.unique_holder(field, value)
        })
    }
}
