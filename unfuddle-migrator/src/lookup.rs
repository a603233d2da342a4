//! Identifier lookup tables.
//!
//! Source ids only mean something inside the backup. [`IdentifierMap`] turns
//! them into remote milestone numbers, label strings and GitHub usernames.
//! It is built once per run, phase by phase, and passed explicitly to every
//! step that reads it.

use crate::backup::{SourceComponent, SourceFieldValue};
use std::collections::HashMap;
use tracing::info;

/// Source-id to remote-value mappings for one migration run.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    milestones: HashMap<String, u64>,
    components: HashMap<String, String>,
    field_values: HashMap<String, String>,
    users: HashMap<String, String>,
}

impl IdentifierMap {
    /// Creates an empty map with the static user table.
    #[must_use]
    pub fn new(users: HashMap<String, String>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    /// Fills the component and custom-field label tables.
    ///
    /// Entries lacking an id or a value are skipped.
    pub fn load_labels(&mut self, components: &[SourceComponent], field_values: &[SourceFieldValue]) {
        self.components = component_labels(components);
        info!(count = self.components.len(), "Component values read from backup");

        self.field_values = field_value_labels(field_values);
        info!(count = self.field_values.len(), "Field values read from backup");
    }

    /// Records the remote number of a recreated milestone.
    pub fn insert_milestone(&mut self, source_id: impl Into<String>, number: u64) {
        self.milestones.insert(source_id.into(), number);
    }

    /// Remote milestone number for a source milestone id.
    #[must_use]
    pub fn milestone(&self, source_id: &str) -> Option<u64> {
        self.milestones.get(source_id).copied()
    }

    /// Label for a source component id.
    #[must_use]
    pub fn component(&self, source_id: &str) -> Option<&str> {
        self.components.get(source_id).map(String::as_str)
    }

    /// Label for a source custom-field value id.
    #[must_use]
    pub fn field_value(&self, source_id: &str) -> Option<&str> {
        self.field_values.get(source_id).map(String::as_str)
    }

    /// GitHub username for a source user id.
    #[must_use]
    pub fn user(&self, source_id: &str) -> Option<&str> {
        self.users.get(source_id).map(String::as_str)
    }
}

/// Builds the component id to label table.
#[must_use]
pub fn component_labels(components: &[SourceComponent]) -> HashMap<String, String> {
    components
        .iter()
        .filter_map(|c| Some((c.id.clone()?, c.name.clone()?)))
        .collect()
}

/// Builds the custom-field value id to label table.
#[must_use]
pub fn field_value_labels(values: &[SourceFieldValue]) -> HashMap<String, String> {
    values
        .iter()
        .filter_map(|v| Some((v.id.clone()?, v.value.clone()?)))
        .collect()
}
