//! Wire types for the NLU prediction response
//!
//! The entity section is a flat map from entity type to raw values, plus a
//! reserved `$instance` map holding per-occurrence metadata. Group order is
//! the order the service wrote them in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Key of the per-occurrence metadata map inside an entity section
pub const INSTANCE_KEY: &str = "$instance";

/// Raw output of one prediction call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionDocument {
    /// Query as the service received it
    #[serde(default)]
    pub query: Option<String>,
    pub prediction: Prediction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub top_intent: String,
    #[serde(default)]
    pub intents: HashMap<String, IntentScore>,
    #[serde(default)]
    pub entities: EntitySection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntentScore {
    pub score: f64,
}

/// Entity groups and their instance metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySection {
    #[serde(rename = "$instance", default)]
    pub instance: Map<String, Value>,
    /// Every other key: entity type -> raw values, in document order
    #[serde(flatten)]
    pub groups: Map<String, Value>,
}

/// One occurrence of an entity in the utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Prediction {
    /// Score of the top intent, if the service listed it
    pub fn top_score(&self) -> Option<f64> {
        self.intents.get(&self.top_intent).map(|s| s.score)
    }
}

impl EntitySection {
    /// Entity group names in document order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Raw values of an entity group
    pub fn values(&self, group: &str) -> Option<&Vec<Value>> {
        self.groups.get(group).and_then(Value::as_array)
    }

    /// Instance metadata of an entity group
    ///
    /// Entries that do not fit the metadata shape are skipped.
    pub fn instances(&self, group: &str) -> Vec<InstanceMetadata> {
        self.indexed_instances(group)
            .into_iter()
            .map(|(_, meta)| meta)
            .collect()
    }

    /// Instance metadata paired with its position in the raw `$instance` list
    ///
    /// The position lines up with the group's raw values even when unreadable
    /// entries were skipped.
    pub fn indexed_instances(&self, group: &str) -> Vec<(usize, InstanceMetadata)> {
        let Some(Value::Array(entries)) = self.instance.get(group) else {
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry.clone()) {
                Ok(meta) => Some((i, meta)),
                Err(e) => {
                    tracing::warn!(group, error = %e, "skipping unreadable instance metadata");
                    None
                }
            })
            .collect()
    }

    /// Every instance across all groups, in group order
    pub fn all_instances(&self) -> Vec<InstanceMetadata> {
        self.group_names()
            .flat_map(|group| self.instances(group))
            .collect()
    }
}
