//! Shared builders for prediction documents

#![allow(dead_code)]

use nav_intent::prediction::PredictionDocument;
use serde_json::{json, Map, Value};

/// Builds a prediction document group by group, in insertion order
pub struct DocBuilder {
    top_intent: String,
    groups: Map<String, Value>,
    instances: Map<String, Value>,
}

impl DocBuilder {
    pub fn new(top_intent: &str) -> Self {
        Self {
            top_intent: top_intent.to_string(),
            groups: Map::new(),
            instances: Map::new(),
        }
    }

    fn push(&mut self, group: &str, value: Value, instance: Value) {
        self.groups
            .entry(group.to_string())
            .or_insert_with(|| json!([]))
            .as_array_mut()
            .unwrap()
            .push(value);
        self.instances
            .entry(group.to_string())
            .or_insert_with(|| json!([]))
            .as_array_mut()
            .unwrap()
            .push(instance);
    }

    /// Simple entity whose raw value is its text
    pub fn entity(mut self, label: &str, text: &str, start: usize) -> Self {
        self.push(
            label,
            json!(text),
            json!({ "type": label, "text": text, "startIndex": start, "score": 0.9 }),
        );
        self
    }

    /// Entity with a raw value that differs from its text
    pub fn resolved(
        mut self,
        group: &str,
        label: &str,
        text: &str,
        start: usize,
        value: Value,
    ) -> Self {
        self.push(
            group,
            value,
            json!({ "type": label, "text": text, "startIndex": start, "score": 0.9 }),
        );
        self
    }

    /// Hierarchy entity carrying one composite child
    pub fn composite(
        mut self,
        label: &str,
        text: &str,
        start: usize,
        child: &str,
        child_text: &str,
        child_value: Value,
    ) -> Self {
        let mut child_instances = Map::new();
        child_instances.insert(
            child.to_string(),
            json!([{ "type": child, "text": child_text, "startIndex": start, "score": 0.8 }]),
        );
        let mut record = Map::new();
        record.insert(child.to_string(), json!([child_value]));
        record.insert("$instance".to_string(), Value::Object(child_instances));
        let value = Value::Object(record);
        self.push(
            label,
            value,
            json!({ "type": label, "text": text, "startIndex": start, "score": 0.9 }),
        );
        self
    }

    /// Group value inserted verbatim, with a single instance
    pub fn raw_group(mut self, label: &str, text: &str, start: usize, value: Value) -> Self {
        self.push(
            label,
            value,
            json!({ "type": label, "text": text, "startIndex": start }),
        );
        self
    }

    pub fn build(self) -> PredictionDocument {
        let mut entities = self.groups;
        entities.insert("$instance".to_string(), Value::Object(self.instances));

        let mut intents = Map::new();
        intents.insert(self.top_intent.clone(), json!({ "score": 0.85 }));

        serde_json::from_value(json!({
            "query": "test",
            "prediction": {
                "topIntent": self.top_intent,
                "intents": intents,
                "entities": entities,
            }
        }))
        .unwrap()
    }
}
