//! Composite entity groups
//!
//! A composite group value is itself an entity section: child entity types
//! mapped to resolved values, with their own `$instance` sibling. Plain groups
//! (strings, numbers, prebuilt resolutions) are not composite and are skipped
//! without complaint. A value that claims to be composite but is missing
//! pieces is reported as a [`CompositeFault`].

use crate::prediction::document::INSTANCE_KEY;
use serde_json::{Map, Value};
use thiserror::Error;

/// A child entity found inside a composite group
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeChild {
    pub label: String,
    /// Surface text of the child's first instance
    pub text: String,
    /// Resolved value for ordinal children, surface text otherwise
    pub value: Value,
    pub score: Option<f64>,
}

impl CompositeChild {
    pub fn is_ordinal(&self) -> bool {
        self.label.contains("ordinal")
    }

    /// Ordinal child spelled "last"
    pub fn is_last(&self) -> bool {
        self.is_ordinal() && self.text.trim() == "last"
    }

    pub fn base(&self) -> &str {
        self.label.split('_').next().unwrap_or(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompositeGroup {
    NotComposite,
    Children(Vec<CompositeChild>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositeFault {
    #[error("child `{0}` has no instance metadata")]
    MissingInstance(String),

    #[error("child `{0}` instance metadata is not readable")]
    UnreadableInstance(String),

    #[error("ordinal child `{0}` has no resolved value")]
    MissingValue(String),
}

/// Extract children from every composite value of a group
pub fn extract_children(values: &[Value]) -> Result<CompositeGroup, CompositeFault> {
    let mut children = Vec::new();
    let mut composite = false;

    for value in values {
        let Some(record) = value.as_object() else {
            continue;
        };
        let Some(instances) = record.get(INSTANCE_KEY).and_then(Value::as_object) else {
            continue;
        };
        composite = true;

        for (label, resolved) in record {
            if label == INSTANCE_KEY {
                continue;
            }
            children.push(read_child(label, resolved, instances)?);
        }
    }

    if composite {
        Ok(CompositeGroup::Children(children))
    } else {
        Ok(CompositeGroup::NotComposite)
    }
}

fn read_child(
    label: &str,
    resolved: &Value,
    instances: &Map<String, Value>,
) -> Result<CompositeChild, CompositeFault> {
    let first = instances
        .get(label)
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .ok_or_else(|| CompositeFault::MissingInstance(label.to_string()))?;

    let text = first
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| CompositeFault::UnreadableInstance(label.to_string()))?
        .to_string();
    let score = first.get("score").and_then(Value::as_f64);

    let mut child = CompositeChild {
        label: label.to_string(),
        value: Value::String(text.clone()),
        text,
        score,
    };

    if child.is_ordinal() {
        child.value = resolved
            .as_array()
            .and_then(|list| list.first())
            .cloned()
            .ok_or_else(|| CompositeFault::MissingValue(label.to_string()))?;
    }

    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_values_not_composite() {
        let values = vec![json!("page"), json!(3), json!({ "offset": 2, "relativeTo": "start" })];
        assert_eq!(extract_children(&values), Ok(CompositeGroup::NotComposite));
    }

    #[test]
    fn test_ordinal_child_uses_resolved_value() {
        let values = vec![json!({
            "question_ordinal": [{ "offset": 3, "relativeTo": "start" }],
            "$instance": {
                "question_ordinal": [{ "type": "question_ordinal", "text": "third", "startIndex": 4, "score": 0.9 }]
            }
        })];
        let CompositeGroup::Children(children) = extract_children(&values).unwrap() else {
            panic!("expected children");
        };
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].base(), "question");
        assert_eq!(children[0].value, json!({ "offset": 3, "relativeTo": "start" }));
        assert_eq!(children[0].score, Some(0.9));
        assert!(!children[0].is_last());
    }

    #[test]
    fn test_number_child_uses_text() {
        let values = vec![json!({
            "page_number": [5],
            "$instance": { "page_number": [{ "type": "page_number", "text": "5", "startIndex": 5 }] }
        })];
        let CompositeGroup::Children(children) = extract_children(&values).unwrap() else {
            panic!("expected children");
        };
        assert_eq!(children[0].value, json!("5"));
        assert_eq!(children[0].score, None);
    }

    #[test]
    fn test_last_detection() {
        let values = vec![json!({
            "question_ordinal": [{ "offset": 0, "relativeTo": "end" }],
            "$instance": { "question_ordinal": [{ "type": "question_ordinal", "text": "last ", "startIndex": 9 }] }
        })];
        let CompositeGroup::Children(children) = extract_children(&values).unwrap() else {
            panic!("expected children");
        };
        assert!(children[0].is_last());
    }

    #[test]
    fn test_missing_instance_is_fault() {
        let values = vec![json!({
            "question_ordinal": [{ "offset": 1, "relativeTo": "start" }],
            "$instance": {}
        })];
        assert_eq!(
            extract_children(&values),
            Err(CompositeFault::MissingInstance("question_ordinal".into()))
        );
    }

    #[test]
    fn test_ordinal_without_value_is_fault() {
        let values = vec![json!({
            "question_ordinal": [],
            "$instance": { "question_ordinal": [{ "type": "question_ordinal", "text": "first", "startIndex": 0 }] }
        })];
        assert_eq!(
            extract_children(&values),
            Err(CompositeFault::MissingValue("question_ordinal".into()))
        );
    }
}
