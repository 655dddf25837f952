//! Resolved and normalized intent data model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document position an offset is counted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePoint {
    #[default]
    Start,
    Current,
    End,
}

impl ReferencePoint {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "current" => Some(Self::Current),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

/// "N units from the reference point"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub offset: i64,
    #[serde(rename = "relativeTo")]
    pub relative_to: ReferencePoint,
}

impl Offset {
    pub fn current(offset: i64) -> Self {
        Self {
            offset,
            relative_to: ReferencePoint::Current,
        }
    }

    pub fn to_value(self) -> Value {
        serde_json::json!({
            "offset": self.offset,
            "relativeTo": self.relative_to,
        })
    }
}

/// One semantic slot of a resolved intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub entity: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Qualifier bound to a hierarchy entity; always a single element once valid
    #[serde(rename = "CHILD", default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Vec<CanonicalEntity>>,
}

impl CanonicalEntity {
    pub fn new(entity: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            score: None,
            child: None,
        }
    }

    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.score = score;
        self
    }

    /// `<base>_ordinal` entity carrying an offset descriptor
    pub fn ordinal_offset(base: &str, offset: Offset) -> Self {
        Self::new(format!("{}_ordinal", base), offset.to_value())
    }

    pub fn with_child(mut self, child: CanonicalEntity) -> Self {
        self.child = Some(vec![child]);
        self
    }

    /// Type name before the first `_` (`question_ordinal` -> `question`)
    pub fn base_name(&self) -> &str {
        self.entity.split('_').next().unwrap_or(&self.entity)
    }
}

/// Output of entity resolution, before flattening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIntent {
    /// Query text with the trailing newline removed
    #[serde(default)]
    pub text: String,
    pub top_intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_score: Option<f64>,
    #[serde(rename = "Entities")]
    pub entities: Vec<CanonicalEntity>,
}

/// Free-text qualifier of a hierarchy entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionDescriptor {
    pub key: String,
    pub value: String,
}

impl DescriptionDescriptor {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            key: "description".into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    Description(DescriptionDescriptor),
    Raw(Value),
}

/// Entity in the final schema: prefix stripped, qualifier inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntity {
    pub entity: String,
    pub value: FlatValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl FlatEntity {
    pub fn description(&self) -> Option<&str> {
        match &self.value {
            FlatValue::Description(d) => Some(&d.value),
            FlatValue::Raw(_) => None,
        }
    }
}

/// Canonical intent handed to the command executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIntent {
    pub reference: ReferencePoint,
    pub top_intent: String,
    pub entities: Vec<FlatEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_point_serialization() {
        assert_eq!(serde_json::to_string(&ReferencePoint::Current).unwrap(), "\"current\"");
        assert_eq!(ReferencePoint::parse("end"), Some(ReferencePoint::End));
        assert_eq!(ReferencePoint::parse("middle"), None);
    }

    #[test]
    fn test_canonical_entity_wire_shape() {
        let entity = CanonicalEntity::new("typeofnav_page", "page")
            .with_child(CanonicalEntity::ordinal_offset("page", Offset::current(1)));
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            value,
            json!({
                "entity": "typeofnav_page",
                "value": "page",
                "CHILD": [{ "entity": "page_ordinal", "value": { "offset": 1, "relativeTo": "current" } }]
            })
        );
    }

    #[test]
    fn test_base_name() {
        assert_eq!(CanonicalEntity::new("question_description", "x").base_name(), "question");
        assert_eq!(CanonicalEntity::new("description", "x").base_name(), "description");
    }

    #[test]
    fn test_flat_entity_omits_missing_offset() {
        let flat = FlatEntity {
            entity: "question".into(),
            value: FlatValue::Description(DescriptionDescriptor::new("about gravity")),
            offset: None,
        };
        assert_eq!(
            serde_json::to_value(&flat).unwrap(),
            json!({ "entity": "question", "value": { "key": "description", "value": "about gravity" } })
        );
    }
}
