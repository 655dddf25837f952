//! Flatten a resolved intent into the executor schema

use crate::core::error::{ChildFault, EntitiesFault, IntentError, Result};
use crate::intent::types::{
    CanonicalEntity, DescriptionDescriptor, FlatEntity, FlatValue, NormalizedIntent,
    ReferencePoint, ResolvedIntent,
};
use crate::resolve::hierarchy::HIERARCHY_PREFIX;
use serde_json::Value;

/// Prefix of status tag entity types
pub const TAG_PREFIX: &str = "locator_";

/// Offset used when a qualifier gives none
pub const DEFAULT_OFFSET: i64 = 1;

pub struct IntentFlattener;

impl IntentFlattener {
    pub fn flatten(intent: &ResolvedIntent) -> Result<NormalizedIntent> {
        let Some(head) = intent.entities.first() else {
            return Err(IntentError::MalformedEntities(EntitiesFault::Empty));
        };

        let reference = reference_of(head)?;
        let entities = intent
            .entities
            .iter()
            .map(flatten_entity)
            .collect::<Result<Vec<_>>>()?;

        Ok(NormalizedIntent {
            reference,
            top_intent: intent.top_intent.to_lowercase(),
            entities,
        })
    }

    /// Validate the shape of a serialized resolved intent, then flatten it
    pub fn flatten_value(value: &Value) -> Result<NormalizedIntent> {
        let entities = value
            .get("Entities")
            .ok_or(IntentError::MalformedEntities(EntitiesFault::Missing))?;
        let list = entities
            .as_array()
            .ok_or(IntentError::MalformedEntities(EntitiesFault::NotList))?;
        if list.is_empty() {
            return Err(IntentError::MalformedEntities(EntitiesFault::Empty));
        }
        if list
            .iter()
            .filter_map(|e| e.get("CHILD"))
            .any(|child| !child.is_array())
        {
            return Err(IntentError::InvalidChild(ChildFault::NotList));
        }

        let intent: ResolvedIntent = serde_json::from_value(value.clone())?;
        Self::flatten(&intent)
    }
}

/// The single element of an entity's CHILD container, if it has one
fn single_child(entity: &CanonicalEntity) -> Result<Option<&CanonicalEntity>> {
    match entity.child.as_deref() {
        None => Ok(None),
        Some([]) => Err(IntentError::InvalidChild(ChildFault::Empty)),
        Some([child]) => Ok(Some(child)),
        Some(many) => Err(IntentError::InvalidChild(ChildFault::TooMany(many.len()))),
    }
}

fn reference_of(head: &CanonicalEntity) -> Result<ReferencePoint> {
    let Some(child) = single_child(head)? else {
        return Ok(ReferencePoint::Start);
    };
    let Some(relative_to) = child.value.get("relativeTo") else {
        return Ok(ReferencePoint::Start);
    };

    match relative_to.as_str().and_then(ReferencePoint::parse) {
        Some(point) => Ok(point),
        None => {
            tracing::warn!(%relative_to, "unknown reference point, using start");
            Ok(ReferencePoint::Start)
        }
    }
}

fn flatten_entity(entity: &CanonicalEntity) -> Result<FlatEntity> {
    let name = entity
        .entity
        .strip_prefix(HIERARCHY_PREFIX)
        .or_else(|| entity.entity.strip_prefix(TAG_PREFIX))
        .unwrap_or(&entity.entity)
        .to_string();

    let Some(child) = single_child(entity)? else {
        return Ok(FlatEntity {
            entity: name,
            value: FlatValue::Raw(entity.value.clone()),
            offset: None,
        });
    };

    if child.entity.ends_with("description") {
        let text = match &child.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(FlatEntity {
            entity: name,
            value: FlatValue::Description(DescriptionDescriptor::new(text)),
            offset: None,
        });
    }

    Ok(FlatEntity {
        entity: name,
        value: FlatValue::Raw(entity.value.clone()),
        offset: Some(offset_of(&child.value)),
    })
}

/// Offset carried by a qualifier value: an offset descriptor or a bare integer
///
/// Text values, numeric or not, fall back to `DEFAULT_OFFSET`.
fn offset_of(value: &Value) -> i64 {
    value
        .get("offset")
        .and_then(Value::as_i64)
        .or_else(|| value.as_i64())
        .unwrap_or(DEFAULT_OFFSET)
}
