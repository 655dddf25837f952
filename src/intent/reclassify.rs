//! Remap coarse top intents using the resolved entities
//!
//! The recognizer has two navigation intents and two broad status intents
//! (`META`, `BOOL_META`). They are split here into the concrete intents the
//! executor handles.

use crate::intent::types::{CanonicalEntity, ResolvedIntent};
use crate::resolve::context::ResolutionFlags;
use crate::resolve::engine::Resolution;
use crate::resolve::hierarchy::HIERARCHY_PREFIX;

pub const NAVIGATION: &str = "Navigation";

/// Entities that tag a question's status
pub const TAG_ENTITIES: [&str; 5] = [
    "locator_marked",
    "locator_skipped",
    "status_attempted",
    "status_remaining",
    "total",
];

const META_TIME: &str = "meta_time";
const META_MARKS: &str = "meta_marks";
const NUMBER: &str = "builtin.number";

pub struct IntentReclassifier;

impl IntentReclassifier {
    pub fn apply(resolution: Resolution) -> ResolvedIntent {
        let Resolution { mut intent, flags } = resolution;
        Self::reclassify(&mut intent, &flags);
        intent
    }

    pub fn reclassify(intent: &mut ResolvedIntent, flags: &ResolutionFlags) {
        let before = intent.top_intent.clone();

        if ((intent.top_intent == "Repeat" || intent.top_intent == "speed") && flags.nav)
            || intent.top_intent.contains(NAVIGATION)
        {
            intent.top_intent = NAVIGATION.to_string();
        }

        let remapped = match intent.top_intent.as_str() {
            "META" => meta_intent(&intent.entities),
            "BOOL_META" => Some(bool_meta_intent(&intent.entities)),
            _ => None,
        };
        if let Some(top) = remapped {
            intent.top_intent = top.to_string();
        }

        if before != intent.top_intent {
            tracing::debug!(from = %before, to = %intent.top_intent, "reclassified intent");
        }
    }
}

fn meta_intent(entities: &[CanonicalEntity]) -> Option<&'static str> {
    entities.iter().find_map(|e| match e.entity.as_str() {
        META_TIME => Some("time_check"),
        META_MARKS => Some("marks_check"),
        _ => None,
    })
}

fn bool_meta_intent(entities: &[CanonicalEntity]) -> &'static str {
    let mut tag_present = false;
    let mut quantity_present = false;
    let mut all_bound = true;

    for entity in entities {
        match entity.entity.as_str() {
            META_MARKS => return "boolean_marks_check",
            META_TIME => return "boolean_time_check",
            NUMBER => quantity_present = true,
            label if TAG_ENTITIES.contains(&label) => tag_present = true,
            label if label.starts_with(HIERARCHY_PREFIX) => {
                all_bound &= entity.child.is_some();
            }
            _ => {}
        }
    }

    if all_bound && !tag_present && !quantity_present {
        "boolean_position_check"
    } else if quantity_present {
        "boolean_quantity_check"
    } else {
        "boolean_status_check"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::types::Offset;

    fn intent(top: &str, entities: Vec<CanonicalEntity>) -> ResolvedIntent {
        ResolvedIntent {
            text: String::new(),
            top_intent: top.into(),
            top_score: None,
            entities,
        }
    }

    fn reclassify(top: &str, entities: Vec<CanonicalEntity>, flags: ResolutionFlags) -> String {
        let mut i = intent(top, entities);
        IntentReclassifier::reclassify(&mut i, &flags);
        i.top_intent
    }

    fn bound(label: &str) -> CanonicalEntity {
        CanonicalEntity::new(label, "x")
            .with_child(CanonicalEntity::ordinal_offset("x", Offset::current(1)))
    }

    #[test]
    fn test_navigation_unified() {
        let none = ResolutionFlags::default();
        assert_eq!(reclassify("Navigation2", vec![], none), "Navigation");
        assert_eq!(reclassify("Repeat", vec![], none), "Repeat");

        let nav = ResolutionFlags {
            nav: true,
            ..ResolutionFlags::default()
        };
        assert_eq!(reclassify("Repeat", vec![], nav), "Navigation");
        assert_eq!(reclassify("speed", vec![], nav), "Navigation");
        assert_eq!(reclassify("edit", vec![], nav), "edit");
    }

    #[test]
    fn test_meta_split() {
        let f = ResolutionFlags::default();
        let time = CanonicalEntity::new("meta_time", "time");
        let marks = CanonicalEntity::new("meta_marks", "marks");
        assert_eq!(reclassify("META", vec![time.clone(), marks.clone()], f), "time_check");
        assert_eq!(reclassify("META", vec![marks, time], f), "marks_check");
        assert_eq!(reclassify("META", vec![], f), "META");
    }

    #[test]
    fn test_bool_meta_terminal_checks() {
        let f = ResolutionFlags::default();
        let marks = CanonicalEntity::new("meta_marks", "marks");
        let tag = CanonicalEntity::new("locator_marked", "marked");
        assert_eq!(reclassify("BOOL_META", vec![tag, marks], f), "boolean_marks_check");
        assert_eq!(
            reclassify("BOOL_META", vec![CanonicalEntity::new("meta_time", "t")], f),
            "boolean_time_check"
        );
    }

    #[test]
    fn test_bool_meta_position_quantity_status() {
        let f = ResolutionFlags::default();
        assert_eq!(
            reclassify("BOOL_META", vec![bound("typeofnav_question")], f),
            "boolean_position_check"
        );
        assert_eq!(
            reclassify(
                "BOOL_META",
                vec![CanonicalEntity::new("typeofnav_question", "question")],
                f
            ),
            "boolean_status_check"
        );
        assert_eq!(
            reclassify(
                "BOOL_META",
                vec![CanonicalEntity::new("builtin.number", "3"), bound("typeofnav_page")],
                f
            ),
            "boolean_quantity_check"
        );
        assert_eq!(
            reclassify("BOOL_META", vec![CanonicalEntity::new("total", "total")], f),
            "boolean_status_check"
        );
    }
}
