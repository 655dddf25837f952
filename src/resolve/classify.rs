//! Classify raw entity type labels
//!
//! Every instance label is mapped to exactly one [`EntityClass`] before any
//! resolution rule runs. Rules then match on the class instead of re-testing
//! substrings.

use crate::resolve::hierarchy::{HierarchyLevel, HIERARCHY_MARKER};

/// Top-level action an entity forces on the intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Edit,
    Copy,
}

impl ActionKind {
    pub fn intent(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Copy => "copy",
        }
    }
}

/// Which hierarchy marker a description qualifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierSlot {
    /// Typed description (`question_description`), bound by its own base name
    Literal,
    /// First hierarchy marker of the utterance
    First,
    /// Second hierarchy marker of the utterance
    Second,
    /// Hierarchy marker immediately before it
    Nav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeSignal {
    Previous,
    Next,
}

impl RelativeSignal {
    pub fn offset(self) -> i64 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Marked,
    Skipped,
    Attempted,
    Remaining,
}

/// Closed classification of an entity type label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    /// Exact-match list entities and prebuilt dates; never emitted
    Excluded,
    /// Edit or copy action; `describes` when the label also names a description
    Action { kind: ActionKind, describes: bool },
    /// Note or reminder text; emitted as-is
    Annotation,
    Hierarchy(HierarchyLevel),
    /// `typeofnav_*` label outside the fixed hierarchy
    NavMarker,
    Qualifier(QualifierSlot),
    Signal(RelativeSignal),
    Total,
    Tag(TagKind),
    /// Prebuilt ordinal whose resolved value replaces its text
    Ordinal,
    Plain,
}

impl EntityClass {
    pub fn classify(label: &str) -> Self {
        if label.contains("list") || label.contains("datetime") {
            return Self::Excluded;
        }

        let describes = label.contains("description");

        if label.contains("copy") {
            return Self::Action {
                kind: ActionKind::Copy,
                describes,
            };
        }
        if label.contains("delete") || label.contains("write") || label.contains("insert") {
            return Self::Action {
                kind: ActionKind::Edit,
                describes,
            };
        }
        if label.contains("total") {
            return Self::Total;
        }
        if describes {
            if label.contains("note") || label.contains("reminder") {
                return Self::Annotation;
            }
            return Self::Qualifier(if label.contains("description1") {
                QualifierSlot::First
            } else if label.contains("description2") {
                QualifierSlot::Second
            } else if label.contains("description_nav") {
                QualifierSlot::Nav
            } else {
                QualifierSlot::Literal
            });
        }
        if label.contains("marked") {
            return Self::Tag(TagKind::Marked);
        }
        if label.contains("previous") {
            return Self::Signal(RelativeSignal::Previous);
        }
        if label.contains("next") {
            return Self::Signal(RelativeSignal::Next);
        }
        if label.contains(HIERARCHY_MARKER) {
            return match HierarchyLevel::from_label(label) {
                Some(level) => Self::Hierarchy(level),
                None => Self::NavMarker,
            };
        }
        if label.contains("ordinalV2") {
            return Self::Ordinal;
        }
        match label {
            "locator_skipped" => Self::Tag(TagKind::Skipped),
            "status_attempted" => Self::Tag(TagKind::Attempted),
            "status_remaining" => Self::Tag(TagKind::Remaining),
            _ => Self::Plain,
        }
    }

    /// Whether this class counts as navigational
    pub fn is_navigational(self, label: &str) -> bool {
        match self {
            Self::Hierarchy(_) | Self::NavMarker => true,
            Self::Plain => label.contains("rough"),
            _ => false,
        }
    }
}
