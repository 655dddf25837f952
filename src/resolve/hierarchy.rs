//! Navigational hierarchy and position-ordered hierarchy mentions
//!
//! Instances carry a character offset but no parent links. The index built
//! here orders hierarchy markers by position so generic descriptions
//! (`description1`, `description2`, `description_nav`) can be bound to the
//! marker they qualify.

use crate::prediction::document::{EntitySection, InstanceMetadata};

/// Substring marking a hierarchy entity type
pub const HIERARCHY_MARKER: &str = "typeofnav";
/// Prefix of hierarchy entity type labels
pub const HIERARCHY_PREFIX: &str = "typeofnav_";
/// Generic description bound to the preceding hierarchy marker
pub const NAV_DESCRIPTION: &str = "description_nav";

/// Navigational granularity, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HierarchyLevel {
    Chapter,
    Page,
    Section,
    Passage,
    Question,
    Subpart,
    Answer,
    Rough,
    Step,
    Paragraph,
    Sentence,
}

/// Fixed resolution and output order of hierarchy entities
pub const HIERARCHY_ORDER: [HierarchyLevel; 11] = [
    HierarchyLevel::Chapter,
    HierarchyLevel::Page,
    HierarchyLevel::Section,
    HierarchyLevel::Passage,
    HierarchyLevel::Question,
    HierarchyLevel::Subpart,
    HierarchyLevel::Answer,
    HierarchyLevel::Rough,
    HierarchyLevel::Step,
    HierarchyLevel::Paragraph,
    HierarchyLevel::Sentence,
];

impl HierarchyLevel {
    /// Name without the hierarchy prefix, also used as qualifier base
    pub fn base(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Page => "page",
            Self::Section => "section",
            Self::Passage => "passage",
            Self::Question => "question",
            Self::Subpart => "subpart",
            Self::Answer => "answer",
            Self::Rough => "rough",
            Self::Step => "step",
            Self::Paragraph => "paragraph",
            Self::Sentence => "sentence",
        }
    }

    /// Full entity type label (`typeofnav_page`)
    pub fn label(self) -> String {
        format!("{}{}", HIERARCHY_PREFIX, self.base())
    }

    pub fn from_base(base: &str) -> Option<Self> {
        HIERARCHY_ORDER.iter().copied().find(|l| l.base() == base)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        label.strip_prefix(HIERARCHY_PREFIX).and_then(Self::from_base)
    }
}

/// Base name of a hierarchy marker label: the segment after the first `_`
pub fn marker_base(label: &str) -> &str {
    label.split('_').nth(1).unwrap_or(label)
}

/// A hierarchy marker occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyMention {
    pub label: String,
    pub level: Option<HierarchyLevel>,
    pub start_index: usize,
}

impl HierarchyMention {
    pub fn base(&self) -> &str {
        marker_base(&self.label)
    }
}

/// Entry of the combined marker/`description_nav` ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSlot {
    /// Index into `HierarchyIndex::mentions`
    Anchor(usize),
    NavDescription { start_index: usize },
}

/// Position-sorted hierarchy markers for one utterance
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    /// Hierarchy markers ordered by position
    pub mentions: Vec<HierarchyMention>,
    /// Hierarchy markers and `description_nav` qualifiers ordered by position
    pub nav_order: Vec<NavSlot>,
}

pub struct HierarchyResolver;

impl HierarchyResolver {
    /// Scan every instance of the document and build the marker index
    pub fn scan(entities: &EntitySection) -> HierarchyIndex {
        Self::from_instances(&entities.all_instances())
    }

    pub fn from_instances(instances: &[InstanceMetadata]) -> HierarchyIndex {
        let mut markers: Vec<&InstanceMetadata> = instances
            .iter()
            .filter(|i| i.kind.contains(HIERARCHY_MARKER))
            .collect();
        markers.sort_by(|a, b| (a.start_index, &a.kind).cmp(&(b.start_index, &b.kind)));

        let mentions: Vec<HierarchyMention> = markers
            .iter()
            .map(|i| HierarchyMention {
                label: i.kind.clone(),
                level: HierarchyLevel::from_label(&i.kind),
                start_index: i.start_index,
            })
            .collect();

        let mut nav_order: Vec<(usize, NavSlot)> = mentions
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.start_index, NavSlot::Anchor(idx)))
            .collect();
        nav_order.extend(
            instances
                .iter()
                .filter(|i| i.kind.contains(NAV_DESCRIPTION) && !i.kind.contains(HIERARCHY_MARKER))
                .map(|i| {
                    (
                        i.start_index,
                        NavSlot::NavDescription {
                            start_index: i.start_index,
                        },
                    )
                }),
        );
        // Stable: a marker and a description at the same offset keep marker first
        nav_order.sort_by_key(|(start, _)| *start);

        HierarchyIndex {
            mentions,
            nav_order: nav_order.into_iter().map(|(_, slot)| slot).collect(),
        }
    }
}

impl HierarchyIndex {
    /// Marker nearest before the `description_nav` at `start_index`
    pub fn preceding_anchor(&self, start_index: usize) -> Option<usize> {
        let pos = self.nav_order.iter().position(|slot| {
            matches!(slot, NavSlot::NavDescription { start_index: s } if *s == start_index)
        })?;

        self.nav_order[..pos].iter().rev().find_map(|slot| match slot {
            NavSlot::Anchor(idx) => Some(*idx),
            NavSlot::NavDescription { .. } => None,
        })
    }
}
