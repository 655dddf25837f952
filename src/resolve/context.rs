//! Per-request resolution state
//!
//! One `ResolutionContext` is created for each prediction document and
//! dropped once the resolved intent is built.

use crate::intent::types::CanonicalEntity;
use crate::resolve::classify::{ActionKind, RelativeSignal};
use crate::resolve::hierarchy::{HierarchyIndex, HierarchyLevel};
use std::collections::HashSet;

/// Signals gathered during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionFlags {
    pub previous: bool,
    pub next: bool,
    /// A section entity was present
    pub section_seen: bool,
    /// A hierarchy marker or rough-work entity was present
    pub nav: bool,
    /// A marked tag was already emitted
    pub marked_seen: bool,
}

impl ResolutionFlags {
    pub fn raise(&mut self, signal: RelativeSignal) {
        match signal {
            RelativeSignal::Previous => self.previous = true,
            RelativeSignal::Next => self.next = true,
        }
    }
}

/// Qualifier waiting to be bound to a hierarchy anchor
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQualifier {
    /// Entity the binding is matched on
    pub source: CanonicalEntity,
    /// Descriptor bound in place of `source` (synthesized offset for "last")
    pub bound: Option<CanonicalEntity>,
}

impl PendingQualifier {
    pub fn single(entity: CanonicalEntity) -> Self {
        Self {
            source: entity,
            bound: None,
        }
    }

    pub fn paired(source: CanonicalEntity, bound: CanonicalEntity) -> Self {
        Self {
            source,
            bound: Some(bound),
        }
    }

    pub fn base_name(&self) -> &str {
        self.source.base_name()
    }

    /// The descriptor that becomes the anchor's CHILD
    pub fn into_child(self) -> CanonicalEntity {
        self.bound.unwrap_or(self.source)
    }
}

/// Hierarchy entity held back for canonical-order assembly
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub level: HierarchyLevel,
    pub entity: CanonicalEntity,
}

#[derive(Debug)]
pub struct ResolutionContext {
    pub top_intent: String,
    pub action: Option<ActionKind>,
    pub flags: ResolutionFlags,
    pub index: HierarchyIndex,
    /// Mentions (indices into `index.mentions`) already bound to a qualifier
    pub consumed: HashSet<usize>,
    /// Non-hierarchy entities in scan order
    pub emitted: Vec<CanonicalEntity>,
    pub anchors: Vec<Anchor>,
    pub pending: Vec<PendingQualifier>,
    pub held_total: Option<CanonicalEntity>,
}

impl ResolutionContext {
    pub fn new(top_intent: impl Into<String>, index: HierarchyIndex) -> Self {
        Self {
            top_intent: top_intent.into(),
            action: None,
            flags: ResolutionFlags::default(),
            index,
            consumed: HashSet::new(),
            emitted: Vec::new(),
            anchors: Vec::new(),
            pending: Vec::new(),
            held_total: None,
        }
    }

    /// Consume the mention at `idx`, returning its base name
    pub fn consume_mention(&mut self, idx: usize) -> Option<String> {
        let base = self.index.mentions.get(idx)?.base().to_string();
        self.consumed.insert(idx);
        Some(base)
    }

    /// Consume the first unbound mention with the given base name
    pub fn consume_base(&mut self, base: &str) -> bool {
        let found = self
            .index
            .mentions
            .iter()
            .enumerate()
            .find(|(idx, m)| !self.consumed.contains(idx) && m.base() == base)
            .map(|(idx, _)| idx);

        match found {
            Some(idx) => {
                self.consumed.insert(idx);
                true
            }
            None => false,
        }
    }

    /// First hierarchy level, in canonical order, with an unbound mention
    pub fn first_unbound_level(&self) -> Option<HierarchyLevel> {
        self.index
            .mentions
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.consumed.contains(idx))
            .filter_map(|(_, m)| m.level)
            .min()
    }
}
