//! Entity resolution engine
//!
//! Converts a flat prediction document into a resolved intent:
//! PredictionDocument -> classify instances -> bind qualifiers -> ResolvedIntent
//!
//! Non-hierarchy entities keep scan order. Hierarchy entities are held back
//! and appended afterwards in `HIERARCHY_ORDER`, each carrying the qualifier
//! that matched its base name. A held `total` goes last, and only when no
//! section was mentioned.

use crate::core::config::EngineConfig;
use crate::intent::types::{CanonicalEntity, Offset, ResolvedIntent};
use crate::prediction::document::{EntitySection, InstanceMetadata, PredictionDocument};
use crate::resolve::classify::{ActionKind, EntityClass, QualifierSlot, RelativeSignal, TagKind};
use crate::resolve::composite::{extract_children, CompositeChild, CompositeGroup};
use crate::resolve::context::{Anchor, PendingQualifier, ResolutionContext, ResolutionFlags};
use crate::resolve::hierarchy::{
    HierarchyLevel, HierarchyResolver, HIERARCHY_MARKER, HIERARCHY_ORDER,
};

/// Phrases the recognizer tends to swallow at the end of a description
pub const TRAILING_PHRASES: [&str; 12] = [
    " go to the",
    " in the",
    " of the",
    " in",
    " and",
    " and then",
    " on the",
    " on",
    " then",
    " to",
    " from",
    " instead",
];

/// Edit-target descriptions that only point back at a hierarchy entity
pub const DEMONSTRATIVES: [&str; 7] = [
    "that",
    "this",
    "the",
    "this specific",
    "that specific",
    "this entire",
    "that entire",
];

/// Resolved intent plus the signals the reclassifier needs
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub intent: ResolvedIntent,
    pub flags: ResolutionFlags,
}

/// Strip every trailing phrase, checked in `TRAILING_PHRASES` order
pub fn trim_trailing_phrases(text: &str) -> &str {
    TRAILING_PHRASES
        .iter()
        .fold(text, |acc, phrase| acc.strip_suffix(phrase).unwrap_or(acc))
}

#[derive(Debug, Clone, Default)]
pub struct EntityResolutionEngine {
    include_scores: bool,
}

impl EntityResolutionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            include_scores: config.debug,
        }
    }

    /// Resolve one prediction document
    ///
    /// `text` is the newline-stripped query recorded on the result.
    pub fn resolve(&self, doc: &PredictionDocument, text: &str) -> Resolution {
        let section = &doc.prediction.entities;
        let mut ctx = ResolutionContext::new(
            doc.prediction.top_intent.clone(),
            HierarchyResolver::scan(section),
        );

        for group in section.group_names() {
            let instances = section.indexed_instances(group);
            if instances.is_empty() {
                tracing::debug!(group, "entity group has no instance metadata");
            }
            for (i, instance) in &instances {
                self.resolve_instance(&mut ctx, section, group, *i, instance);
            }
            if !group.contains('.') {
                self.extract_composite(&mut ctx, section, group);
            }
        }

        self.apply_relative_fallback(&mut ctx);

        if let Some(kind) = ctx.action {
            ctx.top_intent = kind.intent().to_string();
        }
        let flags = ctx.flags;
        let top_intent = ctx.top_intent.clone();
        let entities = Self::assemble(ctx);

        Resolution {
            intent: ResolvedIntent {
                text: text.to_string(),
                top_intent,
                top_score: self.score(doc.prediction.top_score()),
                entities,
            },
            flags,
        }
    }

    fn score(&self, score: Option<f64>) -> Option<f64> {
        if self.include_scores {
            score
        } else {
            None
        }
    }

    fn resolve_instance(
        &self,
        ctx: &mut ResolutionContext,
        section: &EntitySection,
        group: &str,
        i: usize,
        instance: &InstanceMetadata,
    ) {
        let label = instance.kind.as_str();
        let class = EntityClass::classify(label);
        let score = self.score(instance.score);
        let entity =
            |value: serde_json::Value| CanonicalEntity::new(label, value).with_score(score);

        match class {
            EntityClass::Excluded => {
                tracing::debug!(label, "dropping excluded entity");
            }
            EntityClass::Action { kind, describes } => {
                ctx.action = Some(kind);
                let mut value = instance.text.as_str();
                if describes {
                    if kind == ActionKind::Edit && DEMONSTRATIVES.contains(&value.trim()) {
                        value = HIERARCHY_MARKER;
                    }
                    value = trim_trailing_phrases(value);
                }
                ctx.emitted.push(entity(value.into()));
            }
            EntityClass::Annotation => {
                ctx.emitted.push(entity(trim_trailing_phrases(&instance.text).into()));
            }
            EntityClass::Total => {
                ctx.held_total = Some(entity(instance.text.as_str().into()));
            }
            EntityClass::Tag(TagKind::Marked) if ctx.flags.marked_seen => {
                tracing::debug!(label, "dropping repeated marked tag");
            }
            EntityClass::Tag(kind) => {
                if kind == TagKind::Marked {
                    ctx.flags.marked_seen = true;
                }
                ctx.emitted.push(entity(instance.text.as_str().into()));
            }
            EntityClass::Qualifier(slot) => {
                self.queue_description(ctx, slot, instance);
            }
            EntityClass::Signal(signal) => {
                ctx.flags.raise(signal);
            }
            EntityClass::Hierarchy(level) => {
                ctx.flags.nav = true;
                if level == HierarchyLevel::Section {
                    ctx.flags.section_seen = true;
                }
                ctx.anchors.push(Anchor {
                    level,
                    entity: entity(instance.text.as_str().into()),
                });
            }
            EntityClass::NavMarker => {
                ctx.flags.nav = true;
                ctx.emitted.push(entity(instance.text.as_str().into()));
            }
            EntityClass::Ordinal => {
                let resolved = section
                    .values(group)
                    .and_then(|values| values.get(i).or_else(|| values.first()))
                    .cloned()
                    .unwrap_or_else(|| instance.text.as_str().into());
                ctx.emitted.push(entity(resolved));
            }
            EntityClass::Plain => {
                if class.is_navigational(label) {
                    ctx.flags.nav = true;
                }
                ctx.emitted.push(entity(instance.text.as_str().into()));
            }
        }
    }

    /// Bind a description to its hierarchy marker and queue it
    fn queue_description(
        &self,
        ctx: &mut ResolutionContext,
        slot: QualifierSlot,
        instance: &InstanceMetadata,
    ) {
        let label = match slot {
            QualifierSlot::Literal => Some(instance.kind.clone()),
            QualifierSlot::First => ctx.consume_mention(0).map(description_label),
            QualifierSlot::Second => ctx.consume_mention(1).map(description_label),
            QualifierSlot::Nav => ctx
                .index
                .preceding_anchor(instance.start_index)
                .and_then(|idx| ctx.consume_mention(idx))
                .map(description_label),
        };

        let Some(label) = label else {
            tracing::warn!(
                label = %instance.kind,
                text = %instance.text,
                "no hierarchy entity to attach description to"
            );
            return;
        };

        let qualifier = CanonicalEntity::new(label, trim_trailing_phrases(&instance.text))
            .with_score(self.score(instance.score));
        if qualifier.base_name() == HierarchyLevel::Section.base() {
            ctx.flags.section_seen = true;
        }
        ctx.pending.push(PendingQualifier::single(qualifier));
    }

    fn extract_composite(&self, ctx: &mut ResolutionContext, section: &EntitySection, group: &str) {
        let Some(values) = section.values(group) else {
            return;
        };

        match extract_children(values) {
            Ok(CompositeGroup::NotComposite) => {}
            Ok(CompositeGroup::Children(children)) => {
                for child in children {
                    self.queue_child(ctx, child);
                }
            }
            Err(fault) => {
                tracing::warn!(group, error = %fault, "skipping malformed composite group");
            }
        }
    }

    fn queue_child(&self, ctx: &mut ResolutionContext, child: CompositeChild) {
        let base = child.base().to_string();
        if !ctx.consume_base(&base) {
            tracing::debug!(
                child = %child.label,
                "composite child has no unbound hierarchy marker"
            );
        }

        let last = child.is_last();
        let entity =
            CanonicalEntity::new(child.label, child.value).with_score(self.score(child.score));

        let pending = if last {
            let offset = CanonicalEntity::ordinal_offset(&base, Offset::current(-1))
                .with_score(self.score(Some(1.0)));
            PendingQualifier::paired(entity, offset)
        } else {
            PendingQualifier::single(entity)
        };
        ctx.pending.push(pending);
    }

    /// Turn previous/next signals into an offset for the first unbound anchor
    fn apply_relative_fallback(&self, ctx: &mut ResolutionContext) {
        for (raised, signal) in [
            (ctx.flags.previous, RelativeSignal::Previous),
            (ctx.flags.next, RelativeSignal::Next),
        ] {
            if !raised {
                continue;
            }
            let Some(level) = ctx.first_unbound_level() else {
                tracing::debug!(?signal, "relative signal without an unbound hierarchy entity");
                continue;
            };
            ctx.pending.push(PendingQualifier::single(CanonicalEntity::ordinal_offset(
                level.base(),
                Offset::current(signal.offset()),
            )));
        }
    }

    fn assemble(ctx: ResolutionContext) -> Vec<CanonicalEntity> {
        let ResolutionContext {
            flags,
            emitted,
            anchors,
            pending,
            held_total,
            ..
        } = ctx;

        let mut entities = emitted;
        let mut pending: Vec<Option<PendingQualifier>> = pending.into_iter().map(Some).collect();

        for level in HIERARCHY_ORDER {
            let mut first = true;
            for anchor in anchors.iter().filter(|a| a.level == level) {
                let mut entity = anchor.entity.clone();
                if first {
                    first = false;
                    let slot = pending
                        .iter_mut()
                        .find(|p| matches!(p, Some(q) if q.base_name() == level.base()));
                    if let Some(qualifier) = slot.and_then(Option::take) {
                        entity = entity.with_child(qualifier.into_child());
                    }
                }
                entities.push(entity);
            }
        }

        let unbound = pending.iter().flatten().count();
        if unbound > 0 {
            tracing::debug!(unbound, "qualifiers left without a hierarchy entity");
        }

        match held_total {
            Some(total) if !flags.section_seen => entities.push(total),
            Some(_) => tracing::debug!("dropping total in favour of explicit section"),
            None => {}
        }

        entities
    }
}

fn description_label(base: String) -> String {
    format!("{}_description", base)
}
