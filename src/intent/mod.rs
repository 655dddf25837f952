//! Resolved intent post-processing
//!
//! ResolvedIntent -> IntentReclassifier -> IntentFlattener -> NormalizedIntent

pub mod flatten;
pub mod reclassify;
pub mod reference;
pub mod types;

pub use flatten::IntentFlattener;
pub use reclassify::IntentReclassifier;
pub use reference::Reference;
pub use types::{
    CanonicalEntity, DescriptionDescriptor, FlatEntity, FlatValue, NormalizedIntent, Offset,
    ReferencePoint, ResolvedIntent,
};
