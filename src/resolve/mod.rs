//! Entity resolution: prediction document to resolved intent
//!
//! PredictionDocument -> HierarchyResolver -> EntityResolutionEngine -> Resolution

pub mod classify;
pub mod composite;
pub mod context;
pub mod engine;
pub mod hierarchy;

pub use classify::EntityClass;
pub use context::ResolutionFlags;
pub use engine::{EntityResolutionEngine, Resolution};
pub use hierarchy::{HierarchyLevel, HierarchyResolver, HIERARCHY_ORDER};
