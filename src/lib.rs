//! Nav Intent - entity resolution and intent normalization for navigation commands

pub mod core;
pub mod intent;
pub mod pipeline;
pub mod prediction;
pub mod query;
pub mod resolve;

pub use pipeline::{IntentPipeline, PipelineOutcome};
