//! Prediction service boundary: wire format and client seam

pub mod client;
pub mod document;

pub use client::{HttpPredictionClient, PredictionClient};
pub use document::{EntitySection, InstanceMetadata, Prediction, PredictionDocument};
