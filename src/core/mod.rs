pub mod config;
pub mod error;

pub use config::{EngineConfig, PredictionSettings};
pub use error::{ChildFault, EntitiesFault, IntentError, Result};
