use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("{0}")]
    MalformedEntities(EntitiesFault),

    #[error("{0}")]
    InvalidChild(ChildFault),

    #[error("Prediction error: {0}")]
    PredictionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Why an intent's entity collection was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitiesFault {
    #[error("could not understand request")]
    Missing,

    #[error("could not understand request")]
    NotList,

    #[error("cannot handle request")]
    Empty,
}

/// Why a CHILD container was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildFault {
    #[error("could not process request")]
    NotList,

    #[error("child cannot be empty")]
    Empty,

    #[error("child cannot have more than one item (found {0})")]
    TooMany(usize),
}

pub type Result<T> = std::result::Result<T, IntentError>;
