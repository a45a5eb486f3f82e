use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoveltyError {
    #[error("organism has no behavior data ({context})")]
    MissingBehaviorData { context: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid archive setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
