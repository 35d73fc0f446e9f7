use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgoraError {
    #[error("Missing webhook target: `target` must be set to a URL")]
    MissingTarget,
    #[error("Invalid webhook target: {0}")]
    InvalidTarget(#[from] url::ParseError),
    #[error("Webhook target has no host: {0}")]
    TargetWithoutHost(String),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Delivery failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("No async runtime available to deliver the request")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, AgoraError>;
