use std::time::Duration;

pub type RiddleResult<T> = Result<T, RiddleError>;

#[derive(thiserror::Error, Debug)]
pub enum RiddleError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("encode timed out after {}ms", .0.as_millis())]
    EncodeTimeout(Duration),

    #[error("encoder returned no image data")]
    EncodeEmpty,

    #[error("a capture is already in flight")]
    CaptureInFlight,

    #[error("share overlay is closed")]
    OverlayClosed,

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RiddleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failure belongs to a single capture attempt and a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Encode(_) | Self::EncodeTimeout(_) | Self::EncodeEmpty | Self::CaptureInFlight
        )
    }
}
