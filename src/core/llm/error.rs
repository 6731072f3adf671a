use thiserror::Error;

/// Failures talking to the hosted model.
///
/// These travel inside `anyhow::Error`; callers that need to tell a rate limit
/// apart from other failures use [`is_rate_limited`].
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("the model is rate limited: {message}")]
    RateLimited { message: String },

    #[error("the model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("the request was blocked: {reason}")]
    Blocked { reason: String },

    #[error("could not reach the model API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from the model API: {0}")]
    MalformedResponse(String),
}

pub fn is_rate_limited(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<LlmError>(),
        Some(LlmError::RateLimited { .. })
    )
}
