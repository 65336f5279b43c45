use thiserror::Error;

/// Failure detail at the upstream call boundary.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("authentication rejected: {0}")]
    Unauthorized(String),
    #[error("quota or rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Maps a non-success HTTP status and its body onto the taxonomy.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(body),
            429 => Self::RateLimited(body),
            _ => Self::Upstream { status, body },
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type CompletionResult<T> = std::result::Result<T, CompletionError>;
