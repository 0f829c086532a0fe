use thiserror::Error;

/// Errors raised by collectors and the narrative service.
///
/// Every variant except `InvalidTarget` is caught at the collector call
/// boundary and recorded as an absent report field; only an invalid target
/// aborts an investigation outright.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("domain does not resolve: {0}")]
    Resolution(String),

    #[error("lookup tool not found: {0}")]
    ToolNotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("narrative service rate limited")]
    RateLimit,

    #[error("narrative service failure: {0}")]
    Service(String),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

impl From<reqwest::Error> for ReconError {
    fn from(err: reqwest::Error) -> Self {
        ReconError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        ReconError::Transport(err.to_string())
    }
}
