use thiserror::Error;

/// Errors returned by the match input API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("invalid player {0}, expected 1 or 2")]
    InvalidPlayer(u8),

    #[error("match is already finished")]
    MatchFinished,

    #[error("both players must be loaded first")]
    NotLoaded,

    #[error("match recording failed: {0}")]
    RecordingFailed(String),
}
