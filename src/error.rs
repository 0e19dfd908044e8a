use thiserror::Error;

/// Failures of the remote word generator. These never leave the `words`
/// module: the chat supply logs them and hands out the fallback list instead.
#[derive(Debug, Error)]
pub enum WordSupplyError {
    #[error("no API key configured for the word generator")]
    MissingApiKey,
    #[error("word generator request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("word generator answered with HTTP {0}")]
    Status(u16),
    #[error("word generator payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("word generator returned no choices")]
    NoChoices,
    #[error("word generator reply contained no parsable pairs")]
    NoPairs,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid game config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word count range {min}..={max} is empty or starts at zero")]
    InvalidWordRange { min: usize, max: usize },
    #[error("fall timing must be positive with min_duration_ms <= max_duration_ms")]
    InvalidFallTiming,
    #[error("x_margin must lie in [0, 0.5)")]
    InvalidMargin,
}
