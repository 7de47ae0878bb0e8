pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the caption pipeline. Every variant is terminal for
/// the current request; nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed watch page: {0}")]
    MalformedDocument(String),

    #[error("no caption tracks available")]
    NoCaptions,

    #[error("invalid duration: {0}")]
    InvalidDuration(i64),

    #[error("summarization backend failed: {0}")]
    Summarization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

/// Outward-facing error surface of the pipeline. Internal failure varieties
/// collapse into exactly two distinguishable states; the source is preserved
/// for logging only.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to fetch captions")]
    Captions(#[source] Error),

    #[error("failed to summarize captions")]
    Summarize(#[source] Error),
}
