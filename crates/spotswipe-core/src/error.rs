use thiserror::Error;

/// Failure talking to the places backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("decode: {0}")]
    Decode(String),
}

/// Failure reading or writing persisted credentials.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Errors surfaced by session operations that the user triggered directly.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("you need to be logged in to do that")]
    NotAuthenticated,

    #[error("{0} must not be empty")]
    MissingField(&'static str),
}
