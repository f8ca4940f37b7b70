use thiserror::Error;

/// Errors from resolving and serving a name lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The random path ran out of attempts without finding a popular enough name.
    #[error("no qualifying random candidate after {attempts} attempts")]
    NoQualifyingCandidate { attempts: u32 },

    /// The request is missing a path parameter the route requires.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LookupError>;
