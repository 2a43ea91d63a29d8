#[derive(Debug, thiserror::Error)]
pub enum BackfillError {
    #[error("Failed to login as admin")]
    AdminLogin,
    #[error("No patient found")]
    NoPatient,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("request to {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write report: {0}")]
    Report(std::io::Error),
}

impl BackfillError {
    /// True for the two preconditions that abort a run before any assignment is touched.
    pub fn is_precondition(&self) -> bool {
        matches!(self, BackfillError::AdminLogin | BackfillError::NoPatient)
    }
}

pub type BackfillResult<T> = std::result::Result<T, BackfillError>;
