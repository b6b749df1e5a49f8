use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocError {
    /// The server answered with a non-success status.
    #[error("unable to load document: {path} (HTTP {status})")]
    Status { path: String, status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid document base url: {0}")]
    InvalidBase(String),
}

impl DocError {
    /// The text shown in the content area when loading a document fails.
    pub fn content_message(&self) -> String {
        match self {
            DocError::Status { .. } => self.to_string(),
            other => format!("failed to load document: {other}"),
        }
    }
}
