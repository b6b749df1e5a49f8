use miette::Diagnostic;
use thiserror::Error;

use crate::api::{Operation, RemoteFailure};

#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum WorkbenchError {
    #[error("request to the engine failed: {0}")]
    #[diagnostic(
        code(wp_workbench::transport),
        help("check that the engine is running and WP_EDITOR_ENDPOINT points at it")
    )]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from the engine: {0}")]
    #[diagnostic(code(wp_workbench::decode))]
    Decode(#[from] serde_json::Error),

    /// The engine reported `success: false`.
    #[error("{0}")]
    #[diagnostic(code(wp_workbench::remote))]
    Remote(RemoteFailure),

    #[error("please fill in the OML rule first")]
    #[diagnostic(code(wp_workbench::oml_required))]
    OmlRequired,

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(wp_workbench::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(wp_workbench::docs))]
    Docs(#[from] wp_docs::DocError),
}

impl WorkbenchError {
    /// The failure shown in a result panel.
    pub fn to_failure(&self, operation: Operation) -> RemoteFailure {
        match self {
            WorkbenchError::Remote(failure) => failure.clone(),
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    RemoteFailure::new(operation.default_message())
                } else {
                    RemoteFailure::new(message)
                }
            }
        }
    }
}
