use stubweave_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StubweaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("stub tool produced no output for `{0}`")]
    MissingArtifact(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl StubweaveError {
    /// True for the single run-aborting precondition: the stub tool is absent.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, StubweaveError::Api(ApiError::ToolMissing(_)))
    }
}

pub type Result<T> = std::result::Result<T, StubweaveError>;
