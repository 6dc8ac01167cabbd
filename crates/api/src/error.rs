use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("stub tool `{0}` is not installed or not runnable")]
    ToolMissing(String),
    #[error("stub tool failed for `{target}` ({status}): {stderr}")]
    ToolFailed {
        target: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("Registry error: {0}")]
    Registry(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
