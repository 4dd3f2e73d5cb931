use crate::types::TaskStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("user not found: {0}")]
    UserNotFound(i64),

    #[error("task not found: {0}")]
    TaskNotFound(i64),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    #[error("storage failure: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for ForgeError {
    fn from(err: rusqlite::Error) -> Self {
        ForgeError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
