use crate::RuleError;

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("invalid combo rule: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<RuleError> for CreateError {
    fn from(value: RuleError) -> Self {
        match value {
            RuleError::Invalid { errors } => CreateError::Invalid { errors },
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("invalid combo rule: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<RuleError> for UpdateError {
    fn from(value: RuleError) -> Self {
        match value {
            RuleError::Invalid { errors } => UpdateError::Invalid { errors },
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}
