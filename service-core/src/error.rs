use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Storage error: {0}")]
    StorageError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    /// Process exit status for command-line front ends.
    ///
    /// Codes follow the BSD `sysexits.h` conventions so scripts can tell a
    /// rejected input apart from a broken data directory.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::BadRequest(_) => 65,
            AppError::NotFound(_) => 66,
            AppError::Conflict(_) => 75,
            AppError::InternalError(_) => 70,
            AppError::StorageError(_) => 74,
            AppError::ConfigError(_) => 78,
        }
    }

    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::InternalError(_) => "internal",
            AppError::StorageError(_) => "storage",
            AppError::ConfigError(_) => "config",
        }
    }
}
