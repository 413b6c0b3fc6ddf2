use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum SpendviewError {
    #[error("Invalid value: {0}")]
    Parse(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Cancelled, nothing was changed")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("Logging error: {0}")]
    Logging(#[from] log::SetLoggerError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
