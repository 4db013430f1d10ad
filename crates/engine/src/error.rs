//! The module contains the errors the engine can throw.
//!
//! - [`EngineError`] covers store failures and invalid configuration.
//! - [`DispatchError`] is what a single chat command can fail with; every
//!   variant has an [`ErrorKind`] that decides the reply shown to the user.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid category table: {0}")]
    InvalidCategoryTable(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidCategoryTable(a), Self::InvalidCategoryTable(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCategory,
    InvalidAmount,
    EmptyResult,
    MalformedCommand,
    SystemFailure,
}

impl ErrorKind {
    /// Validation failures are the user's to fix and are not logged as errors.
    pub fn is_validation(self) -> bool {
        !matches!(self, ErrorKind::SystemFailure)
    }
}

/// Failure of a single dispatched command.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown category code \"{0}\"")]
    InvalidCategory(String),
    #[error("non-positive amount {0}")]
    NonPositiveAmount(i64),
    #[error("no records for \"{0}\"")]
    EmptyResult(String),
    #[error("malformed query \"{0}\"")]
    MalformedQuery(String),
    #[error("unparsable amount \"{0}\"")]
    UnparsableAmount(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InvalidCategory(_) => ErrorKind::InvalidCategory,
            DispatchError::NonPositiveAmount(_) => ErrorKind::InvalidAmount,
            DispatchError::EmptyResult(_) => ErrorKind::EmptyResult,
            DispatchError::MalformedQuery(_) => ErrorKind::MalformedCommand,
            // Amount parse failures are reported like store failures.
            DispatchError::UnparsableAmount(_) | DispatchError::Engine(_) => {
                ErrorKind::SystemFailure
            }
        }
    }
}
