//! Error types for the token generation flow
//!
//! One variant per failure mode. Every variant is fatal for the run; the
//! binary reports it together with the stage that raised it.

use std::path::PathBuf;

use crate::flow::Stage;

/// Errors from the token generation flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("credentials file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid credentials file: {0}")]
    ConfigParse(String),

    #[error("failed to read authorization code: {0}")]
    InputRead(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("failed to persist token: {0}")]
    FilePersist(String),

    #[error("failed to create Drive client: {0}")]
    ServiceInit(String),

    #[error("verification call failed: {0}")]
    VerificationCall(String),
}

impl Error {
    /// The stage the flow was in when this error was raised.
    pub fn stage(&self) -> Stage {
        match self {
            Error::ConfigNotFound(_) | Error::ConfigParse(_) => Stage::Start,
            Error::InputRead(_) => Stage::AwaitingUserCode,
            Error::TokenExchange(_) => Stage::AwaitingUserCode,
            Error::FilePersist(_) => Stage::TokenExchanged,
            Error::ServiceInit(_) | Error::VerificationCall(_) => Stage::TokenPersisted,
        }
    }
}

/// Result alias for token generation operations.
pub type Result<T> = std::result::Result<T, Error>;
