use thiserror::Error;

/// Domain errors for credential store operations
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("No admin record with id {0}")]
    UnknownAdmin(String),

    #[error("Permission matrix is not a well-formed module/action mapping: {0}")]
    MalformedMatrix(String),
}
