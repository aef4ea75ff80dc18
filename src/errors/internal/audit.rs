use thiserror::Error;

/// Domain errors for audit log operations
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to serialize audit details: {message}")]
    Serialization { message: String },
}
