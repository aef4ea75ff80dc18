use thiserror::Error;

/// Domain errors raised by content handlers
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid {module} payload: {message}")]
    InvalidPayload { module: String, message: String },

    #[error("No {module} item with id {id}")]
    NotFound { module: String, id: i64 },
}
