use thiserror::Error;

/// Domain errors for the approval workflow
#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("No approval record with id {id}")]
    NotFound { id: i64 },

    /// The record already left the pending state. Raced or repeated
    /// approve/reject calls land here; callers must not retry blindly.
    #[error("Approval {id} has already been processed")]
    AlreadyProcessed { id: i64 },

    #[error("Item data for a {action} approval must carry the target id")]
    MissingTargetId { action: String },

    /// The replay path has no handler for this (module, action) pair. This
    /// is a server defect: an approval was recorded for an action that
    /// cannot be executed.
    #[error("No approval handler registered for {module}.{action}")]
    UnsupportedAction { module: String, action: String },

    #[error("Review notes must be at least {min} characters")]
    NotesTooShort { min: usize },
}
