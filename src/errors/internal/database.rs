use thiserror::Error;

/// Infrastructure errors from the database layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error during {operation}: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Failed to begin transaction: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Failed to commit transaction: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}
