use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Response model for a directly executed content mutation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    /// ID of the content item that was created, edited or deleted
    pub id: i64,

    /// Target module
    pub module: String,

    /// Executed action
    pub action: String,
}
