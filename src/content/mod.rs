// Content Store seam - the mutation targets the core dispatches into
//
// Each module registers a small create/edit/delete handler set; the approval
// workflow and the direct-write path both go through the registry, so a
// replayed mutation is the same code path as a directly permitted one.
pub mod announcements;
pub mod applications;
pub mod events;
pub mod gallery;
pub mod members;
pub mod projects;

use crate::errors::internal::{ApprovalError, ContentError};
use crate::errors::InternalError;
use crate::types::internal::{Action, Module};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::collections::HashMap;
use std::sync::Arc;

pub use announcements::AnnouncementHandler;
pub use applications::ApplicationHandler;
pub use events::EventHandler;
pub use gallery::GalleryHandler;
pub use members::MemberHandler;
pub use projects::ProjectHandler;

/// Result of a content mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// ID of the item that was created, edited or deleted
    pub item_id: i64,
}

/// Create/edit/delete primitives for one content module
///
/// Handlers run over a transaction supplied by the caller: the approval
/// workflow passes its replay transaction, the direct-write path opens one
/// of its own. Handlers never commit.
#[async_trait]
pub trait ContentHandler: Send + Sync {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError>;

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError>;

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError>;
}

/// Registry mapping modules to their handler sets
///
/// Lookups fail closed: a module without a registered handler yields an
/// UnsupportedAction error instead of a silent no-op.
pub struct HandlerRegistry {
    handlers: HashMap<Module, Arc<dyn ContentHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a module
    pub fn register(mut self, module: Module, handler: Arc<dyn ContentHandler>) -> Self {
        self.handlers.insert(module, handler);
        self
    }

    pub fn get(&self, module: Module) -> Option<Arc<dyn ContentHandler>> {
        self.handlers.get(&module).cloned()
    }

    /// Registry with the production handler for every content module
    pub fn with_all_modules() -> Self {
        Self::new()
            .register(Module::Members, Arc::new(MemberHandler))
            .register(Module::Events, Arc::new(EventHandler))
            .register(Module::Projects, Arc::new(ProjectHandler))
            .register(Module::Announcements, Arc::new(AnnouncementHandler))
            .register(Module::Gallery, Arc::new(GalleryHandler))
            .register(Module::Applications, Arc::new(ApplicationHandler))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute a permitted mutation directly, in its own transaction
pub async fn execute(
    db: &DatabaseConnection,
    registry: &HandlerRegistry,
    module: Module,
    action: Action,
    target_id: Option<i64>,
    data: &serde_json::Value,
) -> Result<MutationOutcome, InternalError> {
    let handler = registry.get(module).ok_or_else(|| {
        InternalError::Approval(ApprovalError::UnsupportedAction {
            module: module.as_str().to_string(),
            action: action.as_str().to_string(),
        })
    })?;

    let txn = db.begin().await.map_err(|source| {
        InternalError::Database(crate::errors::internal::DatabaseError::TransactionBegin { source })
    })?;

    let outcome = match action {
        Action::Create => handler.create(&txn, data).await?,
        Action::Edit => {
            let id = require_target(module, target_id)?;
            handler.edit(&txn, id, data).await?
        }
        Action::Delete => {
            let id = require_target(module, target_id)?;
            handler.delete(&txn, id).await?
        }
    };

    txn.commit().await.map_err(|source| {
        InternalError::Database(crate::errors::internal::DatabaseError::TransactionCommit { source })
    })?;

    Ok(outcome)
}

fn require_target(module: Module, target_id: Option<i64>) -> Result<i64, InternalError> {
    target_id.ok_or_else(|| {
        InternalError::Content(ContentError::InvalidPayload {
            module: module.as_str().to_string(),
            message: "missing target id".to_string(),
        })
    })
}

/// Deserialize a handler payload, failing with an InvalidPayload error
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    module: Module,
    data: &serde_json::Value,
) -> Result<T, InternalError> {
    serde_json::from_value(data.clone()).map_err(|e| {
        InternalError::Content(ContentError::InvalidPayload {
            module: module.as_str().to_string(),
            message: e.to_string(),
        })
    })
}

/// Extract a required, non-empty string field
pub(crate) fn require_field(
    module: Module,
    field: &str,
    value: Option<String>,
) -> Result<String, InternalError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(InternalError::Content(ContentError::InvalidPayload {
            module: module.as_str().to_string(),
            message: format!("{} is required", field),
        })),
    }
}
