use crate::content::{parse_payload, require_field, ContentHandler, MutationOutcome};
use crate::errors::internal::ContentError;
use crate::errors::InternalError;
use crate::types::db::project;
use crate::types::internal::Module;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};
use serde::Deserialize;

/// Payload fields accepted for project create/edit
#[derive(Debug, Deserialize)]
pub struct ProjectData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Content handler for the projects module
pub struct ProjectHandler;

#[async_trait]
impl ContentHandler for ProjectHandler {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: ProjectData = parse_payload(Module::Projects, data)?;
        let title = require_field(Module::Projects, "title", data.title)?;

        let now = Utc::now().timestamp();
        let record = project::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            title: Set(title),
            description: Set(data.description.unwrap_or_default()),
            link: Set(data.link),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = record
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_project", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: ProjectData = parse_payload(Module::Projects, data)?;

        let existing = project::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_project", e))?
            .ok_or_else(|| ContentError::NotFound {
                module: Module::Projects.as_str().to_string(),
                id,
            })?;

        let mut active: project::ActiveModel = existing.into();
        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(description) = data.description {
            active.description = Set(description);
        }
        if let Some(link) = data.link {
            active.link = Set(Some(link));
        }
        active.updated_at = Set(Utc::now().timestamp());

        let record = active
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_project", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError> {
        let result = project::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("delete_project", e))?;

        if result.rows_affected == 0 {
            return Err(ContentError::NotFound {
                module: Module::Projects.as_str().to_string(),
                id,
            }
            .into());
        }

        Ok(MutationOutcome { item_id: id })
    }
}
