use crate::content::{parse_payload, require_field, ContentHandler, MutationOutcome};
use crate::errors::internal::ContentError;
use crate::errors::InternalError;
use crate::types::db::announcement;
use crate::types::internal::Module;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};
use serde::Deserialize;

/// Payload fields accepted for announcement create/edit
#[derive(Debug, Deserialize)]
pub struct AnnouncementData {
    pub title: Option<String>,
    pub body: Option<String>,
    pub pinned: Option<bool>,
}

/// Content handler for the announcements module
pub struct AnnouncementHandler;

#[async_trait]
impl ContentHandler for AnnouncementHandler {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: AnnouncementData = parse_payload(Module::Announcements, data)?;
        let title = require_field(Module::Announcements, "title", data.title)?;
        let body = require_field(Module::Announcements, "body", data.body)?;

        let now = Utc::now().timestamp();
        let record = announcement::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            title: Set(title),
            body: Set(body),
            pinned: Set(data.pinned.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = record
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_announcement", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: AnnouncementData = parse_payload(Module::Announcements, data)?;

        let existing = announcement::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_announcement", e))?
            .ok_or_else(|| ContentError::NotFound {
                module: Module::Announcements.as_str().to_string(),
                id,
            })?;

        let mut active: announcement::ActiveModel = existing.into();
        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(body) = data.body {
            active.body = Set(body);
        }
        if let Some(pinned) = data.pinned {
            active.pinned = Set(pinned);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let record = active
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_announcement", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError> {
        let result = announcement::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("delete_announcement", e))?;

        if result.rows_affected == 0 {
            return Err(ContentError::NotFound {
                module: Module::Announcements.as_str().to_string(),
                id,
            }
            .into());
        }

        Ok(MutationOutcome { item_id: id })
    }
}
