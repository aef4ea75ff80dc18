use crate::content::{parse_payload, require_field, ContentHandler, MutationOutcome};
use crate::errors::internal::ContentError;
use crate::errors::InternalError;
use crate::types::db::event;
use crate::types::internal::Module;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};
use serde::Deserialize;

/// Payload fields accepted for event create/edit
#[derive(Debug, Deserialize)]
pub struct EventData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
}

/// Content handler for the events module
pub struct EventHandler;

#[async_trait]
impl ContentHandler for EventHandler {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: EventData = parse_payload(Module::Events, data)?;
        let title = require_field(Module::Events, "title", data.title)?;
        let event_date = require_field(Module::Events, "event_date", data.event_date)?;

        let now = Utc::now().timestamp();
        let record = event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            title: Set(title),
            description: Set(data.description.unwrap_or_default()),
            event_date: Set(event_date),
            location: Set(data.location),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = record
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_event", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: EventData = parse_payload(Module::Events, data)?;

        let existing = event::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_event", e))?
            .ok_or_else(|| ContentError::NotFound {
                module: Module::Events.as_str().to_string(),
                id,
            })?;

        let mut active: event::ActiveModel = existing.into();
        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(description) = data.description {
            active.description = Set(description);
        }
        if let Some(event_date) = data.event_date {
            active.event_date = Set(event_date);
        }
        if let Some(location) = data.location {
            active.location = Set(Some(location));
        }
        active.updated_at = Set(Utc::now().timestamp());

        let record = active
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_event", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError> {
        let result = event::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("delete_event", e))?;

        if result.rows_affected == 0 {
            return Err(ContentError::NotFound {
                module: Module::Events.as_str().to_string(),
                id,
            }
            .into());
        }

        Ok(MutationOutcome { item_id: id })
    }
}
