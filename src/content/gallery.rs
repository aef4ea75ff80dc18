use crate::content::{parse_payload, require_field, ContentHandler, MutationOutcome};
use crate::errors::internal::ContentError;
use crate::errors::InternalError;
use crate::types::db::gallery_item;
use crate::types::internal::Module;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};
use serde::Deserialize;

/// Payload fields accepted for gallery create/edit
///
/// The image itself lives in external storage; only its URL is tracked
/// here.
#[derive(Debug, Deserialize)]
pub struct GalleryData {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// Content handler for the gallery module
pub struct GalleryHandler;

#[async_trait]
impl ContentHandler for GalleryHandler {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: GalleryData = parse_payload(Module::Gallery, data)?;
        let title = require_field(Module::Gallery, "title", data.title)?;
        let image_url = require_field(Module::Gallery, "image_url", data.image_url)?;

        let now = Utc::now().timestamp();
        let record = gallery_item::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            title: Set(title),
            image_url: Set(image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = record
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_gallery_item", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: GalleryData = parse_payload(Module::Gallery, data)?;

        let existing = gallery_item::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_gallery_item", e))?
            .ok_or_else(|| ContentError::NotFound {
                module: Module::Gallery.as_str().to_string(),
                id,
            })?;

        let mut active: gallery_item::ActiveModel = existing.into();
        if let Some(title) = data.title {
            active.title = Set(title);
        }
        if let Some(image_url) = data.image_url {
            active.image_url = Set(image_url);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let record = active
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_gallery_item", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError> {
        let result = gallery_item::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("delete_gallery_item", e))?;

        if result.rows_affected == 0 {
            return Err(ContentError::NotFound {
                module: Module::Gallery.as_str().to_string(),
                id,
            }
            .into());
        }

        Ok(MutationOutcome { item_id: id })
    }
}
