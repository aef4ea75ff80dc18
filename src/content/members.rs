use crate::content::{parse_payload, require_field, ContentHandler, MutationOutcome};
use crate::errors::internal::ContentError;
use crate::errors::InternalError;
use crate::types::db::member;
use crate::types::internal::Module;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};
use serde::Deserialize;

/// Payload fields accepted for member create/edit
#[derive(Debug, Deserialize)]
pub struct MemberData {
    pub name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Content handler for the members module
pub struct MemberHandler;

#[async_trait]
impl ContentHandler for MemberHandler {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: MemberData = parse_payload(Module::Members, data)?;
        let name = require_field(Module::Members, "name", data.name)?;
        let department = require_field(Module::Members, "department", data.department)?;

        let now = Utc::now().timestamp();
        let record = member::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(name),
            department: Set(department),
            email: Set(data.email),
            photo_url: Set(data.photo_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = record
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_member", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: MemberData = parse_payload(Module::Members, data)?;

        let existing = member::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_member", e))?
            .ok_or_else(|| ContentError::NotFound {
                module: Module::Members.as_str().to_string(),
                id,
            })?;

        let mut active: member::ActiveModel = existing.into();
        if let Some(name) = data.name {
            active.name = Set(name);
        }
        if let Some(department) = data.department {
            active.department = Set(department);
        }
        if let Some(email) = data.email {
            active.email = Set(Some(email));
        }
        if let Some(photo_url) = data.photo_url {
            active.photo_url = Set(Some(photo_url));
        }
        active.updated_at = Set(Utc::now().timestamp());

        let record = active
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_member", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError> {
        let result = member::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("delete_member", e))?;

        if result.rows_affected == 0 {
            return Err(ContentError::NotFound {
                module: Module::Members.as_str().to_string(),
                id,
            }
            .into());
        }

        Ok(MutationOutcome { item_id: id })
    }
}
