use crate::content::{parse_payload, require_field, ContentHandler, MutationOutcome};
use crate::errors::internal::ContentError;
use crate::errors::InternalError;
use crate::types::db::application;
use crate::types::internal::Module;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};
use serde::Deserialize;

/// Payload fields accepted for application create/edit
#[derive(Debug, Deserialize)]
pub struct ApplicationData {
    pub applicant_name: Option<String>,
    pub email: Option<String>,
    pub motivation: Option<String>,
    pub status: Option<String>,
}

/// Content handler for the applications module
pub struct ApplicationHandler;

#[async_trait]
impl ContentHandler for ApplicationHandler {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: ApplicationData = parse_payload(Module::Applications, data)?;
        let applicant_name = require_field(Module::Applications, "applicant_name", data.applicant_name)?;
        let email = require_field(Module::Applications, "email", data.email)?;

        let now = Utc::now().timestamp();
        let record = application::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            applicant_name: Set(applicant_name),
            email: Set(email),
            motivation: Set(data.motivation),
            status: Set(data.status.unwrap_or_else(|| "submitted".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = record
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_application", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn edit(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
        data: &serde_json::Value,
    ) -> Result<MutationOutcome, InternalError> {
        let data: ApplicationData = parse_payload(Module::Applications, data)?;

        let existing = application::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_application", e))?
            .ok_or_else(|| ContentError::NotFound {
                module: Module::Applications.as_str().to_string(),
                id,
            })?;

        let mut active: application::ActiveModel = existing.into();
        if let Some(applicant_name) = data.applicant_name {
            active.applicant_name = Set(applicant_name);
        }
        if let Some(email) = data.email {
            active.email = Set(email);
        }
        if let Some(motivation) = data.motivation {
            active.motivation = Set(Some(motivation));
        }
        if let Some(status) = data.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let record = active
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_application", e))?;

        Ok(MutationOutcome { item_id: record.id })
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<MutationOutcome, InternalError> {
        let result = application::Entity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("delete_application", e))?;

        if result.rows_affected == 0 {
            return Err(ContentError::NotFound {
                module: Module::Applications.as_str().to_string(),
                id,
            }
            .into());
        }

        Ok(MutationOutcome { item_id: id })
    }
}
