use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::db::admin_user::{self, Entity as AdminUser};
use crate::types::internal::{AdminRole, PermissionMatrix};
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Input for creating an admin account
#[derive(Debug)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
    pub role: AdminRole,
    pub is_super_admin: bool,
    pub permissions: PermissionMatrix,
}

/// CredentialStore manages admin identity records
///
/// Passwords are hashed with Argon2id using a server-side pepper as the
/// secret parameter. The permission matrix is stored as JSON text; the typed
/// form crosses this boundary in both directions.
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and
    /// password pepper
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e))
    }

    /// Create a new admin account
    ///
    /// # Errors
    /// Returns `CredentialError::DuplicateUsername` if the username is
    /// already taken.
    pub async fn create_admin(&self, new_admin: NewAdmin) -> Result<admin_user::Model, InternalError> {
        // Check if username already exists
        let existing = AdminUser::find()
            .filter(admin_user::Column::Username.eq(&new_admin.username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_username", e))?;

        if existing.is_some() {
            return Err(CredentialError::DuplicateUsername(new_admin.username).into());
        }

        let admin_id = Uuid::new_v4().to_string();

        // Hash password with Argon2id using the pepper as secret parameter
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let password_hash = self
            .argon2()?
            .hash_password(new_admin.password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("hash_password", e))?
            .to_string();

        let now = Utc::now().timestamp();
        let record = admin_user::ActiveModel {
            id: Set(admin_id),
            username: Set(new_admin.username),
            password_hash: Set(password_hash),
            role: Set(new_admin.role.as_str().to_string()),
            is_super_admin: Set(new_admin.is_super_admin),
            permissions: Set(new_admin.permissions.to_json_text()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await.map_err(|e| {
            // Unique constraint race on username
            if e.to_string().contains("UNIQUE") {
                InternalError::Credential(CredentialError::DuplicateUsername(
                    "<concurrent insert>".to_string(),
                ))
            } else {
                InternalError::database("insert_admin", e)
            }
        })
    }

    /// Verify admin credentials and return the record on success
    ///
    /// # Errors
    /// Returns `CredentialError::InvalidCredentials` when the username is
    /// unknown or the password does not match; the two cases are not
    /// distinguishable from the outside.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<admin_user::Model, InternalError> {
        let record = AdminUser::find()
            .filter(admin_user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_username", e))?
            .ok_or(CredentialError::InvalidCredentials)?;

        self.verify_password(&record, password)?;

        Ok(record)
    }

    /// Verify a password against a loaded admin record
    ///
    /// Used by login and by the super-admin elevation step, which re-checks
    /// the password of an already-authenticated caller.
    pub fn verify_password(
        &self,
        record: &admin_user::Model,
        password: &str,
    ) -> Result<(), InternalError> {
        let parsed_hash = PasswordHash::new(&record.password_hash)
            .map_err(|_| CredentialError::InvalidCredentials)?;

        self.argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| CredentialError::InvalidCredentials)?;

        Ok(())
    }

    /// Find an admin record by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<admin_user::Model>, InternalError> {
        AdminUser::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_id", e))
    }

    /// Read the current active flag for an admin
    ///
    /// Returns `None` when the record no longer exists; callers treat that
    /// as inactive.
    pub async fn current_active_flag(&self, id: &str) -> Result<Option<bool>, InternalError> {
        Ok(self.find_by_id(id).await?.map(|record| record.is_active))
    }

    /// Replace an admin's permission matrix
    pub async fn set_permissions(
        &self,
        id: &str,
        permissions: &PermissionMatrix,
    ) -> Result<admin_user::Model, InternalError> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| CredentialError::UnknownAdmin(id.to_string()))?;

        let mut active: admin_user::ActiveModel = record.into();
        active.permissions = Set(permissions.to_json_text());
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_admin_permissions", e))
    }

    /// Set an admin's active flag
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<admin_user::Model, InternalError> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| CredentialError::UnknownAdmin(id.to_string()))?;

        let mut active: admin_user::ActiveModel = record.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_admin_active_flag", e))
    }

    /// List all admin accounts, oldest first
    pub async fn list(&self) -> Result<Vec<admin_user::Model>, InternalError> {
        AdminUser::find()
            .order_by_asc(admin_user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_admins", e))
    }

    /// Whether any super-admin account exists
    ///
    /// Checks both signals that can carry super-admin status, matching the
    /// normalization applied at the identity read boundary.
    pub async fn super_admin_exists(&self) -> Result<bool, InternalError> {
        let count = AdminUser::find()
            .filter(
                Condition::any()
                    .add(admin_user::Column::IsSuperAdmin.eq(true))
                    .add(admin_user::Column::Role.eq(AdminRole::SuperAdmin.as_str())),
            )
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_super_admins", e))?;

        Ok(count > 0)
    }
}
