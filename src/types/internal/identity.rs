use crate::types::db::admin_user;
use crate::types::internal::permissions::PermissionMatrix;
use std::fmt;

/// Admin role tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    Admin,
    Moderator,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "Admin",
            AdminRole::Moderator => "Moderator",
            AdminRole::SuperAdmin => "SuperAdmin",
        }
    }

    /// Parse a role string, returning None for anything outside the set
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(AdminRole::Admin),
            "Moderator" => Some(AdminRole::Moderator),
            "SuperAdmin" => Some(AdminRole::SuperAdmin),
            _ => None,
        }
    }

    /// Parse a stored role string
    ///
    /// An unrecognized role degrades to Moderator, the least privileged
    /// tier; actual authority comes from the permission matrix and the
    /// super-admin flag, so this never widens access.
    pub fn parse_or_moderator(value: &str) -> Self {
        match Self::parse(value) {
            Some(role) => role,
            None => {
                tracing::warn!(role = value, "unrecognized admin role, treating as Moderator");
                AdminRole::Moderator
            }
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated principal, extracted from a verified token or loaded
/// from the credential store
///
/// `is_super_admin` is always the normalized value: true when the role is
/// SuperAdmin or the stored flag is set, whichever signal carries it.
/// `permissions` is `None` when the stored/embedded matrix failed to parse;
/// the permission engine denies on that (fail closed) for everyone except
/// super-admins, whose bypass is evaluated first.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub role: AdminRole,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub permissions: Option<PermissionMatrix>,
}

impl Identity {
    /// Normalize the super-admin signal from role and flag
    pub fn normalize_super_admin(role: AdminRole, flag: bool) -> bool {
        role == AdminRole::SuperAdmin || flag
    }

    /// Build an identity from a credential store record
    ///
    /// This is the read boundary for the permission matrix: the JSON text is
    /// parsed into the typed mapping exactly once, and a malformed matrix
    /// becomes `None` rather than an error so that the engine can apply its
    /// own fail-closed rule in evaluation order.
    pub fn from_record(record: &admin_user::Model) -> Self {
        let role = AdminRole::parse_or_moderator(&record.role);
        let permissions = match PermissionMatrix::parse(&record.permissions) {
            Ok(matrix) => Some(matrix),
            Err(e) => {
                tracing::warn!(
                    admin_id = %record.id,
                    error = %e,
                    "stored permission matrix failed to parse"
                );
                None
            }
        };

        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            role,
            is_super_admin: Self::normalize_super_admin(role, record.is_super_admin),
            is_active: record.is_active,
            permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str, is_super_admin: bool, permissions: &str) -> admin_user::Model {
        admin_user::Model {
            id: "admin-1".to_string(),
            username: "ada".to_string(),
            password_hash: "hash".to_string(),
            role: role.to_string(),
            is_super_admin,
            permissions: permissions.to_string(),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_super_admin_normalization_from_role() {
        let identity = Identity::from_record(&record("SuperAdmin", false, "{}"));
        assert!(identity.is_super_admin);
    }

    #[test]
    fn test_super_admin_normalization_from_flag() {
        let identity = Identity::from_record(&record("Moderator", true, "{}"));
        assert!(identity.is_super_admin);
    }

    #[test]
    fn test_regular_moderator_is_not_super_admin() {
        let identity = Identity::from_record(&record("Moderator", false, "{}"));
        assert!(!identity.is_super_admin);
    }

    #[test]
    fn test_malformed_matrix_becomes_none() {
        let identity = Identity::from_record(&record("Moderator", false, "not json"));
        assert!(identity.permissions.is_none());
    }

    #[test]
    fn test_unknown_role_degrades_to_moderator() {
        let identity = Identity::from_record(&record("Editor", false, "{}"));
        assert_eq!(identity.role, AdminRole::Moderator);
        assert!(!identity.is_super_admin);
    }
}
