use crate::errors::InternalError;
use crate::stores::{CredentialStore, SettingStore};
use crate::types::db::module_setting;
use crate::types::internal::{AccessDecision, Action, Identity, Module};
use std::sync::Arc;

/// Evaluate a (module, action) request against an identity
///
/// The step order is load-bearing and must not be rearranged:
///
/// 1. Super-admin bypass. Checked before everything else so a stale or
///    malformed matrix can never lock out a super-admin.
/// 2. Deactivated accounts lose all authorization.
/// 3. A matrix that failed to parse denies everything (fail closed).
/// 4. The matrix must carry an explicit grant for the pair.
/// 5. A permitted action whose module defers it goes to the approval queue.
/// 6. Otherwise the action proceeds.
pub fn evaluate(
    identity: &Identity,
    module: Module,
    action: Action,
    setting: &module_setting::Model,
) -> AccessDecision {
    if identity.is_super_admin {
        return AccessDecision::Allow;
    }

    if !identity.is_active {
        return AccessDecision::Deny("account deactivated".to_string());
    }

    let matrix = match identity.permissions.as_ref() {
        Some(matrix) => matrix,
        None => return AccessDecision::Deny("invalid permission structure".to_string()),
    };

    if !matrix.allows(module, action) {
        return AccessDecision::Deny(format!("missing permission for {}.{}", module, action));
    }

    if requires_approval(setting, action) {
        return AccessDecision::Defer;
    }

    AccessDecision::Allow
}

fn requires_approval(setting: &module_setting::Model, action: Action) -> bool {
    match action {
        Action::Create => setting.requires_approval_for_create,
        Action::Edit => setting.requires_approval_for_edit,
        Action::Delete => setting.requires_approval_for_delete,
    }
}

/// Store-backed authorization entry point
///
/// Wraps `evaluate` with the two reads it needs: the module's approval
/// setting, and the acting admin's current active flag. The database, not
/// the token snapshot, is the source of truth for `is_active` - a token
/// outliving a deactivation stops authorizing immediately. The permission
/// matrix embedded in the token stays authoritative; that staleness window
/// is deliberate.
pub struct PermissionEngine {
    credentials: Arc<CredentialStore>,
    settings: Arc<SettingStore>,
}

impl PermissionEngine {
    pub fn new(credentials: Arc<CredentialStore>, settings: Arc<SettingStore>) -> Self {
        Self {
            credentials,
            settings,
        }
    }

    /// Authorize a (module, action) request for the given identity
    pub async fn authorize(
        &self,
        identity: &Identity,
        module: Module,
        action: Action,
    ) -> Result<AccessDecision, InternalError> {
        // A deleted admin record evaluates as inactive
        let current_active = self
            .credentials
            .current_active_flag(&identity.id)
            .await?
            .unwrap_or(false);

        let snapshot = Identity {
            is_active: current_active,
            ..identity.clone()
        };

        let setting = self.settings.get(module).await?;

        Ok(evaluate(&snapshot, module, action, &setting))
    }
}
