use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Content modules subject to independent permission grants
///
/// This is a closed set: permission matrices naming any other module are
/// rejected at the parse boundary instead of being carried around as loose
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Members,
    Events,
    Projects,
    Announcements,
    Gallery,
    Applications,
}

impl Module {
    pub const ALL: [Module; 6] = [
        Module::Members,
        Module::Events,
        Module::Projects,
        Module::Announcements,
        Module::Gallery,
        Module::Applications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Members => "members",
            Module::Events => "events",
            Module::Projects => "projects",
            Module::Announcements => "announcements",
            Module::Gallery => "gallery",
            Module::Applications => "applications",
        }
    }

    /// Parse a module name, returning None for anything outside the closed set
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "members" => Some(Module::Members),
            "events" => Some(Module::Events),
            "projects" => Some(Module::Projects),
            "announcements" => Some(Module::Announcements),
            "gallery" => Some(Module::Gallery),
            "applications" => Some(Module::Applications),
            _ => None,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutating actions a permission grant can cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Edit,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Action::Create),
            "edit" => Some(Action::Edit),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of a pending approval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed permission matrix: module -> action -> granted
///
/// Serialized as a plain nested JSON object. Deserialization is strict with
/// respect to the closed module/action sets - an unknown key fails the whole
/// parse, which callers treat as a malformed matrix (fail closed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionMatrix(BTreeMap<Module, BTreeMap<Action, bool>>);

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a single (module, action) pair
    pub fn grant(mut self, module: Module, action: Action) -> Self {
        self.0.entry(module).or_default().insert(action, true);
        self
    }

    /// Whether the matrix explicitly grants the pair
    ///
    /// Anything other than a stored `true` - including an absent module or
    /// action entry - counts as not granted.
    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.0
            .get(&module)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(false)
    }

    /// Parse a matrix from its JSON text representation
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Parse a matrix from a JSON value, tolerating double encoding
    ///
    /// Tokens minted by older builds carried the matrix as a JSON string
    /// inside the claim set rather than as an object; both forms decode to
    /// the same typed matrix here.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::String(raw) => Self::parse(raw),
            other => serde_json::from_value(other.clone()),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn to_json_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allows_only_explicit_true() {
        let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);

        assert!(matrix.allows(Module::Members, Action::Create));
        assert!(!matrix.allows(Module::Members, Action::Edit));
        assert!(!matrix.allows(Module::Events, Action::Create));
    }

    #[test]
    fn test_parse_rejects_unknown_module() {
        let raw = r#"{"members": {"create": true}, "moderation": {"create": true}}"#;
        assert!(PermissionMatrix::parse(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        let raw = r#"{"members": {"publish": true}}"#;
        assert!(PermissionMatrix::parse(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_boolean_grant() {
        let raw = r#"{"members": {"create": "yes"}}"#;
        assert!(PermissionMatrix::parse(raw).is_err());
    }

    #[test]
    fn test_from_value_accepts_object_form() {
        let value = json!({"events": {"edit": true}});
        let matrix = PermissionMatrix::from_value(&value).unwrap();
        assert!(matrix.allows(Module::Events, Action::Edit));
    }

    #[test]
    fn test_from_value_accepts_string_encoded_form() {
        let value = json!(r#"{"events": {"edit": true}}"#);
        let matrix = PermissionMatrix::from_value(&value).unwrap();
        assert!(matrix.allows(Module::Events, Action::Edit));
    }

    #[test]
    fn test_round_trip_through_json_text() {
        let matrix = PermissionMatrix::new()
            .grant(Module::Members, Action::Create)
            .grant(Module::Gallery, Action::Delete);

        let parsed = PermissionMatrix::parse(&matrix.to_json_text()).unwrap();
        assert_eq!(parsed, matrix);
    }

    #[test]
    fn test_module_parse_is_closed() {
        assert_eq!(Module::parse("members"), Some(Module::Members));
        assert_eq!(Module::parse("Members"), None);
        assert_eq!(Module::parse("chat"), None);
    }
}
