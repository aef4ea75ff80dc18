use crate::stores::AuditStore;
use crate::types::db::audit_log;
use crate::types::internal::NewAuditEntry;
use std::sync::Arc;

/// Fire-and-log audit recording
///
/// Audit is best-effort observability here, not a consistency boundary: a
/// failed write is logged locally and never aborts the primary operation.
/// The one exception is the approval workflow, which writes its decision
/// entries through the store inside its own transaction.
pub struct AuditLogger {
    store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }

    /// Record an audit entry, swallowing failures
    pub async fn record(&self, entry: NewAuditEntry) {
        if let Err(e) = self.store.append(entry).await {
            tracing::warn!(error = %e, "failed to write audit entry; continuing");
        }
    }
}

/// Render audit rows as CSV, newest first as given
///
/// Hand-rolled RFC-4180-style escaping: fields containing commas, quotes or
/// line breaks are quoted, with embedded quotes doubled.
pub fn export_csv(rows: &[audit_log::Model]) -> String {
    let mut out = String::from(
        "id,created_at,admin_id,admin_username,action_type,module,item_id,status,ip_address,user_agent,action_details\n",
    );

    for row in rows {
        let fields = [
            row.id.to_string(),
            row.created_at.clone(),
            row.admin_id.clone(),
            row.admin_username.clone(),
            row.action_type.clone(),
            row.module.clone().unwrap_or_default(),
            row.item_id.map(|id| id.to_string()).unwrap_or_default(),
            row.status.clone(),
            row.ip_address.clone().unwrap_or_default(),
            row.user_agent.clone().unwrap_or_default(),
            row.action_details.clone(),
        ];

        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, username: &str, details: &str) -> audit_log::Model {
        audit_log::Model {
            id,
            admin_id: "admin-1".to_string(),
            admin_username: username.to_string(),
            action_type: "create".to_string(),
            module: Some("members".to_string()),
            item_id: Some(42),
            action_details: details.to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
            status: "success".to_string(),
            created_at: "2025-08-10T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_export_csv_header_and_row_count() {
        let rows = vec![row(1, "ada", "{}"), row(2, "mina", "{}")];
        let csv = export_csv(&rows);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,created_at,admin_id"));
    }

    #[test]
    fn test_export_csv_escapes_commas_and_quotes() {
        let rows = vec![row(1, "ada", r#"{"name": "Lovelace, Ada"}"#)];
        let csv = export_csv(&rows);

        // The details field is quoted and embedded quotes are doubled
        assert!(csv.contains(r#""{""name"": ""Lovelace, Ada""}""#));
    }

    #[test]
    fn test_export_csv_escapes_newlines() {
        let rows = vec![row(1, "ada", "line one\nline two")];
        let csv = export_csv(&rows);

        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_export_csv_plain_fields_are_unquoted() {
        let rows = vec![row(1, "ada", "{}")];
        let csv = export_csv(&rows);

        assert!(csv.contains(",ada,create,members,42,success,"));
    }
}
