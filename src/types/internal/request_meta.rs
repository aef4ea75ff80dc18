/// Request metadata captured for audit entries
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Metadata for actions with no originating HTTP request (startup
    /// seeding, tests)
    pub fn internal() -> Self {
        Self::default()
    }
}
