use std::time::Duration;

/// Connection settings for the managed backend service.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub base_url: String,
    /// Public API key sent as `apikey` on every request.
    pub anon_key: String,
    /// User access token; requests fall back to the anon key without one.
    pub access_token: Option<String>,
    pub table: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            access_token: None,
            table: "bookmarks".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            ..Self::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
