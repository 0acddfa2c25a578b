/// Connection details for the hosted auth endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build with a fresh HTTP client.
    pub fn build(base_url: &str, api_key: &str) -> Self {
        Self::new(reqwest::Client::new(), base_url, api_key)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }
}
