//! Connection settings for the remote API. Values come from CLI flags or their
//! `REQRES_ADMIN_*` environment fallbacks; the defaults target the public
//! reqres.in deployment.

use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_QUERY_RETRIES: u32 = 2;
pub const DEFAULT_MUTATION_RETRIES: u32 = 1;
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(300);

/// How the data layer reaches the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Remote API, answering from the mock when it fails.
    Fallback,
    /// Remote API only; failures surface to the caller.
    Remote,
    /// In-memory mock only.
    Offline,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub query_retries: u32,
    pub mutation_retries: u32,
    pub backend: Backend,
    /// Base latency of mock reads; writes take longer.
    pub mock_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            query_retries: DEFAULT_QUERY_RETRIES,
            mutation_retries: DEFAULT_MUTATION_RETRIES,
            backend: Backend::Fallback,
            mock_delay: DEFAULT_MOCK_DELAY,
        }
    }
}

impl ApiConfig {
    /// Checks the base URL is an absolute http(s) URL and strips trailing slashes.
    ///
    /// # Errors
    /// Returns an error if the URL does not parse or uses another scheme.
    pub fn with_base_url(mut self, base_url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url.trim())?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => anyhow::bail!("unsupported scheme for base URL: {scheme}"),
        }
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Mock write latency, matching the slower create/update/delete path.
    #[must_use]
    pub fn mock_write_delay(&self) -> Duration {
        self.mock_delay * 5 / 3
    }
}
