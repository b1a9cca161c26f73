use crate::api::ApiConfig;
use std::path::PathBuf;

/// Settings shared by every action.
#[derive(Clone)]
pub struct GlobalArgs {
    pub api: ApiConfig,
    pub state_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api: ApiConfig, state_file: Option<PathBuf>) -> Self {
        Self {
            api,
            state_file: state_file.unwrap_or_else(default_state_file),
        }
    }
}

/// `reqres-admin/auth.json` under the user state directory, falling back to
/// the config directory on platforms without one.
#[must_use]
pub fn default_state_file() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reqres-admin")
        .join("auth.json")
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("base_url", &self.api.base_url)
            .field("api_key", &"***")
            .field("timeout", &self.api.timeout)
            .field("query_retries", &self.api.query_retries)
            .field("mutation_retries", &self.api.mutation_retries)
            .field("backend", &self.api.backend)
            .field("mock_delay", &self.api.mock_delay)
            .field("state_file", &self.state_file)
            .finish()
    }
}
