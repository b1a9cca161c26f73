//! Data-fetching layer: the HTTP client and its interceptors, the remote and
//! mock implementations of [`UsersApi`], and the fallback chain between them.

pub mod client;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod mock;
pub mod remote;
pub mod routes;
pub mod session;
pub mod types;

pub use self::{
    client::HttpClient,
    config::{ApiConfig, Backend},
    errors::ApiError,
    fallback::FallbackApi,
    mock::MockApi,
    remote::RemoteApi,
    session::SessionToken,
};

use crate::notify::Notifier;
use async_trait::async_trait;
use std::sync::Arc;
use types::{
    ApiResponse, CreateUserRequest, CreatedUser, HealthStatus, LoginRequest, LoginResponse,
    PaginationParams, UpdateUserRequest, UpdatedUser, UserEnvelope, UsersPage,
};

/// Operations the front end needs from a user-management backend.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError>;

    async fn list_users(&self, params: PaginationParams) -> Result<ApiResponse<UsersPage>, ApiError>;

    async fn get_user(&self, id: u64) -> Result<ApiResponse<UserEnvelope>, ApiError>;

    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ApiResponse<CreatedUser>, ApiError>;

    async fn update_user(
        &self,
        id: u64,
        request: &UpdateUserRequest,
    ) -> Result<ApiResponse<UpdatedUser>, ApiError>;

    async fn delete_user(&self, id: u64) -> Result<ApiResponse<()>, ApiError>;

    async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError>;
}

/// Builds the backend selected by `config`.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn connect(
    config: &ApiConfig,
    session: SessionToken,
    notifier: Notifier,
) -> Result<Arc<dyn UsersApi>, ApiError> {
    let mock = || MockApi::new(config.mock_delay, config.mock_write_delay());

    Ok(match config.backend {
        Backend::Offline => Arc::new(mock()),
        Backend::Remote => Arc::new(RemoteApi::new(
            HttpClient::new(config, session, notifier)?,
            config,
        )),
        Backend::Fallback => Arc::new(FallbackApi::new(
            RemoteApi::new(HttpClient::new(config, session, notifier)?, config),
            mock(),
        )),
    })
}
