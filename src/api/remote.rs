use super::{
    client::HttpClient,
    config::ApiConfig,
    errors::ApiError,
    routes,
    types::{
        ApiResponse, CreateUserRequest, CreatedUser, HealthStatus, LoginRequest, LoginResponse,
        MutationEcho, PaginationParams, RawUserEnvelope, RawUsersPage, UpdateUserRequest,
        UpdatedUser, UserEnvelope, UsersPage,
    },
    UsersApi,
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Method;
use tracing::instrument;

/// [`UsersApi`] backed by the real HTTP API.
#[derive(Clone, Debug)]
pub struct RemoteApi {
    http: HttpClient,
    query_retries: u32,
    mutation_retries: u32,
}

impl RemoteApi {
    #[must_use]
    pub fn new(http: HttpClient, config: &ApiConfig) -> Self {
        Self {
            http,
            query_retries: config.query_retries,
            mutation_retries: config.mutation_retries,
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl UsersApi for RemoteApi {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError> {
        self.http
            .send(Method::POST, routes::LOGIN, credentials, self.mutation_retries)
            .await
    }

    #[instrument(skip(self))]
    async fn list_users(&self, params: PaginationParams) -> Result<ApiResponse<UsersPage>, ApiError> {
        let response = self
            .http
            .get::<RawUsersPage>(routes::USERS, &params.query_pairs(), self.query_retries)
            .await?;
        Ok(response.map(UsersPage::from))
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: u64) -> Result<ApiResponse<UserEnvelope>, ApiError> {
        let response = self
            .http
            .get::<RawUserEnvelope>(&routes::user(id), &[], self.query_retries)
            .await?;
        Ok(response.map(UserEnvelope::from))
    }

    #[instrument(skip(self, request))]
    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ApiResponse<CreatedUser>, ApiError> {
        let response = self
            .http
            .send::<_, MutationEcho>(Method::POST, routes::USERS, request, self.mutation_retries)
            .await?;

        Ok(response.map(|echo| {
            let job = echo.job.clone().unwrap_or_else(|| request.job.clone());
            let created_at = echo.created_at.clone().unwrap_or_else(now_iso);
            CreatedUser {
                user: echo.into_user(0, Some(&request.name)),
                job,
                created_at,
            }
        }))
    }

    #[instrument(skip(self, request))]
    async fn update_user(
        &self,
        id: u64,
        request: &UpdateUserRequest,
    ) -> Result<ApiResponse<UpdatedUser>, ApiError> {
        let response = self
            .http
            .send::<_, MutationEcho>(Method::PUT, &routes::user(id), request, self.mutation_retries)
            .await?;

        Ok(response.map(|echo| {
            let job = echo
                .job
                .clone()
                .or_else(|| request.job.clone())
                .unwrap_or_default();
            let updated_at = echo.updated_at.clone().unwrap_or_else(now_iso);
            UpdatedUser {
                user: echo.into_user(id, request.name.as_deref()),
                job,
                updated_at,
            }
        }))
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: u64) -> Result<ApiResponse<()>, ApiError> {
        self.http
            .send_empty(Method::DELETE, &routes::user(id), self.mutation_retries)
            .await
    }

    async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
        let params = PaginationParams {
            page: Some(1),
            per_page: Some(1),
        };
        match self
            .http
            .get::<serde_json::Value>(routes::USERS, &params.query_pairs(), 0)
            .await
        {
            Ok(response) => Ok(response.map(|_| HealthStatus {
                status: "ok".to_string(),
            })),
            Err(_) => Err(ApiError::Network("API health check failed".to_string())),
        }
    }
}
