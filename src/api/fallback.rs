use super::{
    errors::ApiError,
    types::{
        ApiResponse, CreateUserRequest, CreatedUser, HealthStatus, LoginRequest, LoginResponse,
        PaginationParams, UpdateUserRequest, UpdatedUser, UserEnvelope, UsersPage,
    },
    UsersApi,
};
use async_trait::async_trait;
use tracing::warn;

/// Tries the primary API first and answers from the secondary when it fails.
///
/// Health checks never fall back: they exist to report whether the primary is
/// reachable.
#[derive(Debug)]
pub struct FallbackApi<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackApi<P, S> {
    pub const fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub const fn secondary(&self) -> &S {
        &self.secondary
    }
}

fn log_fallback(operation: &str, err: &ApiError) {
    warn!("Real API failed, falling back to mock API: {} ({})", operation, err);
}

#[async_trait]
impl<P, S> UsersApi for FallbackApi<P, S>
where
    P: UsersApi,
    S: UsersApi,
{
    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError> {
        match self.primary.login(credentials).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log_fallback("login", &err);
                self.secondary.login(credentials).await
            }
        }
    }

    async fn list_users(&self, params: PaginationParams) -> Result<ApiResponse<UsersPage>, ApiError> {
        match self.primary.list_users(params).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log_fallback("list users", &err);
                self.secondary.list_users(params).await
            }
        }
    }

    async fn get_user(&self, id: u64) -> Result<ApiResponse<UserEnvelope>, ApiError> {
        match self.primary.get_user(id).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log_fallback("get user", &err);
                self.secondary.get_user(id).await
            }
        }
    }

    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ApiResponse<CreatedUser>, ApiError> {
        match self.primary.create_user(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log_fallback("create user", &err);
                self.secondary.create_user(request).await
            }
        }
    }

    async fn update_user(
        &self,
        id: u64,
        request: &UpdateUserRequest,
    ) -> Result<ApiResponse<UpdatedUser>, ApiError> {
        match self.primary.update_user(id, request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log_fallback("update user", &err);
                self.secondary.update_user(id, request).await
            }
        }
    }

    async fn delete_user(&self, id: u64) -> Result<ApiResponse<()>, ApiError> {
        match self.primary.delete_user(id).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log_fallback("delete user", &err);
                self.secondary.delete_user(id).await
            }
        }
    }

    async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
        self.primary.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{mock::MockApi, types::User};
    use std::time::Duration;

    /// Backend that fails every call the way an unreachable server would.
    struct Unreachable;

    #[async_trait]
    impl UsersApi for Unreachable {
        async fn login(&self, _: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError> {
            Err(ApiError::Network("down".to_string()))
        }

        async fn list_users(&self, _: PaginationParams) -> Result<ApiResponse<UsersPage>, ApiError> {
            Err(ApiError::Network("down".to_string()))
        }

        async fn get_user(&self, _: u64) -> Result<ApiResponse<UserEnvelope>, ApiError> {
            Err(ApiError::Network("down".to_string()))
        }

        async fn create_user(
            &self,
            _: &CreateUserRequest,
        ) -> Result<ApiResponse<CreatedUser>, ApiError> {
            Err(ApiError::Network("down".to_string()))
        }

        async fn update_user(
            &self,
            _: u64,
            _: &UpdateUserRequest,
        ) -> Result<ApiResponse<UpdatedUser>, ApiError> {
            Err(ApiError::Network("down".to_string()))
        }

        async fn delete_user(&self, _: u64) -> Result<ApiResponse<()>, ApiError> {
            Err(ApiError::Network("down".to_string()))
        }

        async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
            Err(ApiError::Network("API health check failed".to_string()))
        }
    }

    fn fallback() -> FallbackApi<Unreachable, MockApi> {
        FallbackApi::new(Unreachable, MockApi::instant())
    }

    #[tokio::test]
    async fn reads_fall_back_to_mock() {
        let api = fallback();
        let page = api.list_users(PaginationParams::default()).await.expect("list");
        assert_eq!(page.data.total, 12);

        let user = api.get_user(1).await.expect("get").data.data;
        assert_eq!(user.first_name, "George");
    }

    #[tokio::test]
    async fn writes_fall_back_to_mock() {
        let api = fallback();
        let created = api
            .create_user(&CreateUserRequest {
                name: "Ada Lovelace".to_string(),
                job: "Engineer".to_string(),
            })
            .await
            .expect("create");
        assert_eq!(created.status, 201);

        api.delete_user(created.data.user.id).await.expect("delete");
        let remaining: Vec<User> = api.secondary().users().await;
        assert_eq!(remaining.len(), 12);
    }

    #[tokio::test]
    async fn login_is_accepted_in_demo_mode() {
        let api = fallback();
        let token = api
            .login(&LoginRequest {
                email: "eve.holt@reqres.in".to_string(),
                password: "cityslicka".to_string(),
            })
            .await
            .expect("login")
            .data
            .token;
        assert!(token.starts_with("mock_token_"));
    }

    #[tokio::test]
    async fn mock_errors_surface_after_fallback() {
        let api = fallback();
        let err = api.get_user(404).await.expect_err("missing user");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn health_check_does_not_fall_back() {
        let api = FallbackApi::new(
            Unreachable,
            MockApi::new(Duration::ZERO, Duration::ZERO),
        );
        let err = api.health_check().await.expect_err("unreachable");
        assert!(err.is_network_error());
    }
}
