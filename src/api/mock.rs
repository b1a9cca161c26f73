//! In-memory stand-in for the remote API, seeded with the reqres demo users.
//! Used for offline/demo runs and as the second link of the fallback chain.

use super::{
    errors::ApiError,
    types::{
        ApiResponse, CreateUserRequest, CreatedUser, HealthStatus, LoginRequest, LoginResponse,
        PaginationParams, Support, UpdateUserRequest, UpdatedUser, User, UserEnvelope, UsersPage,
    },
    UsersApi,
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 6;
const DEFAULT_JOB: &str = "Software Engineer";

const SEED: [(&str, &str); 12] = [
    ("George", "Bluth"),
    ("Janet", "Weaver"),
    ("Emma", "Wong"),
    ("Eve", "Holt"),
    ("Charles", "Morris"),
    ("Tracey", "Ramos"),
    ("Michael", "Lawson"),
    ("Lindsay", "Ferguson"),
    ("Tobias", "Funke"),
    ("Byron", "Fields"),
    ("George", "Edwards"),
    ("Rachel", "Howell"),
];

#[derive(Debug)]
struct MockState {
    users: Vec<User>,
    next_id: u64,
}

#[derive(Debug)]
pub struct MockApi {
    state: Mutex<MockState>,
    read_delay: Duration,
    write_delay: Duration,
}

/// The twelve demo users reqres ships with.
#[must_use]
pub fn seed_users() -> Vec<User> {
    SEED.iter()
        .zip(1u64..)
        .map(|((first, last), id)| User::from_name(id, &format!("{first} {last}")))
        .collect()
}

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl MockApi {
    #[must_use]
    pub fn new(read_delay: Duration, write_delay: Duration) -> Self {
        Self::with_users(seed_users(), read_delay, write_delay)
    }

    /// Mock with no artificial latency.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub fn with_users(users: Vec<User>, read_delay: Duration, write_delay: Duration) -> Self {
        let next_id = users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MockState { users, next_id }),
            read_delay,
            write_delay,
        }
    }

    async fn delay(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }
}

#[async_trait]
impl UsersApi for MockApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError> {
        self.delay(self.read_delay).await;
        debug!("mock login for {}", credentials.email);

        Ok(ApiResponse::ok(LoginResponse {
            token: format!("mock_token_{}", Utc::now().timestamp_millis()),
        }))
    }

    async fn list_users(&self, params: PaginationParams) -> Result<ApiResponse<UsersPage>, ApiError> {
        self.delay(self.read_delay).await;

        let page = params.page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE);
        let per_page = params
            .per_page
            .filter(|per_page| *per_page > 0)
            .unwrap_or(DEFAULT_PER_PAGE);

        let state = self.state.lock().await;
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let data = state
            .users
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect();
        let total = state.users.len() as u64;

        Ok(ApiResponse::ok(UsersPage {
            page,
            per_page,
            total,
            total_pages: u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX),
            data,
            support: Support::default(),
        }))
    }

    async fn get_user(&self, id: u64) -> Result<ApiResponse<UserEnvelope>, ApiError> {
        self.delay(self.read_delay).await;

        let state = self.state.lock().await;
        let user = state
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(not_found)?;

        Ok(ApiResponse::ok(UserEnvelope {
            data: user,
            support: Support::default(),
        }))
    }

    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<ApiResponse<CreatedUser>, ApiError> {
        self.delay(self.write_delay).await;

        let mut state = self.state.lock().await;
        let user = User::from_name(state.next_id, &request.name);
        state.next_id += 1;
        state.users.push(user.clone());

        Ok(ApiResponse::new(
            CreatedUser {
                user,
                job: request.job.clone(),
                created_at: now_iso(),
            },
            201,
            "Created",
        ))
    }

    async fn update_user(
        &self,
        id: u64,
        request: &UpdateUserRequest,
    ) -> Result<ApiResponse<UpdatedUser>, ApiError> {
        self.delay(self.write_delay).await;

        let mut state = self.state.lock().await;
        let user = state
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(not_found)?;

        if let Some(name) = request.name.as_deref().filter(|name| !name.is_empty()) {
            user.rename(name);
        }

        Ok(ApiResponse::ok(UpdatedUser {
            user: user.clone(),
            job: request
                .job
                .clone()
                .filter(|job| !job.is_empty())
                .unwrap_or_else(|| DEFAULT_JOB.to_string()),
            updated_at: now_iso(),
        }))
    }

    async fn delete_user(&self, id: u64) -> Result<ApiResponse<()>, ApiError> {
        self.delay(self.write_delay).await;

        let mut state = self.state.lock().await;
        let index = state
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or_else(not_found)?;
        state.users.remove(index);

        Ok(ApiResponse::new((), 204, "No Content"))
    }

    async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
        Ok(ApiResponse::ok(HealthStatus {
            status: "ok".to_string(),
        }))
    }
}
