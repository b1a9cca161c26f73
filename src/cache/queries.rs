//! User queries and mutations on top of [`QueryCache`].
//!
//! - Lists are served from cache while fresh and refetched otherwise.
//! - Create and update apply an optimistic change to every cached list, roll
//!   it back if the call fails and skip the refetch when it succeeds.
//! - Delete waits for the server and then invalidates every list.

use super::{QueryCache, QueryData, QueryFilter, QueryKey, DEFAULT_GC_TIME, USER_LIST_STALE_TIME};
use crate::api::{
    errors::ApiError,
    types::{
        CreateUserRequest, CreatedUser, PaginationParams, UpdateUserRequest, UpdatedUser, User,
        UsersPage,
    },
    UsersApi,
};
use chrono::Utc;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tracing::{debug, error, info};

pub struct UserQueries {
    api: Arc<dyn UsersApi>,
    cache: Mutex<QueryCache>,
    list_stale_time: Duration,
}

impl UserQueries {
    #[must_use]
    pub fn new(api: Arc<dyn UsersApi>) -> Self {
        Self::with_cache(
            api,
            QueryCache::new(Duration::ZERO, DEFAULT_GC_TIME),
            USER_LIST_STALE_TIME,
        )
    }

    #[must_use]
    pub fn with_cache(api: Arc<dyn UsersApi>, cache: QueryCache, list_stale_time: Duration) -> Self {
        Self {
            api,
            cache: Mutex::new(cache),
            list_stale_time,
        }
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn UsersApi> {
        &self.api
    }

    /// Locks the cache. Never hold the guard across an `.await`.
    pub fn cache(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One page of users, from cache while fresh.
    ///
    /// # Errors
    /// Returns the API error when the page has to be fetched and the call fails.
    pub async fn users_query(&self, params: PaginationParams) -> Result<UsersPage, ApiError> {
        let key = QueryKey::UserList(params);
        {
            let mut cache = self.cache();
            cache.gc();
            if !cache.is_stale(&key, Some(self.list_stale_time)) {
                if let Some(QueryData::UserList(page)) = cache.get(&key) {
                    debug!("user list served from cache: {:?}", params);
                    return Ok(page.clone());
                }
            }
        }

        let page = self.api.list_users(params).await?.data;
        self.cache().set(key, QueryData::UserList(page.clone()));
        Ok(page)
    }

    /// A single user; disabled (returns `None`) for id `0`.
    ///
    /// # Errors
    /// Returns the API error when the fetch fails.
    pub async fn user_query(&self, id: u64) -> Result<Option<User>, ApiError> {
        if id == 0 {
            return Ok(None);
        }

        let key = QueryKey::UserDetail(id);
        {
            let mut cache = self.cache();
            if !cache.is_stale(&key, None) {
                if let Some(QueryData::UserDetail(user)) = cache.get(&key) {
                    return Ok(Some(user.clone()));
                }
            }
        }

        let user = self.api.get_user(id).await?.data.data;
        self.cache().set(key, QueryData::UserDetail(user.clone()));
        Ok(Some(user))
    }

    /// Creates a user, showing it at the top of every cached list right away.
    ///
    /// # Errors
    /// Returns the API error after restoring the cached lists.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<CreatedUser, ApiError> {
        let snapshot = {
            let mut cache = self.cache();
            let snapshot = cache.get_queries(&QueryFilter::UserLists);
            let optimistic = optimistic_user(&request.name);
            cache.set_queries(&QueryFilter::UserLists, |data| {
                if let QueryData::UserList(page) = data {
                    page.data.insert(0, optimistic.clone());
                    page.total += 1;
                }
            });
            snapshot
        };

        match self.api.create_user(request).await {
            Ok(response) => {
                info!("user created: {}", response.data.user.id);
                Ok(response.data)
            }
            Err(err) => {
                self.cache().restore(snapshot);
                error!("create user failed, cache rolled back: {}", err);
                Err(err)
            }
        }
    }

    /// Updates a user, renaming it in every cached list right away.
    ///
    /// # Errors
    /// Returns the API error after restoring the cached lists.
    pub async fn update_user(
        &self,
        id: u64,
        request: &UpdateUserRequest,
    ) -> Result<UpdatedUser, ApiError> {
        let snapshot = {
            let mut cache = self.cache();
            let snapshot = cache.get_queries(&QueryFilter::UserLists);
            if let Some(name) = request.name.as_deref() {
                cache.set_queries(&QueryFilter::UserLists, |data| {
                    if let QueryData::UserList(page) = data {
                        page.data
                            .iter_mut()
                            .filter(|user| user.id == id)
                            .for_each(|user| user.rename(name));
                    }
                });
            }
            snapshot
        };

        match self.api.update_user(id, request).await {
            Ok(response) => {
                info!("user updated: {}", id);
                Ok(response.data)
            }
            Err(err) => {
                self.cache().restore(snapshot);
                error!("update user failed, cache rolled back: {}", err);
                Err(err)
            }
        }
    }

    /// Deletes a user and invalidates every cached list on success.
    ///
    /// # Errors
    /// Returns the API error; the cache is left untouched.
    pub async fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        match self.api.delete_user(id).await {
            Ok(_) => {
                let invalidated = self.cache().invalidate(&QueryFilter::UserLists);
                info!("user deleted: {}, {} cached lists invalidated", id, invalidated);
                Ok(())
            }
            Err(err) => {
                error!("delete user failed: {}", err);
                Err(err)
            }
        }
    }

    /// Records a fresh sign-in.
    pub fn on_login(&self) {
        let mut cache = self.cache();
        cache.invalidate(&QueryFilter::Auth);
        cache.set(QueryKey::Auth, QueryData::Auth(true));
    }

    /// Forgets everything cached for the previous session.
    pub fn on_logout(&self) {
        self.cache().clear();
    }
}

/// Placeholder shown until the server confirms the create. The id comes from
/// the clock so it cannot collide with the small ids the API hands out.
fn optimistic_user(name: &str) -> User {
    let temporary_id = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    User::from_name(temporary_id, name)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{
        mock::MockApi,
        types::{
            ApiResponse, HealthStatus, LoginRequest, LoginResponse, UserEnvelope,
        },
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock that counts list calls and can be told to reject logins and writes.
    pub(crate) struct Scripted {
        inner: MockApi,
        pub(crate) list_calls: AtomicUsize,
        reject_writes: bool,
    }

    impl Scripted {
        pub(crate) fn new(reject_writes: bool) -> Self {
            Self {
                inner: MockApi::instant(),
                list_calls: AtomicUsize::new(0),
                reject_writes,
            }
        }

        fn rejected() -> ApiError {
            ApiError::Http {
                status: 500,
                message: "Server Error (500)".to_string(),
            }
        }
    }

    #[async_trait]
    impl UsersApi for Scripted {
        async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError> {
            if self.reject_writes {
                return Err(ApiError::Http {
                    status: 400,
                    message: "Missing password".to_string(),
                });
            }
            self.inner.login(credentials).await
        }

        async fn list_users(&self, params: PaginationParams) -> Result<ApiResponse<UsersPage>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_users(params).await
        }

        async fn get_user(&self, id: u64) -> Result<ApiResponse<UserEnvelope>, ApiError> {
            self.inner.get_user(id).await
        }

        async fn create_user(
            &self,
            request: &CreateUserRequest,
        ) -> Result<ApiResponse<CreatedUser>, ApiError> {
            if self.reject_writes {
                return Err(Self::rejected());
            }
            self.inner.create_user(request).await
        }

        async fn update_user(
            &self,
            id: u64,
            request: &UpdateUserRequest,
        ) -> Result<ApiResponse<UpdatedUser>, ApiError> {
            if self.reject_writes {
                return Err(Self::rejected());
            }
            self.inner.update_user(id, request).await
        }

        async fn delete_user(&self, id: u64) -> Result<ApiResponse<()>, ApiError> {
            if self.reject_writes {
                return Err(Self::rejected());
            }
            self.inner.delete_user(id).await
        }

        async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
            self.inner.health_check().await
        }
    }

    fn queries(reject_writes: bool) -> (Arc<Scripted>, UserQueries) {
        let api = Arc::new(Scripted::new(reject_writes));
        let queries = UserQueries::new(api.clone());
        (api, queries)
    }

    fn cached_page(queries: &UserQueries, page: u32) -> Option<UsersPage> {
        match queries.cache().peek(&QueryKey::UserList(PaginationParams::page(page))) {
            Some(QueryData::UserList(page)) => Some(page.clone()),
            _ => None,
        }
    }

    fn create_request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Ada Lovelace".to_string(),
            job: "Engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn fresh_lists_come_from_cache() {
        let (api, queries) = queries(false);
        queries.users_query(PaginationParams::page(1)).await.expect("list");
        queries.users_query(PaginationParams::page(1)).await.expect("list");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

        queries.users_query(PaginationParams::page(2)).await.expect("list");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn create_prepends_optimistic_user() {
        let (_, queries) = queries(false);
        queries.users_query(PaginationParams::page(1)).await.expect("list");

        let created = queries.create_user(&create_request()).await.expect("create");
        assert_eq!(created.user.id, 13);

        let page = cached_page(&queries, 1).expect("cached page");
        assert_eq!(page.total, 13);
        assert_eq!(page.data.len(), 7);
        assert_eq!(page.data[0].email, "ada.lovelace@reqres.in");
        assert_ne!(page.data[0].id, 13);
    }

    #[tokio::test]
    async fn failed_create_rolls_back() {
        let (_, queries) = queries(true);
        let before = queries.users_query(PaginationParams::page(1)).await.expect("list");

        let err = queries.create_user(&create_request()).await.expect_err("rejected");
        assert!(err.is_server_error());
        assert_eq!(cached_page(&queries, 1), Some(before));
    }

    #[tokio::test]
    async fn update_renames_cached_user() {
        let (_, queries) = queries(false);
        queries.users_query(PaginationParams::page(1)).await.expect("list");

        let request = UpdateUserRequest {
            name: Some("Janet Weaver-Smith".to_string()),
            job: Some("Lead".to_string()),
        };
        let updated = queries.update_user(2, &request).await.expect("update");
        assert_eq!(updated.job, "Lead");

        let page = cached_page(&queries, 1).expect("cached page");
        let janet = page.data.iter().find(|user| user.id == 2).expect("janet");
        assert_eq!(janet.last_name, "Weaver-Smith");
    }

    #[tokio::test]
    async fn failed_update_rolls_back() {
        let (_, queries) = queries(true);
        let before = queries.users_query(PaginationParams::page(1)).await.expect("list");

        let request = UpdateUserRequest {
            name: Some("Nobody".to_string()),
            job: None,
        };
        assert!(queries.update_user(1, &request).await.is_err());
        assert_eq!(cached_page(&queries, 1), Some(before));
    }

    #[tokio::test]
    async fn delete_invalidates_lists() {
        let (api, queries) = queries(false);
        queries.users_query(PaginationParams::page(1)).await.expect("list");

        queries.delete_user(3).await.expect("delete");
        let page = queries.users_query(PaginationParams::page(1)).await.expect("list");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
        assert!(page.data.iter().all(|user| user.id != 3));
        assert_eq!(page.total, 11);
    }

    #[tokio::test]
    async fn failed_delete_keeps_cache_fresh() {
        let (api, queries) = queries(true);
        queries.users_query(PaginationParams::page(1)).await.expect("list");

        assert!(queries.delete_user(3).await.is_err());
        queries.users_query(PaginationParams::page(1)).await.expect("list");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn user_query_is_disabled_for_zero() {
        let (_, queries) = queries(false);
        assert_eq!(queries.user_query(0).await.expect("disabled"), None);
        let user = queries.user_query(5).await.expect("get").expect("user");
        assert_eq!(user.first_name, "Charles");
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let (_, queries) = queries(false);
        queries.on_login();
        queries.users_query(PaginationParams::page(1)).await.expect("list");
        assert_eq!(queries.cache().len(), 2);

        queries.on_logout();
        assert!(queries.cache().is_empty());
    }
}
