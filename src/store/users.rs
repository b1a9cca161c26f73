use crate::{
    api::{
        errors::ApiError,
        types::{CreateUserRequest, CreatedUser, PaginationParams, UpdateUserRequest, UpdatedUser, User},
    },
    cache::{QueryFilter, QueryKey, UserQueries},
};
use std::sync::Arc;

/// Paginated user list shown by the users screen.
pub struct UserStore {
    queries: Arc<UserQueries>,
    pub users: Vec<User>,
    pub current_user: Option<User>,
    pub total_pages: u32,
    pub current_page: u32,
    /// Page size as requested, so a reload hits the same cached query.
    pub per_page: Option<u32>,
    pub total_users: u64,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl UserStore {
    #[must_use]
    pub fn new(queries: Arc<UserQueries>) -> Self {
        Self {
            queries,
            users: Vec::new(),
            current_user: None,
            total_pages: 0,
            current_page: 1,
            per_page: None,
            total_users: 0,
            is_loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn queries(&self) -> &Arc<UserQueries> {
        &self.queries
    }

    /// Loads one page. On failure the list is emptied and the error recorded.
    ///
    /// # Errors
    /// Returns the API error.
    pub async fn fetch_users(&mut self, params: PaginationParams) -> Result<(), ApiError> {
        self.is_loading = true;
        self.error = None;

        match self.queries.users_query(params).await {
            Ok(page) => {
                self.users = page.data;
                self.total_pages = page.total_pages;
                self.current_page = page.page;
                self.per_page = params.per_page;
                self.total_users = page.total;
                self.is_loading = false;
                Ok(())
            }
            Err(err) => {
                self.users.clear();
                self.is_loading = false;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// # Errors
    /// Returns the API error.
    pub async fn fetch_user_by_id(&mut self, id: u64) -> Result<Option<User>, ApiError> {
        self.is_loading = true;
        self.error = None;

        let result = self.queries.user_query(id).await;
        self.is_loading = false;
        match result {
            Ok(user) => {
                self.current_user.clone_from(&user);
                Ok(user)
            }
            Err(err) => {
                self.current_user = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Creates a user and reloads the current page.
    ///
    /// # Errors
    /// Returns the API error from the create or the reload.
    pub async fn create_user(&mut self, request: &CreateUserRequest) -> Result<CreatedUser, ApiError> {
        self.is_loading = true;
        self.error = None;

        let result = self.queries.create_user(request).await;
        self.finish(result).await
    }

    /// Updates a user and reloads the current page.
    ///
    /// # Errors
    /// Returns the API error from the update or the reload.
    pub async fn update_user(
        &mut self,
        id: u64,
        request: &UpdateUserRequest,
    ) -> Result<UpdatedUser, ApiError> {
        self.is_loading = true;
        self.error = None;

        let result = self.queries.update_user(id, request).await;
        self.finish(result).await
    }

    /// Deletes a user and drops it from the loaded page.
    ///
    /// # Errors
    /// Returns the API error.
    pub async fn delete_user(&mut self, id: u64) -> Result<(), ApiError> {
        self.is_loading = true;
        self.error = None;

        let result = self.queries.delete_user(id).await;
        self.is_loading = false;
        match result {
            Ok(()) => {
                self.users.retain(|user| user.id != id);
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn finish<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                // The optimistic write left the page fresh; reload it from the server.
                let params = self.current_params();
                self.queries
                    .cache()
                    .invalidate(&QueryFilter::Exact(QueryKey::UserList(params)));
                self.fetch_users(params).await?;
                Ok(value)
            }
            Err(err) => {
                self.is_loading = false;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn current_params(&self) -> PaginationParams {
        PaginationParams {
            page: Some(self.current_page),
            per_page: self.per_page,
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_current_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    pub fn clear_current_user(&mut self) {
        self.current_user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{MockApi, UsersApi},
        cache::queries::tests::Scripted,
    };
    use std::sync::atomic::Ordering;

    fn store() -> UserStore {
        let api: Arc<dyn UsersApi> = Arc::new(MockApi::instant());
        UserStore::new(Arc::new(UserQueries::new(api)))
    }

    #[tokio::test]
    async fn fetch_users_tracks_pagination() {
        let mut store = store();
        store.fetch_users(PaginationParams::page(2)).await.expect("fetch");
        assert_eq!(store.current_page, 2);
        assert_eq!(store.total_pages, 2);
        assert_eq!(store.total_users, 12);
        assert_eq!(store.users.len(), 6);
        assert!(!store.is_loading);
    }

    #[tokio::test]
    async fn create_reloads_current_page_from_server() {
        let mut store = store();
        store.fetch_users(PaginationParams::page(1)).await.expect("fetch");

        let created = store
            .create_user(&CreateUserRequest {
                name: "Grace Hopper".to_string(),
                job: "Admiral".to_string(),
            })
            .await
            .expect("create");

        assert_eq!(created.user.id, 13);
        assert_eq!(created.user.first_name, "Grace");
        let ids: Vec<u64> = store.users.iter().map(|user| user.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
        assert_eq!(store.total_users, 13);
        assert_eq!(store.total_pages, 3);
    }

    #[tokio::test]
    async fn mutations_refetch_the_list() {
        let api = Arc::new(Scripted::new(false));
        let mut store = UserStore::new(Arc::new(UserQueries::new(api.clone())));
        store.fetch_users(PaginationParams::page(1)).await.expect("fetch");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

        store
            .create_user(&CreateUserRequest {
                name: "Grace Hopper".to_string(),
                job: "Admiral".to_string(),
            })
            .await
            .expect("create");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);

        store
            .update_user(
                2,
                &UpdateUserRequest {
                    name: Some("Janet Weaver-Smith".to_string()),
                    job: None,
                },
            )
            .await
            .expect("update");
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 3);
        let janet = store.users.iter().find(|user| user.id == 2).expect("janet");
        assert_eq!(janet.last_name, "Weaver-Smith");
    }

    #[tokio::test]
    async fn failed_create_keeps_loaded_page() {
        let api = Arc::new(Scripted::new(true));
        let mut store = UserStore::new(Arc::new(UserQueries::new(api.clone())));
        store.fetch_users(PaginationParams::page(1)).await.expect("fetch");

        let result = store
            .create_user(&CreateUserRequest {
                name: "Grace Hopper".to_string(),
                job: "Admiral".to_string(),
            })
            .await;
        assert!(result.is_err());
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.users.len(), 6);
        assert!(store.error.as_deref().is_some_and(|error| error.contains("500")));
        assert!(!store.is_loading);
    }

    #[tokio::test]
    async fn failed_fetch_empties_list() {
        let mut store = store();
        store.fetch_users(PaginationParams::page(1)).await.expect("fetch");

        assert!(store.fetch_user_by_id(77).await.is_err());
        assert!(store.current_user.is_none());
        assert_eq!(store.error.as_deref(), Some("User not found"));

        store.clear_error();
        assert!(store.error.is_none());
    }

    #[tokio::test]
    async fn delete_removes_from_loaded_page() {
        let mut store = store();
        store.fetch_users(PaginationParams::page(1)).await.expect("fetch");
        store.delete_user(1).await.expect("delete");
        assert!(store.users.iter().all(|user| user.id != 1));
        assert_eq!(store.users.len(), 5);
    }

    #[tokio::test]
    async fn fetch_user_by_id_sets_current_user() {
        let mut store = store();
        let user = store.fetch_user_by_id(6).await.expect("get").expect("user");
        assert_eq!(user.last_name, "Ramos");
        assert_eq!(store.current_user, Some(user));

        store.clear_current_user();
        assert!(store.current_user.is_none());
    }
}
