//! Auth session store. Demo mode: the API (or its mock) accepts any
//! credentials, and the signed-in operator is a synthetic admin record. The
//! session survives restarts through a JSON state file, the counterpart of the
//! browser's local storage.

use crate::{
    api::{
        types::{avatar_url, LoginRequest, User},
        ApiError, SessionToken, UsersApi,
    },
    cache::UserQueries,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the persisted record, kept as the top-level key of the state file.
pub const STORAGE_NAME: &str = "auth-storage";

/// Persisted subset of the auth state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedAuth {
    is_authenticated: bool,
    user: Option<User>,
    token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(rename = "auth-storage", default)]
    auth: PersistedAuth,
}

#[derive(Debug)]
pub struct AuthStore {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    session: SessionToken,
    storage: Option<PathBuf>,
}

impl AuthStore {
    /// In-memory store that never touches disk.
    #[must_use]
    pub fn new(session: SessionToken) -> Self {
        Self {
            is_authenticated: false,
            user: None,
            is_loading: false,
            error: None,
            session,
            storage: None,
        }
    }

    /// Store persisted at `path`, hydrated from it when the file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn load(session: SessionToken, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self::new(session);

        if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let state: StateFile = serde_json::from_str(&raw)
                .with_context(|| format!("failed to decode {}", path.display()))?;
            store.hydrate(state.auth);
            debug!("auth state restored from {}", path.display());
        }

        store.storage = Some(path);
        Ok(store)
    }

    fn hydrate(&mut self, persisted: PersistedAuth) {
        match persisted.token.filter(|token| !token.is_empty()) {
            Some(token) if persisted.is_authenticated => {
                self.session.set(SecretString::from(token));
                self.is_authenticated = true;
                self.user = persisted.user;
            }
            _ => {
                self.session.clear();
                self.is_authenticated = false;
                self.user = None;
            }
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.session.get()
    }

    /// The only authorization policy: a token is present.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.is_authenticated && self.session.is_present()
    }

    /// Fails with [`ApiError::Unauthenticated`] unless a session is present.
    ///
    /// # Errors
    /// Returns an error when no token is stored.
    pub fn require_session(&self) -> Result<(), ApiError> {
        if self.is_authorized() {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }

    /// Signs in and persists the session. A rejected login persists the
    /// signed-out state, so an earlier token is not reused.
    ///
    /// # Errors
    /// Returns the API error after resetting the state, or a persistence error.
    pub async fn login(
        &mut self,
        api: &dyn UsersApi,
        queries: Option<&UserQueries>,
        credentials: &LoginRequest,
    ) -> Result<()> {
        self.is_loading = true;
        self.error = None;

        match api.login(credentials).await {
            Ok(response) => {
                self.session.set(SecretString::from(response.data.token));
                self.is_authenticated = true;
                self.user = Some(demo_user(&credentials.email));
                self.is_loading = false;
                if let Some(queries) = queries {
                    queries.on_login();
                }
                info!("signed in as {}", credentials.email);
                self.persist()
            }
            Err(err) => {
                self.session.clear();
                self.is_authenticated = false;
                self.user = None;
                self.is_loading = false;
                self.error = Some(err.to_string());
                self.persist()?;
                Err(err).context("Login failed")
            }
        }
    }

    /// Signs out, clears the cache and persists the empty session.
    ///
    /// # Errors
    /// Returns an error if the state file cannot be written.
    pub fn logout(&mut self, queries: Option<&UserQueries>) -> Result<()> {
        self.session.clear();
        self.is_authenticated = false;
        self.user = None;
        self.error = None;
        if let Some(queries) = queries {
            queries.on_logout();
        }
        self.persist()
    }

    /// Drops the session when an interceptor cleared the token (after a `401`).
    ///
    /// # Errors
    /// Returns an error if the state file cannot be written.
    pub fn reconcile(&mut self) -> Result<bool> {
        if self.is_authenticated && !self.session.is_present() {
            warn!("session token was revoked, signing out");
            self.logout(None)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    #[must_use]
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage.as_deref()
    }

    /// Writes `{is_authenticated, user, token}` to the state file, if any.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.storage else {
            return Ok(());
        };

        let state = StateFile {
            auth: PersistedAuth {
                is_authenticated: self.is_authenticated,
                user: self.user.clone(),
                token: self
                    .session
                    .get()
                    .map(|token| token.expose_secret().to_string()),
            },
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, serde_json::to_vec_pretty(&state)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        set_owner_only(path)?;

        debug!("auth state saved to {}", path.display());
        Ok(())
    }
}

/// reqres does not return a profile on login, so the session carries a
/// synthetic admin record.
fn demo_user(email: &str) -> User {
    User {
        id: 1,
        email: email.to_string(),
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        avatar: avatar_url(1),
    }
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict {}", path.display()))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> Result<()> {
    Ok(())
}
