use crate::{
    api::{self, SessionToken, UsersApi},
    cache::UserQueries,
    cli::globals::GlobalArgs,
    notify::{Notice, Notifier},
    store::AuthStore,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Everything one command needs: the restored session, the API chosen by the
/// global flags, the query cache over it and the notice queue.
pub struct Context {
    pub auth: AuthStore,
    pub api: Arc<dyn UsersApi>,
    pub queries: Arc<UserQueries>,
    pub notifier: Notifier,
}

impl Context {
    /// # Errors
    /// Returns an error if the state file is unreadable or the HTTP client
    /// cannot be built.
    pub fn open(globals: &GlobalArgs) -> Result<Self> {
        debug!("{:?}", globals);

        let session = SessionToken::new();
        let auth = AuthStore::load(session.clone(), &globals.state_file)?;
        let notifier = Notifier::new();
        let api = api::connect(&globals.api, session, notifier.clone())?;
        let queries = Arc::new(UserQueries::new(api.clone()));

        Ok(Self {
            auth,
            api,
            queries,
            notifier,
        })
    }

    /// Signs out if a `401` revoked the token, then returns the queued notices.
    ///
    /// # Errors
    /// Returns an error if the cleared session cannot be persisted.
    pub fn finish(&mut self) -> Result<Vec<Notice>> {
        self.auth.reconcile()?;
        Ok(self.notifier.drain())
    }

    /// [`Self::finish`] and print the notices on stderr.
    ///
    /// # Errors
    /// Returns an error if the cleared session cannot be persisted.
    pub fn flush(&mut self) -> Result<()> {
        for notice in self.finish()? {
            eprintln!("{notice}");
        }
        Ok(())
    }
}
