pub mod auth;
pub mod health;
pub mod users;

mod context;
pub use self::context::Context;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Login(auth::LoginArgs),
    Logout(crate::cli::globals::GlobalArgs),
    Whoami(crate::cli::globals::GlobalArgs),
    Health(crate::cli::globals::GlobalArgs),
    Users(users::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
