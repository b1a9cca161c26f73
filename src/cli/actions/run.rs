use crate::cli::actions::{auth, health, users, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => auth::login(args).await,
        Action::Logout(globals) => auth::logout(&globals),
        Action::Whoami(globals) => auth::whoami(&globals),
        Action::Health(globals) => health::execute(&globals).await,
        Action::Users(args) => users::execute(args).await,
    }
}
