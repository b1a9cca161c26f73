use crate::{
    api::{types::LoginRequest, SessionToken},
    cli::{actions::Context, globals::GlobalArgs},
    store::AuthStore,
    view,
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// # Errors
/// Returns an error if the login fails or the session cannot be stored.
pub async fn login(args: LoginArgs) -> Result<()> {
    let mut ctx = Context::open(&args.globals)?;
    let credentials = LoginRequest {
        email: args.email,
        password: args.password.expose_secret().to_string(),
    };

    let result = ctx
        .auth
        .login(ctx.api.as_ref(), Some(ctx.queries.as_ref()), &credentials)
        .await;

    if result.is_ok() {
        ctx.notifier.success("Login successful");
        println!("Signed in as {}", credentials.email);
    }

    ctx.flush()?;
    result
}

/// # Errors
/// Returns an error if the cleared session cannot be stored.
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    ctx.auth.logout(Some(ctx.queries.as_ref()))?;
    ctx.notifier.success("Logged out");
    ctx.flush()
}

/// # Errors
/// Returns an error if the state file cannot be read.
pub fn whoami(globals: &GlobalArgs) -> Result<()> {
    let auth = AuthStore::load(SessionToken::new(), &globals.state_file)?;

    match auth.user.as_ref().filter(|_| auth.is_authorized()) {
        Some(user) => print!("{}", view::render_user(user)),
        None => println!("Not signed in"),
    }

    Ok(())
}
