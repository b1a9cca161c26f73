pub mod api;
pub mod logging;
pub mod users;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_HEALTH: &str = "health";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";

fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in (demo mode accepts any credentials)")
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Email address")
                .env("REQRES_ADMIN_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long(ARG_PASSWORD)
                .help("Password")
                .env("REQRES_ADMIN_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("reqres-admin")
        .about("User management admin")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login())
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out and forget the stored session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in user"))
        .subcommand(Command::new(CMD_HEALTH).about("Check that the remote API answers"))
        .subcommand(users::subcommand());

    let command = api::with_args(command);
    logging::with_args(command)
}
