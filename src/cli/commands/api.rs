use crate::api::config::{DEFAULT_API_KEY, DEFAULT_BASE_URL};
use clap::{Arg, ArgAction, Command};

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_API_KEY: &str = "api-key";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_QUERY_RETRIES: &str = "query-retries";
pub const ARG_MUTATION_RETRIES: &str = "mutation-retries";
pub const ARG_NO_MOCK_FALLBACK: &str = "no-mock-fallback";
pub const ARG_OFFLINE: &str = "offline";
pub const ARG_MOCK_DELAY_MS: &str = "mock-delay-ms";
pub const ARG_STATE_FILE: &str = "state-file";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_connection_args(command);
    with_backend_args(command)
}

fn with_connection_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Base URL of the user management API")
                .env("REQRES_ADMIN_BASE_URL")
                .default_value(DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Value sent in the x-api-key header")
                .env("REQRES_ADMIN_API_KEY")
                .default_value(DEFAULT_API_KEY)
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("REQRES_ADMIN_TIMEOUT")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_QUERY_RETRIES)
                .long(ARG_QUERY_RETRIES)
                .help("Retries for failed reads (network errors, timeouts, 429 and 5xx)")
                .env("REQRES_ADMIN_QUERY_RETRIES")
                .default_value("2")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_MUTATION_RETRIES)
                .long(ARG_MUTATION_RETRIES)
                .help("Retries for failed writes")
                .env("REQRES_ADMIN_MUTATION_RETRIES")
                .default_value("1")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_STATE_FILE)
                .long(ARG_STATE_FILE)
                .help("File holding the signed-in session")
                .long_help(
                    "File holding the signed-in session. Defaults to reqres-admin/auth.json under the user state directory.",
                )
                .env("REQRES_ADMIN_STATE_FILE")
                .global(true),
        )
}

fn with_backend_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_NO_MOCK_FALLBACK)
                .long(ARG_NO_MOCK_FALLBACK)
                .help("Fail instead of answering from the mock API when the remote API fails")
                .env("REQRES_ADMIN_NO_MOCK_FALLBACK")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_OFFLINE)
                .long(ARG_OFFLINE)
                .help("Use the in-memory mock API only")
                .env("REQRES_ADMIN_OFFLINE")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with(ARG_NO_MOCK_FALLBACK),
        )
        .arg(
            Arg::new(ARG_MOCK_DELAY_MS)
                .long(ARG_MOCK_DELAY_MS)
                .help("Simulated latency of mock reads in milliseconds; writes take 5/3 of it")
                .env("REQRES_ADMIN_MOCK_DELAY_MS")
                .default_value("300")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
}
