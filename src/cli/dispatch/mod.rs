use crate::{
    api::{
        types::{CreateUserRequest, PaginationParams, UpdateUserRequest},
        ApiConfig, Backend,
    },
    cli::{
        actions::{auth::LoginArgs, users, Action},
        commands::{self, api as api_args, users as user_args},
        globals::GlobalArgs,
    },
    view::{ListView, SortField, SortOrder},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some((commands::CMD_LOGIN, sub_m)) => Ok(Action::Login(LoginArgs {
            globals,
            email: required(sub_m, commands::ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, commands::ARG_PASSWORD)?),
        })),
        Some((commands::CMD_LOGOUT, _)) => Ok(Action::Logout(globals)),
        Some((commands::CMD_WHOAMI, _)) => Ok(Action::Whoami(globals)),
        Some((commands::CMD_HEALTH, _)) => Ok(Action::Health(globals)),
        Some((user_args::CMD_USERS, sub_m)) => Ok(Action::Users(users::Args {
            globals,
            operation: users_operation(sub_m)?,
        })),
        _ => Err(anyhow!("no command given, see --help")),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>(user_args::ARG_ID)
        .copied()
        .context("missing required argument: <id>")
}

/// # Errors
/// Returns an error if the base URL is invalid.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let backend = if matches.get_flag(api_args::ARG_OFFLINE) {
        Backend::Offline
    } else if matches.get_flag(api_args::ARG_NO_MOCK_FALLBACK) {
        Backend::Remote
    } else {
        Backend::Fallback
    };

    let defaults = ApiConfig::default();
    let config = ApiConfig {
        api_key: matches
            .get_one::<String>(api_args::ARG_API_KEY)
            .cloned()
            .unwrap_or(defaults.api_key.clone()),
        timeout: matches
            .get_one::<u64>(api_args::ARG_TIMEOUT)
            .map_or(defaults.timeout, |secs| Duration::from_secs(*secs)),
        query_retries: matches
            .get_one::<u32>(api_args::ARG_QUERY_RETRIES)
            .copied()
            .unwrap_or(defaults.query_retries),
        mutation_retries: matches
            .get_one::<u32>(api_args::ARG_MUTATION_RETRIES)
            .copied()
            .unwrap_or(defaults.mutation_retries),
        backend,
        mock_delay: matches
            .get_one::<u64>(api_args::ARG_MOCK_DELAY_MS)
            .map_or(defaults.mock_delay, |millis| Duration::from_millis(*millis)),
        ..defaults
    };

    let config = match matches.get_one::<String>(api_args::ARG_BASE_URL) {
        Some(base_url) => config
            .with_base_url(base_url)
            .with_context(|| format!("invalid --base-url: {base_url}"))?,
        None => config,
    };

    let state_file = matches
        .get_one::<String>(api_args::ARG_STATE_FILE)
        .map(PathBuf::from);

    Ok(GlobalArgs::new(config, state_file))
}

fn users_operation(matches: &ArgMatches) -> Result<users::Operation> {
    match matches.subcommand() {
        Some((user_args::CMD_LIST, sub_m)) => {
            let sort_by = sub_m
                .get_one::<String>(user_args::ARG_SORT_BY)
                .map(|field| field.parse::<SortField>())
                .transpose()
                .map_err(|e| anyhow!(e))?;
            let order = sub_m
                .get_one::<String>(user_args::ARG_ORDER)
                .map(|order| order.parse::<SortOrder>())
                .transpose()
                .map_err(|e| anyhow!(e))?
                .unwrap_or_default();

            Ok(users::Operation::List {
                params: PaginationParams {
                    page: sub_m.get_one::<u32>(user_args::ARG_PAGE).copied(),
                    per_page: sub_m.get_one::<u32>(user_args::ARG_PER_PAGE).copied(),
                },
                view: ListView {
                    search: sub_m
                        .get_one::<String>(user_args::ARG_SEARCH)
                        .cloned()
                        .unwrap_or_default(),
                    sort_by,
                    order,
                },
            })
        }
        Some((user_args::CMD_GET, sub_m)) => Ok(users::Operation::Get { id: id(sub_m)? }),
        Some((user_args::CMD_CREATE, sub_m)) => {
            Ok(users::Operation::Create(CreateUserRequest {
                name: required(sub_m, user_args::ARG_NAME)?,
                job: required(sub_m, user_args::ARG_JOB)?,
            }))
        }
        Some((user_args::CMD_UPDATE, sub_m)) => Ok(users::Operation::Update {
            id: id(sub_m)?,
            request: UpdateUserRequest {
                name: sub_m.get_one::<String>(user_args::ARG_NAME).cloned(),
                job: sub_m.get_one::<String>(user_args::ARG_JOB).cloned(),
            },
        }),
        Some((user_args::CMD_DELETE, sub_m)) => Ok(users::Operation::Delete {
            id: id(sub_m)?,
            confirmed: sub_m.get_flag(user_args::ARG_YES),
        }),
        _ => Err(anyhow!("missing users subcommand, see `reqres-admin users --help`")),
    }
}
