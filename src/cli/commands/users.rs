use crate::view::SortField;
use clap::{Arg, ArgAction, ArgGroup, Command};

pub const CMD_USERS: &str = "users";
pub const CMD_LIST: &str = "list";
pub const CMD_GET: &str = "get";
pub const CMD_CREATE: &str = "create";
pub const CMD_UPDATE: &str = "update";
pub const CMD_DELETE: &str = "delete";

pub const ARG_ID: &str = "id";
pub const ARG_PAGE: &str = "page";
pub const ARG_PER_PAGE: &str = "per-page";
pub const ARG_SEARCH: &str = "search";
pub const ARG_SORT_BY: &str = "sort-by";
pub const ARG_ORDER: &str = "order";
pub const ARG_NAME: &str = "name";
pub const ARG_JOB: &str = "job";
pub const ARG_YES: &str = "yes";

fn id_arg() -> Arg {
    Arg::new(ARG_ID)
        .help("User id")
        .required(true)
        .value_parser(clap::value_parser!(u64).range(1..))
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_USERS)
        .about("Browse and manage users")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(list())
        .subcommand(Command::new(CMD_GET).about("Show one user").arg(id_arg()))
        .subcommand(
            Command::new(CMD_CREATE)
                .about("Create a user")
                .arg(
                    Arg::new(ARG_NAME)
                        .long(ARG_NAME)
                        .help("Full name, e.g. \"Ada Lovelace\"")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_JOB)
                        .long(ARG_JOB)
                        .help("Job title")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_UPDATE)
                .about("Rename a user or change their job")
                .arg(id_arg())
                .arg(Arg::new(ARG_NAME).long(ARG_NAME).help("New full name"))
                .arg(Arg::new(ARG_JOB).long(ARG_JOB).help("New job title"))
                .group(
                    ArgGroup::new("changes")
                        .args([ARG_NAME, ARG_JOB])
                        .required(true)
                        .multiple(true),
                ),
        )
        .subcommand(
            Command::new(CMD_DELETE)
                .about("Delete a user")
                .arg(id_arg())
                .arg(
                    Arg::new(ARG_YES)
                        .short('y')
                        .long(ARG_YES)
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn list() -> Command {
    Command::new(CMD_LIST)
        .about("List one page of users")
        .arg(
            Arg::new(ARG_PAGE)
                .long(ARG_PAGE)
                .help("Page number")
                .default_value("1")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_PER_PAGE)
                .long(ARG_PER_PAGE)
                .help("Users per page (server default when omitted)")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_SEARCH)
                .short('s')
                .long(ARG_SEARCH)
                .help("Filter the page by first name, last name or email"),
        )
        .arg(
            Arg::new(ARG_SORT_BY)
                .long(ARG_SORT_BY)
                .help("Sort the page by this field")
                .value_parser(SortField::VALUES),
        )
        .arg(
            Arg::new(ARG_ORDER)
                .long(ARG_ORDER)
                .help("Sort direction")
                .default_value("asc")
                .value_parser(["asc", "desc"]),
        )
}
