use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_JSON: &str = "log-json";

/// Accepts a level name or its count (`0` to `5`), as `-v` would produce.
fn parse_log_level(level: &str) -> Result<u8, String> {
    match level.to_lowercase().as_str() {
        "error" => Ok(0),
        "warn" => Ok(1),
        "info" => Ok(2),
        "debug" => Ok(3),
        "trace" => Ok(4),
        other => other
            .parse::<u8>()
            .ok()
            .filter(|count| *count <= 5)
            .ok_or_else(|| format!("invalid log level: {level}")),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("REQRES_ADMIN_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(ValueParser::from(parse_log_level)),
        )
        .arg(
            Arg::new(ARG_LOG_JSON)
                .long("log-json")
                .help("Emit logs as JSON lines on stderr")
                .env("REQRES_ADMIN_LOG_JSON")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("INFO"), Ok(2));
        assert_eq!(parse_log_level("trace"), Ok(4));
        assert_eq!(parse_log_level("3"), Ok(3));
        assert!(parse_log_level("6").is_err());
        assert!(parse_log_level("loud").is_err());
    }
}
