use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch, telemetry,
};
use anyhow::Result;
use tracing::Level;

/// `-v` count (or `REQRES_ADMIN_LOG_LEVEL`) to a log level. `None` keeps the
/// default `error` filter.
const fn log_level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Parses the command line, installs the subscriber and returns the action
/// for the binary to run.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed or the arguments do
/// not form a valid action.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity = matches
        .get_one::<u8>(logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or_default();
    telemetry::init(log_level(verbosity), matches.get_flag(logging::ARG_LOG_JSON))?;

    dispatch::handler(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), None);
        assert_eq!(log_level(1), Some(Level::WARN));
        assert_eq!(log_level(2), Some(Level::INFO));
        assert_eq!(log_level(3), Some(Level::DEBUG));
        assert_eq!(log_level(9), Some(Level::TRACE));
    }
}
