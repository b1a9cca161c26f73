//! # reqres-admin (User Management Front End)
//!
//! `reqres-admin` is an administrative front end for reqres-style user
//! management REST APIs. It signs an operator in (demo mode accepts any
//! credentials), then lists, searches, sorts, paginates, creates, edits and
//! deletes user records. The crate has no backend of its own: durable state
//! lives in the remote API, with an in-memory mock used when the remote API is
//! unreachable.
//!
//! ## Layers
//!
//! - **View** (`cli::actions`, `view`): one action per interaction, rendering
//!   tables and notices to the terminal.
//! - **Data fetching** (`api`): a single `reqwest` client wrapped by request and
//!   response interceptors, and the real -> mock fallback chain.
//! - **Cache** (`cache`): query cache with optimistic create/update, snapshot
//!   rollback on failure and list invalidation on delete.
//! - **State containers** (`store`): persisted auth session, modal selection and
//!   the paginated user list.
//!
//! ## Authorization
//!
//! The only policy is "is a token present". The token is attached as a bearer
//! header to every outbound call; a `401` clears it.

pub mod api;
pub mod cache;
pub mod cli;
pub mod notify;
pub mod store;
pub mod view;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
