//! Endpoint paths for the reqres API, kept in one place so the remote client
//! and the fake servers in tests agree on them.

pub const LOGIN: &str = "/login";
pub const USERS: &str = "/users";

#[must_use]
pub fn user(id: u64) -> String {
    format!("{USERS}/{id}")
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_normalizes_slashes() {
        assert_eq!(
            build_url("https://reqres.in/api/", "/users"),
            "https://reqres.in/api/users"
        );
        assert_eq!(
            build_url("https://reqres.in/api", "users/2"),
            "https://reqres.in/api/users/2"
        );
        assert_eq!(build_url("  ", "/login"), "/login");
    }

    #[test]
    fn user_path() {
        assert_eq!(user(7), "/users/7");
    }
}
