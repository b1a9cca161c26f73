use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, PoisonError, RwLock};

/// Bearer token shared between the auth store and the HTTP interceptors.
///
/// The auth store writes it on login and logout; the request interceptor reads
/// it for every call and the response interceptor clears it on `401`.
#[derive(Clone, Debug, Default)]
pub struct SessionToken {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl SessionToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    /// `Authorization` header value, when a token is present.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_the_token() {
        let session = SessionToken::new();
        let interceptor = session.clone();
        assert!(!interceptor.is_present());
        assert_eq!(interceptor.bearer(), None);

        session.set(SecretString::from("QpwL5tke4Pnpja7X4".to_string()));
        assert!(interceptor.is_present());
        assert_eq!(
            interceptor.bearer().as_deref(),
            Some("Bearer QpwL5tke4Pnpja7X4")
        );

        interceptor.clear();
        assert!(!session.is_present());
    }

    #[test]
    fn empty_token_is_not_present() {
        let session = SessionToken::new();
        session.set(SecretString::from(String::new()));
        assert!(!session.is_present());
    }
}
