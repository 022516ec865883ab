mod fn_provider;
mod static_token;

use std::{future::Future, pin::Pin, time::Duration};

pub use fn_provider::*;
use oauth2::TokenResponse;
pub use static_token::*;

use crate::error::Result;

/// Boxed future returned by [`TokenProvider::fetch_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Token>>> + Send + 'a>>;

/// Main trait of this crate.
///
/// Supplies the token used to authorize each request. Implementations may hit the network or
/// return cached state, and must be safe to call concurrently.
pub trait TokenProvider: Send + Sync + 'static {
    /// Returns the current token.
    ///
    /// `Ok(None)` means the provider has no token to offer.
    ///
    /// # Errors
    /// Fails if a token cannot be obtained, for example because the refresh failed.
    fn fetch_token(&self) -> TokenFuture<'_>;
}

/// An access token as handed out by a [`TokenProvider`].
#[derive(Clone, PartialEq, Eq, veil::Redact)]
pub struct Token {
    #[redact]
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<Duration>,
}

impl Token {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            token_type: None,
            expires_in: None,
        }
    }

    /// A token that carries no access token.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            access_token: None,
            token_type: None,
            expires_in: None,
        }
    }

    /// Convert a token response of the `oauth2` crate.
    #[must_use]
    pub fn from_token_response<TR: TokenResponse>(tr: &TR) -> Self {
        Self {
            access_token: Some(tr.access_token().secret().clone()),
            token_type: None,
            expires_in: tr.expires_in(),
        }
    }

    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// The access token, if present and non-empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Lifetime reported when the token was issued.
    #[must_use]
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in
    }

    /// `Bearer <access token>`, if the token carries one.
    #[must_use]
    pub fn bearer_authorization(&self) -> Option<String> {
        self.access_token().map(|t| format!("Bearer {t}"))
    }
}

#[cfg(test)]
mod tests {
    use oauth2::basic::BasicTokenResponse;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_bearer_authorization() {
        let token = Token::new("abc");
        assert_eq!(token.bearer_authorization().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_empty_access_token_is_absent() {
        assert_eq!(Token::new("").access_token(), None);
        assert_eq!(Token::empty().bearer_authorization(), None);
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let token = Token::new("super-secret").with_token_type("Bearer");
        let debug = format!("{token:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("Bearer"));
    }

    #[test]
    fn test_from_token_response() {
        let tr: BasicTokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "my-issued-token",
            "token_type": "bearer",
            "expires_in": 3600
        }))
        .unwrap();

        let token = Token::from_token_response(&tr);

        assert_eq!(token.access_token(), Some("my-issued-token"));
        assert_eq!(token.expires_in(), Some(Duration::from_secs(3600)));
    }
}
