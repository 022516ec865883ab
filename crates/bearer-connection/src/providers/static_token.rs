use super::{Token, TokenFuture, TokenProvider};
use crate::error::{Error, Result};

/// A provider that always hands out the same token.
///
/// Useful for long-lived API keys or tokens obtained out of band.
#[derive(Clone, Debug)]
pub struct StaticTokenProvider {
    token: Token,
}

impl StaticTokenProvider {
    /// Create a new provider with the given access token.
    /// Pass only the token, without the `Bearer` prefix.
    ///
    /// # Errors
    /// Fails if the token is empty or not an ASCII string.
    pub fn new(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::MissingAccessToken);
        }
        if !token.is_ascii() {
            return Err(Error::InvalidHeaderValue);
        }

        Ok(Self {
            token: Token::new(token),
        })
    }
}

impl TokenProvider for StaticTokenProvider {
    fn fetch_token(&self) -> TokenFuture<'_> {
        let token = self.token.clone();
        Box::pin(async move { Ok(Some(token)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_is_returned() {
        let provider = StaticTokenProvider::new("my-token").unwrap();

        let token = provider.fetch_token().await.unwrap().unwrap();

        assert_eq!(token.bearer_authorization().as_deref(), Some("Bearer my-token"));
    }

    #[test]
    fn test_invalid_tokens_are_rejected() {
        assert!(matches!(
            StaticTokenProvider::new(""),
            Err(Error::MissingAccessToken)
        ));
        assert!(matches!(
            StaticTokenProvider::new("tökén"),
            Err(Error::InvalidHeaderValue)
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let provider = StaticTokenProvider::new("my-token").unwrap();
        assert!(!format!("{provider:?}").contains("my-token"));
    }
}
