use std::{fmt, future::Future};

use super::{Token, TokenFuture, TokenProvider};
use crate::error::Result;

/// A provider backed by an async closure.
///
/// ```
/// use bearer_connection::{Error, FnTokenProvider, Token};
///
/// let provider =
///     FnTokenProvider::new(|| async { Ok::<_, Error>(Some(Token::new("my-token"))) });
/// # let _ = provider;
/// ```
#[derive(Clone)]
pub struct FnTokenProvider<F> {
    fetch: F,
}

impl<F, Fut> FnTokenProvider<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Token>>> + Send + 'static,
{
    #[must_use]
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F, Fut> TokenProvider for FnTokenProvider<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Token>>> + Send + 'static,
{
    fn fetch_token(&self) -> TokenFuture<'_> {
        Box::pin((self.fetch)())
    }
}

impl<F> fmt::Debug for FnTokenProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTokenProvider").finish_non_exhaustive()
    }
}
