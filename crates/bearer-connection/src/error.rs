use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
    #[error("Failed to parse request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Authorization cannot be used as a header value.")]
    InvalidHeaderValue,
    #[error("Request to fetch token failed: {0}")]
    TokenRequestFailed(String),
    #[error("Token provider did not return an access token.")]
    MissingAccessToken,
    #[error("Request failed: {0}")]
    ReqwestFailed(#[from] Arc<reqwest::Error>),
    #[error("Transport failed: {0}")]
    TransportFailed(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::ReqwestFailed(Arc::new(value))
    }
}
