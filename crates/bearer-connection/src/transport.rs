use std::{future::Future, pin::Pin, sync::Arc};

use http::{HeaderMap, StatusCode, Version};
use url::Url;

use crate::{error::Result, request::RequestDescriptor};

/// Boxed future returned by [`Transport::dispatch`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;

/// Produces a transport for calls made without a shared one.
pub type TransportFactory = Arc<dyn Fn() -> Arc<dyn Transport> + Send + Sync>;

/// Executes built requests.
///
/// Implementations are shared across concurrent calls and are expected to pool connections
/// internally. `reqwest::Client` implements this trait.
pub trait Transport: Send + Sync + 'static {
    /// Send `request` and collect the full response body.
    ///
    /// # Errors
    /// Fails on network-level errors. HTTP error statuses are not errors.
    fn dispatch(&self, request: RequestDescriptor) -> TransportFuture<'_>;
}

/// Status line and headers of a response.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    pub status: StatusCode,
    pub version: Version,
    /// Final URL, after redirects.
    pub url: Url,
    pub headers: HeaderMap,
}

/// A completed response.
#[derive(Debug, Clone)]
pub struct Response {
    pub metadata: ResponseMetadata,
    pub body: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.metadata.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.metadata.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl Transport for reqwest::Client {
    fn dispatch(&self, request: RequestDescriptor) -> TransportFuture<'_> {
        Box::pin(async move {
            let response = self.execute(request.into_reqwest()).await?;
            let metadata = ResponseMetadata {
                status: response.status(),
                version: response.version(),
                url: response.url().clone(),
                headers: response.headers().clone(),
            };
            let body = response.bytes().await?.to_vec();

            Ok(Response { metadata, body })
        })
    }
}

/// Factory creating a fresh `reqwest::Client` for every call.
///
/// # Panics
/// The returned factory panics when invoked if a TLS backend cannot be initialized, or the
/// resolver cannot load the system configuration. (If `reqwest::Client::new()` panics)
#[must_use]
pub fn default_transport_factory() -> TransportFactory {
    Arc::new(|| Arc::new(reqwest::Client::new()) as Arc<dyn Transport>)
}
