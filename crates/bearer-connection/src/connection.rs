use std::{fmt, sync::Arc};

use http::Method;

use crate::{
    error::{Error, Result},
    providers::{Token, TokenProvider},
    request::{build_request, Parameters, RequestSpec},
    transport::{default_transport_factory, Response, Transport, TransportFactory},
};

/// Sends requests authorized with a bearer token obtained from a [`TokenProvider`].
///
/// Every call asks the provider for the current token, builds the request with
/// `Authorization: Bearer <token>` and dispatches it. Tokens are never cached here; that is
/// up to the provider.
///
/// Requests go through the shared transport set with [`with_transport`](Self::with_transport).
/// Without one, the transport factory is invoked once per call, which by default creates a
/// new `reqwest::Client`. Share a client to benefit from connection pooling.
///
/// Uses `Arc` internally for cheap cloning.
#[derive(Clone)]
pub struct AuthorizedConnection {
    provider: Arc<dyn TokenProvider>,
    transport: Option<Arc<dyn Transport>>,
    transport_factory: TransportFactory,
}

impl AuthorizedConnection {
    /// Creates a new `AuthorizedConnection` with the given `TokenProvider`.
    #[must_use]
    pub fn new(provider: impl TokenProvider) -> Self {
        Self::with_shared_provider(Arc::new(provider))
    }

    /// Creates a new `AuthorizedConnection` from a provider shared with other code.
    #[must_use]
    pub fn with_shared_provider(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            transport: None,
            transport_factory: default_transport_factory(),
        }
    }

    /// Set a transport shared by all calls.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set a custom `reqwest::Client` shared by all calls.
    #[must_use]
    pub fn with_client(self, client: reqwest::Client) -> Self {
        self.with_transport(Arc::new(client))
    }

    /// Set the factory used for calls when no shared transport is set.
    #[must_use]
    pub fn with_transport_factory(mut self, factory: TransportFactory) -> Self {
        self.transport_factory = factory;
        self
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn TokenProvider> {
        &self.provider
    }

    /// Obtain the authorization header value for the current token.
    ///
    /// # Errors
    /// - Returns the provider's error if it fails to provide a token.
    /// - Returns [`Error::MissingAccessToken`] if the provider has no token, or the token has
    ///   no access token.
    pub async fn authorization(&self) -> Result<String> {
        let token = self.provider.fetch_token().await.map_err(|e| {
            tracing::debug!("Failed to obtain token: {e}");
            e
        })?;

        token
            .as_ref()
            .and_then(Token::bearer_authorization)
            .ok_or_else(|| {
                tracing::debug!("Failed to obtain token: provider returned no access token.");
                Error::MissingAccessToken
            })
    }

    /// Fetch a token, build the request described by `spec` and dispatch it.
    ///
    /// # Errors
    /// - Returns an error if no token could be obtained. Nothing is sent in that case.
    /// - Returns an error if the request cannot be built, see [`build_request`].
    /// - Returns the transport's error if the request fails.
    #[tracing::instrument(skip(self, spec), fields(method = %spec.method, url = %spec.url))]
    pub async fn perform(&self, spec: RequestSpec) -> Result<Response> {
        let authorization = self.authorization().await?;
        let transport = self.transport();

        dispatch(&spec, &authorization, transport.as_ref()).await
    }

    /// Positional form of [`perform`](Self::perform).
    ///
    /// # Errors
    /// See [`perform`](Self::perform).
    pub async fn perform_request(
        &self,
        method: Method,
        url: &str,
        parameters: impl Into<Parameters>,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let spec = RequestSpec {
            method,
            url: url.to_string(),
            parameters: parameters.into(),
            body,
        };
        self.perform(spec).await
    }

    /// Convenience method for a request without parameters or body.
    ///
    /// # Errors
    /// See [`perform`](Self::perform).
    pub async fn perform_request_without_parameters(
        &self,
        method: Method,
        url: &str,
    ) -> Result<Response> {
        self.perform(RequestSpec::new(method, url)).await
    }

    /// Send a request with a pre-formatted authorization value, without a token provider.
    ///
    /// A transport is created with the default factory if `transport` is `None`.
    ///
    /// # Errors
    /// - Returns an error if the request cannot be built, see [`build_request`].
    /// - Returns the transport's error if the request fails.
    pub async fn perform_with_authorization(
        spec: RequestSpec,
        authorization: &str,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Response> {
        let transport = transport.unwrap_or_else(|| default_transport_factory()());

        dispatch(&spec, authorization, transport.as_ref()).await
    }

    fn transport(&self) -> Arc<dyn Transport> {
        match &self.transport {
            Some(transport) => transport.clone(),
            None => (self.transport_factory)(),
        }
    }
}

#[cfg(feature = "runtime-tokio")]
impl AuthorizedConnection {
    /// Run [`perform`](Self::perform) on the Tokio runtime and hand the outcome to `callback`.
    ///
    /// The callback is invoked once, on a runtime worker thread, including when no token could
    /// be obtained. If the task panics first (for example in the transport factory) or is
    /// aborted, the callback is not invoked; the panic or cancellation surfaces as a
    /// `JoinError` when awaiting the returned handle.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn perform_with_callback<F>(
        &self,
        spec: RequestSpec,
        callback: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<Response>) + Send + 'static,
    {
        let connection = self.clone();
        tokio::spawn(async move {
            let outcome = connection.perform(spec).await;
            callback(outcome);
        })
    }

    /// Positional form of [`perform_with_callback`](Self::perform_with_callback).
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn perform_request_with_callback<F>(
        &self,
        method: Method,
        url: &str,
        parameters: impl Into<Parameters>,
        body: Option<Vec<u8>>,
        callback: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<Response>) + Send + 'static,
    {
        let spec = RequestSpec {
            method,
            url: url.to_string(),
            parameters: parameters.into(),
            body,
        };
        self.perform_with_callback(spec, callback)
    }

    /// Callback form of [`perform_with_authorization`](Self::perform_with_authorization).
    ///
    /// Panics inside the task skip the callback, as for
    /// [`perform_with_callback`](Self::perform_with_callback).
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn perform_with_authorization_and_callback<F>(
        spec: RequestSpec,
        authorization: String,
        transport: Option<Arc<dyn Transport>>,
        callback: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<Response>) + Send + 'static,
    {
        tokio::spawn(async move {
            let outcome = Self::perform_with_authorization(spec, &authorization, transport).await;
            callback(outcome);
        })
    }
}

impl fmt::Debug for AuthorizedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedConnection")
            .field("shared_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

async fn dispatch(
    spec: &RequestSpec,
    authorization: &str,
    transport: &dyn Transport,
) -> Result<Response> {
    let request = build_request(spec, authorization)?;
    tracing::trace!("Dispatching `{}` request to `{}`.", request.method(), request.url());
    transport.dispatch(request).await
}
