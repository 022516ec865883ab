//! Construction of authorized requests.
//!
//! [`build_request`] turns a [`RequestSpec`] and a pre-formatted authorization value into an
//! immutable [`RequestDescriptor`]. No I/O happens here.
//!
//! Parameters are placed according to the method and body:
//! * `GET`, or any request carrying a body: parameters are appended to the URL query, after
//!   the items already present in the URL. Bodies supplied for `GET` and `HEAD` are dropped.
//! * Any other method without a body: the URL query items followed by the parameters are
//!   form-encoded into the body, and the URL is left untouched.
use std::collections::{BTreeMap, HashMap};

use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderValue, Method,
};
use typed_builder::TypedBuilder;
use url::{form_urlencoded, Url};

use crate::error::{Error, Result};

const APPLICATION_JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Ordered key/value pairs attached to a request.
///
/// Pairs keep their insertion order. Conversions from unordered maps sort by key so that the
/// same map always produces the same request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(String, String)>);

impl Parameters {
    /// Create an empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> ParametersIter<'_> {
        ParametersIter(self.0.iter())
    }
}

/// Iterator over the pairs of [`Parameters`].
#[derive(Debug, Clone)]
pub struct ParametersIter<'a>(std::slice::Iter<'a, (String, String)>);

impl<'a> Iterator for ParametersIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a str, &'a str);
    type IntoIter = ParametersIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Parameters {
    fn from(value: Vec<(K, V)>) -> Self {
        value.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Parameters {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for Parameters {
    fn from(value: BTreeMap<K, V>) -> Self {
        value.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>, S> From<HashMap<K, V, S>> for Parameters {
    fn from(value: HashMap<K, V, S>) -> Self {
        let mut pairs: Vec<(String, String)> = value
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        pairs.sort();
        Self(pairs)
    }
}

/// Everything a caller supplies for a single request, except authorization.
///
/// ```
/// use bearer_connection::{http::Method, RequestSpec};
///
/// let spec = RequestSpec::builder()
///     .method(Method::POST)
///     .url("https://api.example.com/items")
///     .parameters([("a", "b")])
///     .build();
/// assert!(spec.body.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RequestSpec {
    pub method: Method,
    #[builder(setter(into))]
    pub url: String,
    #[builder(default, setter(into))]
    pub parameters: Parameters,
    /// Raw body bytes, sent verbatim as JSON.
    #[builder(default, setter(strip_option, into))]
    pub body: Option<Vec<u8>>,
}

impl RequestSpec {
    /// A request without parameters or body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            parameters: Parameters::new(),
            body: None,
        }
    }
}

/// A fully built request, ready to be handed to a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Convert into a `reqwest::Request` for execution.
    #[must_use]
    pub fn into_reqwest(self) -> reqwest::Request {
        let mut request = reqwest::Request::new(self.method, self.url);
        *request.headers_mut() = self.headers;
        if let Some(body) = self.body {
            *request.body_mut() = Some(body.into());
        }
        request
    }
}

/// Build a request from `spec`, setting `Authorization` to `authorization` verbatim.
///
/// # Errors
/// - [`Error::InvalidUrl`] if `spec.url` is not an absolute URL.
/// - [`Error::InvalidHeaderValue`] if `authorization` is not a valid ASCII header value.
pub fn build_request(spec: &RequestSpec, authorization: &str) -> Result<RequestDescriptor> {
    let mut url = Url::parse(&spec.url)?;
    let authorization = authorization_header(authorization)?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);

    let body = match &spec.body {
        Some(body) if !is_bodiless(&spec.method) => {
            append_query(&mut url, &spec.parameters);
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            Some(body.clone())
        }
        Some(_) => {
            tracing::debug!(
                "Dropping body of `{}` request to `{url}`: method cannot carry a body.",
                spec.method
            );
            append_query(&mut url, &spec.parameters);
            None
        }
        None if spec.method == Method::GET => {
            append_query(&mut url, &spec.parameters);
            None
        }
        None => {
            let form = form_body(&url, &spec.parameters);
            if form.is_empty() && !requires_body(&spec.method) {
                None
            } else {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
                Some(form.into_bytes())
            }
        }
    };

    Ok(RequestDescriptor {
        method: spec.method.clone(),
        url,
        headers,
        body,
    })
}

fn authorization_header(authorization: &str) -> Result<HeaderValue> {
    if !authorization.is_ascii() {
        return Err(Error::InvalidHeaderValue);
    }
    let mut header = HeaderValue::from_str(authorization).map_err(|_e| Error::InvalidHeaderValue)?;
    header.set_sensitive(true);
    Ok(header)
}

fn is_bodiless(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

// POST and PUT always get a (possibly empty) form body when no body is supplied.
fn requires_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

fn append_query(url: &mut Url, parameters: &Parameters) {
    // `query_pairs_mut` would leave a trailing `?` behind even without pairs.
    if parameters.is_empty() {
        return;
    }
    url.query_pairs_mut().extend_pairs(parameters.iter());
}

fn form_body(url: &Url, parameters: &Parameters) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(url.query_pairs());
    serializer.extend_pairs(parameters.iter());
    serializer.finish()
}
