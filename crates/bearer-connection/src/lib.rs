//! Attach `OAuth2` bearer tokens to outgoing HTTP requests.
//!
//! An [`AuthorizedConnection`] asks a [`TokenProvider`] for the current token before every
//! request, builds the request with [`build_request`] and dispatches it over a [`Transport`]
//! (a shared `reqwest::Client` by default).
//!
//! ```no_run
//! # async fn run() -> bearer_connection::Result<()> {
//! use bearer_connection::{http::Method, AuthorizedConnection, StaticTokenProvider};
//!
//! let connection = AuthorizedConnection::new(StaticTokenProvider::new("my-token")?)
//!     .with_client(reqwest::Client::new());
//! let response = connection
//!     .perform_request(Method::GET, "https://api.example.com/items", [("page", "2")], None)
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![forbid(unsafe_code)]

mod connection;
pub mod error;
mod providers;
mod request;
mod transport;

pub use connection::*;
pub use error::{Error, Result};
pub use http;
pub use providers::*;
pub use request::*;
pub use transport::*;
