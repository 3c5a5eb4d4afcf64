//! `clink` is an async HTTP request executor built on `reqwest`.
//!
//! A [`Client`] wraps a transport with cross-cutting behavior configured once
//! through [`ClientOption`] directives:
//! - default headers, Basic/Bearer authentication and `User-Agent`
//! - an outbound rate limit shared by every request on the client
//! - a retry bound plus a caller-supplied predicate ([`RetryPolicy`])
//!
//! [`Client::execute`] runs the request pipeline and [`decode_json`] turns a
//! response body into a typed value.
//!
//! ```no_run
//! use clink::{retry, Client, ClientOption, RetryPolicy};
//!
//! # async fn run() -> clink::Result<()> {
//! let client = Client::new([
//!     ClientOption::bearer_auth("token"),
//!     ClientOption::rate_limit(120),
//!     ClientOption::retries(RetryPolicy::new(3, retry::transient)),
//! ]);
//! let request = reqwest::Request::new(
//!     reqwest::Method::GET,
//!     "https://example.com/items".parse().expect("valid url"),
//! );
//! let response = client.execute(request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod client;
mod decode;
mod error;
mod options;
mod rate_limit;
pub mod retry;

pub use client::Client;
pub use decode::decode_json;
pub use error::ClinkError;
pub use options::ClientOption;
pub use rate_limit::RateLimiter;
pub use retry::{Outcome, RetryPolicy, RetryPredicate};

pub type Result<T> = std::result::Result<T, ClinkError>;
