//! Retry policy: a bound on extra attempts plus the predicate that decides
//! whether a finished attempt is worth repeating.

use std::fmt;
use std::sync::Arc;

use reqwest::{Request, Response, StatusCode};

use crate::ClinkError;

/// What a single attempt produced.
#[derive(Clone, Copy, Debug)]
pub enum Outcome<'a> {
    /// The transport returned a response, whatever its status.
    Sent(&'a Response),
    /// The attempt failed before a response was received.
    Failed(&'a ClinkError),
}

impl<'a> Outcome<'a> {
    pub(crate) fn of(result: &'a Result<Response, ClinkError>) -> Self {
        match result {
            Ok(response) => Outcome::Sent(response),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Status code of the response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Outcome::Sent(response) => Some(response.status()),
            Outcome::Failed(_) => None,
        }
    }
}

/// Shared retry decision function.
pub type RetryPredicate = Arc<dyn Fn(&Request, Outcome<'_>) -> bool + Send + Sync>;

/// Maximum retry count and the predicate consulted before each retry.
///
/// The two are only meaningful together, so they are configured together.
#[derive(Clone)]
pub struct RetryPolicy {
    pub(crate) max_retries: usize,
    pub(crate) predicate: RetryPredicate,
}

impl RetryPolicy {
    /// Allows up to `max_retries` attempts after the first one, each gated by
    /// `predicate`.
    pub fn new<F>(max_retries: usize, predicate: F) -> Self
    where
        F: Fn(&Request, Outcome<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            max_retries,
            predicate: Arc::new(predicate),
        }
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("predicate", &"<fn>")
            .finish()
    }
}

/// Retries throttling and server-side failures plus transient network errors.
pub fn transient(_request: &Request, outcome: Outcome<'_>) -> bool {
    match outcome {
        Outcome::Sent(response) => matches!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        ),
        Outcome::Failed(ClinkError::Transport(err)) => {
            err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
        }
        Outcome::Failed(_) => false,
    }
}

/// Builds a predicate that retries only responses with one of `statuses`.
///
/// Failed attempts are never retried by this predicate.
pub fn on_status<I>(statuses: I) -> impl Fn(&Request, Outcome<'_>) -> bool + Send + Sync + 'static
where
    I: IntoIterator<Item = StatusCode>,
{
    let statuses: Vec<StatusCode> = statuses.into_iter().collect();
    move |_request: &Request, outcome: Outcome<'_>| {
        outcome
            .status()
            .is_some_and(|status| statuses.contains(&status))
    }
}
