use std::collections::{BTreeMap, HashMap};
use std::fmt;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Request, Response};

use crate::{
    options::AUTHORIZATION,
    retry::{Outcome, RetryPredicate},
    ClientOption, ClinkError, RateLimiter, Result,
};

#[derive(Clone)]
/// HTTP request executor with default headers, rate limiting and retries.
///
/// Configuration is fixed once the client is built. Clones share the same
/// transport pool, rate limiter state and retry predicate, so a client can
/// be cloned freely into concurrent tasks.
pub struct Client {
    pub(crate) transport: Option<reqwest::Client>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) rate_limiter: Option<RateLimiter>,
    pub(crate) max_retries: usize,
    pub(crate) retry_predicate: Option<RetryPredicate>,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            transport: Some(reqwest::Client::new()),
            headers: HashMap::new(),
            rate_limiter: None,
            max_retries: 0,
            retry_predicate: None,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(AUTHORIZATION) {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("Client")
            .field("transport", &self.transport.is_some())
            .field("headers", &headers)
            .field("rate_limiter", &self.rate_limiter)
            .field("max_retries", &self.max_retries)
            .field(
                "retry_predicate",
                &self.retry_predicate.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

impl Client {
    /// Builds a client by applying `options` in order to the defaults.
    ///
    /// Defaults: a fresh `reqwest::Client`, no headers, no rate limit and
    /// no retries.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ClientOption>,
    {
        options
            .into_iter()
            .fold(Self::default(), |client, option| client.with_option(option))
    }

    /// Applies one more directive.
    pub fn with_option(mut self, option: ClientOption) -> Self {
        option.apply(&mut self);
        self
    }

    /// Creates a client from `CLINK_*` environment variables.
    ///
    /// See [`ClientOption::from_env`] for the variables read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use clink::Client;
    ///
    /// let client = Client::from_env().expect("malformed CLINK_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientOption::from_env()?))
    }

    pub fn transport(&self) -> Option<&reqwest::Client> {
        self.transport.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.rate_limiter.as_ref()
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn has_retry_predicate(&self) -> bool {
        self.retry_predicate.is_some()
    }

    /// Sends `request`, retrying while the predicate asks for it and the
    /// retry budget lasts.
    ///
    /// Every attempt gets the configured headers, waits for one rate limiter
    /// admission and goes through the transport once. Non-success statuses
    /// are returned as `Ok`; only the predicate decides whether they are
    /// worth another attempt. When the budget runs out the last outcome is
    /// returned as-is.
    ///
    /// A request whose body cannot be cloned is sent exactly once.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let mut attempt = 0usize;
        loop {
            self.apply_headers(&mut request)?;

            // `request` is kept for the predicate and the next attempt.
            let replay = if self.retry_predicate.is_some() && attempt < self.max_retries {
                request.try_clone()
            } else {
                None
            };

            self.admit().await;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt,
                method = %request.method(),
                url = %request.url(),
                "sending request"
            );

            let Some(outgoing) = replay else {
                return self.send(request).await;
            };

            let result = self.send(outgoing).await;
            if !self.should_retry(&request, &result) {
                return result;
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, "retry predicate requested another attempt");

            // Release the discarded response and its connection before retrying.
            drop(result);
            attempt += 1;
        }
    }

    fn apply_headers(&self, request: &mut Request) -> Result<()> {
        for (name, value) in &self.headers {
            let invalid = || {
                #[cfg(feature = "tracing")]
                tracing::warn!(header = %name, "configured header is not valid HTTP");
                ClinkError::InvalidHeader { name: name.clone() }
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let mut header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            if header_name == reqwest::header::AUTHORIZATION {
                header_value.set_sensitive(true);
            }
            request.headers_mut().insert(header_name, header_value);
        }
        Ok(())
    }

    async fn admit(&self) {
        if let Some(limiter) = &self.rate_limiter {
            #[cfg(feature = "tracing")]
            tracing::trace!(per_second = limiter.limit(), "waiting for rate limiter");
            limiter.acquire().await;
        }
    }

    async fn send(&self, request: Request) -> Result<Response> {
        match &self.transport {
            Some(http) => http.execute(request).await.map_err(ClinkError::Transport),
            None => Err(ClinkError::NoTransport),
        }
    }

    fn should_retry(&self, request: &Request, result: &Result<Response>) -> bool {
        self.retry_predicate
            .as_ref()
            .is_some_and(|predicate| predicate(request, Outcome::of(result)))
    }
}
