use std::collections::HashMap;
use std::fmt;

use base64::Engine as _;

use crate::{Client, ClinkError, RateLimiter, Result, RetryPolicy};

pub(crate) const AUTHORIZATION: &str = "Authorization";
const USER_AGENT: &str = "User-Agent";

/// A single configuration directive applied by [`Client::new`].
///
/// Directives are applied in order, so a later directive overrides an
/// earlier one touching the same field.
#[derive(Clone)]
pub enum ClientOption {
    /// Sets the transport. `None` leaves the client unable to send.
    Transport(Option<reqwest::Client>),
    /// Replaces the whole default header map.
    Headers(HashMap<String, String>),
    /// Sets or overwrites one default header.
    Header(String, String),
    /// Rate limit in events per minute. `0` removes the limiter.
    RateLimit(u32),
    /// `Authorization: Basic base64(username:password)`.
    BasicAuth { username: String, password: String },
    /// `Authorization: Bearer <token>`.
    BearerAuth(String),
    /// `User-Agent: <value>`.
    UserAgent(String),
    /// Retry bound and predicate.
    Retries(RetryPolicy),
}

impl ClientOption {
    pub fn transport(http: reqwest::Client) -> Self {
        ClientOption::Transport(Some(http))
    }

    pub fn no_transport() -> Self {
        ClientOption::Transport(None)
    }

    pub fn headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ClientOption::Headers(
            headers
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn header(key: impl Into<String>, value: impl Into<String>) -> Self {
        ClientOption::Header(key.into(), value.into())
    }

    pub fn rate_limit(per_minute: u32) -> Self {
        ClientOption::RateLimit(per_minute)
    }

    pub fn basic_auth(username: impl Into<String>, password: impl Into<String>) -> Self {
        ClientOption::BasicAuth {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer_auth(token: impl Into<String>) -> Self {
        ClientOption::BearerAuth(token.into())
    }

    pub fn user_agent(user_agent: impl Into<String>) -> Self {
        ClientOption::UserAgent(user_agent.into())
    }

    pub fn retries(policy: RetryPolicy) -> Self {
        ClientOption::Retries(policy)
    }

    /// Reads directives from `CLINK_*` environment variables.
    ///
    /// Reads:
    /// - `CLINK_USER_AGENT`
    /// - `CLINK_BEARER_TOKEN`
    /// - `CLINK_BASIC_USERNAME` and `CLINK_BASIC_PASSWORD` (both or neither)
    /// - `CLINK_RATE_LIMIT` (events per minute)
    ///
    /// Unset or blank variables are skipped.
    pub fn from_env() -> Result<Vec<Self>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Vec<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut options = Vec::new();

        if let Some(user_agent) = read("CLINK_USER_AGENT") {
            options.push(Self::user_agent(user_agent));
        }

        let bearer = read("CLINK_BEARER_TOKEN");
        let basic = match (read("CLINK_BASIC_USERNAME"), read("CLINK_BASIC_PASSWORD")) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            _ => {
                return Err(ClinkError::Config(
                    "CLINK_BASIC_USERNAME and CLINK_BASIC_PASSWORD must be set together"
                        .to_owned(),
                ))
            }
        };
        match (bearer, basic) {
            (Some(_), Some(_)) => {
                return Err(ClinkError::Config(
                    "CLINK_BEARER_TOKEN and CLINK_BASIC_* are mutually exclusive".to_owned(),
                ))
            }
            (Some(token), None) => options.push(Self::bearer_auth(token.trim())),
            (None, Some((username, password))) => {
                options.push(Self::basic_auth(username, password))
            }
            (None, None) => {}
        }

        if let Some(raw) = read("CLINK_RATE_LIMIT") {
            let per_minute = raw.trim().parse::<u32>().map_err(|err| {
                ClinkError::Config(format!("invalid CLINK_RATE_LIMIT '{raw}': {err}"))
            })?;
            options.push(Self::rate_limit(per_minute));
        }

        Ok(options)
    }

    pub(crate) fn apply(self, client: &mut Client) {
        match self {
            ClientOption::Transport(http) => client.transport = http,
            ClientOption::Headers(headers) => client.headers = headers,
            ClientOption::Header(key, value) => {
                client.headers.insert(key, value);
            }
            ClientOption::RateLimit(per_minute) => {
                client.rate_limiter = RateLimiter::per_minute(per_minute);
            }
            ClientOption::BasicAuth { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                client
                    .headers
                    .insert(AUTHORIZATION.to_owned(), format!("Basic {encoded}"));
            }
            ClientOption::BearerAuth(token) => {
                client
                    .headers
                    .insert(AUTHORIZATION.to_owned(), format!("Bearer {token}"));
            }
            ClientOption::UserAgent(user_agent) => {
                client.headers.insert(USER_AGENT.to_owned(), user_agent);
            }
            ClientOption::Retries(policy) => {
                client.max_retries = policy.max_retries;
                client.retry_predicate = Some(policy.predicate);
            }
        }
    }
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::Transport(http) => f
                .debug_tuple("Transport")
                .field(&http.as_ref().map(|_| "reqwest::Client"))
                .finish(),
            ClientOption::Headers(headers) => f
                .debug_tuple("Headers")
                .field(&headers.keys().collect::<Vec<_>>())
                .finish(),
            ClientOption::Header(key, _) => f.debug_tuple("Header").field(key).finish(),
            ClientOption::RateLimit(per_minute) => {
                f.debug_tuple("RateLimit").field(per_minute).finish()
            }
            ClientOption::BasicAuth { username, .. } => f
                .debug_struct("BasicAuth")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            ClientOption::BearerAuth(_) => {
                f.debug_tuple("BearerAuth").field(&"<redacted>").finish()
            }
            ClientOption::UserAgent(user_agent) => {
                f.debug_tuple("UserAgent").field(user_agent).finish()
            }
            ClientOption::Retries(policy) => f.debug_tuple("Retries").field(policy).finish(),
        }
    }
}
