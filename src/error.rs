/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ClinkError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The client was configured without a transport.
    #[error("no transport configured")]
    NoTransport,
    /// A configured header name or value is not valid HTTP.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },
    /// There was no response to decode.
    #[error("response is missing")]
    NoResponse,
    /// The response carried no body content.
    #[error("response body is empty")]
    EmptyBody,
    /// The response body is not valid JSON for the requested type.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    /// Configuration loaded from the environment is malformed.
    #[error("config error: {0}")]
    Config(String),
}
