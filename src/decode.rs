use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::{ClinkError, Result};

/// Reads the whole response body and decodes it as JSON.
///
/// A missing response and an empty body are reported as
/// [`ClinkError::NoResponse`] and [`ClinkError::EmptyBody`] so callers can
/// tell them apart from malformed JSON ([`ClinkError::Decode`]).
///
/// # Example
///
/// ```no_run
/// use std::collections::HashMap;
///
/// # async fn run(client: clink::Client, request: reqwest::Request) -> clink::Result<()> {
/// let response = client.execute(request).await?;
/// let body: HashMap<String, String> = clink::decode_json(Some(response)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn decode_json<T: DeserializeOwned>(response: Option<Response>) -> Result<T> {
    let response = response.ok_or(ClinkError::NoResponse)?;
    let body = response.bytes().await.map_err(ClinkError::Transport)?;
    if body.is_empty() {
        return Err(ClinkError::EmptyBody);
    }

    serde_json::from_slice(&body).map_err(ClinkError::Decode)
}
