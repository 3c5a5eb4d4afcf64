use std::collections::HashMap;

use clink::{decode_json, Client, ClientOption};
use reqwest::{Method, Request};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("CLINK_DEMO_URL")?;

    let client = Client::from_env()?.with_option(ClientOption::user_agent("clink-demo/0.1"));

    let request = Request::new(Method::GET, url.parse()?);
    let response = client.execute(request).await?;
    println!("status: {}", response.status());

    let body: HashMap<String, serde_json::Value> = decode_json(Some(response)).await?;
    for (key, value) in body {
        println!("{key}: {value}");
    }

    Ok(())
}
