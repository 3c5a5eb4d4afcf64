use clink::{Client, ClientOption, Outcome, RetryPolicy};
use reqwest::{Method, Request, StatusCode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("CLINK_DEMO_URL")?;

    let client = Client::new([
        ClientOption::rate_limit(30),
        ClientOption::retries(RetryPolicy::new(4, |request, outcome| {
            let retry = match outcome {
                Outcome::Sent(response) => response.status() == StatusCode::INTERNAL_SERVER_ERROR,
                Outcome::Failed(err) => {
                    eprintln!("{} {} failed: {err}", request.method(), request.url());
                    true
                }
            };
            if retry {
                eprintln!("retrying {}", request.url());
            }
            retry
        })),
    ]);

    let response = client.execute(Request::new(Method::GET, url.parse()?)).await?;
    println!("final status: {}", response.status());

    Ok(())
}
