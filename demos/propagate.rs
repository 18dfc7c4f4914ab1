//! Run with
//!
//! ```not_rust
//! BASE_URL=http://127.0.0.1:5000 cargo run --example propagate
//! ```
//!
//! Every response's `x-value` header is sent along with the next request.

use anyhow::Context;
use api_chainer::{client::ChainedClient, propagate::HeaderPropagation};
use reqwest::Client;

#[path = "../util/util.rs"]
mod util;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init("propagate")?;

    let base_url = util::base_url();

    let headers = std::env::var("PROPAGATE_HEADERS").unwrap_or_else(|_| String::from("x-value"));

    let propagation = HeaderPropagation::try_from_names(headers.split(','))
        .context("Invalid PROPAGATE_HEADERS")?;

    tracing::info!(%base_url, ?propagation, "Chaining requests");

    let client = ChainedClient::with_header_propagation(Client::new(), propagation);

    // Issued back to back, sent one after the other.
    let requests = ["/1/1", "/1/2", "/1/3"]
        .into_iter()
        .map(|path| client.send(client.get(format!("{base_url}{path}"))))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to build request")?;

    for request in requests {
        let response = request.await.context("Request failed")?;

        tracing::info!(
            url = %response.url(),
            status = %response.status(),
            x_value = ?response.headers().get("x-value"),
            "Response"
        );
    }

    Ok(())
}
