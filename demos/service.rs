//! Run with
//!
//! ```not_rust
//! BASE_URL=http://127.0.0.1:5000 cargo run --example service
//! ```
//!
//! A `reqwest::Client` used as a tower service, wrapped in a `ChainLayer`
//! that forwards a session cursor from each response to the next request.

use std::future::poll_fn;

use anyhow::Context;
use api_chainer::{
    chain::{Chainer, ChainerConfig, FailurePolicy},
    reduce::ReduceFn,
    service::ChainLayerExt,
    transform::TransformFn,
};
use http::HeaderValue;
use reqwest::{Client, Request, Response};
use tower::{Layer, Service};

#[path = "../util/util.rs"]
mod util;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init("service")?;

    let base_url = util::base_url();

    let chainer = Chainer::new(
        ChainerConfig::new()
            .reducer(ReduceFn::new(
                |response: Option<&Response>, cursor: Option<&Option<HeaderValue>>| {
                    response
                        .and_then(|response| response.headers().get("x-cursor").cloned())
                        .or_else(|| cursor.cloned().flatten())
                },
            ))
            .args_transformer(TransformFn::new(
                |mut request: Request, cursor: &Option<HeaderValue>| {
                    if let Some(cursor) = cursor {
                        request.headers_mut().insert("x-cursor", cursor.clone());
                    }

                    request
                },
            ))
            .failure_policy(FailurePolicy::Poison),
    )
    .context("Failed to create chainer")?;

    let http_client = Client::new();

    let mut service = chainer.layer().layer(http_client.clone());

    let mut pages = Vec::new();

    for page in 1..=3 {
        let request = http_client
            .get(format!("{base_url}/pages/{page}"))
            .build()
            .context("Failed to build request")?;

        poll_fn(|cx| service.poll_ready(cx))
            .await
            .context("Service not ready")?;

        pages.push(service.call(request));
    }

    for page in pages {
        let response = page.await.context("Request failed")?;

        tracing::info!(url = %response.url(), status = %response.status(), "Page");
    }

    Ok(())
}
