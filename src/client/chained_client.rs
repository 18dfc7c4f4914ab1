use http::HeaderMap;
use reqwest::{Client, IntoUrl, Request, RequestBuilder, Response};

use crate::{
    chain::{ChainFuture, Chainer, ChainerConfig},
    error::ConfigurationError,
    propagate::HeaderPropagation,
    reduce::Reducer,
    transform::ArgsTransformer,
};

/// A [`reqwest::Client`] whose requests run one at a time, in the order they
/// were issued, each shaped by the response before it.
#[derive(Debug)]
pub struct ChainedClient<S = HeaderMap, R = HeaderPropagation, T = HeaderPropagation> {
    http_client: Client,
    chainer: Chainer<Response, S, R, T>,
}

impl ChainedClient {
    /// Carries the `headers` of each response into the next request.
    pub fn with_header_propagation(http_client: Client, propagation: HeaderPropagation) -> Self {
        let config = ChainerConfig::new()
            .reducer(propagation.clone())
            .args_transformer(propagation);

        match Chainer::new(config) {
            Ok(chainer) => Self::new(http_client, chainer),
            Err(ConfigurationError::InitialState(infallible)) => match infallible {},
        }
    }
}

impl<S, R, T> ChainedClient<S, R, T> {
    pub const fn new(http_client: Client, chainer: Chainer<Response, S, R, T>) -> Self {
        Self {
            http_client,
            chainer,
        }
    }

    pub const fn chainer(&self) -> &Chainer<Response, S, R, T> {
        &self.chainer
    }

    /// Starts a request on the underlying client. Send it with [`ChainedClient::send`].
    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.http_client.get(url)
    }

    pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.http_client.post(url)
    }
}

impl<S, R, T> ChainedClient<S, R, T>
where
    S: Send + 'static,
    R: Reducer<Response, S> + Send + Sync + 'static,
    R::Error: Send + 'static,
    T: ArgsTransformer<Request, S> + Send + Sync + 'static,
    T::Error: Send + 'static,
{
    #[tracing::instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub fn execute(&self, request: Request) -> ChainFuture<Response, reqwest::Error, R::Error, T::Error> {
        let http_client = self.http_client.clone();

        self.chainer.chain(
            move |request| async move { http_client.execute(request).await },
            request,
        )
    }

    /// Builds the request and admits it to the chain.
    ///
    /// Fails right away, without taking a place in the sequence, if the
    /// request cannot be built.
    pub fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<ChainFuture<Response, reqwest::Error, R::Error, T::Error>, reqwest::Error> {
        let request = request.build()?;

        Ok(self.execute(request))
    }
}

impl<S, R, T> Clone for ChainedClient<S, R, T> {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            chainer: self.chainer.clone(),
        }
    }
}
