use std::{
    fmt,
    future::poll_fn,
    task::{Context, Poll},
};

use tower::Service;

use crate::{
    chain::{ChainFuture, Chainer},
    error::ChainError,
    reduce::Reducer,
    transform::ArgsTransformer,
};

/// Sends each request through a [`Chainer`] before it reaches the inner service.
///
/// Readiness of the inner service is driven inside the link, right before
/// the request is sent, so `poll_ready` on this service is always ready.
pub struct ChainService<Svc, Res, S, R, T> {
    service: Svc,
    chainer: Chainer<Res, S, R, T>,
}

impl<Svc, Res, S, R, T> ChainService<Svc, Res, S, R, T> {
    pub const fn new(service: Svc, chainer: Chainer<Res, S, R, T>) -> Self {
        Self { service, chainer }
    }

    pub const fn chainer(&self) -> &Chainer<Res, S, R, T> {
        &self.chainer
    }

    pub fn into_inner(self) -> Svc {
        self.service
    }
}

impl<Svc, Res, S, R, T> fmt::Debug for ChainService<Svc, Res, S, R, T>
where
    Svc: fmt::Debug,
    Chainer<Res, S, R, T>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainService")
            .field("service", &self.service)
            .field("chainer", &self.chainer)
            .finish()
    }
}

impl<Svc, Res, S, R, T> Clone for ChainService<Svc, Res, S, R, T>
where
    Svc: Clone,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            chainer: self.chainer.clone(),
        }
    }
}

impl<Svc, Req, Res, S, R, T> Service<Req> for ChainService<Svc, Res, S, R, T>
where
    Svc: Service<Req, Response = Res> + Clone + Send + 'static,
    Svc::Future: Send + 'static,
    Svc::Error: Send + 'static,
    Req: Send + 'static,
    Res: Send + 'static,
    S: Send + 'static,
    R: Reducer<Res, S> + Send + Sync + 'static,
    R::Error: Send + 'static,
    T: ArgsTransformer<Req, S> + Send + Sync + 'static,
    T::Error: Send + 'static,
{
    type Response = Res;
    type Error = ChainError<Svc::Error, R::Error, T::Error>;
    type Future = ChainFuture<Res, Svc::Error, R::Error, T::Error>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    #[tracing::instrument(skip_all)]
    fn call(&mut self, request: Req) -> Self::Future {
        let mut service = self.service.clone();

        self.chainer.chain(
            move |request| async move {
                poll_fn(|cx| service.poll_ready(cx)).await?;

                service.call(request).await
            },
            request,
        )
    }
}
