use std::{
    future::Future,
    pin::Pin,
    task::{ready, Context, Poll},
};

use tokio::task::JoinHandle;

use crate::error::ChainError;

/// Settles with the outcome of one chained call.
///
/// Dropping it does not cancel the call: the link keeps its place in the
/// sequence and still feeds its state to the next link.
#[derive(Debug)]
pub struct ChainFuture<Res, C, R, T> {
    handle: JoinHandle<Result<Res, ChainError<C, R, T>>>,
}

impl<Res, C, R, T> ChainFuture<Res, C, R, T> {
    pub(crate) const fn new(handle: JoinHandle<Result<Res, ChainError<C, R, T>>>) -> Self {
        Self { handle }
    }
}

impl<Res, C, R, T> Future for ChainFuture<Res, C, R, T> {
    type Output = Result<Res, ChainError<C, R, T>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(Pin::new(&mut self.handle).poll(cx)) {
            Ok(outcome) => Poll::Ready(outcome),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Poll::Ready(Err(ChainError::Cancelled)),
        }
    }
}
