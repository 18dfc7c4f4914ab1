use std::future::Future;

use tokio::sync::oneshot;

use crate::{error::ChainError, reduce::Reducer, transform::ArgsTransformer};

use super::config::FailurePolicy;

/// What a settled link hands to the link admitted after it.
#[derive(Debug)]
pub(crate) enum LinkState<S> {
    Ready(S),
    Poisoned,
}

/// Sending half of a link's state hand-off, holding the prior state.
///
/// Dropping it without settling forwards the prior state, so the next link
/// never waits forever. A panic under [`FailurePolicy::Poison`] forwards
/// [`LinkState::Poisoned`] instead.
#[derive(Debug)]
struct Handoff<S> {
    next: Option<oneshot::Sender<LinkState<S>>>,
    prior: Option<LinkState<S>>,
    failure_policy: FailurePolicy,
}

impl<S> Handoff<S> {
    fn new(
        next: oneshot::Sender<LinkState<S>>,
        prior: LinkState<S>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            next: Some(next),
            prior: Some(prior),
            failure_policy,
        }
    }

    fn state(&self) -> Option<&S> {
        match &self.prior {
            Some(LinkState::Ready(state)) => Some(state),
            _ => None,
        }
    }

    fn send(&mut self, state: LinkState<S>) {
        if let Some(next) = self.next.take() {
            // The receiver is gone only when the chainer and every later link are.
            let _ = next.send(state);
        }
    }

    fn settle(mut self, state: S) {
        self.send(LinkState::Ready(state));
    }

    /// Hands on whatever the failure policy dictates after this link failed.
    fn fail<Res, R>(mut self, reducer: &R)
    where
        R: Reducer<Res, S>,
    {
        match self.failure_policy {
            FailurePolicy::Poison => {
                tracing::debug!("Poisoning chain");

                self.send(LinkState::Poisoned);
            }
            FailurePolicy::Isolate => match reducer.reduce(None, self.state()) {
                Ok(state) => self.settle(state),
                Err(_) => {
                    tracing::warn!("Reducer failed after a failed call, carrying prior state forward");
                }
            },
        }
    }
}

impl<S> Drop for Handoff<S> {
    fn drop(&mut self) {
        let Some(prior) = self.prior.take() else {
            return;
        };

        if std::thread::panicking() && self.failure_policy == FailurePolicy::Poison {
            tracing::debug!("Poisoning chain after a panic");

            self.send(LinkState::Poisoned);

            return;
        }

        self.send(prior);
    }
}

/// One admitted call, waiting on the state of the link before it.
#[derive(Debug)]
pub(crate) struct Link<S> {
    id: u64,
    prev: oneshot::Receiver<LinkState<S>>,
    next: oneshot::Sender<LinkState<S>>,
    failure_policy: FailurePolicy,
}

impl<S> Link<S> {
    pub(crate) const fn new(
        id: u64,
        prev: oneshot::Receiver<LinkState<S>>,
        next: oneshot::Sender<LinkState<S>>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            id,
            prev,
            next,
            failure_policy,
        }
    }

    /// Drives the link through `Pending`, `Transforming`, `Calling` and
    /// finally `Settled` or `Failed`.
    #[tracing::instrument(name = "link", skip_all, fields(link = self.id))]
    pub(crate) async fn run<Res, A, F, Fut, E, R, T>(
        self,
        reducer: &R,
        args_transformer: &T,
        call: F,
        args: A,
    ) -> Result<Res, ChainError<E, R::Error, T::Error>>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<Res, E>>,
        R: Reducer<Res, S>,
        T: ArgsTransformer<A, S>,
    {
        tracing::trace!("Pending");

        let Ok(prior) = self.prev.await else {
            tracing::debug!("Previous link vanished before settling");

            return Err(ChainError::Cancelled);
        };

        let handoff = Handoff::new(self.next, prior, self.failure_policy);

        let transformed = match handoff.state() {
            Some(state) => {
                tracing::trace!("Transforming");

                args_transformer.transform(args, state)
            }
            None => {
                tracing::debug!("Failed: chain poisoned");

                return Err(ChainError::Poisoned);
            }
        };

        let args = match transformed {
            Ok(args) => args,
            Err(err) => {
                tracing::debug!("Failed: args transformer error");

                handoff.fail::<Res, R>(reducer);

                return Err(ChainError::Transform(err));
            }
        };

        tracing::trace!("Calling");

        let response = match call(args).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!("Failed: call error");

                handoff.fail::<Res, R>(reducer);

                return Err(ChainError::Call(err));
            }
        };

        match reducer.reduce(Some(&response), handoff.state()) {
            Ok(state) => {
                tracing::trace!("Settled");

                handoff.settle(state);

                Ok(response)
            }
            Err(err) => {
                tracing::debug!("Failed: reducer error");

                if handoff.failure_policy == FailurePolicy::Poison {
                    handoff.fail::<Res, R>(reducer);
                }

                Err(ChainError::Reduce(err))
            }
        }
    }
}
