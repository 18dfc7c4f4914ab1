use std::{
    fmt,
    future::Future,
    marker::PhantomData,
    ops::Deref,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::oneshot;

use crate::{
    error::ConfigurationError,
    reduce::{DefaultReducer, Reducer},
    transform::{ArgsTransformer, DefaultTransformer},
};

use super::{
    config::{ChainerConfig, FailurePolicy},
    future::ChainFuture,
    link::{Link, LinkState},
};

/// The most recently admitted link.
#[derive(Debug)]
struct Tail<S> {
    link: oneshot::Receiver<LinkState<S>>,
    admitted: u64,
}

#[derive(Debug)]
pub struct ChainerInner<S, R, T> {
    reducer: R,
    args_transformer: T,
    failure_policy: FailurePolicy,
    tail: Mutex<Tail<S>>,
}

impl<S, R, T> ChainerInner<S, R, T> {
    pub const fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub const fn reducer(&self) -> &R {
        &self.reducer
    }

    pub const fn args_transformer(&self) -> &T {
        &self.args_transformer
    }

    /// Swaps in a fresh tail and returns the link it replaced.
    fn admit(&self) -> Link<S> {
        let (next, link) = oneshot::channel();

        let mut tail = self.tail.lock().unwrap_or_else(PoisonError::into_inner);

        let prev = std::mem::replace(&mut tail.link, link);

        tail.admitted += 1;

        Link::new(tail.admitted, prev, next, self.failure_policy)
    }
}

/// Runs calls one at a time in the order they were chained, threading the
/// state derived from each response into the arguments of the next call.
///
/// Clones share the same sequence.
pub struct Chainer<Res, S = (), R = DefaultReducer, T = DefaultTransformer> {
    inner: Arc<ChainerInner<S, R, T>>,
    _phantom: PhantomData<fn() -> Res>,
}

impl<Res, S, R, T> Chainer<Res, S, R, T>
where
    R: Reducer<Res, S>,
{
    /// Creates a chainer whose root link already holds the zero state
    /// `reducer.reduce(None, None)`.
    pub fn new(config: ChainerConfig<R, T>) -> Result<Self, ConfigurationError<R::Error>> {
        let (reducer, args_transformer, failure_policy) = config.into_parts();

        let state = reducer
            .reduce(None, None)
            .map_err(ConfigurationError::InitialState)?;

        let (root, link) = oneshot::channel();

        // The receiver lives in the tail we are about to build.
        let _ = root.send(LinkState::Ready(state));

        tracing::debug!(?failure_policy, "Chainer created");

        Ok(Self {
            inner: Arc::new(ChainerInner {
                reducer,
                args_transformer,
                failure_policy,
                tail: Mutex::new(Tail { link, admitted: 0 }),
            }),
            _phantom: PhantomData,
        })
    }
}

impl<Res, S, R, T> Chainer<Res, S, R, T>
where
    Res: Send + 'static,
    S: Send + 'static,
    R: Reducer<Res, S> + Send + Sync + 'static,
    R::Error: Send + 'static,
{
    /// Admits `call(args)` at the end of the sequence.
    ///
    /// The call is ordered after every call chained before this method
    /// returns. Its args are transformed with the state left by the previous
    /// call, and its response is folded into the state seen by the next one.
    ///
    /// The link runs on the tokio runtime whether or not the returned future
    /// is awaited.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn chain<A, F, Fut, E>(&self, call: F, args: A) -> ChainFuture<Res, E, R::Error, T::Error>
    where
        A: Send + 'static,
        F: FnOnce(A) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Res, E>> + Send + 'static,
        E: Send + 'static,
        T: ArgsTransformer<A, S> + Send + Sync + 'static,
        T::Error: Send + 'static,
    {
        let link = self.inner.admit();

        let inner = self.inner.clone();

        let handle = tokio::spawn(async move {
            link.run(&inner.reducer, &inner.args_transformer, call, args)
                .await
        });

        ChainFuture::new(handle)
    }
}

impl<Res> Chainer<Res> {
    /// Creates a chainer that passes args through unchanged and keeps `()` as state.
    pub fn new_default() -> Self {
        match Self::new(ChainerConfig::new()) {
            Ok(chainer) => chainer,
            Err(ConfigurationError::InitialState(infallible)) => match infallible {},
        }
    }
}

impl<Res> Default for Chainer<Res> {
    fn default() -> Self {
        Self::new_default()
    }
}

impl<Res, S, R, T> Clone for Chainer<Res, S, R, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<Res, S, R, T> fmt::Debug for Chainer<Res, S, R, T>
where
    ChainerInner<S, R, T>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chainer")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<Res, S, R, T> Deref for Chainer<Res, S, R, T> {
    type Target = ChainerInner<S, R, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
