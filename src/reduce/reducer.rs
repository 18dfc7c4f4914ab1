use std::{convert::Infallible, marker::PhantomData};

/// Derives the next chain state from a response and the prior state.
///
/// `response` is `None` when the zero state is computed at construction, and
/// when a link failed under [`FailurePolicy::Isolate`](crate::chain::FailurePolicy::Isolate).
/// `state` is `None` only for the zero state.
pub trait Reducer<Res, S> {
    type Error;

    fn reduce(&self, response: Option<&Res>, state: Option<&S>) -> Result<S, Self::Error>;
}

/// Ignores its inputs and yields `()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReducer;

impl<Res> Reducer<Res, ()> for DefaultReducer {
    type Error = Infallible;

    fn reduce(&self, _: Option<&Res>, _: Option<&()>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Infallible reducer built from a closure.
#[derive(Debug)]
pub struct ReduceFn<F, Res, S> {
    reduce: F,
    _phantom: PhantomData<fn(&Res, &S) -> S>,
}

impl<F, Res, S> ReduceFn<F, Res, S>
where
    F: Fn(Option<&Res>, Option<&S>) -> S,
{
    pub fn new(reduce: F) -> Self {
        Self {
            reduce,
            _phantom: PhantomData,
        }
    }
}

impl<F: Clone, Res, S> Clone for ReduceFn<F, Res, S> {
    fn clone(&self) -> Self {
        Self {
            reduce: self.reduce.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F, Res, S> Reducer<Res, S> for ReduceFn<F, Res, S>
where
    F: Fn(Option<&Res>, Option<&S>) -> S,
{
    type Error = Infallible;

    fn reduce(&self, response: Option<&Res>, state: Option<&S>) -> Result<S, Self::Error> {
        Ok((self.reduce)(response, state))
    }
}

/// Fallible reducer built from a closure.
#[derive(Debug)]
pub struct TryReduceFn<F, Res, S> {
    reduce: F,
    _phantom: PhantomData<fn(&Res, &S) -> S>,
}

impl<F, Res, S, E> TryReduceFn<F, Res, S>
where
    F: Fn(Option<&Res>, Option<&S>) -> Result<S, E>,
{
    pub fn new(reduce: F) -> Self {
        Self {
            reduce,
            _phantom: PhantomData,
        }
    }
}

impl<F: Clone, Res, S> Clone for TryReduceFn<F, Res, S> {
    fn clone(&self) -> Self {
        Self {
            reduce: self.reduce.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F, Res, S, E> Reducer<Res, S> for TryReduceFn<F, Res, S>
where
    F: Fn(Option<&Res>, Option<&S>) -> Result<S, E>,
{
    type Error = E;

    fn reduce(&self, response: Option<&Res>, state: Option<&S>) -> Result<S, Self::Error> {
        (self.reduce)(response, state)
    }
}
