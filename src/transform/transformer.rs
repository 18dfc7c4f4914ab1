use std::{convert::Infallible, marker::PhantomData};

/// Produces the arguments actually passed to a call from the arguments the
/// caller asked for and the state left by the previous link.
pub trait ArgsTransformer<A, S> {
    type Error;

    fn transform(&self, args: A, state: &S) -> Result<A, Self::Error>;
}

/// Passes arguments through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransformer;

impl<A, S> ArgsTransformer<A, S> for DefaultTransformer {
    type Error = Infallible;

    fn transform(&self, args: A, _: &S) -> Result<A, Self::Error> {
        Ok(args)
    }
}

#[derive(Debug)]
pub struct TransformFn<F, A, S> {
    transform: F,
    _phantom: PhantomData<fn(A, &S) -> A>,
}

impl<F, A, S> TransformFn<F, A, S>
where
    F: Fn(A, &S) -> A,
{
    pub fn new(transform: F) -> Self {
        Self {
            transform,
            _phantom: PhantomData,
        }
    }
}

impl<F: Clone, A, S> Clone for TransformFn<F, A, S> {
    fn clone(&self) -> Self {
        Self {
            transform: self.transform.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F, A, S> ArgsTransformer<A, S> for TransformFn<F, A, S>
where
    F: Fn(A, &S) -> A,
{
    type Error = Infallible;

    fn transform(&self, args: A, state: &S) -> Result<A, Self::Error> {
        Ok((self.transform)(args, state))
    }
}

#[derive(Debug)]
pub struct TryTransformFn<F, A, S> {
    transform: F,
    _phantom: PhantomData<fn(A, &S) -> A>,
}

impl<F, A, S, E> TryTransformFn<F, A, S>
where
    F: Fn(A, &S) -> Result<A, E>,
{
    pub fn new(transform: F) -> Self {
        Self {
            transform,
            _phantom: PhantomData,
        }
    }
}

impl<F: Clone, A, S> Clone for TryTransformFn<F, A, S> {
    fn clone(&self) -> Self {
        Self {
            transform: self.transform.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F, A, S, E> ArgsTransformer<A, S> for TryTransformFn<F, A, S>
where
    F: Fn(A, &S) -> Result<A, E>,
{
    type Error = E;

    fn transform(&self, args: A, state: &S) -> Result<A, Self::Error> {
        (self.transform)(args, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transformer_passes_args_through() {
        let args = ArgsTransformer::<_, u8>::transform(&DefaultTransformer, vec!["A"], &7);

        assert_eq!(args, Ok(vec!["A"]));
    }

    #[test]
    fn transform_fn_replaces_second_argument() {
        let transformer =
            TransformFn::new(|(url, _): (&'static str, u32), state: &u32| (url, *state));

        assert_eq!(transformer.transform(("/1/2", 0), &1), Ok(("/1/2", 1)));
    }

    #[test]
    fn try_transform_fn_surfaces_error() {
        let transformer = TryTransformFn::new(|args: Vec<u8>, limit: &usize| {
            if args.len() > *limit {
                return Err("too many arguments");
            }

            Ok(args)
        });

        assert_eq!(transformer.transform(vec![1, 2, 3], &2), Err("too many arguments"));
        assert_eq!(transformer.transform(vec![1], &2), Ok(vec![1]));
    }
}
