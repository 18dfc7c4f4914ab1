/// Failure of a single chained call, as seen by its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError<C, R, T> {
    #[error("Call error: {0}")]
    Call(#[source] C),
    #[error("Reducer error: {0}")]
    Reduce(#[source] R),
    #[error("Args transformer error: {0}")]
    Transform(#[source] T),
    #[error("Chain poisoned by an earlier failed call")]
    Poisoned,
    #[error("Chain link cancelled before it settled")]
    Cancelled,
}

impl<C, R, T> ChainError<C, R, T> {
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call(_))
    }

    pub const fn is_poisoned(&self) -> bool {
        matches!(self, Self::Poisoned)
    }

    /// Returns the underlying call's own error, if that is what failed.
    pub fn into_call(self) -> Option<C> {
        match self {
            Self::Call(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError<R> {
    #[error("Reducer failed to produce an initial state: {0}")]
    InitialState(#[source] R),
}
