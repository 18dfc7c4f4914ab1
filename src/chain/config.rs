use serde::{Deserialize, Serialize};

use crate::{reduce::DefaultReducer, transform::DefaultTransformer};

/// What a failed link does to the links admitted after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Only the failing caller sees the failure. The reducer is invoked with
    /// no response and the prior state, and the chain continues with its
    /// result. If the reducer itself fails, the prior state is carried forward.
    #[default]
    Isolate,
    /// The first failure poisons the chain: every later link fails with
    /// [`ChainError::Poisoned`](crate::error::ChainError::Poisoned) without
    /// invoking its call.
    Poison,
}

#[derive(Debug, Clone)]
pub struct ChainerConfig<R = DefaultReducer, T = DefaultTransformer> {
    reducer: R,
    args_transformer: T,
    failure_policy: FailurePolicy,
}

impl ChainerConfig {
    pub const fn new() -> Self {
        Self {
            reducer: DefaultReducer,
            args_transformer: DefaultTransformer,
            failure_policy: FailurePolicy::Isolate,
        }
    }
}

impl Default for ChainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, T> ChainerConfig<R, T> {
    pub fn reducer<R2>(self, reducer: R2) -> ChainerConfig<R2, T> {
        ChainerConfig {
            reducer,
            args_transformer: self.args_transformer,
            failure_policy: self.failure_policy,
        }
    }

    pub fn args_transformer<T2>(self, args_transformer: T2) -> ChainerConfig<R, T2> {
        ChainerConfig {
            reducer: self.reducer,
            args_transformer,
            failure_policy: self.failure_policy,
        }
    }

    pub fn failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub(crate) fn into_parts(self) -> (R, T, FailurePolicy) {
        (self.reducer, self.args_transformer, self.failure_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_policy_defaults_to_isolate() {
        let (_, _, failure_policy) = ChainerConfig::default().into_parts();

        assert_eq!(failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn failure_policy_deserializes_from_snake_case() {
        let policies: Vec<FailurePolicy> =
            serde_json::from_str(r#"["isolate", "poison"]"#).expect("Failed to parse policies");

        assert_eq!(policies, [FailurePolicy::Isolate, FailurePolicy::Poison]);
    }

    #[test]
    fn builder_keeps_policy_when_swapping_strategies() {
        let config = ChainerConfig::new()
            .failure_policy(FailurePolicy::Poison)
            .reducer(42_u8)
            .args_transformer("transformer");

        let (reducer, args_transformer, failure_policy) = config.into_parts();

        assert_eq!(reducer, 42);
        assert_eq!(args_transformer, "transformer");
        assert_eq!(failure_policy, FailurePolicy::Poison);
    }
}
