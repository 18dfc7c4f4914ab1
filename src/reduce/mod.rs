mod reducer;

pub use reducer::{DefaultReducer, ReduceFn, Reducer, TryReduceFn};
