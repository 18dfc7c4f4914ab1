mod chainer;
mod config;
mod future;
mod link;

pub use chainer::{Chainer, ChainerInner};
pub use config::{ChainerConfig, FailurePolicy};
pub use future::ChainFuture;
