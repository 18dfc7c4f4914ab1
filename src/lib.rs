#![deny(unsafe_code, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Sequence async calls one at a time, in submission order, threading state
//! derived from each response into the arguments of the next call.
//!
//! A [`Chainer`](chain::Chainer) holds a [`Reducer`](reduce::Reducer), which
//! folds every response into a chain state, and an
//! [`ArgsTransformer`](transform::ArgsTransformer), which rewrites the
//! arguments of the next call from that state. Integrations are provided for
//! [tower](https://docs.rs/tower/latest/tower/) services and
//! [reqwest](https://docs.rs/reqwest/latest/reqwest/) clients.

pub mod chain;
pub mod client;
pub mod error;
pub mod propagate;
pub mod reduce;
pub mod service;
pub mod transform;

#[cfg(test)]
mod test;
