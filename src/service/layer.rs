use std::fmt;

use tower_layer::Layer;

use crate::chain::Chainer;

use super::service::ChainService;

/// Wraps services so every request they receive goes through one chainer.
///
/// All services produced by the same layer share its sequence.
pub struct ChainLayer<Res, S, R, T> {
    chainer: Chainer<Res, S, R, T>,
}

impl<Res, S, R, T> ChainLayer<Res, S, R, T> {
    pub const fn new(chainer: Chainer<Res, S, R, T>) -> Self {
        Self { chainer }
    }
}

impl<Res, S, R, T> Clone for ChainLayer<Res, S, R, T> {
    fn clone(&self) -> Self {
        Self {
            chainer: self.chainer.clone(),
        }
    }
}

impl<Res, S, R, T> fmt::Debug for ChainLayer<Res, S, R, T>
where
    Chainer<Res, S, R, T>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainLayer")
            .field("chainer", &self.chainer)
            .finish()
    }
}

impl<Svc, Res, S, R, T> Layer<Svc> for ChainLayer<Res, S, R, T> {
    type Service = ChainService<Svc, Res, S, R, T>;

    fn layer(&self, service: Svc) -> Self::Service {
        ChainService::new(service, self.chainer.clone())
    }
}

pub trait ChainLayerExt<Res, S, R, T> {
    fn layer(&self) -> ChainLayer<Res, S, R, T>;
}

impl<Res, S, R, T> ChainLayerExt<Res, S, R, T> for Chainer<Res, S, R, T> {
    fn layer(&self) -> ChainLayer<Res, S, R, T> {
        ChainLayer::new(self.clone())
    }
}
