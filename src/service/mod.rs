mod layer;
mod service;

pub use layer::{ChainLayer, ChainLayerExt};
pub use service::ChainService;
