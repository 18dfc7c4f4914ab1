mod header_propagation;

pub use header_propagation::{HeaderPropagation, HeaderPropagationError};
