mod transformer;

pub use transformer::{ArgsTransformer, DefaultTransformer, TransformFn, TryTransformFn};
