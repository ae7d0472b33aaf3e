//! Curve transformation: the transform function library and the ordered,
//! filterable pipeline that applies it.

pub mod ops;
mod options;
mod pipeline;

pub use options::{Polarity, TransformOptions};
pub use pipeline::{Filter, RunState, TransformFn, Transformer};
