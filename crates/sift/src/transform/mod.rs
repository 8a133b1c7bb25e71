//! Value transformation: per-column operation chains with optional
//! target-type coercion.

mod engine;
mod formula;
mod operations;

pub use engine::{
    BatchSummary, BatchedTransform, CellError, TargetTypes, TransformOutcome, TransformationSpec,
    transform, transform_batched,
};
pub use operations::{DateStyle, Operation, TransformStep};
