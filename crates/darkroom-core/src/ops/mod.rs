//! The operation registry: the closed set of transforms a pipeline may
//! name, their parameter schemas, and the projection onto engine calls.

pub mod kind;
pub mod params;
pub mod registry;
pub mod step;

pub use kind::{OperationKind, OPERATIONS};
pub use params::OpParams;
pub use step::{parse_steps, ProcessStep, RawStep};
