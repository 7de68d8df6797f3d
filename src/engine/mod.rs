//! A small in-process collection engine: partitioned datasets evaluated on a
//! rayon worker pool.

mod context;
mod dataset;

pub use context::{Context, EngineConfig};
pub use dataset::{Data, Dataset};
