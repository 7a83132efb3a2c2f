//! Compute Module
//!
//! Bounded, off-scheduler execution of model predictions.

mod dispatcher;
mod limiter;

pub use dispatcher::{round_prediction, ComputeDispatcher};
pub use limiter::{ComputePermit, ConcurrencyLimiter};

// == Public Constants ==
/// Default number of predictions allowed to run at once
pub const DEFAULT_MAX_CONCURRENT: usize = 5;
