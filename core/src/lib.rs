//! leadflow-core: fairness-preserving lead distribution.
//!
//! Representatives hold weekly credits. Each day a weighted, shuffled
//! queue is built from those credits plus the carried deficit, leads are
//! dispatched round-robin off the head of the queue, and the day's
//! shortfall or surplus is fed into the next day's queue.

pub mod assignment;
pub mod clock;
pub mod config;
pub mod deficit;
pub mod error;
pub mod event;
pub mod participation;
pub mod queue;
pub mod report;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod week;

pub use error::{ConfigurationError, SchedError, SchedResult};
pub use scheduler::LeadScheduler;
