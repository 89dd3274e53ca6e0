//! Worker threads and their coordination.
mod coordinator;
mod gate;
mod worker;


pub use coordinator::{PoolOptions, WorkerPool};
pub use worker::Worker;
