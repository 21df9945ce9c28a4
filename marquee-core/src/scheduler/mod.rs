//! Cooperative task scheduler
//!
//! Runs periodic tasks on a single thread. Tasks never block; each due task
//! runs to completion and then the loop moves on, so a slow task only delays
//! the others, it never starves them.

pub mod executor;
pub mod task;

pub use executor::{Scheduler, SchedulerError};
pub use task::{PeriodicTask, TaskControl};
