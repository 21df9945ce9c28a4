//! Periodic task executor
//!
//! Tasks are identified by a small `Copy` id (usually an enum) and visited
//! in registration order, which doubles as priority order. The caller
//! supplies the dispatcher on every run, so task actions can borrow
//! whatever application state they need without the scheduler owning it.

use heapless::Vec;

use super::task::{PeriodicTask, TaskControl};

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// No room for another task
    Full,
    /// A task with this id is already registered
    Duplicate,
    /// No task with this id
    UnknownTask,
}

/// Cooperative periodic task scheduler
#[derive(Debug)]
pub struct Scheduler<T, const N: usize> {
    tasks: Vec<PeriodicTask<T>, N>,
}

impl<T: Copy + PartialEq, const N: usize> Default for Scheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + PartialEq, const N: usize> Scheduler<T, N> {
    /// Create an empty scheduler
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register an enabled task, first due at `now_ms`
    pub fn register(&mut self, id: T, interval_ms: u32, now_ms: u64) -> Result<(), SchedulerError> {
        if self.find(id).is_some() {
            return Err(SchedulerError::Duplicate);
        }
        self.tasks
            .push(PeriodicTask::new(id, interval_ms, now_ms))
            .map_err(|_| SchedulerError::Full)
    }

    /// Re-enable a task, due immediately
    pub fn enable(&mut self, id: T, now_ms: u64) -> Result<(), SchedulerError> {
        let task = self.find_mut(id).ok_or(SchedulerError::UnknownTask)?;
        task.enabled = true;
        task.next_due_ms = now_ms;
        Ok(())
    }

    /// Stop scheduling a task
    pub fn disable(&mut self, id: T) -> Result<(), SchedulerError> {
        let task = self.find_mut(id).ok_or(SchedulerError::UnknownTask)?;
        task.enabled = false;
        Ok(())
    }

    /// Check if a task is registered and enabled
    pub fn is_enabled(&self, id: T) -> bool {
        self.find(id).map(|t| t.enabled).unwrap_or(false)
    }

    /// Number of completed runs of a task
    pub fn runs(&self, id: T) -> Option<u32> {
        self.find(id).map(|t| t.runs)
    }

    /// Earliest due time among enabled tasks
    pub fn next_due(&self) -> Option<u64> {
        self.tasks
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.next_due_ms)
            .min()
    }

    /// Run every task due at `now_ms` exactly once
    ///
    /// `dispatch` is called with the id of each due task in registration
    /// order. Returns the number of tasks that ran.
    pub fn run_pending<F>(&mut self, now_ms: u64, mut dispatch: F) -> usize
    where
        F: FnMut(T) -> TaskControl,
    {
        let mut ran = 0;
        for task in self.tasks.iter_mut() {
            if !task.is_due(now_ms) {
                continue;
            }

            let control = dispatch(task.id);
            task.runs = task.runs.wrapping_add(1);
            task.reschedule(now_ms);
            if control == TaskControl::Disable {
                task.enabled = false;
            }
            ran += 1;
        }
        ran
    }

    fn find(&self, id: T) -> Option<&PeriodicTask<T>> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn find_mut(&mut self, id: T) -> Option<&mut PeriodicTask<T>> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}
