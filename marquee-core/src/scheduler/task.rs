//! Periodic task bookkeeping

/// What a task wants after it ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskControl {
    /// Keep running at the task's interval
    Continue,
    /// Stop scheduling this task
    Disable,
}

/// A registered periodic task
///
/// The action itself is not stored: the scheduler hands the task's `id` to
/// the dispatcher passed to [`Scheduler::run_pending`](super::Scheduler::run_pending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTask<T> {
    /// Task identifier
    pub id: T,
    /// Interval between runs (ms)
    pub interval_ms: u32,
    /// Whether the task is scheduled
    pub enabled: bool,
    /// Time the task is next due (ms since boot)
    pub next_due_ms: u64,
    /// Number of completed runs
    pub runs: u32,
}

impl<T> PeriodicTask<T> {
    /// Create a task that is first due at `first_due_ms`
    pub fn new(id: T, interval_ms: u32, first_due_ms: u64) -> Self {
        Self {
            id,
            interval_ms,
            enabled: true,
            next_due_ms: first_due_ms,
            runs: 0,
        }
    }

    /// Check if the task should run at `now_ms`
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.enabled && now_ms >= self.next_due_ms
    }

    /// Move the due time to the next interval boundary after `now_ms`
    ///
    /// Boundaries stay on the original grid (`first_due + k × interval`), so
    /// execution time never accumulates as drift. Boundaries that already
    /// passed are skipped rather than replayed.
    pub fn reschedule(&mut self, now_ms: u64) {
        let interval = self.interval_ms.max(1) as u64;
        let next = self.next_due_ms + interval;
        self.next_due_ms = if next > now_ms {
            next
        } else {
            let missed = (now_ms - self.next_due_ms) / interval;
            self.next_due_ms + (missed + 1) * interval
        };
    }
}
