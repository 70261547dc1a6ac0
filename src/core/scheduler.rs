//! Core domain: cancellable deferred tasks on simulation time.

/// Deferred work owned by a motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionTask {
    /// Landing recovery window has elapsed.
    EndLandingRecovery,
    /// Dash charges come back after the cooldown.
    RefreshDash,
}

/// Handle returned by [`DeferredScheduler::schedule_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Schedules a one-shot task `delay_ms` after the scheduler's current time.
pub trait DeferredScheduler<T> {
    fn schedule_once(&mut self, delay_ms: f32, task: T) -> TaskHandle;

    /// Returns `false` when the task already fired or was cancelled.
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due_ms: f64,
    task: T,
}

/// Deterministic scheduler advanced by the fixed step.
///
/// Tasks carry data instead of callbacks; the owner dispatches what
/// [`TaskScheduler::advance_to`] returns. Ties on due time fire in
/// scheduling order.
#[derive(Debug, Clone)]
pub struct TaskScheduler<T> {
    now_ms: f64,
    next_id: u64,
    pending: Vec<ScheduledTask<T>>,
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TaskScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    pub fn remaining_ms(&self, handle: TaskHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| (t.due_ms - self.now_ms).max(0.0) as f32)
    }

    /// Move time forward and return every task now due.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<T> {
        self.now_ms = self.now_ms.max(now_ms);
        if !self.pending.iter().any(|t| t.due_ms <= self.now_ms) {
            return Vec::new();
        }

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.due_ms <= self.now_ms);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.handle.0.cmp(&b.handle.0)));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Drop every outstanding task, returning how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}

impl<T> DeferredScheduler<T> for TaskScheduler<T> {
    fn schedule_once(&mut self, delay_ms: f32, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTask {
            handle,
            due_ms: self.now_ms + delay_ms.max(0.0) as f64,
            task,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }
}
