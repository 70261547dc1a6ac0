//! Input domain: press buffer with at-most-once delivery.

use std::collections::VecDeque;

use super::InputFrame;

#[derive(Debug, Clone, Copy)]
struct BufferedPress {
    frame: InputFrame,
    consumed: bool,
}

/// Fixed-capacity ring of recent presses for one button.
///
/// Only the newest press can ever be active; recording a press retires every
/// earlier one. A press is active while unconsumed and no older than the
/// window, measured against the caller's `now_ms`.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    presses: VecDeque<BufferedPress>,
    capacity: usize,
    window_ms: f32,
}

impl InputBuffer {
    pub fn new(capacity: usize, window_ms: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            presses: VecDeque::with_capacity(capacity),
            capacity,
            window_ms,
        }
    }

    pub fn window_ms(&self) -> f32 {
        self.window_ms
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    pub fn record(&mut self, frame: InputFrame) {
        for press in &mut self.presses {
            press.consumed = true;
        }
        if self.presses.len() == self.capacity {
            self.presses.pop_front();
        }
        self.presses.push_back(BufferedPress {
            frame,
            consumed: false,
        });
    }

    fn active_index(&self, now_ms: f64) -> Option<usize> {
        let index = self.presses.len().checked_sub(1)?;
        let press = &self.presses[index];
        let age_ms = now_ms - press.frame.timestamp_ms;
        (!press.consumed && age_ms <= self.window_ms as f64).then_some(index)
    }

    pub fn peek_active(&self, now_ms: f64) -> Option<&InputFrame> {
        self.active_index(now_ms).map(|i| &self.presses[i].frame)
    }

    /// Return the active press and mark it consumed.
    pub fn consume_active(&mut self, now_ms: f64) -> Option<InputFrame> {
        let index = self.active_index(now_ms)?;
        let press = &mut self.presses[index];
        press.consumed = true;
        Some(press.frame)
    }

    pub fn clear(&mut self) {
        self.presses.clear();
    }
}
