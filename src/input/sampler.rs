//! Input domain: edge detection from polled button state into buffers.

use crate::config::InputTuning;

use super::{Button, InputBuffer, InputFrame, RawButtons};

#[derive(Debug, Clone)]
pub struct InputSampler {
    jump: InputBuffer,
    dash: InputBuffer,
    held: InputFrame,
}

impl InputSampler {
    pub fn new(tuning: &InputTuning) -> Self {
        Self {
            jump: InputBuffer::new(tuning.buffer_capacity, tuning.buffer_window_ms),
            dash: InputBuffer::new(tuning.buffer_capacity, tuning.buffer_window_ms),
            held: InputFrame::default(),
        }
    }

    /// Record a raw poll taken at `now_ms`.
    pub fn sample(&mut self, raw: RawButtons, now_ms: f64) {
        self.ingest(InputFrame::from_raw(raw, now_ms));
    }

    /// Record a captured frame; not-pressed to pressed transitions are buffered.
    pub fn ingest(&mut self, frame: InputFrame) {
        if frame.jump && !self.held.jump {
            self.jump.record(frame);
        }
        if frame.dash && !self.held.dash {
            self.dash.record(frame);
        }
        self.held = frame;
    }

    /// Latest polled state, for held buttons and axes.
    pub fn held(&self) -> &InputFrame {
        &self.held
    }

    pub fn peek_active(&self, button: Button, now_ms: f64) -> Option<&InputFrame> {
        self.buffer(button).peek_active(now_ms)
    }

    pub fn consume_active(&mut self, button: Button, now_ms: f64) -> Option<InputFrame> {
        self.buffer_mut(button).consume_active(now_ms)
    }

    pub fn buffer(&self, button: Button) -> &InputBuffer {
        match button {
            Button::Jump => &self.jump,
            Button::Dash => &self.dash,
        }
    }

    fn buffer_mut(&mut self, button: Button) -> &mut InputBuffer {
        match button {
            Button::Jump => &mut self.jump,
            Button::Dash => &mut self.dash,
        }
    }

    /// Forget buffered presses and held state.
    pub fn reset(&mut self) {
        self.jump.clear();
        self.dash.clear();
        self.held = InputFrame::default();
    }
}
