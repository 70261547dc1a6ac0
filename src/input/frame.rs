//! Input domain: raw button snapshots and timestamped frames.

use serde::{Deserialize, Serialize};

/// Buttons the motion core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Jump,
    Dash,
}

/// Held state of every button for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawButtons {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub up: bool,
    pub down: bool,
}

impl RawButtons {
    pub fn pressed(&self, button: Button) -> bool {
        match button {
            Button::Jump => self.jump,
            Button::Dash => self.dash,
        }
    }
}

/// One immutable input poll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub up: bool,
    pub down: bool,
    pub timestamp_ms: f64,
}

impl InputFrame {
    pub fn from_raw(raw: RawButtons, timestamp_ms: f64) -> Self {
        Self {
            left: raw.left,
            right: raw.right,
            jump: raw.jump,
            dash: raw.dash,
            up: raw.up,
            down: raw.down,
            timestamp_ms,
        }
    }

    pub fn buttons(&self) -> RawButtons {
        RawButtons {
            left: self.left,
            right: self.right,
            jump: self.jump,
            dash: self.dash,
            up: self.up,
            down: self.down,
        }
    }

    /// -1.0 for left, 1.0 for right, 0.0 for neither or both.
    pub fn horizontal_axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// -1.0 for down, 1.0 for up, 0.0 for neither or both.
    pub fn vertical_axis(&self) -> f32 {
        match (self.down, self.up) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
