//! Controller domain: motion events and the sinks that receive them.

use serde::{Deserialize, Serialize};

use crate::core::{MotionError, ParticleSpray};
use crate::jump::ComboGrade;
use crate::sensing::WallSide;
use crate::wall::DashDirection;

/// Everything the motion core reports to effects, audio, UI and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionEvent {
    JumpExecuted {
        jump_number: u8,
        velocity: f32,
        combo: ComboGrade,
        coyote: bool,
        spray: ParticleSpray,
    },
    WallJumpExecuted {
        side: WallSide,
        vx: f32,
        vy: f32,
        spray: ParticleSpray,
    },
    Landed {
        impact_speed: f32,
        upright: bool,
        spray: ParticleSpray,
    },
    LeftGround {
        coyote: bool,
    },
    WallContactStarted {
        side: WallSide,
    },
    WallContactEnded {
        side: WallSide,
    },
    WallSlideStarted {
        side: WallSide,
    },
    WallSlideEnded {
        side: WallSide,
    },
    DashStarted {
        direction: DashDirection,
        sign: f32,
        spray: ParticleSpray,
    },
    DashEnded,
    HighMomentum {
        magnitude: f32,
    },
    MomentumChanged {
        magnitude: f32,
        peak: f32,
    },
    /// A jump was attempted with every jump spent. The host decides what
    /// that costs.
    JumpExhausted,
}

fn finite(kind: &'static str, name: &str, value: f32) -> Result<(), MotionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MotionError::InvalidEvent {
            kind,
            reason: format!("{name} is {value}"),
        })
    }
}

fn non_negative(kind: &'static str, name: &str, value: f32) -> Result<(), MotionError> {
    finite(kind, name, value)?;
    if value < 0.0 {
        return Err(MotionError::InvalidEvent {
            kind,
            reason: format!("{name} is negative ({value})"),
        });
    }
    Ok(())
}

fn spray_ok(kind: &'static str, spray: &ParticleSpray) -> Result<(), MotionError> {
    spray
        .angles
        .iter()
        .try_for_each(|angle| finite(kind, "spray angle", *angle))
}

impl MotionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MotionEvent::JumpExecuted { .. } => "jump_executed",
            MotionEvent::WallJumpExecuted { .. } => "wall_jump_executed",
            MotionEvent::Landed { .. } => "landed",
            MotionEvent::LeftGround { .. } => "left_ground",
            MotionEvent::WallContactStarted { .. } => "wall_contact_started",
            MotionEvent::WallContactEnded { .. } => "wall_contact_ended",
            MotionEvent::WallSlideStarted { .. } => "wall_slide_started",
            MotionEvent::WallSlideEnded { .. } => "wall_slide_ended",
            MotionEvent::DashStarted { .. } => "dash_started",
            MotionEvent::DashEnded => "dash_ended",
            MotionEvent::HighMomentum { .. } => "high_momentum",
            MotionEvent::MomentumChanged { .. } => "momentum_changed",
            MotionEvent::JumpExhausted => "jump_exhausted",
        }
    }

    /// Check the payload against its schema before it leaves the core.
    pub fn validate(&self) -> Result<(), MotionError> {
        let kind = self.kind();
        match self {
            MotionEvent::JumpExecuted {
                jump_number,
                velocity,
                spray,
                ..
            } => {
                if !(1..=crate::config::MAX_JUMPS).contains(jump_number) {
                    return Err(MotionError::InvalidEvent {
                        kind,
                        reason: format!("jump number {jump_number} out of range"),
                    });
                }
                non_negative(kind, "velocity", *velocity)?;
                spray_ok(kind, spray)
            }
            MotionEvent::WallJumpExecuted { vx, vy, spray, .. } => {
                finite(kind, "vx", *vx)?;
                finite(kind, "vy", *vy)?;
                spray_ok(kind, spray)
            }
            MotionEvent::Landed {
                impact_speed,
                spray,
                ..
            } => {
                non_negative(kind, "impact speed", *impact_speed)?;
                spray_ok(kind, spray)
            }
            MotionEvent::DashStarted { sign, spray, .. } => {
                if sign.abs() != 1.0 {
                    return Err(MotionError::InvalidEvent {
                        kind,
                        reason: format!("dash sign {sign} is not unit"),
                    });
                }
                spray_ok(kind, spray)
            }
            MotionEvent::HighMomentum { magnitude } => non_negative(kind, "magnitude", *magnitude),
            MotionEvent::MomentumChanged { magnitude, peak } => {
                non_negative(kind, "magnitude", *magnitude)?;
                non_negative(kind, "peak", *peak)
            }
            MotionEvent::LeftGround { .. }
            | MotionEvent::WallContactStarted { .. }
            | MotionEvent::WallContactEnded { .. }
            | MotionEvent::WallSlideStarted { .. }
            | MotionEvent::WallSlideEnded { .. }
            | MotionEvent::DashEnded
            | MotionEvent::JumpExhausted => Ok(()),
        }
    }
}

/// Fire-and-forget receiver of motion events.
pub trait EventSink {
    fn emit(&mut self, event: MotionEvent);
}

impl EventSink for Vec<MotionEvent> {
    fn emit(&mut self, event: MotionEvent) {
        self.push(event);
    }
}

/// Records every event for replay comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<MotionEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MotionEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn drain(&mut self) -> Vec<MotionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// One JSON object per line, in emission order.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: MotionEvent) {
        self.events.push(event);
    }
}
