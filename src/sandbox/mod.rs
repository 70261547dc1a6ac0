//! Sandbox domain: a deterministic reference physics host.
//!
//! No gravity of its own and no friction; the motion core supplies both.
//! Physics advances in lockstep with the controller's fixed steps through
//! [`SteppedHost`], so scenario runs are reproducible bit for bit.

mod body;
mod level;
#[cfg(test)]
mod tests;

pub use body::SandboxBody;
pub use level::{Aabb, Level};

use bevy::math::Vec2;

use crate::config::BodyTuning;
use crate::controller::{
    EventLog, FrameReport, MotionContext, MotionController, PhysicsBody, SteppedHost,
};
use crate::input::{InputFrame, RawButtons};

#[derive(Debug, Clone)]
pub struct Sandbox {
    pub level: Level,
    pub body: Option<SandboxBody>,
    pub events: EventLog,
}

impl Sandbox {
    pub fn new(level: Level, spawn: Vec2, body: &BodyTuning) -> Self {
        Self {
            level,
            body: Some(SandboxBody::new(
                spawn,
                Vec2::new(body.half_width, body.half_height),
            )),
            events: EventLog::new(),
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        self.body.as_ref().map(|b| b.position)
    }

    pub fn velocity(&self) -> Option<Vec2> {
        self.body.as_ref().map(|b| b.velocity)
    }

    /// Remove the body, as when a character is despawned mid-run.
    pub fn detach_body(&mut self) -> Option<SandboxBody> {
        self.body.take()
    }

    /// Drive `controller` through a scripted input track.
    ///
    /// Each entry is a frame delta and the held buttons for that frame; the
    /// buttons are polled before the update, as a game loop would.
    pub fn run(
        &mut self,
        controller: &mut MotionController,
        track: impl IntoIterator<Item = (f32, RawButtons)>,
    ) -> Vec<FrameReport> {
        track
            .into_iter()
            .map(|(delta_ms, buttons)| {
                controller.poll_input(buttons);
                controller.update_stepped(delta_ms, self)
            })
            .collect()
    }

    /// Feed pre-stamped frames, then advance through `deltas`.
    pub fn replay(
        &mut self,
        controller: &mut MotionController,
        frames: &[InputFrame],
        deltas: &[f32],
    ) -> Vec<FrameReport> {
        for frame in frames {
            controller.queue_input(*frame);
        }
        deltas
            .iter()
            .map(|delta_ms| controller.update_stepped(*delta_ms, self))
            .collect()
    }
}

impl SteppedHost for Sandbox {
    fn context(&mut self) -> MotionContext<'_> {
        let body: Option<&mut dyn PhysicsBody> = match self.body.as_mut() {
            Some(body) => Some(body),
            None => None,
        };
        MotionContext {
            body,
            world: &self.level,
            events: &mut self.events,
        }
    }

    fn advance(&mut self, dt_secs: f32) {
        if let Some(body) = self.body.as_mut() {
            body.integrate(&self.level, dt_secs);
        }
    }
}
