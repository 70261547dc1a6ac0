//! Controller domain: the per-character motion façade.
//!
//! One fixed step runs an explicit pipeline: drain input, sense ground and
//! walls, fire due tasks, decide jumps, slides and dashes, integrate, then
//! emit. Sensing always completes before any decision reads it, so a step
//! that lands resets the jump count before a buffered jump is evaluated.

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI};

use bevy::log::{debug, info, warn};
use bevy::math::Vec2;

use crate::config::MotionTuning;
use crate::core::{
    CosmeticRng, DeferredScheduler, FixedStepClock, MotionError, MotionTask, PhysicsError,
    StepPlan, TaskScheduler,
};
use crate::input::{Button, InputFrame, InputSampler, RawButtons};
use crate::integrator::{
    MomentumSignal, MomentumState, MomentumTracker, MovementIntegrator, StepDrive, Surface,
};
use crate::jump::{JumpAttempt, JumpState, JumpStateMachine};
use crate::sensing::{
    GroundContactTracker, GroundPhase, GroundTransition, WallContactSensor, WallContactState,
    probe_ground,
};
use crate::wall::{DashState, SlideEdge, WallInteractionSystem};

use super::{EventSink, MotionContext, MotionEvent, PhysicsBody, PhysicsWorld, SteppedHost};

/// Outcome of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub steps: u32,
    /// Backlog discarded by the step cap.
    pub dropped_ms: f32,
    /// Nothing ran: no body, or the controller was torn down.
    pub skipped: bool,
    /// A jump was attempted while exhausted this frame.
    pub jump_exhausted: bool,
}

impl FrameReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    fn from_plan(plan: StepPlan) -> Self {
        Self {
            steps: plan.steps,
            dropped_ms: (plan.dropped.as_nanos() as f64 / 1_000_000.0) as f32,
            ..Self::default()
        }
    }
}

const JUMP_PARTICLES: usize = 6;
const WALL_JUMP_PARTICLES: usize = 8;
const DASH_PARTICLES: usize = 10;

/// Motion state for one character.
///
/// Owns its buffers, timers and scheduled tasks exclusively; the physics
/// body and world are only borrowed for the duration of an update.
#[derive(Debug)]
pub struct MotionController {
    tuning: MotionTuning,
    clock: FixedStepClock,
    sampler: InputSampler,
    pending_input: VecDeque<InputFrame>,
    last_input_ms: f64,
    ground: GroundContactTracker,
    walls: WallContactSensor,
    jump: JumpStateMachine,
    wall: WallInteractionSystem,
    integrator: MovementIntegrator,
    momentum: MomentumTracker,
    scheduler: TaskScheduler<MotionTask>,
    rng: CosmeticRng,
    facing: f32,
    last_ground_contact: bool,
    outbox: Vec<MotionEvent>,
    torn_down: bool,
}

impl MotionController {
    /// `seed` drives cosmetic randomness only.
    pub fn new(tuning: MotionTuning, seed: u64) -> Self {
        Self {
            clock: FixedStepClock::new(&tuning.step),
            sampler: InputSampler::new(&tuning.input),
            pending_input: VecDeque::new(),
            last_input_ms: 0.0,
            ground: GroundContactTracker::new(&tuning.ground),
            walls: WallContactSensor::new(&tuning.body, &tuning.wall),
            jump: JumpStateMachine::new(&tuning.jump),
            wall: WallInteractionSystem::new(&tuning.wall, &tuning.dash),
            integrator: MovementIntegrator::new(&tuning.movement, &tuning.ground),
            momentum: MomentumTracker::new(&tuning.momentum),
            scheduler: TaskScheduler::new(),
            rng: CosmeticRng::new(seed),
            facing: 1.0,
            last_ground_contact: false,
            outbox: Vec::new(),
            torn_down: false,
            tuning,
        }
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    pub fn clock(&self) -> &FixedStepClock {
        &self.clock
    }

    pub fn jump_state(&self) -> &JumpState {
        self.jump.state()
    }

    pub fn ground_phase(&self) -> GroundPhase {
        self.ground.phase()
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.is_on_ground()
    }

    pub fn wall_state(&self) -> &WallContactState {
        self.walls.state()
    }

    pub fn wall_system(&self) -> &WallInteractionSystem {
        &self.wall
    }

    pub fn dash_state(&self) -> &DashState {
        self.wall.dash_state()
    }

    pub fn momentum(&self) -> &MomentumState {
        self.momentum.state()
    }

    pub fn landing_recovery_active(&self) -> bool {
        self.jump.landing_recovery_active()
    }

    /// -1.0 facing left, 1.0 facing right.
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn pending_input(&self) -> usize {
        self.pending_input.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Stamp a polled button snapshot with the controller clock and queue it.
    pub fn poll_input(&mut self, raw: RawButtons) {
        let frame = InputFrame::from_raw(raw, self.clock.clock_ms());
        self.queue_input(frame);
    }

    /// Queue a pre-stamped frame. Each frame is applied by the fixed step
    /// whose time span contains its timestamp.
    pub fn queue_input(&mut self, mut frame: InputFrame) {
        if self.torn_down {
            return;
        }
        if !frame.timestamp_ms.is_finite() || frame.timestamp_ms < self.last_input_ms {
            warn!(
                "Input timestamp {} ms out of order, clamped to {} ms",
                frame.timestamp_ms, self.last_input_ms
            );
            frame.timestamp_ms = self.last_input_ms;
        }
        self.last_input_ms = frame.timestamp_ms;
        self.pending_input.push_back(frame);
    }

    /// Advance by an external frame delta against a host whose physics
    /// integrates on its own schedule.
    pub fn update(&mut self, delta_ms: f32, ctx: &mut MotionContext<'_>) -> FrameReport {
        let Some(plan) = self.begin_frame(delta_ms, ctx.body.is_some()) else {
            return FrameReport::skipped();
        };
        let mut report = FrameReport::from_plan(plan);
        for _ in 0..plan.steps {
            report.jump_exhausted |= self.fixed_step(ctx);
        }
        report
    }

    /// Advance by an external frame delta, stepping the host's physics
    /// after every fixed step.
    pub fn update_stepped<H: SteppedHost>(&mut self, delta_ms: f32, host: &mut H) -> FrameReport {
        let has_body = host.context().body.is_some();
        let Some(plan) = self.begin_frame(delta_ms, has_body) else {
            return FrameReport::skipped();
        };
        let dt_secs = self.clock.step_ms() / 1000.0;
        let mut report = FrameReport::from_plan(plan);
        for _ in 0..plan.steps {
            {
                let mut ctx = host.context();
                report.jump_exhausted |= self.fixed_step(&mut ctx);
            }
            host.advance(dt_secs);
        }
        report
    }

    fn begin_frame(&mut self, delta_ms: f32, has_body: bool) -> Option<StepPlan> {
        if self.torn_down {
            debug!("Update after teardown ignored");
            return None;
        }
        let (delta_ms, error) = self.clock.sanitize_delta(delta_ms);
        if let Some(error) = error {
            warn!("{}", error);
        }
        if !has_body {
            warn!("{}", MotionError::MissingBody);
            return None;
        }
        let plan = self.clock.advance(delta_ms);
        if !plan.dropped.is_zero() {
            warn!(
                "Step cap of {} hit, dropped {:?} of backlog",
                self.tuning.step.max_steps_per_update, plan.dropped
            );
        }
        Some(plan)
    }

    fn fixed_step(&mut self, ctx: &mut MotionContext<'_>) -> bool {
        let step_ms = self.clock.step_ms();
        let now_ms = self.clock.now_ms();
        self.drain_input(now_ms + step_ms as f64);

        let exhausted = match ctx.body.as_deref_mut() {
            Some(body) => self.run_step(body, ctx.world, now_ms, step_ms),
            None => {
                warn!("{}", MotionError::MissingBody);
                false
            }
        };

        self.clock.finish_step();
        self.flush_events(&mut *ctx.events);
        exhausted
    }

    fn drain_input(&mut self, step_end_ms: f64) {
        while self
            .pending_input
            .front()
            .is_some_and(|frame| frame.timestamp_ms < step_end_ms)
        {
            if let Some(frame) = self.pending_input.pop_front() {
                self.sampler.ingest(frame);
            }
        }
    }

    fn run_step(
        &mut self,
        body: &mut dyn PhysicsBody,
        world: &dyn PhysicsWorld,
        now_ms: f64,
        step_ms: f32,
    ) -> bool {
        let dt_secs = step_ms / 1000.0;

        // Sense.
        let (position, mut velocity) = match read_kinematics(body) {
            Ok(kinematics) => kinematics,
            Err(e) => {
                warn!("Physics read failed, no movement applied this step: {}", e);
                return false;
            }
        };

        let held = *self.sampler.held();
        let input_x = self.wall.filter_input(held.horizontal_axis());

        let contact = match probe_ground(world, position, &self.tuning.body, &self.tuning.ground) {
            Ok(contact) => {
                self.last_ground_contact = contact;
                contact
            }
            Err(e) => {
                warn!("Ground probe failed, keeping previous contact: {}", e);
                self.last_ground_contact
            }
        };
        let ground_transition = self.ground.update(contact, velocity.y, step_ms);

        for edge in self.walls.sense(world, position, velocity, input_x) {
            self.outbox.push(if edge.began {
                MotionEvent::WallContactStarted { side: edge.side }
            } else {
                MotionEvent::WallContactEnded { side: edge.side }
            });
        }

        for task in self.scheduler.advance_to(now_ms) {
            match task {
                MotionTask::EndLandingRecovery => {
                    self.jump.end_landing_recovery();
                    debug!("Landing recovery ended");
                }
                MotionTask::RefreshDash => self.wall.refresh_dashes_from_cooldown(),
            }
        }

        // Decide.
        self.jump.on_ground_transition(ground_transition);
        match ground_transition {
            GroundTransition::Landed { impact_speed } => {
                self.on_landed(body, impact_speed);
                velocity.x = self.integrator.blend_transition(velocity.x, input_x, Surface::Ground);
            }
            GroundTransition::LeftGround { coyote } => {
                self.outbox.push(MotionEvent::LeftGround { coyote });
                velocity.x = self.integrator.blend_transition(velocity.x, input_x, Surface::Air);
            }
            GroundTransition::CoyoteExpired | GroundTransition::None => {}
        }

        self.jump.tick(now_ms, step_ms);
        self.wall.tick(step_ms);

        if let Some(scale) = self.wall.finish_dash_if_due(now_ms) {
            velocity *= scale;
            self.outbox.push(MotionEvent::DashEnded);
        }

        let grounded = self.ground.is_on_ground();
        match self.wall.update_slide(self.walls.state_mut(), grounded, velocity, input_x, step_ms) {
            Some(SlideEdge::Started(side)) => {
                self.outbox.push(MotionEvent::WallSlideStarted { side });
            }
            Some(SlideEdge::Ended(side)) => {
                self.outbox.push(MotionEvent::WallSlideEnded { side });
            }
            None => {}
        }

        let mut launched = false;
        let mut exhausted = false;
        let mut torque = 0.0;

        if !self.wall.dash_active() && self.sampler.peek_active(Button::Jump, now_ms).is_some() {
            let wall_side = if grounded {
                None
            } else {
                self.wall.wall_jump_side()
            };
            if let Some(side) = wall_side {
                self.sampler.consume_active(Button::Jump, now_ms);
                let launch = self.wall.wall_jump(side, held.vertical_axis(), self.walls.state_mut());
                self.jump.register_wall_jump(now_ms);
                if self.ground.notify_jump() {
                    debug!("Coyote grace consumed by wall jump");
                }
                velocity = launch.velocity;
                self.facing = side.away();
                launched = true;
                let spray = self.rng.spray(WALL_JUMP_PARTICLES, angle_toward(side.toward()), FRAC_PI_2);
                self.outbox.push(MotionEvent::WallJumpExecuted {
                    side,
                    vx: velocity.x,
                    vy: velocity.y,
                    spray,
                });
            } else {
                match self.jump.attempt(now_ms, grounded, self.ground.grace_active()) {
                    JumpAttempt::Launched(launch) => {
                        self.sampler.consume_active(Button::Jump, now_ms);
                        if self.ground.notify_jump() {
                            debug!("Coyote grace consumed by jump {}", launch.jump_number);
                        }
                        velocity.y = launch.velocity;
                        torque = -launch.spin_torque * self.facing;
                        launched = true;
                        let spray = self.rng.spray(JUMP_PARTICLES, -FRAC_PI_2, FRAC_PI_2);
                        self.outbox.push(MotionEvent::JumpExecuted {
                            jump_number: launch.jump_number,
                            velocity: launch.velocity,
                            combo: launch.combo,
                            coyote: launch.coyote,
                            spray,
                        });
                    }
                    JumpAttempt::Exhausted => {
                        self.sampler.consume_active(Button::Jump, now_ms);
                        warn!("{}", MotionError::JumpExhausted);
                        exhausted = true;
                        self.outbox.push(MotionEvent::JumpExhausted);
                    }
                    JumpAttempt::Ineligible => {}
                }
            }
        }

        if !self.wall.dash_active() && self.sampler.peek_active(Button::Dash, now_ms).is_some() {
            let on_ground = grounded && !launched;
            let wall_side = self.walls.state().contact_side(input_x);
            if let Some(dash) = self.wall.try_dash(
                now_ms,
                on_ground,
                wall_side,
                &held,
                self.facing,
                &mut self.scheduler,
            ) {
                self.sampler.consume_active(Button::Dash, now_ms);
                velocity = dash.velocity;
                let spray = self.rng.spray(DASH_PARTICLES, angle_toward(-dash.sign), PI / 3.0);
                self.outbox.push(MotionEvent::DashStarted {
                    direction: dash.direction,
                    sign: dash.sign,
                    spray,
                });
            }
        }

        if !self.wall.facing_locked() && input_x != 0.0 {
            self.facing = input_x.signum();
        }

        // Integrate.
        let on_ground = grounded && !launched;
        let control = self.jump.vertical_control(held.jump, velocity.y, step_ms);
        let drive = StepDrive {
            input_x,
            fast_fall_held: held.down,
            grounded: on_ground,
            landing_recovery: self.jump.landing_recovery_active(),
            gravity: self.jump.gravity_profile(),
            control,
            slide: self.wall.slide_constraint(self.walls.state()),
            dash: self.wall.dash_drive(),
        };
        let mut next = self.integrator.integrate(velocity, &drive, step_ms);
        if !next.is_finite() {
            warn!("{}", PhysicsError::NonFinite("integrated velocity"));
            next = if velocity.is_finite() {
                velocity
            } else {
                Vec2::ZERO
            };
        }

        if let Err(e) = body.set_linear_velocity(next) {
            warn!("Velocity write failed, no movement applied: {}", e);
        }
        if let Some(impulse) = self.wall.stick_impulse(dt_secs) {
            if let Err(e) = body.apply_impulse(impulse) {
                warn!("Wall stick impulse failed: {}", e);
            }
        }
        if torque != 0.0 {
            if let Err(e) = body.apply_torque_impulse(torque) {
                warn!("Spin torque failed: {}", e);
            }
        }

        self.jump.update_phase(next.y, on_ground);

        for signal in self.momentum.observe(next, now_ms, step_ms) {
            self.outbox.push(match signal {
                MomentumSignal::High { magnitude } => MotionEvent::HighMomentum { magnitude },
                MomentumSignal::Changed { magnitude, peak } => {
                    MotionEvent::MomentumChanged { magnitude, peak }
                }
            });
        }

        exhausted
    }

    fn on_landed(&mut self, body: &dyn PhysicsBody, impact_speed: f32) {
        if let Some(previous) = self.jump.take_landing_recovery() {
            self.scheduler.cancel(previous);
        }
        let handle = self.scheduler.schedule_once(
            self.tuning.ground.landing_recovery_ms,
            MotionTask::EndLandingRecovery,
        );
        self.jump.begin_landing_recovery(handle);
        self.wall.refresh_dashes(&mut self.scheduler);
        self.integrator.reset();

        let upright = match body.rotation() {
            Ok(rotation) => wrap_angle(rotation).abs() <= self.tuning.body.upright_tolerance,
            Err(e) => {
                warn!("Rotation read failed on landing: {}", e);
                true
            }
        };
        let count = (impact_speed / 100.0).clamp(2.0, 12.0) as usize;
        let spray = self.rng.spray(count, FRAC_PI_2, PI);
        self.outbox.push(MotionEvent::Landed {
            impact_speed,
            upright,
            spray,
        });
    }

    fn flush_events(&mut self, sink: &mut dyn EventSink) {
        for event in self.outbox.drain(..) {
            match event.validate() {
                Ok(()) => sink.emit(event),
                Err(e) => warn!("{}", e),
            }
        }
    }

    /// Forget motion state after the host moved the body, e.g. a respawn.
    /// Outstanding tasks are cancelled; the clock and RNG stream continue.
    pub fn reset(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.sampler.reset();
        self.pending_input.clear();
        self.ground = GroundContactTracker::new(&self.tuning.ground);
        self.walls.reset();
        self.jump.reset();
        self.wall.reset();
        self.integrator.reset();
        self.momentum.reset();
        self.last_ground_contact = false;
        self.outbox.clear();
        debug!("Motion controller reset, {} tasks cancelled", cancelled);
    }

    /// Cancel every outstanding task; later updates do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled = self.scheduler.cancel_all();
        self.pending_input.clear();
        self.outbox.clear();
        self.torn_down = true;
        info!("Motion controller torn down, {} tasks cancelled", cancelled);
    }
}

impl Drop for MotionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn read_kinematics(body: &dyn PhysicsBody) -> Result<(Vec2, Vec2), PhysicsError> {
    let position = body.position()?;
    let velocity = body.linear_velocity()?;
    if !position.is_finite() {
        return Err(PhysicsError::NonFinite("position"));
    }
    if !velocity.is_finite() {
        return Err(PhysicsError::NonFinite("velocity"));
    }
    Ok((position, velocity))
}

/// Angle of the horizontal direction `sign`.
fn angle_toward(sign: f32) -> f32 {
    if sign < 0.0 { PI } else { 0.0 }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
