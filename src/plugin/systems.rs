//! Plugin domain: input polling, fixed-step driving and host policy systems.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use std::path::Path;

use crate::config::{MotionTuning, load_tuning, validate_tuning};
use crate::controller::{MotionContext, MotionEvent};
use crate::input::RawButtons;

use super::bridge::{AvianBody, AvianWorld};
use super::{
    ExhaustedJumpPolicy, JumpExhaustedMessage, MotionDebug, MotionDriver, MotionMessage, Player,
    SpawnPoint, TuningPath,
};

/// Map the keyboard to motion buttons.
pub fn raw_buttons_from_keys(keyboard: &ButtonInput<KeyCode>) -> RawButtons {
    RawButtons {
        left: keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft),
        right: keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight),
        up: keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp),
        down: keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown),
        jump: keyboard.pressed(KeyCode::Space) || keyboard.pressed(KeyCode::KeyK),
        dash: keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::KeyJ),
    }
}

/// Serialise one event for the debug log.
pub fn event_json_line(entity: Entity, event: &MotionEvent) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string(event)?;
    Ok(format!("{{\"entity\":{},\"event\":{}}}", entity.to_bits(), payload))
}

/// Load tuning from `path`, falling back to defaults when the file is
/// missing, unparsable or fails validation.
pub fn tuning_or_default(path: &Path) -> MotionTuning {
    let tuning = match load_tuning(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}; using default motion tuning", e);
            return MotionTuning::default();
        }
    };

    let errors = validate_tuning(&tuning);
    if errors.is_empty() {
        info!("Loaded motion tuning from {}", path.display());
        return tuning;
    }
    for error in &errors {
        warn!("Motion tuning: {}", error);
    }
    warn!(
        "{} invalid motion tuning values in {}; using defaults",
        errors.len(),
        path.display()
    );
    MotionTuning::default()
}

pub(crate) fn load_tuning_file(path: Option<Res<TuningPath>>, mut commands: Commands) {
    let Some(path) = path else {
        return;
    };
    commands.insert_resource(tuning_or_default(&path.0));
}

pub(crate) fn configure_fixed_timestep(tuning: Res<MotionTuning>, mut fixed: ResMut<Time<Fixed>>) {
    let hz = tuning.step.steps_per_second.max(1) as f64;
    fixed.set_timestep_hz(hz);
    info!("Motion fixed step set to {} Hz", hz);
}

pub(crate) fn poll_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut drivers: Query<&mut MotionDriver, With<Player>>,
) {
    let raw = raw_buttons_from_keys(&keyboard);
    for mut driver in &mut drivers {
        driver.0.poll_input(raw);
    }
}

pub(crate) fn drive_motion(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut drivers: Query<
        (
            Entity,
            &mut MotionDriver,
            &Transform,
            &mut LinearVelocity,
            &mut AngularVelocity,
        ),
        With<Player>,
    >,
    mut motion_messages: MessageWriter<MotionMessage>,
    mut exhausted_messages: MessageWriter<JumpExhaustedMessage>,
) {
    let delta_ms = time.delta_secs() * 1000.0;

    for (entity, mut driver, transform, mut velocity, mut angular_velocity) in &mut drivers {
        let mut body = AvianBody {
            transform,
            velocity: &mut *velocity,
            angular_velocity: &mut *angular_velocity,
        };
        let world = AvianWorld::new(&spatial_query, entity);
        let mut events: Vec<MotionEvent> = Vec::new();

        let report = {
            let mut ctx = MotionContext::new(&mut body, &world, &mut events);
            driver.0.update(delta_ms, &mut ctx)
        };

        for event in events {
            motion_messages.write(MotionMessage { entity, event });
        }
        if report.jump_exhausted {
            exhausted_messages.write(JumpExhaustedMessage { entity });
        }
    }
}

pub(crate) fn apply_exhausted_policy(
    policy: Res<ExhaustedJumpPolicy>,
    mut exhausted: MessageReader<JumpExhaustedMessage>,
    mut players: Query<(&mut MotionDriver, &SpawnPoint, &mut Transform, &mut LinearVelocity)>,
) {
    for message in exhausted.read() {
        if !policy.resets() {
            debug!("Jump exhausted on {:?}, policy ignores it", message.entity);
            continue;
        }
        let Ok((mut driver, spawn, mut transform, mut velocity)) = players.get_mut(message.entity)
        else {
            warn!("Jump exhausted on missing character {:?}", message.entity);
            continue;
        };
        transform.translation = spawn.0.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;
        driver.0.reset();
        info!("Jump exhausted: {:?} reset to spawn {:?}", message.entity, spawn.0);
    }
}

pub(crate) fn log_motion_messages(
    debug_settings: Res<MotionDebug>,
    mut messages: MessageReader<MotionMessage>,
) {
    for message in messages.read() {
        if !debug_settings.trace_events {
            continue;
        }
        match event_json_line(message.entity, &message.event) {
            Ok(line) => info!("{}", line),
            Err(e) => warn!("Failed to serialise {} event: {}", message.event.kind(), e),
        }
    }
}
