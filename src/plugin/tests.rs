//! Plugin domain: unit tests for keyboard mapping, event logging and
//! tuning fallback.

use std::fs;
use std::path::Path;

use bevy::prelude::*;

use super::*;
use crate::config::MotionTuning;
use crate::controller::MotionEvent;
use crate::input::RawButtons;

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

#[test]
fn test_no_keys_maps_to_idle() {
    let keyboard = ButtonInput::<KeyCode>::default();
    assert_eq!(raw_buttons_from_keys(&keyboard), RawButtons::default());
}

#[test]
fn test_wasd_and_arrows_both_steer() {
    let mut keyboard = ButtonInput::<KeyCode>::default();
    keyboard.press(KeyCode::KeyA);
    keyboard.press(KeyCode::ArrowUp);
    keyboard.press(KeyCode::Space);

    let raw = raw_buttons_from_keys(&keyboard);
    assert!(raw.left);
    assert!(raw.up);
    assert!(raw.jump);
    assert!(!raw.right);
    assert!(!raw.dash);

    keyboard.release(KeyCode::KeyA);
    keyboard.press(KeyCode::KeyD);
    keyboard.press(KeyCode::ShiftLeft);
    let raw = raw_buttons_from_keys(&keyboard);
    assert!(!raw.left);
    assert!(raw.right);
    assert!(raw.dash);
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[test]
fn test_exhausted_policy_defaults_to_ignore() {
    assert_eq!(ExhaustedJumpPolicy::default(), ExhaustedJumpPolicy::Ignore);
    assert!(!ExhaustedJumpPolicy::Ignore.resets());
    assert!(ExhaustedJumpPolicy::ResetToSpawn.resets());
}

#[test]
fn test_default_seed() {
    assert_eq!(MotionSeed::default().0, 0x5eed);
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[test]
fn test_event_json_line_wraps_entity_and_event() {
    let entity = Entity::PLACEHOLDER;
    let line = event_json_line(entity, &MotionEvent::DashEnded).expect("event serialises");

    assert!(line.starts_with(&format!("{{\"entity\":{},", entity.to_bits())));
    assert!(line.ends_with("\"event\":{\"kind\":\"dash_ended\"}}"));

    let parsed: serde_json::Value = serde_json::from_str(&line).expect("line is valid JSON");
    assert_eq!(parsed["event"]["kind"], "dash_ended");
}

// ---------------------------------------------------------------------------
// Tuning fallback
// ---------------------------------------------------------------------------

#[test]
fn test_missing_tuning_file_falls_back() {
    let tuning = tuning_or_default(Path::new("does/not/exist/motion_tuning.ron"));
    assert_eq!(tuning, MotionTuning::default());
}

#[test]
fn test_invalid_tuning_falls_back() {
    let path = std::env::temp_dir().join(format!(
        "motion_tuning_invalid_{}.ron",
        std::process::id()
    ));
    fs::write(&path, "(input: (buffer_window_ms: 20.0))").expect("write temp tuning");

    let tuning = tuning_or_default(&path);
    let _ = fs::remove_file(&path);
    assert_eq!(tuning, MotionTuning::default());
}

#[test]
fn test_valid_tuning_file_is_used() {
    let path = std::env::temp_dir().join(format!(
        "motion_tuning_valid_{}.ron",
        std::process::id()
    ));
    fs::write(&path, "(ground: (coyote_ms: 80.0))").expect("write temp tuning");

    let tuning = tuning_or_default(&path);
    let _ = fs::remove_file(&path);
    assert_eq!(tuning.ground.coyote_ms, 80.0);
}
