use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use duel_shooter::input::*;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
}

fn repeat(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

fn tracker() -> KeyTracker {
    KeyTracker::new(Duration::from_millis(16))
}

#[test]
fn snapshot_reports_pressed_keys() {
    let mut keys = tracker();
    keys.handle(&press(KeyCode::Char('w')), 1);
    keys.handle(&press(KeyCode::Enter), 1);

    let snap = keys.snapshot(1);
    assert!(snap.is_held(&KeyCode::Char('w')));
    assert!(snap.is_held(&KeyCode::Enter));
    assert!(!snap.is_held(&KeyCode::Char('s')));
}

#[test]
fn release_drops_key_immediately() {
    let mut keys = tracker();
    keys.handle(&press(KeyCode::Up), 1);
    keys.handle(&release(KeyCode::Up), 2);
    assert!(!keys.is_held(&KeyCode::Up, 2));
    assert!(keys.snapshot(2).is_empty());
}

#[test]
fn press_expires_after_hold_window() {
    let mut keys = tracker();
    let hold = keys.hold_frames();
    keys.handle(&press(KeyCode::Char(' ')), 10);
    assert!(keys.is_held(&KeyCode::Char(' '), 10 + hold));
    assert!(!keys.is_held(&KeyCode::Char(' '), 10 + hold + 1));
    assert!(keys.snapshot(10 + hold + 1).is_empty());
}

#[test]
fn hold_window_is_a_fixed_time_whatever_the_frame_rate() {
    // 150 ms: 10 frames at ~60 fps, 5 frames at ~30 fps.
    assert_eq!(KeyTracker::new(Duration::from_millis(16)).hold_frames(), 10);
    assert_eq!(KeyTracker::new(Duration::from_millis(33)).hold_frames(), 5);
    assert_eq!(KeyTracker::new(Duration::from_millis(500)).hold_frames(), 1);
    assert_eq!(KeyTracker::new(Duration::ZERO).hold_frames(), 150);
}

#[test]
fn key_survives_typical_autorepeat_gap() {
    // Classic terminal at 60 fps: press, then the first auto-repeat arrives
    // ~100 ms later (6 frames).  The key must not drop out in between.
    let mut keys = tracker();
    keys.handle(&press(KeyCode::Char('w')), 1);
    for frame in 1..=7 {
        assert!(keys.snapshot(frame).is_held(&KeyCode::Char('w')), "frame {frame}");
    }
    keys.handle(&repeat(KeyCode::Char('w')), 7);
    assert!(keys.is_held(&KeyCode::Char('w'), 12));
}

#[test]
fn repeat_keeps_key_alive() {
    let mut keys = tracker();
    keys.handle(&press(KeyCode::Down), 1);
    keys.handle(&repeat(KeyCode::Down), 4);
    keys.handle(&repeat(KeyCode::Down), 8);
    assert!(keys.is_held(&KeyCode::Down, 12));
}

#[test]
fn clear_forgets_everything() {
    let mut keys = tracker();
    keys.handle(&press(KeyCode::Char('w')), 1);
    keys.handle(&press(KeyCode::Down), 1);
    keys.clear();
    assert!(keys.snapshot(1).is_empty());
}

#[test]
fn snapshot_is_detached_from_tracker() {
    let mut keys = tracker();
    keys.handle(&press(KeyCode::Char('s')), 1);
    let snap = keys.snapshot(1);
    keys.handle(&release(KeyCode::Char('s')), 1);
    // events after the snapshot don't leak into it
    assert!(snap.is_held(&KeyCode::Char('s')));
}

#[test]
fn with_keys_builds_snapshot() {
    let snap = InputSnapshot::with_keys([KeyCode::Left, KeyCode::Right]);
    assert!(snap.is_held(&KeyCode::Left));
    assert!(snap.is_held(&KeyCode::Right));
    assert!(!snap.is_empty());
    assert!(InputSnapshot::new().is_empty());
}
