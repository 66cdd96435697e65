/// Keyboard state, decoupled from the terminal event stream.
///
/// The frame loop feeds every key event into a `KeyTracker` and, once per
/// frame, takes an `InputSnapshot` that the simulation reads.  The snapshot
/// never changes during a step.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// A key is considered "held" if its last press/repeat event arrived within
/// this long.  Covers terminals that don't emit key-release events; it has
/// to outlast the OS auto-repeat interval (~30-50 ms), and the first repeat
/// after a press, which some desktops delay further.
pub const HOLD_TIME: Duration = Duration::from_millis(150);

/// Keys held during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<KeyCode>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I: IntoIterator<Item = KeyCode>>(keys: I) -> Self {
        InputSnapshot {
            held: keys.into_iter().collect(),
        }
    }

    pub fn is_held(&self, key: &KeyCode) -> bool {
        self.held.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Maps each held key → the frame it was last seen (press or repeat).
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events.  Keys expire after
///   `HOLD_TIME` of silence, counted in whole frames.
#[derive(Clone, Debug)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    hold_frames: u64,
}

impl KeyTracker {
    /// Tracker for a loop that runs one frame every `frame`.
    pub fn new(frame: Duration) -> Self {
        let frame_ms = frame.as_millis().max(1);
        let hold_frames = (HOLD_TIME.as_millis() + frame_ms - 1) / frame_ms;
        KeyTracker {
            key_frame: HashMap::new(),
            hold_frames: (hold_frames as u64).max(1),
        }
    }

    /// Frames of silence after which a key counts as released.
    pub fn hold_frames(&self) -> u64 {
        self.hold_frames
    }

    pub fn handle(&mut self, event: &KeyEvent, frame: u64) {
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
            }
        }
    }

    /// Returns true if `key` was seen within the last `hold_frames()` frames.
    pub fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= self.hold_frames)
            .unwrap_or(false)
    }

    pub fn snapshot(&self, frame: u64) -> InputSnapshot {
        InputSnapshot::with_keys(
            self.key_frame
                .keys()
                .filter(|k| self.is_held(k, frame))
                .copied(),
        )
    }

    /// Forget every key.  Used when focus is lost so nothing stays stuck.
    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}
