/// A single match: the RUNNING → ENDED state machine around `tick`.
///
/// The frame driver calls `step` once per frame and keeps scheduling frames
/// only while it gets `FrameOutcome::Continue` back.

use std::time::Duration;

use log::info;

use crate::compute::{resize_playfield, tick};
use crate::entities::{GameState, GameStatus, Side};
use crate::input::InputSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Match still running; request another frame.
    Continue,
    /// Match is over.  Further frames must not be scheduled.
    Ended(Side),
}

#[derive(Clone, Debug)]
pub struct Match {
    state: GameState,
}

impl Match {
    pub fn new(state: GameState) -> Self {
        Match { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn winner(&self) -> Option<Side> {
        match self.state.status {
            GameStatus::Ended { winner } => Some(winner),
            GameStatus::Running => None,
        }
    }

    /// Run one frame.  Once the match has ended this is a no-op that keeps
    /// reporting the same winner.
    pub fn step(&mut self, input: &InputSnapshot, now: Duration) -> FrameOutcome {
        if let Some(winner) = self.winner() {
            return FrameOutcome::Ended(winner);
        }

        self.state = tick(&self.state, input, now);

        match self.winner() {
            Some(winner) => {
                info!(
                    "{} wins after {} frames ({} - {})",
                    winner.label(),
                    self.state.frame,
                    self.state.player1.health,
                    self.state.player2.health
                );
                FrameOutcome::Ended(winner)
            }
            None => FrameOutcome::Continue,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        info!("playfield resized to {width}x{height}");
        self.state = resize_playfield(&self.state, width, height);
    }
}
