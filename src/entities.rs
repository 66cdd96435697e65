/// All game entity types — pure data, no logic.
///
/// Positions and sizes are in logical playfield units.  The renderer decides
/// how those map onto terminal cells.

use std::time::Duration;

use crossterm::event::KeyCode;

use crate::config::Rules;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// +1.0 for right, -1.0 for left.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::One => "Player 1",
            Side::Two => "Player 2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Terminal.  There is no way back to `Running`.
    Ended { winner: Side },
}

impl GameStatus {
    /// Text shown over the playfield once the match is decided.
    pub fn banner(&self) -> Option<String> {
        match self {
            GameStatus::Running => None,
            GameStatus::Ended { winner } => Some(format!("{} Wins!", winner.label())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const DEEP_SKY_BLUE: Rgb = Rgb(0, 191, 255);
    pub const CRIMSON: Rgb = Rgb(220, 20, 60);
    pub const EFFECT_RED: Rgb = Rgb(255, 0, 0);
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub up: KeyCode,
    pub down: KeyCode,
    pub shoot: KeyCode,
    pub dir: Direction,
}

impl Controls {
    /// W / S / Space, firing right.
    pub fn player_one() -> Self {
        Controls {
            up: KeyCode::Char('w'),
            down: KeyCode::Char('s'),
            shoot: KeyCode::Char(' '),
            dir: Direction::Right,
        }
    }

    /// ↑ / ↓ / Enter, firing left.
    pub fn player_two() -> Self {
        Controls {
            up: KeyCode::Up,
            down: KeyCode::Down,
            shoot: KeyCode::Enter,
            dir: Direction::Left,
        }
    }

    pub fn binds(&self, key: &KeyCode) -> bool {
        self.up == *key || self.down == *key || self.shoot == *key
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Fixed after construction.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    pub health: u32,
    /// Match time of the last successful shot, `None` before the first one.
    pub last_shot: Option<Duration>,
    pub controls: Controls,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Transient entities ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    /// Fixed at spawn.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    /// Fixed at spawn.
    pub dir: Direction,
}

impl Bullet {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Expanding ring left behind where a bullet struck a player.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Frames left to display.
    pub life: u32,
}

// ── Tagged view ───────────────────────────────────────────────────────────────

/// Borrowed view over any entity so callers can work by capability
/// (bounds for collision / rect drawing, color for tinting) instead of by type.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Bullet(&'a Bullet),
    Effect(&'a Effect),
}

impl<'a> EntityRef<'a> {
    /// Rectangular extent.  Effects are circles and have none.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            EntityRef::Player(p) => Some(p.bounds()),
            EntityRef::Bullet(b) => Some(b.bounds()),
            EntityRef::Effect(_) => None,
        }
    }

    /// Fill color.  Effects fade, so their tint is picked at draw time.
    pub fn color(&self) -> Option<Rgb> {
        match self {
            EntityRef::Player(p) => Some(p.color),
            EntityRef::Bullet(b) => Some(b.color),
            EntityRef::Effect(_) => None,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player1: Player,
    pub player2: Player,
    /// Live bullets in firing order.
    pub bullets: Vec<Bullet>,
    /// Live hit effects in creation order.
    pub effects: Vec<Effect>,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub rules: Rules,
}

impl GameState {
    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::One => &self.player1,
            Side::Two => &self.player2,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Ended { .. })
    }

    /// True if either player uses `key` as a control.
    pub fn binds(&self, key: &KeyCode) -> bool {
        self.player1.controls.binds(key) || self.player2.controls.binds(key)
    }

    /// Every entity in draw order: players, then bullets, then effects.
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> + '_ {
        [EntityRef::Player(&self.player1), EntityRef::Player(&self.player2)]
            .into_iter()
            .chain(self.bullets.iter().map(EntityRef::Bullet))
            .chain(self.effects.iter().map(EntityRef::Effect))
    }
}
