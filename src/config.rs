//! Game configuration.
//!
//! Everything is optional in the TOML file; missing fields fall back to the
//! classic tuning (50-unit paddles, 12-unit bullets, 300 ms cooldown, 5 HP).
//!
//! ```toml
//! log_file = "duel.log"
//!
//! [rules]
//! bullet_speed = 14.0
//!
//! [controls.player2]
//! up = "i"
//! down = "k"
//! shoot = "l"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::entities::{Controls, Direction};
use crate::error::ConfigError;

/// Gameplay tunables.  Copied into every `GameState` so the step functions
/// stay pure.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Units per frame a paddle moves while a direction key is held.
    pub player_speed: f32,
    /// Units per frame a bullet travels.
    pub bullet_speed: f32,
    /// Minimum time between two shots of the same player.
    pub shoot_cooldown_ms: u64,
    pub max_health: u32,
    pub player_width: f32,
    pub player_height: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub effect_radius: f32,
    /// Radius added to an effect every frame.
    pub effect_growth: f32,
    /// Frames an effect stays on screen.
    pub effect_life: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            player_speed: 5.0,
            bullet_speed: 12.0,
            shoot_cooldown_ms: 300,
            max_health: 5,
            player_width: 50.0,
            player_height: 50.0,
            bullet_width: 12.0,
            bullet_height: 5.0,
            effect_radius: 10.0,
            effect_growth: 2.0,
            effect_life: 20,
        }
    }
}

impl Rules {
    pub fn shoot_cooldown(&self) -> Duration {
        Duration::from_millis(self.shoot_cooldown_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("rules.player_speed", self.player_speed)?;
        positive("rules.bullet_speed", self.bullet_speed)?;
        positive("rules.player_width", self.player_width)?;
        positive("rules.player_height", self.player_height)?;
        positive("rules.bullet_width", self.bullet_width)?;
        positive("rules.bullet_height", self.bullet_height)?;
        positive("rules.effect_radius", self.effect_radius)?;
        non_negative("rules.effect_growth", self.effect_growth)?;
        if self.max_health == 0 {
            return Err(ConfigError::Invalid {
                field: "rules.max_health",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value: value as f64,
            reason: "must be a finite number above zero",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value: value as f64,
            reason: "must be a finite number, zero or above",
        })
    }
}

/// Key names for one player, as written in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub shoot: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub player1: KeyBindings,
    pub player2: KeyBindings,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        ControlsConfig {
            player1: KeyBindings {
                up: "w".into(),
                down: "s".into(),
                shoot: "space".into(),
            },
            player2: KeyBindings {
                up: "up".into(),
                down: "down".into(),
                shoot: "enter".into(),
            },
        }
    }
}

impl ControlsConfig {
    /// Resolve key names into `Controls` for (player 1, player 2).
    /// Player 1 always fires right and player 2 always fires left.
    pub fn resolve(&self) -> Result<(Controls, Controls), ConfigError> {
        Ok((
            resolve_bindings(&self.player1, Direction::Right)?,
            resolve_bindings(&self.player2, Direction::Left)?,
        ))
    }
}

fn resolve_bindings(b: &KeyBindings, dir: Direction) -> Result<Controls, ConfigError> {
    Ok(Controls {
        up: parse_key(&b.up)?,
        down: parse_key(&b.down)?,
        shoot: parse_key(&b.shoot)?,
        dir,
    })
}

/// Terminal viewport and frame pacing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Logical units covered by one terminal column.
    pub units_per_column: f32,
    /// Logical units covered by one terminal row.
    pub units_per_row: f32,
    /// Target frame time.
    pub frame_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            units_per_column: 10.0,
            units_per_row: 20.0,
            frame_ms: 16,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("display.units_per_column", self.units_per_column)?;
        positive("display.units_per_row", self.units_per_row)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    /// Logical playfield size for a terminal of `cols` × `rows` cells.
    pub fn playfield_size(&self, cols: u16, rows: u16) -> (f32, f32) {
        (
            cols as f32 * self.units_per_column,
            rows as f32 * self.units_per_row,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: Rules,
    pub controls: ControlsConfig,
    pub display: DisplayConfig,
    /// Where log records go.  The terminal is in raw mode while playing, so
    /// without this only a redirected stderr shows them.
    pub log_file: Option<PathBuf>,
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes, speeds and scales the simulation or renderer can't use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        self.display.validate()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// Map a human key name onto a crossterm `KeyCode`.
///
/// Single characters map to themselves (case-sensitive, as terminals report
/// them).  Named keys are case-insensitive.
pub fn parse_key(name: &str) -> Result<KeyCode, ConfigError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "insert" => KeyCode::Insert,
        "delete" => KeyCode::Delete,
        other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n) if (1..=12).contains(&n) => KeyCode::F(n),
            _ => return Err(ConfigError::UnknownKey(name.to_string())),
        },
    };
    Ok(code)
}

/// Short display name for a key, roughly the inverse of `parse_key`.
pub fn key_label(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "SPACE".to_string(),
        KeyCode::Char(c) => c.to_uppercase().to_string(),
        KeyCode::Enter => "ENTER".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}").to_uppercase(),
    }
}
