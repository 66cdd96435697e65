/// Pure game-logic functions.
///
/// Every public function takes an immutable view of the current state (plus
/// the frame's `InputSnapshot` and match clock where needed) and returns a
/// brand-new value.  Nothing here touches the terminal or the wall clock.

use std::time::Duration;

use log::{debug, trace};

use crate::collision::is_colliding;
use crate::config::Rules;
use crate::entities::{
    Bullet, Controls, Direction, Effect, GameState, GameStatus, Player, Rgb, Side,
};
use crate::input::InputSnapshot;

/// Horizontal distance from the left edge to player 1, and from player 2's
/// right edge to the right edge of the playfield.
pub const SIDE_MARGIN: f32 = 50.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a playfield of `width` × `height` units.
/// Player 1 sits at the left margin, player 2 at `width - 100`.
pub fn init_state(
    rules: Rules,
    controls: (Controls, Controls),
    width: f32,
    height: f32,
) -> GameState {
    let (c1, c2) = controls;
    let player1 = new_player(&rules, SIDE_MARGIN, height, Rgb::DEEP_SKY_BLUE, c1);
    let player2 = new_player(
        &rules,
        width - SIDE_MARGIN - rules.player_width,
        height,
        Rgb::CRIMSON,
        c2,
    );
    GameState {
        player1,
        player2,
        bullets: Vec::new(),
        effects: Vec::new(),
        status: GameStatus::Running,
        frame: 0,
        width,
        height,
        rules,
    }
}

fn new_player(rules: &Rules, x: f32, playfield_height: f32, color: Rgb, controls: Controls) -> Player {
    Player {
        x,
        y: playfield_height / 2.0,
        width: rules.player_width,
        height: rules.player_height,
        color,
        health: rules.max_health,
        last_shot: None,
        controls,
    }
}

/// Change the playfield bounds.  Entities are deliberately left where they
/// are; a paddle outside the new bounds simply can't move further out.
pub fn resize_playfield(state: &GameState, width: f32, height: f32) -> GameState {
    GameState {
        width,
        height,
        ..state.clone()
    }
}

// ── Per-entity updates ───────────────────────────────────────────────────────

/// Apply held up/down keys.  The two checks are independent: holding both
/// applies up first, then down.
pub fn move_player(player: &Player, input: &InputSnapshot, rules: &Rules, playfield_height: f32) -> Player {
    let mut y = player.y;
    if input.is_held(&player.controls.up) && y > 0.0 {
        y -= rules.player_speed;
    }
    if input.is_held(&player.controls.down) && y + player.height < playfield_height {
        y += rules.player_speed;
    }
    Player { y, ..player.clone() }
}

/// Fire if the shoot key is held and the cooldown has strictly elapsed.
/// Returns the updated player and the new bullet, if any.
pub fn player_shoot(
    player: &Player,
    input: &InputSnapshot,
    rules: &Rules,
    now: Duration,
) -> (Player, Option<Bullet>) {
    if !input.is_held(&player.controls.shoot) {
        return (player.clone(), None);
    }
    let ready = match player.last_shot {
        None => true,
        Some(last) => now.saturating_sub(last) > rules.shoot_cooldown(),
    };
    if !ready {
        return (player.clone(), None);
    }

    let x = match player.controls.dir {
        Direction::Right => player.x + player.width,
        Direction::Left => player.x - rules.bullet_width,
    };
    let bullet = Bullet {
        x,
        y: player.y + player.height / 2.0,
        width: rules.bullet_width,
        height: rules.bullet_height,
        color: player.color,
        dir: player.controls.dir,
    };
    let player = Player {
        last_shot: Some(now),
        ..player.clone()
    };
    (player, Some(bullet))
}

pub fn advance_bullet(bullet: &Bullet, rules: &Rules) -> Bullet {
    Bullet {
        x: bullet.x + rules.bullet_speed * bullet.dir.sign(),
        ..bullet.clone()
    }
}

pub fn advance_effect(effect: &Effect, rules: &Rules) -> Effect {
    Effect {
        radius: effect.radius + rules.effect_growth,
        life: effect.life.saturating_sub(1),
        ..effect.clone()
    }
}

fn spawn_effect(bullet: &Bullet, rules: &Rules) -> Effect {
    Effect {
        x: bullet.x,
        y: bullet.y,
        radius: rules.effect_radius,
        life: rules.effect_life,
    }
}

fn damage(player: &Player) -> Player {
    Player {
        health: player.health.saturating_sub(1),
        ..player.clone()
    }
}

/// Player 1 is checked first, so a simultaneous knock-out goes to player 2.
pub fn check_winner(player1: &Player, player2: &Player) -> Option<Side> {
    if player1.health == 0 {
        Some(Side::Two)
    } else if player2.health == 0 {
        Some(Side::One)
    } else {
        None
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// `now` is the match clock (time since the match started); it only matters
/// for shot cooldowns.  An ended match is returned unchanged.
pub fn tick(state: &GameState, input: &InputSnapshot, now: Duration) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let rules = &state.rules;
    let frame = state.frame + 1;

    // ── 1. Players: move, then shoot ─────────────────────────────────────────
    let mut bullets = state.bullets.clone();

    let player1 = move_player(&state.player1, input, rules, state.height);
    let (mut player1, shot) = player_shoot(&player1, input, rules, now);
    bullets.extend(shot);

    let player2 = move_player(&state.player2, input, rules, state.height);
    let (mut player2, shot) = player_shoot(&player2, input, rules, now);
    bullets.extend(shot);

    // ── 2. Bullets: advance, strike, prune ───────────────────────────────────
    let bullets: Vec<Bullet> = bullets.iter().map(|b| advance_bullet(b, rules)).collect();

    let mut effects = state.effects.clone();
    let mut spent: Vec<usize> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        let bounds = bullet.bounds();
        if bullet.dir == Direction::Right && is_colliding(&bounds, &player2.bounds()) {
            player2 = damage(&player2);
            effects.push(spawn_effect(bullet, rules));
            spent.push(bi);
            debug!("frame {frame}: player 2 hit, health {}", player2.health);
        } else if bullet.dir == Direction::Left && is_colliding(&bounds, &player1.bounds()) {
            player1 = damage(&player1);
            effects.push(spawn_effect(bullet, rules));
            spent.push(bi);
            debug!("frame {frame}: player 1 hit, health {}", player1.health);
        } else if bullet.x < 0.0 || bullet.x > state.width {
            spent.push(bi);
        }
    }

    // Compact once, after every bullet has been looked at.
    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent.contains(i))
        .map(|(_, b)| b)
        .collect();

    // ── 3. Effects: grow, fade, expire ───────────────────────────────────────
    let effects: Vec<Effect> = effects
        .iter()
        .map(|e| advance_effect(e, rules))
        .filter(|e| e.life > 0)
        .collect();

    // ── 4. Win check ─────────────────────────────────────────────────────────
    let status = match check_winner(&player1, &player2) {
        Some(winner) => GameStatus::Ended { winner },
        None => GameStatus::Running,
    };

    trace!(
        "frame {frame}: {} bullets, {} effects",
        bullets.len(),
        effects.len()
    );

    GameState {
        player1,
        player2,
        bullets,
        effects,
        status,
        frame,
        ..state.clone()
    }
}
