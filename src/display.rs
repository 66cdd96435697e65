/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// logical playfield units into terminal cells and queues commands.

use std::f32::consts::TAU;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use duel_shooter::config::{key_label, DisplayConfig};
use duel_shooter::entities::{
    Controls, Effect, EntityRef, GameState, Rect, Rgb, Side,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BAR_BACK: Color = Color::DarkGrey;
const C_BANNER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

// ── HUD layout (logical units) ────────────────────────────────────────────────

const BAR_MARGIN: f32 = 20.0;
const BAR_WIDTH: f32 = 150.0;
const BAR_HEIGHT: f32 = 20.0;

/// Points sampled along an effect's ring.
const RING_SAMPLES: usize = 32;

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

/// Maps logical units onto the terminal grid.
struct Viewport {
    units_per_column: f32,
    units_per_row: f32,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(view: &DisplayConfig, state: &GameState) -> Self {
        let (cols, rows) = terminal::size().unwrap_or((
            (state.width / view.units_per_column) as u16,
            (state.height / view.units_per_row) as u16,
        ));
        Viewport {
            units_per_column: view.units_per_column,
            units_per_row: view.units_per_row,
            cols,
            rows,
        }
    }

    fn col(&self, x: f32) -> i32 {
        (x / self.units_per_column).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y / self.units_per_row).floor() as i32
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }

    /// Cell span covered by `[start, start + len)`, at least one cell wide.
    fn span(start: i32, end_exclusive: f32) -> i32 {
        (end_exclusive.ceil() as i32).saturating_sub(start).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: &DisplayConfig) -> std::io::Result<()> {
    let vp = Viewport::new(view, state);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for entity in state.entities() {
        match (entity.bounds(), entity.color()) {
            (Some(bounds), Some(color)) => draw_rect(out, &vp, &bounds, color)?,
            _ => {
                if let EntityRef::Effect(effect) = entity {
                    draw_effect(out, &vp, effect, state.rules.effect_life)?;
                }
            }
        }
    }

    for side in [Side::One, Side::Two] {
        let player = state.player(side);
        let x = match side {
            Side::One => BAR_MARGIN,
            Side::Two => state.width - BAR_WIDTH - BAR_MARGIN,
        };
        draw_health_bar(
            out,
            &vp,
            Rect::new(x, BAR_MARGIN, BAR_WIDTH, BAR_HEIGHT),
            player.health,
            state.rules.max_health,
            player.color,
        )?;
    }

    draw_controls_hint(out, &vp, state)?;

    if let Some(msg) = state.status.banner() {
        draw_banner(out, &vp, &msg)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Primitives ────────────────────────────────────────────────────────────────

fn fill_cells<W: Write>(
    out: &mut W,
    vp: &Viewport,
    col: i32,
    row: i32,
    width: i32,
    height: i32,
    glyph: char,
) -> std::io::Result<()> {
    let first = col.max(0);
    let last = col.saturating_add(width).min(vp.cols as i32);
    if first >= last {
        return Ok(());
    }
    let line: String = std::iter::repeat(glyph).take((last - first) as usize).collect();
    let bottom = row.saturating_add(height).min(vp.rows as i32);
    for r in row.max(0)..bottom {
        out.queue(cursor::MoveTo(first as u16, r as u16))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_rect<W: Write>(out: &mut W, vp: &Viewport, bounds: &Rect, color: Rgb) -> std::io::Result<()> {
    let col = vp.col(bounds.x);
    let row = vp.row(bounds.y);
    let width = Viewport::span(col, (bounds.x + bounds.width) / vp.units_per_column);
    let height = Viewport::span(row, (bounds.y + bounds.height) / vp.units_per_row);

    out.queue(style::SetForegroundColor(to_color(color)))?;
    fill_cells(out, vp, col, row, width, height, '█')
}

/// Grey background bar with a foreground proportional to `current / max`.
fn draw_health_bar<W: Write>(
    out: &mut W,
    vp: &Viewport,
    bar: Rect,
    current: u32,
    max: u32,
    color: Rgb,
) -> std::io::Result<()> {
    let col = vp.col(bar.x);
    let row = vp.row(bar.y);
    let width = Viewport::span(col, (bar.x + bar.width) / vp.units_per_column);
    let height = Viewport::span(row, (bar.y + bar.height) / vp.units_per_row);

    out.queue(style::SetForegroundColor(C_BAR_BACK))?;
    fill_cells(out, vp, col, row, width, height, '░')?;

    let filled = if max == 0 {
        0
    } else {
        (width as f32 * current.min(max) as f32 / max as f32).round() as i32
    };
    if filled > 0 {
        out.queue(style::SetForegroundColor(to_color(color)))?;
        fill_cells(out, vp, col, row, filled, height, '█')?;
    }
    Ok(())
}

/// Ring of radius `effect.radius` whose brightness fades with remaining life.
fn draw_effect<W: Write>(out: &mut W, vp: &Viewport, effect: &Effect, full_life: u32) -> std::io::Result<()> {
    let alpha = if full_life == 0 {
        0.0
    } else {
        (effect.life as f32 / full_life as f32).clamp(0.0, 1.0)
    };
    let Rgb(r, g, b) = Rgb::EFFECT_RED;
    let faded = Color::Rgb {
        r: (r as f32 * alpha) as u8,
        g: (g as f32 * alpha) as u8,
        b: (b as f32 * alpha) as u8,
    };
    out.queue(style::SetForegroundColor(faded))?;

    let mut last: Option<(i32, i32)> = None;
    for i in 0..RING_SAMPLES {
        let angle = TAU * i as f32 / RING_SAMPLES as f32;
        let col = vp.col(effect.x + effect.radius * angle.cos());
        let row = vp.row(effect.y + effect.radius * angle.sin());
        if last == Some((col, row)) || !vp.contains(col, row) {
            continue;
        }
        last = Some((col, row));
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(Print("·"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn controls_text(c: &Controls) -> String {
    format!("{} {} {}", key_label(&c.up), key_label(&c.down), key_label(&c.shoot))
}

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let hint = format!(
        "P1: {}   P2: {}   ESC : Quit",
        controls_text(&state.player1.controls),
        controls_text(&state.player2.controls)
    );
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Win banner ────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, vp: &Viewport, msg: &str) -> std::io::Result<()> {
    let hint = "ESC / Q - Quit";
    let cx = vp.cols / 2;
    let cy = vp.rows / 2;

    out.queue(cursor::MoveTo(cx.saturating_sub(msg.chars().count() as u16 / 2), cy))?;
    out.queue(style::SetForegroundColor(C_BANNER))?;
    out.queue(Print(msg))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(hint.chars().count() as u16 / 2), cy.saturating_add(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_shooter::compute::init_state;
    use duel_shooter::config::Rules;
    use duel_shooter::entities::GameStatus;

    fn make_state() -> GameState {
        init_state(
            Rules::default(),
            (Controls::player_one(), Controls::player_two()),
            800.0,
            600.0,
        )
    }

    fn rendered(state: &GameState, view: &DisplayConfig) -> String {
        let mut out = Vec::new();
        render(&mut out, state, view).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn render_survives_degenerate_scale() {
        // Bypasses config validation: the renderer must still not overflow.
        let state = make_state();
        for (ux, uy) in [(0.0, 20.0), (10.0, 0.0), (f32::NAN, 20.0), (-10.0, -20.0), (1e-30, 1e-30)] {
            let view = DisplayConfig {
                units_per_column: ux,
                units_per_row: uy,
                ..DisplayConfig::default()
            };
            rendered(&state, &view);
        }
    }

    #[test]
    fn fill_cells_clips_huge_spans() {
        let vp = Viewport { units_per_column: 10.0, units_per_row: 20.0, cols: 10, rows: 5 };
        let mut out = Vec::new();
        fill_cells(&mut out, &vp, i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX, '#').unwrap();
        assert!(out.is_empty());
        fill_cells(&mut out, &vp, -3, -3, i32::MAX, i32::MAX, '#').unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("##########").count(), 5);
    }

    #[test]
    fn banner_drawn_only_after_knockout() {
        let mut state = make_state();
        let view = DisplayConfig::default();
        assert!(!rendered(&state, &view).contains("Wins!"));

        state.status = GameStatus::Ended { winner: Side::One };
        assert!(rendered(&state, &view).contains("Player 1 Wins!"));
    }
}
