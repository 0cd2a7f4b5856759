//! Rendering layer: all terminal output lives here.
//!
//! The core works in world units; [`Viewport`] maps them onto the terminal
//! grid inside the border, and back again for mouse input.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use rand::Rng;
use sky_shooter::bullet::Bullet;
use sky_shooter::compute::Game;
use sky_shooter::databus::DataBus;
use sky_shooter::enemy::Enemy;
use sky_shooter::entities::{Entity, Playfield, EXPLOSION_FRAMES};
use sky_shooter::feedback::Feedback;
use sky_shooter::movement::MovementKind;
use sky_shooter::player::Player;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY_STRAIGHT: Color = Color::Green;
const C_ENEMY_ZIGZAG: Color = Color::Magenta;
const C_ENEMY_SINE: Color = Color::Red;
const C_EXPLOSION: Color = Color::Yellow;
const C_BULLET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Glyphs cycled through while an explosion plays.
const EXPLOSION_GLYPHS: [&str; 4] = ["*", "✶", "✺", "·"];

// ── World ↔ terminal mapping ──────────────────────────────────────────────────

/// Maps the playfield onto the terminal area inside the border
/// (columns `1..cols-1`, rows `2..rows-2`).
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    playfield: Playfield,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, playfield: Playfield) -> Self {
        Self { cols, rows, playfield }
    }

    fn inner_cols(&self) -> f32 {
        f32::from(self.cols.saturating_sub(2).max(1))
    }

    fn inner_rows(&self) -> f32 {
        f32::from(self.rows.saturating_sub(4).max(1))
    }

    /// Terminal cell for a world point, or `None` when it is off screen.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.playfield.width || y >= self.playfield.height {
            return None;
        }
        let col = 1.0 + x / self.playfield.width * self.inner_cols();
        let row = 2.0 + y / self.playfield.height * self.inner_rows();
        Some((col as u16, row as u16))
    }

    /// World point at the centre of a terminal cell.
    pub fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        let cx = (f32::from(col) - 1.0 + 0.5) / self.inner_cols();
        let cy = (f32::from(row) - 2.0 + 0.5) / self.inner_rows();
        (
            cx.clamp(0.0, 1.0) * self.playfield.width,
            cy.clamp(0.0, 1.0) * self.playfield.height,
        )
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng, F: Feedback>(
    out: &mut W,
    view: &Viewport,
    game: &Game<R, F>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view, &game.bus)?;

    for enemy in game.bus.enemies() {
        draw_enemy(out, view, enemy)?;
    }
    for bullet in game.bus.bullets() {
        draw_bullet(out, view, bullet)?;
    }

    draw_player(out, view, &game.player)?;
    draw_controls_hint(out, view)?;

    if game.bus.is_game_over() {
        draw_game_over(out, view, &game.bus)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, bus: &DataBus) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", bus.score())))?;

    let level_str = match bus.get_next_upgrade_score() {
        Some(next) => format!("[ LV {} → {} ]", bus.get_upgrade_level(), next),
        None => format!("[ LV {} MAX ]", bus.get_upgrade_level()),
    };
    let lx = (view.cols / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(level_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, player: &Player) -> std::io::Result<()> {
    if !player.is_visible() {
        return Ok(());
    }
    let (cx, cy) = player.bounds().center();
    let Some((col, row)) = view.to_cell(cx, cy) else {
        return Ok(());
    };

    if let Some(frame) = player.explosion.current_frame() {
        return draw_explosion(out, col, row, frame);
    }

    //   ▲
    //  /█\
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;
    if row + 1 < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    if !enemy.is_visible() {
        return Ok(());
    }
    let (cx, cy) = enemy.bounds().center();
    let Some((col, row)) = view.to_cell(cx, cy) else {
        return Ok(());
    };

    if let Some(frame) = enemy.explosion.current_frame() {
        return draw_explosion(out, col, row, frame);
    }

    let (sprite, color) = match enemy.movement.kind() {
        MovementKind::Straight => ("«▼»", C_ENEMY_STRAIGHT),
        MovementKind::ZigZag => ("<▼>", C_ENEMY_ZIGZAG),
        MovementKind::Sine => ("(◎)", C_ENEMY_SINE),
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_explosion<W: Write>(out: &mut W, col: u16, row: u16, frame: usize) -> std::io::Result<()> {
    let step = frame * EXPLOSION_GLYPHS.len() / EXPLOSION_FRAMES;
    let glyph = EXPLOSION_GLYPHS[step.min(EXPLOSION_GLYPHS.len() - 1)];
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, view: &Viewport, bullet: &Bullet) -> std::io::Result<()> {
    let (cx, cy) = bullet.bounds().center();
    let Some((col, row)) = view.to_cell(cx, cy) else {
        return Ok(());
    };
    let glyph = if bullet.angle < -0.05 {
        "╲"
    } else if bullet.angle > 0.05 {
        "╱"
    } else {
        "║"
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_BULLET))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Mouse drag / ← → ↑ ↓ : Move   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, bus: &DataBus) -> std::io::Result<()> {
    let lines: [(String, Color); 5] = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>6}", bus.score()), Color::Yellow),
        ("R - Again  M - Menu  Q - Quit".to_string(), Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
