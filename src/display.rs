/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer, an immutable view of the game
/// state and the colour palette. No game logic is performed; this module
/// only translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use retro_shooter::{GameState, GameStatus, Position};

// ── Colour palette ────────────────────────────────────────────────────────────

/// Colours for every drawn element, chosen once at startup.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub border: Color,
    pub title_bar: Color,
    pub banner: Color,
    pub hud_score: Color,
    pub hud_lives: Color,
    pub player: Color,
    pub enemy: Color,
    pub player_bullet: Color,
    pub enemy_bullet: Color,
    pub status: Color,
    pub hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            border: Color::DarkBlue,
            title_bar: Color::White,
            banner: Color::Cyan,
            hud_score: Color::Yellow,
            hud_lives: Color::Red,
            player: Color::White,
            enemy: Color::Green,
            player_bullet: Color::Cyan,
            enemy_bullet: Color::Magenta,
            status: Color::Yellow,
            hint: Color::DarkGrey,
        }
    }
}

const TITLE: &str = "RETRO SHOOTER";

/// Screen row of the top border; the playfield starts one row below.
const FIELD_TOP: u16 = 2;
/// Screen column of the left border.
const FIELD_LEFT: u16 = 1;

const ENEMY_GLYPH: &str = "$";
const BULLET_GLYPH: &str = ".";
const PLAYER_GLYPH: &str = "*";

// ── Public entry points ───────────────────────────────────────────────────────

/// Render the title screen.
pub fn render_title<W: Write>(out: &mut W, palette: &Palette) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_title_bar(out, palette)?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let banner = [
        "╔═══════════════════════════╗",
        "║   R E T R O   S H O O T   ║",
        "╚═══════════════════════════╝",
    ];
    for (i, line) in banner.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, cy.saturating_sub(4) + i as u16))?;
        out.queue(style::SetForegroundColor(palette.banner))?;
        out.queue(Print(*line))?;
    }

    let prompt = "Press Enter to start...";
    out.queue(cursor::MoveTo(cx.saturating_sub(prompt.len() as u16 / 2), cy + 1))?;
    out.queue(style::SetForegroundColor(palette.title_bar))?;
    out.queue(Print(prompt))?;

    let hint = "↵ start • q quit";
    out.queue(cursor::MoveTo(cx.saturating_sub(hint.chars().count() as u16 / 2), cy + 3))?;
    out.queue(style::SetForegroundColor(palette.hint))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Render one complete game frame.
pub fn render_game<W: Write>(
    out: &mut W,
    state: &GameState,
    palette: &Palette,
    confirm_quit: bool,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_title_bar(out, palette)?;
    draw_border(out, state, palette)?;

    out.queue(style::SetForegroundColor(palette.enemy))?;
    for enemy in state.enemies.positions() {
        draw_cell(out, enemy, ENEMY_GLYPH)?;
    }
    out.queue(style::SetForegroundColor(palette.player_bullet))?;
    for &bullet in &state.player_bullets {
        draw_cell(out, bullet, BULLET_GLYPH)?;
    }
    out.queue(style::SetForegroundColor(palette.enemy_bullet))?;
    for &bullet in &state.enemy_bullets {
        draw_cell(out, bullet, BULLET_GLYPH)?;
    }
    if state.player_visible() {
        out.queue(style::SetForegroundColor(palette.player))?;
        draw_cell(out, state.player, PLAYER_GLYPH)?;
    }

    let below = FIELD_TOP + state.field.height as u16 + 1;
    draw_hud(out, state, palette, below)?;
    draw_status(out, state, palette, below + 2)?;
    draw_controls_hint(out, state.status, confirm_quit, palette, below + 4)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, below + 5))?;
    out.flush()
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn draw_title_bar<W: Write>(out: &mut W, palette: &Palette) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(FIELD_LEFT, 0))?;
    out.queue(style::SetForegroundColor(palette.title_bar))?;
    out.queue(style::SetAttribute(style::Attribute::Bold))?;
    out.queue(Print(TITLE))?;
    out.queue(style::SetAttribute(style::Attribute::Reset))?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, state: &GameState, palette: &Palette) -> std::io::Result<()> {
    let w = state.field.width as usize;
    let h = state.field.height as u16;

    out.queue(style::SetForegroundColor(palette.border))?;

    out.queue(cursor::MoveTo(FIELD_LEFT, FIELD_TOP))?;
    out.queue(Print(format!("╭{}╮", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(FIELD_LEFT, FIELD_TOP + h + 1))?;
    out.queue(Print(format!("╰{}╯", "─".repeat(w))))?;

    for row in 1..=h {
        out.queue(cursor::MoveTo(FIELD_LEFT, FIELD_TOP + row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(FIELD_LEFT + w as u16 + 1, FIELD_TOP + row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// Playfield cell → screen cell, inside the border.
fn draw_cell<W: Write>(out: &mut W, pos: Position, glyph: &str) -> std::io::Result<()> {
    let col = FIELD_LEFT + 1 + pos.x as u16;
    let row = FIELD_TOP + 1 + pos.y as u16;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Text below the field ──────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    palette: &Palette,
    row: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(FIELD_LEFT, row))?;
    out.queue(style::SetForegroundColor(palette.hud_score))?;
    out.queue(Print(format!("Score: {}", state.score)))?;
    out.queue(style::SetForegroundColor(palette.hint))?;
    out.queue(Print("; "))?;
    out.queue(style::SetForegroundColor(palette.hud_lives))?;
    out.queue(Print(format!("Lives: {}", state.lives)))?;
    Ok(())
}

fn draw_status<W: Write>(
    out: &mut W,
    state: &GameState,
    palette: &Palette,
    row: u16,
) -> std::io::Result<()> {
    let Some(message) = state.status.message() else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(FIELD_LEFT, row))?;
    out.queue(style::SetForegroundColor(palette.status))?;
    out.queue(Print(message))?;
    Ok(())
}

fn controls_hint(status: GameStatus, confirm_quit: bool) -> &'static str {
    if confirm_quit {
        return "Really quit?  ↵ quit • esc cancel";
    }
    match status {
        GameStatus::Playing => "←/a left • →/d right • ␣ shoot • p pause",
        GameStatus::Paused => "p resume • q quit",
        GameStatus::LifeLost => "",
        GameStatus::Won | GameStatus::Lost => "↵ restart • q quit",
    }
}

fn draw_controls_hint<W: Write>(
    out: &mut W,
    status: GameStatus,
    confirm_quit: bool,
    palette: &Palette,
    row: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(FIELD_LEFT, row))?;
    out.queue(style::SetForegroundColor(palette.hint))?;
    out.queue(Print(controls_hint(status, confirm_quit)))?;
    Ok(())
}
