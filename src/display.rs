/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer, the level grid and an immutable
/// snapshot.  No game logic is performed; this module only translates state
/// into terminal commands.  One tile is drawn two columns wide so the map
/// keeps roughly square proportions.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use paintball_tactics::entities::{AiState, Owner, RunState, Snapshot, Tile};
use paintball_tactics::geometry::Vec2;
use paintball_tactics::level::LevelGrid;

/// Terminal rows used by the HUD above the map.
pub const HUD_ROWS: u16 = 1;
/// Terminal columns per tile.
pub const CELL_COLS: u16 = 2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_FLOOR: Color = Color::DarkGrey;
const C_HUD: Color = Color::White;
const C_HUD_HEALTH: Color = Color::Red;
const C_PLAYER: Color = Color::Blue;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Wall colour per level, cycling after the fifth.
fn wall_color(level: usize) -> Color {
    match (level.max(1) - 1) % 5 {
        0 => Color::DarkBlue,
        1 => Color::DarkGreen,
        2 => Color::DarkRed,
        3 => Color::DarkYellow,
        _ => Color::DarkMagenta,
    }
}

fn enemy_glyph(state: AiState) -> (char, Color) {
    match state {
        AiState::Patrol => ('e', Color::Green),
        AiState::Engage => ('E', Color::Red),
        AiState::TakeCover => ('C', Color::Yellow),
        AiState::Search => ('?', Color::Magenta),
    }
}

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Terminal cell for a world position.
pub fn world_to_screen(p: Vec2, tile_size: f64) -> (u16, u16) {
    let col = (p.x.max(0.0) / tile_size * CELL_COLS as f64) as u16;
    let row = (p.y.max(0.0) / tile_size) as u16 + HUD_ROWS;
    (col, row)
}

/// World position at the centre of a terminal cell.
pub fn screen_to_world(col: u16, row: u16, tile_size: f64) -> Vec2 {
    Vec2::new(
        (col as f64 + 0.5) / CELL_COLS as f64 * tile_size,
        (row.saturating_sub(HUD_ROWS) as f64 + 0.5) * tile_size,
    )
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    grid: &LevelGrid,
    snap: &Snapshot,
    term: (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut canvas = Canvas::new(grid, snap.current_level);
    let tile = grid.tile_size();

    for p in snap.projectiles.iter().filter(|p| p.active) {
        let color = match p.owner {
            Owner::Player => C_BULLET_PLAYER,
            Owner::Enemy => C_BULLET_ENEMY,
        };
        canvas.put(world_to_screen(p.position, tile), '•', color);
    }
    for e in snap.enemies.iter().filter(|e| e.active) {
        let (glyph, color) = enemy_glyph(e.state);
        canvas.put(world_to_screen(e.position, tile), glyph, color);
    }
    canvas.put(world_to_screen(snap.player.position, tile), '@', C_PLAYER);

    draw_hud(out, snap)?;
    canvas.flush(out, term)?;
    draw_controls_hint(out, term)?;

    match snap.run_state {
        RunState::Running => {}
        RunState::Defeat => draw_banner(out, term, "GAME OVER", Color::Red)?,
        RunState::Victory => draw_banner(out, term, "YOU WON!", Color::Green)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term.1.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Map canvas ────────────────────────────────────────────────────────────────

/// Character buffer for the map area, flushed row by row.
struct Canvas {
    cells: Vec<Vec<(char, Color)>>,
}

impl Canvas {
    fn new(grid: &LevelGrid, level: usize) -> Self {
        let walls = wall_color(level);
        let cells = (0..grid.rows())
            .map(|row| {
                (0..grid.cols())
                    .flat_map(|col| {
                        let cell = match grid.tile_at(row, col) {
                            Tile::Wall => ('█', walls),
                            _ => ('·', C_FLOOR),
                        };
                        std::iter::repeat(cell).take(CELL_COLS as usize)
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    fn put(&mut self, (col, row): (u16, u16), glyph: char, color: Color) {
        let row = row.saturating_sub(HUD_ROWS) as usize;
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col as usize)) {
            *cell = (glyph, color);
        }
    }

    fn flush<W: Write>(&self, out: &mut W, (width, height): (u16, u16)) -> std::io::Result<()> {
        for (i, row) in self.cells.iter().enumerate() {
            let y = i as u16 + HUD_ROWS;
            if y >= height.saturating_sub(1) {
                break;
            }
            out.queue(cursor::MoveTo(0, y))?;
            let mut current = None;
            for &(glyph, color) in row.iter().take(width as usize) {
                if current != Some(color) {
                    out.queue(style::SetForegroundColor(color))?;
                    current = Some(color);
                }
                out.queue(Print(glyph))?;
            }
        }
        Ok(())
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot) -> std::io::Result<()> {
    let remaining = snap.enemies.iter().filter(|e| e.active).count();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print("Health: "))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("{:<4}", snap.player.health)))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "  Level: {}   Enemies: {}",
        snap.current_level, remaining
    )))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, (_, height): (u16, u16)) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD / arrows : Move   Mouse : Aim   Click / SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── End-of-run overlay ────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    (width, height): (u16, u16),
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let inner = format!("   {title}   ");
    let bar = "═".repeat(inner.chars().count());
    let lines = [
        (format!("╔{bar}╗"), color),
        (format!("║{inner}║"), color),
        (format!("╚{bar}╝"), color),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
