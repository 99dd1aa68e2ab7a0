use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::maze::{Cell, Pos};
use crate::session::{Message, Snapshot};
use crate::thread::Tension;

const CELL_W: usize = 2;
const GAUGE_SEGMENTS: u32 = 20;
// HUD line above the maze, message lines below it.
const HUD_ROWS: usize = 1;
const FOOTER_ROWS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Exit,
    Thread,
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub glyph: Glyph,
    pub color: Color,
}

const BLANK: Tile = Tile {
    glyph: Glyph::Open,
    color: Color::Reset,
};

pub fn enter_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    out.execute(EnterAlternateScreen)?;
    out.execute(Hide)?;
    Ok(())
}

/// Undoes [`enter_terminal`]. Every step runs even if an earlier one
/// fails; the first error is returned.
pub fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    let shown = out.execute(Show).map(|_| ());
    let left = out.execute(LeaveAlternateScreen).map(|_| ());
    let cooked = terminal::disable_raw_mode();
    shown.and(left).and(cooked)
}

/// Draws snapshots to the terminal, repainting only cells that changed
/// since the last frame.
#[derive(Debug)]
pub struct Renderer {
    last: Vec<Tile>,
    last_hud: String,
    last_footer: Option<Message>,
    dims: (usize, usize),
    cols: u16,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            last_footer: None,
            dims: (0, 0),
            cols: 0,
            needs_full: true,
            origin_x: 0,
            origin_y: HUD_ROWS as u16,
        }
    }

    /// Forces the next frame to repaint everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        snap: &Snapshot<'_>,
        message: Option<&Message>,
    ) -> io::Result<()> {
        let (term_w, term_h) = terminal::size()?;
        self.render_sized(out, snap, message, (term_w, term_h))
    }

    fn render_sized<W: Write>(
        &mut self,
        out: &mut W,
        snap: &Snapshot<'_>,
        message: Option<&Message>,
        (term_w, term_h): (u16, u16),
    ) -> io::Result<()> {
        let width = snap.grid.width();
        let height = snap.grid.height();
        let needed_w = (width * CELL_W) as u16;
        let needed_h = (height + HUD_ROWS + FOOTER_ROWS) as u16;

        out.queue(MoveTo(0, 0))?;

        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        if self.dims != (width, height) {
            self.dims = (width, height);
            self.last = vec![BLANK; width * height];
            self.needs_full = true;
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + HUD_ROWS as u16;
        if origin_x != self.origin_x || origin_y != self.origin_y || term_w != self.cols {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.cols = term_w;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let hud = hud_line(snap);
        if self.needs_full || hud != self.last_hud {
            // Starts at column 0 and stops at the terminal edge.
            out.queue(MoveTo(0, self.origin_y - HUD_ROWS as u16))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            let (head, bar, tail) = hud_parts(snap);
            let mut room = usize::from(term_w);
            for (part, color) in [
                (head, Color::White),
                (bar, tension_color(snap.tension)),
                (tail, Color::White),
            ] {
                let part = clip(&part, room);
                room -= UnicodeWidthStr::width(part);
                out.queue(SetForegroundColor(color))?;
                out.queue(Print(part))?;
            }
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..height {
            for x in 0..width {
                let tile = tile_for(snap, Pos::new(x, y));
                let idx = y * width + x;
                if self.needs_full || tile != self.last[idx] {
                    self.last[idx] = tile;
                    self.draw_tile(out, x, y, tile)?;
                }
            }
        }

        if self.needs_full || message != self.last_footer.as_ref() {
            self.draw_footer(out, height, message)?;
            self.last_footer = message.cloned();
        }
        self.needs_full = false;

        out.flush()?;
        Ok(())
    }

    fn draw_tile<W: Write>(&self, out: &mut W, x: usize, y: usize, tile: Tile) -> io::Result<()> {
        let text = match tile.glyph {
            Glyph::Player => "😃",
            Glyph::Exit => "🚪",
            Glyph::Thread => "░░",
            Glyph::Wall => "██",
            Glyph::Open => "  ",
        };
        out.queue(MoveTo(
            self.origin_x + (x * CELL_W) as u16,
            self.origin_y + y as u16,
        ))?;
        out.queue(SetForegroundColor(tile.color))?;
        out.queue(Print(text))?;
        for _ in UnicodeWidthStr::width(text)..CELL_W {
            out.queue(Print(' '))?;
        }
        out.queue(ResetColor)?;
        Ok(())
    }

    fn draw_footer<W: Write>(
        &self,
        out: &mut W,
        height: usize,
        message: Option<&Message>,
    ) -> io::Result<()> {
        let top = self.origin_y + height as u16 + 1;
        for row in 0..(FOOTER_ROWS as u16 - 1) {
            out.queue(MoveTo(0, top + row))?;
            out.queue(Clear(ClearType::CurrentLine))?;
        }
        if let Some(message) = message {
            let cols = usize::from(self.cols);
            let text = format!("{} (r to continue, q to quit)", message.text);
            out.queue(MoveTo(0, top))?;
            out.queue(SetForegroundColor(Color::Yellow))?;
            out.queue(Print(clip(message.title, cols)))?;
            out.queue(ResetColor)?;
            out.queue(MoveTo(0, top + 1))?;
            out.queue(Print(clip(&text, cols)))?;
        }
        Ok(())
    }
}

pub fn tile_for(snap: &Snapshot<'_>, pos: Pos) -> Tile {
    if pos == snap.player {
        return Tile {
            glyph: Glyph::Player,
            color: Color::Cyan,
        };
    }
    if pos == snap.exit {
        return Tile {
            glyph: Glyph::Exit,
            color: Color::Green,
        };
    }
    if snap.path.contains(&pos) {
        return Tile {
            glyph: Glyph::Thread,
            color: Color::DarkYellow,
        };
    }
    match snap.grid.get(pos) {
        Some(Cell::Wall) | None => Tile {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Some(Cell::Open) => BLANK,
    }
}

pub fn tension_color(tension: Tension) -> Color {
    match tension {
        Tension::Steady => Color::Green,
        Tension::Danger => Color::Yellow,
        Tension::Critical => Color::Red,
    }
}

/// Fixed-width bar showing how much of the thread is left.
pub fn gauge(percent: u32) -> String {
    let filled = (percent.min(100) * GAUGE_SEGMENTS / 100) as usize;
    let empty = GAUGE_SEGMENTS as usize - filled;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(empty))
}

/// Longest prefix of `text` that fits in `cols` terminal columns.
pub fn clip(text: &str, cols: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > cols {
            return &text[..idx];
        }
    }
    text
}

/// HUD text split around the gauge so the gauge can be colored on its own.
fn hud_parts(snap: &Snapshot<'_>) -> (String, String, String) {
    let (rooms_w, rooms_h) = snap.rooms;
    let head = format!(
        "Level: {}  Steps: {}  Thread: {}/{} ",
        snap.level, snap.steps, snap.thread_left, snap.max_thread
    );
    let tail = format!(
        " {}%  Maze: {}×{}  (r restart, q quit)",
        snap.thread_percent, rooms_w, rooms_h
    );
    (head, gauge(snap.thread_percent), tail)
}

pub fn hud_line(snap: &Snapshot<'_>) -> String {
    let (head, bar, tail) = hud_parts(snap);
    format!("{head}{bar}{tail}")
}
