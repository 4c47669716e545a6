/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws. The frame is
/// a pure function of SessionState; no render state accumulates beyond
/// the back buffer.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::stage::{StageId, ALL_STAGES};
use crate::sim::session::{LineKind, Phase, SessionState};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 18, g: 13, b: 15 };
const HEIST_RED: Color = Color::Rgb { r: 191, g: 9, b: 4 };
const TERM_GREEN: Color = Color::Rgb { r: 17, g: 199, b: 111 };
const GOLD: Color = Color::Rgb { r: 212, g: 175, b: 55 };
const INK: Color = Color::Rgb { r: 228, g: 220, b: 210 };
const DIM: Color = Color::Rgb { r: 120, g: 110, b: 104 };
const ECHO_GREY: Color = Color::Rgb { r: 110, g: 150, b: 126 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: INK, bg: BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y); clipped at the right edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell { ch, fg, bg });
            cx += 1;
        }
    }

    /// Paint a full row with a background color.
    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell { ch: ' ', fg: INK, bg });
        }
    }
}

// ── Layout ──

const HEADER_ROW: usize = 0;
const INDICATOR_ROW: usize = 2;
const PANEL_ROW: usize = 4;
const MARGIN: usize = 3;

/// Which screen is on display; a change forces a full repaint.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Screen {
    phase: Phase,
    stage: StageId,
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, s: &SessionState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        // Detect screen change → clear for a clean transition
        let screen = Screen { phase: s.phase, stage: s.progress.current() };
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();

        match s.phase {
            Phase::Title => self.compose_title(s),
            Phase::Heist => self.compose_heist(s),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = INK;
        let mut last_bg = BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors at frame start; ResetColor would fall back
        // to the terminal default and cause line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(INK),
            SetBackgroundColor(BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Shared chrome ──

    fn compose_header(&mut self, s: &SessionState, subtitle: &str) {
        self.front.fill_row(HEADER_ROW, HEIST_RED);
        let title = format!("  LA CASA DE CTF  ·  {}", subtitle);
        self.front.put_str(0, HEADER_ROW, &title, INK, HEIST_RED);

        let music = if s.music_on { "♪ music on " } else { "  music off " };
        let x = self.term_w.saturating_sub(music.chars().count() + 1);
        self.front.put_str(x, HEADER_ROW, music, INK, HEIST_RED);
    }

    fn compose_help_bar(&mut self, text: &str) {
        let row = self.term_h.saturating_sub(1);
        self.front.put_str(1, row, text, DIM, BASE_BG);
    }

    /// Stage dots: active = red badge, unlocked = gold, locked = grey.
    fn compose_indicators(&mut self, s: &SessionState) {
        let mut x = MARGIN;
        for stage in ALL_STAGES {
            let label = format!("[{}] {}", stage.number(), stage.title());
            let active = stage == s.progress.current();
            let unlocked = s.progress.is_unlocked(stage);
            let (fg, bg) = if active {
                (INK, HEIST_RED)
            } else if unlocked {
                (GOLD, BASE_BG)
            } else {
                (DIM, BASE_BG)
            };
            self.front.put_str(x, INDICATOR_ROW, &label, fg, bg);
            x += label.chars().count();
            if stage != StageId::Console {
                self.front.put_str(x, INDICATOR_ROW, " ──── ", DIM, BASE_BG);
                x += 6;
            }
        }
    }

    fn blink_on(&self, s: &SessionState) -> bool {
        (s.anim_tick / 6) % 2 == 0
    }

    // ── Title screen ──

    fn compose_title(&mut self, s: &SessionState) {
        let cx = self.term_w / 2;
        let top = self.term_h / 2;
        let top = top.saturating_sub(6);

        let banner = [
            "╔══════════════════════════════════════╗",
            "║                                      ║",
            "║     L A   C A S A   D E   C T F      ║",
            "║                                      ║",
            "╚══════════════════════════════════════╝",
        ];
        for (i, line) in banner.iter().enumerate() {
            let x = cx.saturating_sub(line.chars().count() / 2);
            self.front.put_str(x, top + i, line, HEIST_RED, BASE_BG);
        }

        let sub = "a three-door heist for one curious player";
        let x = cx.saturating_sub(sub.chars().count() / 2);
        self.front.put_str(x, top + 6, sub, GOLD, BASE_BG);

        let lines: [(&str, Color); 4] = [
            ("The Professor sealed the plan behind three doors.", INK),
            ("A riddle, a crew log, and a console that knows too much.", INK),
            ("", INK),
            ("Some things are not on any screen. Bring curiosity.", DIM),
        ];
        for (i, (line, fg)) in lines.iter().enumerate() {
            let x = cx.saturating_sub(line.chars().count() / 2);
            self.front.put_str(x, top + 8 + i, line, *fg, BASE_BG);
        }

        let start = if self.blink_on(s) { "▶ ENTER  breach the first door" } else { "  ENTER  breach the first door" };
        let x = cx.saturating_sub(start.chars().count() / 2);
        self.front.put_str(x, top + 13, start, TERM_GREEN, BASE_BG);

        self.compose_help_bar("ENTER:Start  F9:Music  Q/ESC:Quit");

        let music = if s.music_on { "♪ on" } else { "♪ off" };
        let x = self.term_w.saturating_sub(music.chars().count() + 2);
        self.front.put_str(x, 0, music, DIM, BASE_BG);
    }

    // ── Heist timeline ──

    fn compose_heist(&mut self, s: &SessionState) {
        let stage = s.progress.current();
        self.compose_header(s, stage.title());
        self.compose_indicators(s);

        match stage {
            StageId::Vault => self.compose_vault(s),
            StageId::CrewLog => self.compose_crew_log(),
            StageId::Console => self.compose_console(s),
        }

        self.compose_help_bar(match stage {
            StageId::Vault => "ENTER:Submit  F1-F3:Stages  F9:Music  ESC:Title",
            StageId::CrewLog => "ENTER:Open console  F1-F3:Stages  F9:Music  ESC:Title",
            StageId::Console => "ENTER:Run  F1-F3:Stages  F9:Music  ESC:Title",
        });
    }

    fn compose_vault(&mut self, s: &SessionState) {
        let riddle = [
            "Five cities ride with the Professor:",
            "",
            "    Tokyo · Berlin · Nairobi · Denver · Rio",
            "",
            "Count the letters of every city's name and add them up.",
            "The sum opens the vault.",
        ];
        for (i, line) in riddle.iter().enumerate() {
            self.front.put_str(MARGIN, PANEL_ROW + i, line, INK, BASE_BG);
        }

        let entry_row = PANEL_ROW + 8;
        let cursor = if self.blink_on(s) { "█" } else { " " };
        let field = format!("CODE > {}{}", s.riddle_entry, cursor);
        self.front.put_str(MARGIN, entry_row, &field, GOLD, BASE_BG);

        if let Some(fb) = s.feedback {
            let fg = if fb.success { TERM_GREEN } else { HEIST_RED };
            self.front.put_str(MARGIN, entry_row + 2, fb.text, fg, BASE_BG);
        }
    }

    fn compose_crew_log(&mut self) {
        const CHAT: [(&str, &str); 5] = [
            ("tokyo", "The vault was the easy part. The real plan never left the Professor's machine."),
            ("berlin", "He kept repeating it: a terminal remembers what a screen forgets."),
            ("nairobi", "Two numbers, hiding past the last line anyone bothers to read."),
            ("denver", "Numbers? Coordinates. The drop location lives in the system, not on the wire."),
            ("rio", "And if his console plays dumb, ask it for a hint."),
        ];

        let mut row = PANEL_ROW;
        self.front.put_str(MARGIN, row, "── encrypted crew channel, replayed ──", DIM, BASE_BG);
        row += 2;
        for (name, text) in CHAT {
            let tag = format!("{name:>8} ▸ ");
            self.front.put_str(MARGIN, row, &tag, GOLD, BASE_BG);
            self.front.put_str(MARGIN + tag.chars().count(), row, text, INK, BASE_BG);
            row += 2;
        }

        self.front.put_str(
            MARGIN, row + 1,
            "The channel goes quiet. Only the Professor's console is left.",
            DIM, BASE_BG,
        );
        self.front.put_str(
            MARGIN, row + 3,
            "▶ ENTER  open the Professor's console",
            TERM_GREEN, BASE_BG,
        );
    }

    fn compose_console(&mut self, s: &SessionState) {
        // Rows reserved below the log: input line, optional final
        // message block (3 rows), help bar.
        let note_rows = if s.drop_note_revealed { 4 } else { 0 };
        let input_row = self.term_h.saturating_sub(3 + note_rows);
        let log_top = PANEL_ROW;
        let visible = input_row.saturating_sub(log_top + 1);

        // Bottom-anchored tail of the log
        let skip = s.log.len().saturating_sub(visible);
        for (i, line) in s.log.iter().skip(skip).enumerate() {
            let fg = match line.kind {
                LineKind::Echo => ECHO_GREY,
                LineKind::Plain => TERM_GREEN,
            };
            self.front.put_str(MARGIN, log_top + i, &line.text, fg, BASE_BG);
        }

        // Prompt + entry
        let cursor = if self.blink_on(s) { "█" } else { " " };
        let prompt = format!("{} {}{}", s.prompt, s.console_entry, cursor);
        self.front.put_str(MARGIN, input_row, &prompt, TERM_GREEN, BASE_BG);

        if s.drop_note_revealed {
            let row = input_row + 2;
            self.front.put_str(MARGIN, row, "■ FINAL TRANSMISSION", GOLD, BASE_BG);
            self.front.put_str(
                MARGIN, row + 1,
                "The drop location never crossed the wire. It is sealed inside",
                INK, BASE_BG,
            );
            self.front.put_str(
                MARGIN, row + 2,
                "this very program. The Professor's debug helpers still ship.",
                INK, BASE_BG,
            );
        }
    }
}
