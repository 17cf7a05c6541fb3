use crate::model::{Rgb, CELL_H, CELL_W};
use crate::sim::Frame;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Host drawing surface, addressed in pixels.
pub(crate) trait Surface {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self);
    fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, color: Rgb);
}

/// Replay a frame onto a freshly cleared surface.
pub(crate) fn paint<S: Surface>(frame: &Frame, surface: &mut S) {
    surface.clear();
    for c in &frame.commands {
        surface.draw_glyph(c.at.x, c.at.y, c.glyph, c.color);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) bg: Color,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16, bg: Color) -> Self {
        Self {
            w,
            h,
            bg,
            cells: vec![Cell::blank(bg); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x < self.w && y < self.h {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
}

impl Surface for CellBuffer {
    fn size(&self) -> (u32, u32) {
        (self.w as u32 * CELL_W, self.h as u32 * CELL_H)
    }

    fn clear(&mut self) {
        let blank = Cell::blank(self.bg);
        self.cells.fill(blank);
    }

    fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, color: Rgb) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let col = (x / CELL_W as f32) as u16;
        let row = (y / CELL_H as f32) as u16;
        self.set(
            col,
            row,
            Cell {
                ch: glyph,
                fg: color.to_color(),
                bg: self.bg,
            },
        );
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

/// Double-buffered terminal. Only changed cells are written on present.
/// Restores the screen on drop until `end` has succeeded once.
pub(crate) struct Terminal<W: Write = io::Stdout> {
    out: W,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    bg: Color,
    active: bool,
}

impl Terminal {
    pub(crate) fn begin(bg: Rgb) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut term = Self::with_writer(io::stdout(), cols, rows, bg.to_color());

        // the guard exists from here on: a failed setup is undone on drop
        terminal::enable_raw_mode()?;
        execute!(
            term.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        Ok(term)
    }
}

impl<W: Write> Terminal<W> {
    fn with_writer(out: W, cols: u16, rows: u16, bg: Color) -> Self {
        Self {
            out,
            cols,
            rows,
            // force the first present to paint everything
            prev: CellBuffer::new(cols, rows, Color::Reset),
            cur: CellBuffer::new(cols, rows, bg),
            bg,
            active: true,
        }
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    pub(crate) fn resize(&mut self, c: u16, r: u16) {
        if c == self.cols && r == self.rows {
            return;
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r, Color::Reset);
        self.cur = CellBuffer::new(c, r, self.bg);
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec2;
    use crate::sim::DrawCommand;

    #[test]
    fn buffer_reports_pixel_size() {
        let buf = CellBuffer::new(80, 30, Color::Black);
        assert_eq!(buf.size(), (800, 600));
    }

    #[test]
    fn glyphs_land_in_their_cell() {
        let mut buf = CellBuffer::new(80, 30, Color::Black);
        buf.draw_glyph(105.0, 110.0, '◎', Rgb::new(200, 200, 220));
        let c = buf.get(10, 5).unwrap();
        assert_eq!(c.ch, '◎');
        assert_eq!(
            c.fg,
            Color::Rgb {
                r: 200,
                g: 200,
                b: 220
            }
        );
        // off-surface draws are dropped
        buf.draw_glyph(-5.0, 10.0, 'x', Rgb::default());
        buf.draw_glyph(805.0, 10.0, 'x', Rgb::default());
        assert!(buf.cells.iter().filter(|c| c.ch == 'x').count() == 0);
    }

    #[test]
    fn paint_clears_before_drawing() {
        let mut buf = CellBuffer::new(4, 2, Color::Black);
        buf.draw_glyph(5.0, 10.0, 'a', Rgb::default());
        let frame = Frame {
            commands: vec![DrawCommand {
                at: Vec2::new(35.0, 30.0),
                glyph: 'b',
                color: Rgb::new(1, 2, 3),
            }],
        };
        paint(&frame, &mut buf);
        assert_eq!(buf.get(0, 0).unwrap().ch, ' ');
        assert_eq!(buf.get(3, 1).unwrap().ch, 'b');
    }

    struct Flaky {
        fail: bool,
        bytes: Vec<u8>,
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_restore_stays_armed_and_retries() {
        let out = Flaky {
            fail: true,
            bytes: Vec::new(),
        };
        let mut term = Terminal::with_writer(out, 4, 2, Color::Black);
        assert!(term.end().is_err());
        assert!(term.active);

        term.out.fail = false;
        term.end().unwrap();
        assert!(!term.active);
        assert!(!term.out.bytes.is_empty());

        // a second end is a no-op
        let written = term.out.bytes.len();
        term.end().unwrap();
        assert_eq!(term.out.bytes.len(), written);
    }

    #[test]
    fn new_terminal_repaints_every_cell_first() {
        let out = Flaky {
            fail: false,
            bytes: Vec::new(),
        };
        let mut term = Terminal::with_writer(out, 3, 1, Color::Black);
        draw_text(&mut term.cur, 0, 0, "abc", Color::White, Color::Black);
        term.present().unwrap();
        let text = String::from_utf8_lossy(&term.out.bytes).into_owned();
        assert!(text.contains('a') && text.contains('b') && text.contains('c'));

        // nothing changed: only the sync markers and colour reset go out
        term.out.bytes.clear();
        term.present().unwrap();
        let text = String::from_utf8_lossy(&term.out.bytes).into_owned();
        assert!(!text.contains('a'));
        term.end().unwrap();
    }

    #[test]
    fn text_is_clipped_to_the_row() {
        let mut buf = CellBuffer::new(5, 1, Color::Black);
        draw_text(&mut buf, 2, 0, "hello", Color::White, Color::Black);
        let row: String = buf.cells.iter().map(|c| c.ch).collect();
        assert_eq!(row, "  hel");
    }
}
