use crate::framebuffer::{Framebuffer, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH};
use crossterm::{cursor, execute, terminal};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the host to put the framebuffer on a screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// draw the current contents of the framebuffer
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

fn x_bounds() -> [f64; 2] {
    [0.0, (CHIP8_DISPLAY_WIDTH - 1) as f64]
}

fn y_bounds() -> [f64; 2] {
    [-1.0 * (CHIP8_DISPLAY_HEIGHT - 1) as f64, 0.0]
}

/// expand one bitplane into x, y float coords, suitable for rendering with
/// TUI; y grows downwards on the chip-8 so it is negated
fn bitplane_points(frame: &Framebuffer, bitplane: u8) -> Vec<(f64, f64)> {
    frame
        .as_slice()
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p == bitplane)
        .map(|(i, _)| {
            (
                (i % CHIP8_DISPLAY_WIDTH) as f64,         // x
                -1.0 * (i / CHIP8_DISPLAY_WIDTH) as f64, // y
            )
        })
        .collect()
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TermDisplay {
    pub fn new() -> Result<TermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(TermDisplay { terminal })
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        // best effort; the terminal may already be gone
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    }
}

impl Display for TermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        let unlit = bitplane_points(frame, 0);
        let lit = bitplane_points(frame, 1);

        // 1:1 between terminal cells and chip-8 pixels, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + CHIP8_DISPLAY_WIDTH as u16,
                2 + CHIP8_DISPLAY_HEIGHT as u16,
            )
            .intersection(f.size());

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds())
                .y_bounds(y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; remembers how often it drew and
/// the last frame it was given
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last: Option<Framebuffer>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames += 1;
        self.last = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_bounds() {
        assert_eq!(x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        assert_eq!(y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_bitplanes_cover_display() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0x80]);
        fb.draw_sprite(63, 31, &[0x80]);
        let lit = bitplane_points(&fb, 1);
        assert_eq!(lit, vec![(0.0, 0.0), (63.0, -31.0)]);
        assert_eq!(bitplane_points(&fb, 0).len(), 2048 - 2);
    }

    #[test]
    fn test_dummy_display_records() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let fb = Framebuffer::new();
        d.draw(&fb)?;
        d.draw(&fb)?;
        assert_eq!(d.frames, 2);
        assert_eq!(d.last, Some(fb));
        Ok(())
    }
}
