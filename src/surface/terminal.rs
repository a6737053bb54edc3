//! Fullscreen terminal surface using crossterm.
//!
//! The alternate screen stands in for a fullscreen window: it covers the whole
//! terminal, is restored on release, and accepts immediate-mode drawing.

use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use super::error::SurfaceError;
use super::layout::{self, Layout};
use super::{font, CountdownFrame, FlashColor, PresentationSurface};

const TITLE: &str = "INTERVAL TIMER";
const COMPLETE_TITLE: &str = "INTERVAL COMPLETE!";
const HINTS: [&str; 2] = ["Press 'S' to skip interval", "Press 'Q' or 'ESC' to quit"];

/// Resolves the canvas size.
///
/// `queried` is the terminal's own report. When it is unavailable or has a
/// zero dimension, `COLUMNS`/`LINES` style fallbacks are used instead.
///
/// # Errors
///
/// Returns `SurfaceError::InvalidGeometry` if the fallback is missing or
/// non-positive.
pub fn resolve_geometry(
    queried: io::Result<(u16, u16)>,
    fallback_columns: Option<&str>,
    fallback_lines: Option<&str>,
) -> Result<(u16, u16), SurfaceError> {
    match queried {
        Ok((w, h)) if w > 0 && h > 0 => return Ok((w, h)),
        Ok((w, h)) => debug!("Terminal reported {}x{}, using fallback geometry", w, h),
        Err(e) => debug!("Terminal size query failed ({}), using fallback geometry", e),
    }

    let parse = |value: Option<&str>, name: &str| -> Result<u16, SurfaceError> {
        let raw =
            value.ok_or_else(|| SurfaceError::InvalidGeometry(format!("{} not set", name)))?;
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(u16::try_from(n).unwrap_or(u16::MAX)),
            _ => Err(SurfaceError::InvalidGeometry(format!(
                "{}={} is not a positive size",
                name, raw
            ))),
        }
    };

    Ok((
        parse(fallback_columns, "COLUMNS")?,
        parse(fallback_lines, "LINES")?,
    ))
}

/// Presentation surface drawing to a terminal.
///
/// Generic over the writer so frames can be rendered into a buffer in tests.
pub struct TerminalSurface<W: Write> {
    out: W,
    layout: Layout,
    owns_terminal: bool,
    released: bool,
}

impl TerminalSurface<Stdout> {
    /// Takes over the controlling terminal: raw mode, alternate screen,
    /// hidden cursor. Undone by [`PresentationSurface::release`] or on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is not a terminal, the geometry is unusable,
    /// or terminal setup fails.
    pub fn acquire() -> Result<Self, SurfaceError> {
        let mut out = io::stdout();
        if !out.is_terminal() {
            return Err(SurfaceError::NotATerminal);
        }

        let columns = std::env::var("COLUMNS").ok();
        let lines = std::env::var("LINES").ok();
        let (width, height) =
            resolve_geometry(terminal::size(), columns.as_deref(), lines.as_deref())?;

        enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        debug!("Terminal surface acquired ({}x{})", width, height);

        Ok(Self {
            out,
            layout: Layout::new(width, height),
            owns_terminal: true,
            released: false,
        })
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Draws into an arbitrary writer without touching terminal modes.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::InvalidGeometry` for a zero-sized canvas.
    pub fn with_writer(out: W, width: u16, height: u16) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidGeometry(format!("{}x{}", width, height)));
        }
        Ok(Self {
            out,
            layout: Layout::new(width, height),
            owns_terminal: false,
            released: false,
        })
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Rebuilds the layout for a new canvas size.
    ///
    /// A zero dimension or an unchanged size leaves the layout as it is.
    /// Returns true if the layout changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.layout.width, self.layout.height)
        {
            return false;
        }
        debug!(
            "Canvas resized from {}x{} to {}x{}",
            self.layout.width, self.layout.height, width, height
        );
        self.layout = Layout::new(width, height);
        true
    }

    /// Re-queries the terminal size before a frame. Only a surface that owns
    /// the terminal does this; a failed query keeps the current layout.
    fn refresh_geometry(&mut self) {
        if !self.owns_terminal {
            return;
        }
        match terminal::size() {
            Ok((width, height)) => {
                self.resize(width, height);
            }
            Err(e) => debug!("Terminal size query failed, keeping layout: {}", e),
        }
    }

    fn clear(&mut self, color: Color) -> io::Result<()> {
        queue!(
            self.out,
            SetBackgroundColor(color),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )
    }

    fn centered(&mut self, row: u16, text: &str, color: Color) -> io::Result<()> {
        let col = layout::center_column(self.layout.width, text.chars().count());
        queue!(
            self.out,
            MoveTo(col, row),
            SetForegroundColor(color),
            Print(text)
        )
    }

    fn at(&mut self, col: u16, row: u16, text: &str, color: Color) -> io::Result<()> {
        queue!(self.out, MoveTo(col, row), SetForegroundColor(color), Print(text))
    }

    fn draw_clock(&mut self, clock: &str) -> io::Result<()> {
        let rows = if self.layout.large_clock {
            font::render_large(clock)
        } else {
            None
        };
        match rows {
            Some(rows) => {
                for (offset, row) in rows.iter().enumerate() {
                    let y = self.layout.clock_row + offset as u16;
                    self.centered(y, row, Color::White)?;
                }
                Ok(())
            }
            None => {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
                self.centered(self.layout.clock_row, clock, Color::White)?;
                queue!(
                    self.out,
                    SetAttribute(Attribute::Reset),
                    SetBackgroundColor(Color::Black)
                )
            }
        }
    }

    fn draw_bar(
        &mut self,
        row: u16,
        fraction: f64,
        ticks: &[u16],
        color: Color,
    ) -> io::Result<()> {
        let cells = layout::bar_cells(self.layout.bar_width, fraction, ticks);
        let col = self.layout.bar_column;
        self.at(col, row, &cells, color)
    }

    fn flush(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> PresentationSurface for TerminalSurface<W> {
    fn render_countdown(&mut self, frame: &CountdownFrame<'_>) -> Result<(), SurfaceError> {
        self.refresh_geometry();
        let l = self.layout;
        self.clear(Color::Black)?;

        queue!(self.out, SetAttribute(Attribute::Bold))?;
        self.centered(l.title_row, TITLE, Color::White)?;
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Color::Black)
        )?;

        let heading = format!("{} ({}/{})", frame.label, frame.index + 1, frame.count);
        self.centered(l.label_row, &heading, Color::Cyan)?;

        self.draw_clock(&layout::format_clock(frame.minutes, frame.seconds))?;

        let overall_caption = format!("Training {:>3.0}%", frame.overall_progress * 100.0);
        self.centered(l.overall_caption_row, &overall_caption, Color::Grey)?;
        let ticks = layout::tick_columns(l.bar_width, frame.boundaries);
        self.draw_bar(l.overall_bar_row, frame.overall_progress, &ticks, Color::Green)?;

        let current_caption = format!("Interval {:>3.0}%", frame.current_progress * 100.0);
        self.centered(l.current_caption_row, &current_caption, Color::Grey)?;
        self.draw_bar(l.current_bar_row, frame.current_progress, &[], Color::Yellow)?;

        if let Some(next) = frame.next_label {
            if layout::shows_next_preview(frame.remaining_seconds(), true) {
                self.centered(l.next_row, &format!("Next: {}", next), Color::Magenta)?;
            }
        }

        for (i, hint) in HINTS.iter().enumerate() {
            let row = (l.hints_row + i as u16).min(l.height.saturating_sub(1));
            self.centered(row, hint, Color::DarkGrey)?;
        }

        self.flush()?;
        Ok(())
    }

    fn fill(&mut self, color: FlashColor) -> Result<(), SurfaceError> {
        let color = match color {
            FlashColor::White => Color::White,
            FlashColor::Red => Color::Red,
        };
        self.clear(color)?;
        self.flush()?;
        Ok(())
    }

    fn render_completion_message(
        &mut self,
        label: &str,
        notice: &str,
    ) -> Result<(), SurfaceError> {
        self.refresh_geometry();
        let middle = self.layout.height / 2;
        self.clear(Color::Black)?;

        queue!(self.out, SetAttribute(Attribute::Bold))?;
        self.centered(middle.saturating_sub(3), COMPLETE_TITLE, Color::White)?;
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Color::Black)
        )?;
        self.centered(middle, label, Color::Cyan)?;
        let notice_row = (middle + 3).min(self.layout.height.saturating_sub(1));
        self.centered(notice_row, notice, Color::Grey)?;

        self.flush()?;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if self.owns_terminal {
            if let Err(e) = execute!(self.out, ResetColor, Show, LeaveAlternateScreen) {
                warn!("Failed to restore terminal screen: {}", e);
            }
            if let Err(e) = disable_raw_mode() {
                warn!("Failed to leave raw mode: {}", e);
            }
            debug!("Terminal surface released");
        }
    }
}

impl<W: Write> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame<'a>(
        boundaries: &'a [f64],
        next: Option<&'a str>,
        remaining: u32,
    ) -> CountdownFrame<'a> {
        CountdownFrame {
            minutes: remaining / 60,
            seconds: remaining % 60,
            label: "Warmup",
            next_label: next,
            overall_progress: 0.25,
            current_progress: 0.5,
            index: 0,
            count: 3,
            boundaries,
        }
    }

    fn rendered(surface: &TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8_lossy(surface.writer()).into_owned()
    }

    mod geometry_tests {
        use super::*;

        #[test]
        fn test_queried_size_wins() {
            let size = resolve_geometry(Ok((100, 30)), Some("80"), Some("24")).unwrap();
            assert_eq!(size, (100, 30));
        }

        #[test]
        fn test_fallback_on_query_error() {
            let err = io::Error::new(io::ErrorKind::Other, "no tty");
            let size = resolve_geometry(Err(err), Some("80"), Some("24")).unwrap();
            assert_eq!(size, (80, 24));
        }

        #[test]
        fn test_fallback_on_zero_size() {
            let size = resolve_geometry(Ok((0, 0)), Some("132"), Some("43")).unwrap();
            assert_eq!(size, (132, 43));
        }

        #[test]
        fn test_non_positive_fallback_is_fatal() {
            let result = resolve_geometry(Ok((0, 10)), Some("0"), Some("24"));
            assert!(matches!(result, Err(SurfaceError::InvalidGeometry(_))));

            let result = resolve_geometry(Ok((0, 10)), Some("80"), Some("-3"));
            assert!(matches!(result, Err(SurfaceError::InvalidGeometry(_))));
        }

        #[test]
        fn test_missing_fallback_is_fatal() {
            let result = resolve_geometry(Ok((0, 0)), None, None);
            assert!(matches!(result, Err(SurfaceError::InvalidGeometry(_))));
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_zero_size_writer_rejected() {
            assert!(TerminalSurface::with_writer(Vec::new(), 0, 24).is_err());
        }

        #[test]
        fn test_countdown_contains_text() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            surface.render_countdown(&frame(&[0.5], Some("Sprint"), 90)).unwrap();
            let out = rendered(&surface);
            assert!(out.contains(TITLE));
            assert!(out.contains("Warmup (1/3)"));
            assert!(out.contains(HINTS[0]));
            assert!(out.contains("Training"));
            // 90 s left: no preview yet
            assert!(!out.contains("Next: Sprint"));
        }

        #[test]
        fn test_countdown_shows_next_preview() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            surface.render_countdown(&frame(&[], Some("Sprint"), 30)).unwrap();
            assert!(rendered(&surface).contains("Next: Sprint"));
        }

        #[test]
        fn test_small_canvas_plain_clock() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 30, 12).unwrap();
            surface.render_countdown(&frame(&[], None, 65)).unwrap();
            assert!(rendered(&surface).contains("01:05"));
        }

        #[test]
        fn test_large_canvas_block_clock() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 120, 40).unwrap();
            surface.render_countdown(&frame(&[], None, 65)).unwrap();
            let out = rendered(&surface);
            assert!(out.contains('█'));
            assert!(!out.contains("01:05"));
        }

        #[test]
        fn test_completion_message() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            surface
                .render_completion_message("Sprint", "Continuing automatically in 2 seconds...")
                .unwrap();
            let out = rendered(&surface);
            assert!(out.contains(COMPLETE_TITLE));
            assert!(out.contains("Sprint"));
            assert!(out.contains("Continuing automatically"));
        }

        #[test]
        fn test_resize_recenters_next_frame() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            surface.render_countdown(&frame(&[], None, 90)).unwrap();
            // Title (14 cells) on row 1 centered at column 33 of 80.
            assert!(rendered(&surface).contains("\x1b[2;34H"));

            assert!(surface.resize(40, 24));
            assert_eq!(surface.layout().width, 40);
            assert_eq!(surface.layout().bar_width, 32);

            let before = surface.writer().len();
            surface.render_countdown(&frame(&[], None, 90)).unwrap();
            let out = String::from_utf8_lossy(&surface.writer()[before..]).into_owned();
            assert!(out.contains("\x1b[2;14H"));
            assert!(!out.contains("\x1b[2;34H"));
        }

        #[test]
        fn test_resize_ignores_zero_and_unchanged_sizes() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            let original = *surface.layout();

            assert!(!surface.resize(0, 24));
            assert!(!surface.resize(80, 0));
            assert!(!surface.resize(80, 24));
            assert_eq!(*surface.layout(), original);
        }

        #[test]
        fn test_fill_writes_output() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            surface.fill(FlashColor::Red).unwrap();
            assert!(!surface.writer().is_empty());
        }

        #[test]
        fn test_release_without_terminal_is_harmless() {
            let mut surface = TerminalSurface::with_writer(Vec::new(), 80, 24).unwrap();
            surface.release();
            surface.release();
        }
    }
}
