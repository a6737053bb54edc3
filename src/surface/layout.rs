//! Layout math for the countdown screen.
//!
//! Everything here is pure and measured in terminal cells. Exact row offsets
//! are a presentation convention; the progress-bar geometry is not.

use super::font;

/// Remaining seconds at or below which the next interval is previewed.
pub const NEXT_PREVIEW_THRESHOLD: u32 = 30;

/// Column at which text of `text_width` cells is horizontally centered.
#[must_use]
pub fn center_column(canvas_width: u16, text_width: usize) -> u16 {
    let text_width = u16::try_from(text_width).unwrap_or(u16::MAX);
    canvas_width.saturating_sub(text_width) / 2
}

/// Number of filled cells for a bar of `bar_width` at `fraction` (clamped to
/// `[0, 1]`). Linear in `fraction`.
#[must_use]
pub fn fill_width(bar_width: u16, fraction: f64) -> u16 {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    (fraction * f64::from(bar_width)).round() as u16
}

/// Cell offsets inside a bar of `bar_width` for each boundary fraction.
#[must_use]
pub fn tick_columns(bar_width: u16, boundaries: &[f64]) -> Vec<u16> {
    boundaries
        .iter()
        .map(|b| fill_width(bar_width, *b).min(bar_width.saturating_sub(1)))
        .collect()
}

/// Builds the cells of a progress bar: filled `█`, empty `░`, and `│` at
/// each tick offset.
#[must_use]
pub fn bar_cells(bar_width: u16, fraction: f64, ticks: &[u16]) -> String {
    let filled = fill_width(bar_width, fraction);
    (0..bar_width)
        .map(|col| {
            if ticks.contains(&col) {
                '│'
            } else if col < filled {
                '█'
            } else {
                '░'
            }
        })
        .collect()
}

/// Whether the "Next: ..." preview is shown.
#[must_use]
pub fn shows_next_preview(remaining_seconds: u32, has_next: bool) -> bool {
    has_next && remaining_seconds <= NEXT_PREVIEW_THRESHOLD
}

/// Formats a countdown as `MM:SS`.
#[must_use]
pub fn format_clock(minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

/// Row and column assignments for one countdown frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub title_row: u16,
    pub label_row: u16,
    pub clock_row: u16,
    /// Use the block font for the clock.
    pub large_clock: bool,
    pub overall_caption_row: u16,
    pub overall_bar_row: u16,
    pub current_caption_row: u16,
    pub current_bar_row: u16,
    pub next_row: u16,
    pub hints_row: u16,
    pub bar_column: u16,
    pub bar_width: u16,
}

impl Layout {
    /// Computes the layout for a canvas. The large clock is used only when
    /// it fits with room for the bars and hints.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let clock_width = font::large_width("00:00").unwrap_or(0);
        let large_clock =
            usize::from(width) >= clock_width + 4 && usize::from(height) >= font::GLYPH_HEIGHT + 17;
        let clock_height = if large_clock {
            font::GLYPH_HEIGHT as u16
        } else {
            1
        };

        let last = height.saturating_sub(1);
        let title_row = 1.min(last);
        let label_row = 3.min(last);
        let clock_row = (height / 2)
            .saturating_sub(clock_height / 2 + 3)
            .max(label_row + 2)
            .min(last);
        let below_clock = clock_row + clock_height + 1;
        let overall_caption_row = below_clock.min(last);
        let overall_bar_row = (below_clock + 1).min(last);
        let current_caption_row = (below_clock + 3).min(last);
        let current_bar_row = (below_clock + 4).min(last);
        let next_row = (below_clock + 6).min(last);
        let hints_row = height.saturating_sub(3);

        let bar_width = width.saturating_sub(8).min(80).max(1);
        let bar_column = center_column(width, usize::from(bar_width));

        Self {
            width,
            height,
            title_row,
            label_row,
            clock_row,
            large_clock,
            overall_caption_row,
            overall_bar_row,
            current_caption_row,
            current_bar_row,
            next_row,
            hints_row,
            bar_column,
            bar_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod centering_tests {
        use super::*;

        #[test]
        fn test_center_column() {
            assert_eq!(center_column(80, 10), 35);
            assert_eq!(center_column(81, 10), 35);
            assert_eq!(center_column(10, 10), 0);
        }

        #[test]
        fn test_center_column_text_wider_than_canvas() {
            assert_eq!(center_column(10, 50), 0);
        }
    }

    mod bar_tests {
        use super::*;

        #[test]
        fn test_fill_width_linear() {
            assert_eq!(fill_width(100, 0.0), 0);
            assert_eq!(fill_width(100, 0.25), 25);
            assert_eq!(fill_width(100, 0.5), 50);
            assert_eq!(fill_width(100, 1.0), 100);
        }

        #[test]
        fn test_fill_width_clamped() {
            assert_eq!(fill_width(40, -0.5), 0);
            assert_eq!(fill_width(40, 1.5), 40);
            assert_eq!(fill_width(40, f64::NAN), 0);
        }

        #[test]
        fn test_fill_width_monotonic() {
            let mut previous = 0;
            for step in 0..=100 {
                let width = fill_width(73, f64::from(step) / 100.0);
                assert!(width >= previous);
                previous = width;
            }
        }

        #[test]
        fn test_tick_columns() {
            // Warmup 5, Sprint 3, Rest 2 -> boundaries at 0.5 and 0.8
            assert_eq!(tick_columns(50, &[0.5, 0.8]), vec![25, 40]);
        }

        #[test]
        fn test_tick_columns_stay_inside_bar() {
            assert_eq!(tick_columns(10, &[1.0]), vec![9]);
        }

        #[test]
        fn test_bar_cells() {
            let cells = bar_cells(10, 0.5, &[]);
            assert_eq!(cells, "█████░░░░░");

            let cells = bar_cells(10, 0.3, &[5]);
            assert_eq!(cells, "███░░│░░░░");
        }
    }

    mod preview_tests {
        use super::*;

        #[test]
        fn test_preview_threshold() {
            assert!(shows_next_preview(30, true));
            assert!(shows_next_preview(1, true));
            assert!(!shows_next_preview(31, true));
            assert!(!shows_next_preview(10, false));
        }
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_format_clock() {
            assert_eq!(format_clock(5, 7), "05:07");
            assert_eq!(format_clock(120, 59), "120:59");
        }

        #[test]
        fn test_large_clock_on_big_canvas() {
            let layout = Layout::new(120, 40);
            assert!(layout.large_clock);
            assert!(layout.overall_bar_row > layout.clock_row + 4);
            assert!(layout.current_bar_row > layout.overall_bar_row);
            assert!(layout.hints_row > layout.next_row);
            assert_eq!(layout.bar_width, 80);
            assert_eq!(layout.bar_column, 20);
        }

        #[test]
        fn test_small_canvas_uses_plain_clock() {
            let layout = Layout::new(30, 12);
            assert!(!layout.large_clock);
            assert!(layout.current_bar_row < 12);
            assert_eq!(layout.bar_width, 22);
        }

        #[test]
        fn test_tiny_canvas_does_not_panic() {
            let layout = Layout::new(1, 1);
            assert_eq!(layout.bar_width, 1);
            assert_eq!(layout.hints_row, 0);
        }
    }
}
