//! Block-glyph font for the large countdown clock.

/// Rows per glyph.
pub const GLYPH_HEIGHT: usize = 5;

const BLOCK: char = '█';

fn glyph(c: char) -> Option<[&'static str; GLYPH_HEIGHT]> {
    let rows = match c {
        '0' => ["#####", "#   #", "#   #", "#   #", "#####"],
        '1' => ["  #  ", " ##  ", "  #  ", "  #  ", " ### "],
        '2' => ["#####", "    #", "#####", "#    ", "#####"],
        '3' => ["#####", "    #", " ####", "    #", "#####"],
        '4' => ["#   #", "#   #", "#####", "    #", "    #"],
        '5' => ["#####", "#    ", "#####", "    #", "#####"],
        '6' => ["#####", "#    ", "#####", "#   #", "#####"],
        '7' => ["#####", "    #", "   # ", "  #  ", "  #  "],
        '8' => ["#####", "#   #", "#####", "#   #", "#####"],
        '9' => ["#####", "#   #", "#####", "    #", "#####"],
        ':' => ["   ", " # ", "   ", " # ", "   "],
        _ => return None,
    };
    Some(rows)
}

/// Renders `text` as rows of block characters, one space between glyphs.
///
/// Returns `None` if `text` contains a character the font does not cover.
#[must_use]
pub fn render_large(text: &str) -> Option<Vec<String>> {
    let glyphs: Vec<_> = text.chars().map(glyph).collect::<Option<_>>()?;
    let rows = (0..GLYPH_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| g[row].replace('#', &BLOCK.to_string()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Some(rows)
}

/// Display width (in cells) of `text` when rendered with [`render_large`].
#[must_use]
pub fn large_width(text: &str) -> Option<usize> {
    let widths: Vec<usize> = text
        .chars()
        .map(|c| glyph(c).map(|g| g[0].chars().count()))
        .collect::<Option<_>>()?;
    Some(widths.iter().sum::<usize>() + widths.len().saturating_sub(1))
}
