//! Wrapping and font-size search for the text block.

use tracing::debug;

use super::fonts::{FontSet, SizedFont, whole_pixels};
use crate::constants::{
    FONT_SHRINK_FACTOR, INITIAL_FONT_RATIO, MAX_FIT_ATTEMPTS, MIN_FONT_SIZE, PADDING_RATIO,
};

/// Area available to the text once padding is removed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TextBox {
    /// Padding on every side
    pub padding: u32,
    /// Widest a line may be
    pub max_width: u32,
    /// Tallest the block may be
    pub max_height: u32,
}

impl TextBox {
    /// Padded box for a `width` x `height` canvas.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let padding = (f64::from(width.min(height)) * PADDING_RATIO) as u32;
        Self {
            padding,
            max_width: width.saturating_sub(2 * padding),
            max_height: height.saturating_sub(2 * padding),
        }
    }

    fn fits(&self, layout: &LayoutResult) -> bool {
        layout.width <= self.max_width && layout.height <= self.max_height
    }
}

/// Wrapped lines and the size they were measured at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayoutResult {
    /// Lines in drawing order, empty strings for blank lines
    pub lines: Vec<String>,
    /// Font size in pixels
    pub font_size: u32,
    /// Width of the widest line
    pub width: u32,
    /// Height of the whole block
    pub height: u32,
}

impl LayoutResult {
    /// Top-left corner that centers the block on the canvas. Negative when
    /// the block overflows.
    pub fn origin(&self, canvas_width: u32, canvas_height: u32) -> (i32, i32) {
        let x = (i64::from(canvas_width) - i64::from(self.width)).div_euclid(2);
        let y = (i64::from(canvas_height) - i64::from(self.height)).div_euclid(2);
        (x as i32, y as i32)
    }
}

/// First size tried for a canvas, never below the floor.
pub fn initial_font_size(width: u32, height: u32) -> u32 {
    ((f64::from(width.min(height)) * INITIAL_FONT_RATIO) as u32).max(MIN_FONT_SIZE)
}

/// Greedy wrap one character at a time so scripts without spaces break too.
///
/// Explicit newlines always break, and blank paragraphs stay as empty lines.
/// A line only exceeds `max_width` when it holds a single character.
pub fn wrap_text(text: &str, font: &SizedFont<'_>, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        // running width sums advances in the same order as text_width
        let mut current = String::new();
        let mut current_width = 0.0_f32;
        for ch in paragraph.chars() {
            let advance = font.char_advance(ch);
            let candidate = current_width + advance;
            if whole_pixels(candidate) <= max_width {
                current.push(ch);
                current_width = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
            current_width = advance;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Wraps and measures `text` at one font size.
pub fn layout_at(fonts: &FontSet, text: &str, size: u32, max_width: u32) -> LayoutResult {
    let font = fonts.at_size(size);
    let lines = wrap_text(text, &font, max_width);
    let (width, height) = font.block_size(&lines);
    LayoutResult {
        lines,
        font_size: size,
        width,
        height,
    }
}

/// Searches for the largest tried size at which the wrapped text fits the
/// padded box, shrinking by 15% per attempt.
///
/// Gives up after [`MAX_FIT_ATTEMPTS`] or once a shrink would go below
/// [`MIN_FONT_SIZE`]. When no tried size fits, the text is laid out at the
/// floor and may overflow.
pub fn fit_text(fonts: &FontSet, text: &str, width: u32, height: u32) -> LayoutResult {
    let bounds = TextBox::for_canvas(width, height);
    let mut size = initial_font_size(width, height);

    for attempt in 1..=MAX_FIT_ATTEMPTS {
        let layout = layout_at(fonts, text, size, bounds.max_width);
        if bounds.fits(&layout) {
            debug!("Text fits at {}px after {} attempt(s)", size, attempt);
            return layout;
        }

        let next = (f64::from(size) * FONT_SHRINK_FACTOR) as u32;
        if next < MIN_FONT_SIZE {
            break;
        }
        size = next;
    }

    debug!("Text does not fit above {}px, using the floor", size);
    layout_at(fonts, text, MIN_FONT_SIZE, bounds.max_width)
}
