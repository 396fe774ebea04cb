//! Placeholder image rendering: gradient background, fitted text, JPEG output.

pub mod color;
pub mod fonts;
pub mod gradient;
pub mod layout;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::constants::SHADOW_OFFSET;
use crate::error::PlaceholderError;

pub use color::derive_color;
pub use fonts::FontSet;
pub use layout::{LayoutResult, fit_text};

const SHADOW: Rgb<u8> = Rgb([0, 0, 0]);
const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// A validated render job.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderRequest {
    /// Text drawn on the image, also seeds the background color
    pub text: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Respond with raw image bytes rather than a JSON envelope
    pub return_as_file: bool,
}

/// Draws the full placeholder: gradient, shadow, then white text.
pub fn render_placeholder(fonts: &FontSet, text: &str, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    gradient::fill_gradient(&mut canvas, derive_color(text));

    let layout = fit_text(fonts, text, width, height);
    let (x, y) = layout.origin(width, height);
    debug!(
        "Laid out {} line(s) at {}px, block {}x{} at ({}, {})",
        layout.lines.len(),
        layout.font_size,
        layout.width,
        layout.height,
        x,
        y
    );

    let font = fonts.at_size(layout.font_size);
    font.draw(
        &mut canvas,
        &layout.lines,
        (x + SHADOW_OFFSET, y + SHADOW_OFFSET),
        SHADOW,
    );
    font.draw(&mut canvas, &layout.lines, (x, y), FOREGROUND);
    canvas
}

/// Encodes the canvas as JPEG at `quality` (1-100).
pub fn encode_jpeg(canvas: &RgbImage, quality: u8) -> Result<Vec<u8>, PlaceholderError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(canvas)?;
    Ok(bytes)
}
