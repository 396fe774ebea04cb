//! Font faces and the fallback chain shared by every request.
//!
//! A [`FontSet`] is loaded once at startup and only read afterwards. Each
//! character is drawn with the first face in the chain that has a glyph for
//! it. The chain always ends with a font compiled into the binary, which also
//! draws the missing-glyph box for characters no face covers.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};
use tracing::{error, info, warn};

use crate::constants::{BUNDLED_FONT_FILES, LINE_SPACING, SYSTEM_FONT_PATHS};

/// Name the embedded fallback face reports.
pub const EMBEDDED_FONT_NAME: &str = "DejaVuSans-Bold (embedded)";

const EMBEDDED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/DejaVuSans-Bold.ttf"
));

/// Vertical metrics of a face at a given pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    /// Distance from baseline to the top of the tallest glyph
    pub ascent: f32,
    /// Distance from baseline to the lowest descender, negative
    pub descent: f32,
    /// Recommended gap between lines
    pub line_gap: f32,
}

impl LineMetrics {
    /// Rough proportions used only when the chain has no face at all.
    fn approximate(px: f32) -> Self {
        Self {
            ascent: px * 0.8,
            descent: -px * 0.2,
            line_gap: 0.0,
        }
    }
}

/// Anything that can look up, measure and rasterize glyphs.
pub trait FontFace: Send + Sync {
    /// Human readable name, used in logs
    fn name(&self) -> &str;

    /// Whether the face has a real glyph for `ch`
    fn has_glyph(&self, ch: char) -> bool;

    /// Vertical metrics at `px` pixels
    fn line_metrics(&self, px: f32) -> LineMetrics;

    /// Horizontal advance of `ch` at `px` pixels
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Calls `plot(x, y, coverage)` for every covered pixel of `ch` drawn
    /// with its baseline origin at `origin`.
    fn rasterize(
        &self,
        ch: char,
        px: f32,
        origin: (f32, f32),
        plot: &mut dyn FnMut(i32, i32, f32),
    );
}

/// An outline font (TrueType or CFF OpenType).
pub struct OutlineFace {
    name: String,
    font: Font<'static>,
}

impl OutlineFace {
    /// Parses font bytes, `None` when they are not a usable font.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let font = Font::try_from_vec(bytes)?;
        Some(Self {
            name: name.into(),
            font,
        })
    }

    /// The font compiled into the binary.
    pub fn embedded() -> Option<Self> {
        let font = Font::try_from_bytes(EMBEDDED_FONT)?;
        Some(Self {
            name: EMBEDDED_FONT_NAME.to_string(),
            font,
        })
    }

    /// Reads and parses a font file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|err| err.to_string())?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, bytes).ok_or_else(|| "not a valid font file".to_string())
    }
}

impl std::fmt::Debug for OutlineFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFace")
            .field("name", &self.name)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontFace for OutlineFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.glyph(ch).id().0 != 0
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        let v_metrics = self.font.v_metrics(Scale::uniform(px));
        LineMetrics {
            ascent: v_metrics.ascent,
            descent: v_metrics.descent,
            line_gap: v_metrics.line_gap,
        }
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        self.font
            .glyph(ch)
            .scaled(Scale::uniform(px))
            .h_metrics()
            .advance_width
    }

    fn rasterize(
        &self,
        ch: char,
        px: f32,
        origin: (f32, f32),
        plot: &mut dyn FnMut(i32, i32, f32),
    ) {
        let glyph = self
            .font
            .glyph(ch)
            .scaled(Scale::uniform(px))
            .positioned(point(origin.0, origin.1));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                plot(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage);
            });
        }
    }
}

/// Ordered font fallback chain, terminated by the embedded face.
pub struct FontSet {
    faces: Vec<Box<dyn FontFace>>,
}

impl FontSet {
    /// A set with only the embedded face.
    pub fn embedded() -> Self {
        Self::from_faces(Vec::new())
    }

    /// Builds a set from already loaded faces, appending the embedded face.
    pub fn from_faces(mut faces: Vec<Box<dyn FontFace>>) -> Self {
        match OutlineFace::embedded() {
            Some(face) => faces.push(Box::new(face)),
            None => error!("Embedded font could not be parsed"),
        }
        Self { faces }
    }

    /// Loads `extra` fonts, then the bundled fonts from `font_dir`. Falls back
    /// to well-known system fonts only when neither produced a face.
    pub fn discover(font_dir: &Path, extra: &[PathBuf]) -> Self {
        let mut faces: Vec<Box<dyn FontFace>> = Vec::new();
        let bundled = BUNDLED_FONT_FILES.iter().map(|file| font_dir.join(file));
        for path in extra.iter().cloned().chain(bundled) {
            if let Some(face) = try_load(&path) {
                faces.push(Box::new(face));
            }
        }

        if faces.is_empty() {
            warn!(
                "No fonts found in {}, trying system fonts",
                font_dir.display()
            );
            if let Some(face) = SYSTEM_FONT_PATHS
                .iter()
                .map(Path::new)
                .filter(|path| path.exists())
                .find_map(try_load)
            {
                faces.push(Box::new(face));
            }
        }

        if faces.is_empty() {
            warn!("No usable font files, rendering with the embedded font only");
        }
        Self::from_faces(faces)
    }

    /// Names of the faces in fallback order.
    pub fn names(&self) -> Vec<&str> {
        self.faces.iter().map(|face| face.name()).collect()
    }

    /// Binds the set to a pixel size for measuring and drawing.
    pub fn at_size(&self, size: u32) -> SizedFont<'_> {
        SizedFont { set: self, size }
    }

    fn primary(&self) -> Option<&dyn FontFace> {
        self.faces.first().map(|face| face.as_ref())
    }

    /// First face with a glyph for `ch`, otherwise the last face so the
    /// character still takes up space.
    fn face_for(&self, ch: char) -> Option<&dyn FontFace> {
        self.faces
            .iter()
            .find(|face| face.has_glyph(ch))
            .or_else(|| self.faces.last())
            .map(|face| face.as_ref())
    }
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("faces", &self.names())
            .finish()
    }
}

fn try_load(path: &Path) -> Option<OutlineFace> {
    match OutlineFace::load(path) {
        Ok(face) => {
            info!("Loaded font {}", path.display());
            Some(face)
        }
        Err(err) => {
            warn!("Skipping font {}: {}", path.display(), err);
            None
        }
    }
}

/// Rounds a fractional width up to whole pixels.
pub(crate) fn whole_pixels(width: f32) -> u32 {
    width.ceil().max(0.0) as u32
}

/// A [`FontSet`] at a fixed pixel size.
#[derive(Clone, Copy, Debug)]
pub struct SizedFont<'a> {
    set: &'a FontSet,
    size: u32,
}

impl SizedFont<'_> {
    fn px(&self) -> f32 {
        self.size as f32
    }

    /// Metrics of the primary face.
    pub fn metrics(&self) -> LineMetrics {
        let px = self.px();
        self.set
            .primary()
            .map_or_else(|| LineMetrics::approximate(px), |face| face.line_metrics(px))
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> u32 {
        let metrics = self.metrics();
        (metrics.ascent - metrics.descent + metrics.line_gap).ceil() as u32 + LINE_SPACING
    }

    /// Height of a single line from ascent to descent.
    pub fn line_height(&self) -> u32 {
        let metrics = self.metrics();
        (metrics.ascent - metrics.descent).ceil() as u32
    }

    /// Unrounded advance of a single character.
    pub fn char_advance(&self, ch: char) -> f32 {
        self.set
            .face_for(ch)
            .map_or(0.0, |face| face.advance(ch, self.px()))
    }

    /// Rendered width of one line of text.
    pub fn text_width(&self, text: &str) -> u32 {
        let width = text
            .chars()
            .fold(0.0, |width, ch| width + self.char_advance(ch));
        whole_pixels(width)
    }

    /// Width and height of a block of lines.
    pub fn block_size<S: AsRef<str>>(&self, lines: &[S]) -> (u32, u32) {
        let width = lines
            .iter()
            .map(|line| self.text_width(line.as_ref()))
            .max()
            .unwrap_or(0);
        let rows = lines.len().max(1) as u32;
        let height = (rows - 1) * self.line_advance() + self.line_height();
        (width, height)
    }

    /// Draws lines top-left anchored at `(x, y)`, blending glyph coverage
    /// into the canvas. Pixels outside the canvas are skipped.
    pub fn draw<S: AsRef<str>>(
        &self,
        canvas: &mut RgbImage,
        lines: &[S],
        (x, y): (i32, i32),
        color: Rgb<u8>,
    ) {
        let px = self.px();
        let ascent = self.metrics().ascent;
        let advance = self.line_advance() as f32;
        let (canvas_width, canvas_height) = canvas.dimensions();

        let mut plot = |px_x: i32, px_y: i32, coverage: f32| {
            if px_x < 0 || px_y < 0 {
                return;
            }
            let (px_x, px_y) = (px_x as u32, px_y as u32);
            if px_x >= canvas_width || px_y >= canvas_height {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0);
            if alpha <= 0.0 {
                return;
            }
            let dst = canvas.get_pixel_mut(px_x, px_y);
            for channel in 0..3 {
                let blended = f32::from(color.0[channel]) * alpha
                    + f32::from(dst.0[channel]) * (1.0 - alpha);
                dst.0[channel] = blended.round().clamp(0.0, 255.0) as u8;
            }
        };

        for (index, line) in lines.iter().enumerate() {
            let baseline = y as f32 + ascent + index as f32 * advance;
            let mut caret = x as f32;
            for ch in line.as_ref().chars() {
                let Some(face) = self.set.face_for(ch) else {
                    continue;
                };
                face.rasterize(ch, px, (caret, baseline), &mut plot);
                caret += face.advance(ch, px);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Covers ASCII capitals only, with a fixed wide advance.
    struct CapitalsOnly;

    impl FontFace for CapitalsOnly {
        fn name(&self) -> &str {
            "capitals"
        }

        fn has_glyph(&self, ch: char) -> bool {
            ch.is_ascii_uppercase()
        }

        fn line_metrics(&self, px: f32) -> LineMetrics {
            LineMetrics {
                ascent: px,
                descent: 0.0,
                line_gap: 0.0,
            }
        }

        fn advance(&self, _ch: char, _px: f32) -> f32 {
            100.0
        }

        fn rasterize(
            &self,
            _ch: char,
            _px: f32,
            origin: (f32, f32),
            plot: &mut dyn FnMut(i32, i32, f32),
        ) {
            plot(origin.0 as i32, origin.1 as i32 - 1, 1.0);
        }
    }

    fn bright(pixel: &Rgb<u8>) -> bool {
        pixel.0.iter().all(|&channel| channel >= 250)
    }

    #[test]
    fn embedded_face_parses() {
        let face = OutlineFace::embedded().expect("embedded font");
        assert_eq!(face.name(), EMBEDDED_FONT_NAME);
        assert!(face.has_glyph('A'));
        assert!(face.has_glyph('é'));
        assert!(!face.has_glyph('你'));
    }

    #[test]
    fn outline_metrics_scale_with_size() {
        let face = OutlineFace::embedded().expect("embedded font");
        let metrics = face.line_metrics(40.0);
        assert!(metrics.ascent > 0.0);
        assert!(metrics.descent < 0.0);
        assert!((metrics.ascent - metrics.descent - 40.0).abs() < 0.5);
        assert!(face.advance('W', 40.0) > face.advance('i', 40.0));
        assert!(face.advance('W', 80.0) > face.advance('W', 40.0));
        // the missing-glyph box still advances
        assert!(face.advance('你', 40.0) > 0.0);
    }

    #[test]
    fn outline_rasterizes_inside_its_advance() {
        let face = OutlineFace::embedded().expect("embedded font");
        let mut pixels = Vec::new();
        face.rasterize('H', 40.0, (10.0, 50.0), &mut |x: i32, y: i32, coverage: f32| {
            pixels.push((x, y, coverage))
        });
        assert!(pixels.iter().any(|&(_, _, coverage)| coverage > 0.9));
        let right = 10.0 + face.advance('H', 40.0);
        assert!(
            pixels
                .iter()
                .filter(|&&(_, _, coverage)| coverage > 0.0)
                .all(|&(x, y, _)| x >= 10 && (x as f32) <= right && y <= 50)
        );
    }

    #[test]
    fn embedded_set_has_one_face() {
        let fonts = FontSet::embedded();
        assert_eq!(fonts.names(), vec![EMBEDDED_FONT_NAME]);
    }

    #[test]
    fn missing_glyphs_fall_through_to_later_faces() {
        let fonts = FontSet::from_faces(vec![Box::new(CapitalsOnly)]);
        assert_eq!(fonts.names(), vec!["capitals", EMBEDDED_FONT_NAME]);

        let embedded = OutlineFace::embedded().expect("embedded font");
        let font = fonts.at_size(20);
        assert_eq!(font.char_advance('A'), 100.0);
        assert_eq!(font.char_advance('a'), embedded.advance('a', 20.0));
        assert_eq!(font.char_advance('你'), embedded.advance('你', 20.0));
        assert_eq!(
            font.text_width("Aa"),
            whole_pixels(100.0 + embedded.advance('a', 20.0))
        );
        // vertical metrics come from the first face
        assert_eq!(font.line_height(), 20);
    }

    #[test]
    fn mixed_latin_and_cjk_measure_and_draw() {
        let fonts = FontSet::embedded();
        let font = fonts.at_size(30);
        let latin = font.text_width("Hi");
        let cjk = font.text_width("你好");
        assert!(latin > 0 && cjk > 0);
        let summed: f32 = "Hi你好".chars().map(|ch| font.char_advance(ch)).sum();
        assert_eq!(font.text_width("Hi你好"), whole_pixels(summed));

        let mut canvas = RgbImage::new(200, 60);
        font.draw(&mut canvas, &["Hi 你好"], (5, 5), Rgb([255, 255, 255]));
        assert!(canvas.pixels().any(bright));
        // the missing-glyph boxes land right of the Latin part
        assert!(
            canvas
                .enumerate_pixels()
                .any(|(x, _, pixel)| x > 5 + latin + 4 && pixel.0[0] > 0)
        );
    }

    #[test]
    fn discover_empty_dir_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fonts = FontSet::discover(dir.path(), &[]);
        assert_eq!(fonts.names().last(), Some(&EMBEDDED_FONT_NAME));
    }

    #[test]
    fn corrupt_font_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bogus = dir.path().join(BUNDLED_FONT_FILES[0]);
        std::fs::write(&bogus, b"definitely not an opentype file").expect("write bogus font");
        assert!(OutlineFace::load(&bogus).is_err());

        let fonts = FontSet::discover(dir.path(), &[bogus]);
        assert!(!fonts.names().contains(&BUNDLED_FONT_FILES[0]));
        assert_eq!(fonts.names().last(), Some(&EMBEDDED_FONT_NAME));
    }

    #[test]
    fn font_files_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(BUNDLED_FONT_FILES[1]);
        std::fs::write(&path, EMBEDDED_FONT).expect("write font");

        let fonts = FontSet::discover(dir.path(), &[]);
        assert_eq!(
            fonts.names(),
            vec![BUNDLED_FONT_FILES[1], EMBEDDED_FONT_NAME]
        );
    }

    #[test]
    fn width_grows_with_text() {
        let fonts = FontSet::embedded();
        let font = fonts.at_size(36);
        assert_eq!(font.text_width(""), 0);
        assert!(font.text_width("ab") > font.text_width("a"));
        assert!(fonts.at_size(72).text_width("a") > font.text_width("a"));
    }

    #[test]
    fn block_height_counts_every_line() {
        let fonts = FontSet::embedded();
        let font = fonts.at_size(20);
        let (_, one) = font.block_size(&["A"]);
        let (_, three) = font.block_size(&["A", "", "B"]);
        assert_eq!(one, font.line_height());
        assert_eq!(three, one + 2 * font.line_advance());
    }

    #[test]
    fn draw_clips_at_canvas_edges() {
        let fonts = FontSet::embedded();
        let font = fonts.at_size(30);
        let mut canvas = RgbImage::new(40, 40);
        font.draw(&mut canvas, &["HI"], (-8, -8), Rgb([255, 255, 255]));
        font.draw(&mut canvas, &["HI"], (30, 30), Rgb([255, 255, 255]));
        assert!(canvas.pixels().any(bright));
    }
}
