//! Shared constants for rendering and the HTTP surface
//!

/// Default canvas width when the query omits it
pub const DEFAULT_WIDTH: u32 = 900;

/// Default canvas height when the query omits it
pub const DEFAULT_HEIGHT: u32 = 1200;

/// Largest accepted width or height, caps memory and CPU per request
pub const MAX_DIMENSION: u32 = 2000;

/// Default JPEG quality, matches the usual encoder default
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Default directory searched for bundled fonts
pub const DEFAULT_FONT_DIR: &str = "./fonts";

/// Font files looked up in the font directory, in fallback order
pub const BUNDLED_FONT_FILES: &[&str] = &["NotoSansSC-Bold.otf", "NotoSansJP-Bold.otf"];

/// System fonts tried when nothing from the font directory loads
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Padding around the text block, as a fraction of the smaller dimension
pub const PADDING_RATIO: f64 = 0.08;

/// First font size tried, as a fraction of the smaller dimension
pub const INITIAL_FONT_RATIO: f64 = 0.15;

/// Multiplier applied to the font size after a failed fit
pub const FONT_SHRINK_FACTOR: f64 = 0.85;

/// Smallest font size the fit loop will use
pub const MIN_FONT_SIZE: u32 = 12;

/// Upper bound on fit attempts
pub const MAX_FIT_ATTEMPTS: usize = 10;

/// Extra pixels between lines of a text block
pub const LINE_SPACING: u32 = 4;

/// Offset of the drop shadow in pixels
pub const SHADOW_OFFSET: i32 = 2;

/// Fraction of brightness lost at the bottom row of the gradient
pub const GRADIENT_DARKEN: f64 = 0.3;

/// Content type of encoded images
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";
