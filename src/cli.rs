//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{DEFAULT_FONT_DIR, DEFAULT_JPEG_QUALITY};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "PLACEHOLDER_DEBUG")]
    /// Enable debug logging. Env: PLACEHOLDER_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "5566", env = "PLACEHOLDER_PORT")]
    /// http listener, defaults to `5566`.
    /// Env: PLACEHOLDER_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "0.0.0.0",
        env = "PLACEHOLDER_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `0.0.0.0`.
    /// Env: PLACEHOLDER_LISTEN_ADDRESS
    pub listen_address: String,
    #[clap(long, default_value = DEFAULT_FONT_DIR, env = "PLACEHOLDER_FONT_DIR")]
    /// Directory holding `NotoSansSC-Bold.otf` and `NotoSansJP-Bold.otf`.
    /// Env: PLACEHOLDER_FONT_DIR
    pub font_dir: PathBuf,
    #[clap(long = "font")]
    /// Extra font files tried before the font directory, may be repeated.
    pub fonts: Vec<PathBuf>,
    #[clap(
        long,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
        env = "PLACEHOLDER_JPEG_QUALITY"
    )]
    /// JPEG quality between 1 and 100, defaults to `75`.
    /// Env: PLACEHOLDER_JPEG_QUALITY
    pub jpeg_quality: u8,
}
