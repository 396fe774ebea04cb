//! Background color derived from the prompt text

use image::Rgb;
use md5::{Digest, Md5};

/// Maps text to a stable color: the first three bytes of its MD5 digest.
pub fn derive_color(text: &str) -> Rgb<u8> {
    let digest = Md5::digest(text.as_bytes());
    Rgb([digest[0], digest[1], digest[2]])
}
