//! Vertical darkening gradient

use image::{Rgb, RgbImage};

use crate::constants::GRADIENT_DARKEN;

/// Color of scanline `row` on a canvas `height` rows tall.
pub fn darken(base: Rgb<u8>, row: u32, height: u32) -> Rgb<u8> {
    let alpha = if height == 0 {
        0.0
    } else {
        f64::from(row) / f64::from(height)
    };
    let factor = 1.0 - alpha * GRADIENT_DARKEN;
    Rgb(base.0.map(|channel| (f64::from(channel) * factor).clamp(0.0, 255.0) as u8))
}

/// Fills every row of the canvas with the darkened base color.
pub fn fill_gradient(canvas: &mut RgbImage, base: Rgb<u8>) {
    let height = canvas.height();
    for (row, pixels) in canvas.enumerate_rows_mut() {
        let color = darken(base, row, height);
        for (_, _, pixel) in pixels {
            *pixel = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_row_is_base_color() {
        let base = Rgb([200, 100, 50]);
        assert_eq!(darken(base, 0, 1200), base);
    }

    #[test]
    fn bottom_row_approaches_seventy_percent() {
        let base = Rgb([200, 100, 50]);
        // 1 - (99/100) * 0.3 = 0.703
        assert_eq!(darken(base, 99, 100), Rgb([140, 70, 35]));
    }

    #[test]
    fn rows_never_brighten() {
        let base = Rgb([255, 128, 3]);
        let height = 500;
        let mut previous = darken(base, 0, height);
        for row in 1..height {
            let current = darken(base, row, height);
            for channel in 0..3 {
                assert!(current.0[channel] <= previous.0[channel], "row {row}");
            }
            previous = current;
        }
    }

    #[test]
    fn fill_covers_whole_rows() {
        let mut canvas = RgbImage::new(7, 10);
        let base = Rgb([100, 200, 255]);
        fill_gradient(&mut canvas, base);
        for y in 0..10 {
            let expected = darken(base, y, 10);
            for x in 0..7 {
                assert_eq!(*canvas.get_pixel(x, y), expected);
            }
        }
    }
}
