//! Shared fixtures for unit tests.

use image::{Rgb, Rgba};
use imageproc::definitions::Image;

use crate::ColorSource;

/// 2x2 RGB image with a distinct color in every pixel.
pub fn create_test_rgb_image() -> Image<Rgb<u8>> {
    let mut image = Image::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([10, 20, 30]));
    image.put_pixel(0, 1, Rgb([40, 50, 60]));
    image.put_pixel(1, 1, Rgb([70, 80, 90]));
    image
}

/// Solid-color RGBA image.
pub fn create_solid_rgba_image(width: u32, height: u32, color: Rgba<u8>) -> Image<Rgba<u8>> {
    Image::from_pixel(width, height, color)
}

/// 8x8 RGBA image: a white border one pixel wide around a dark subject,
/// with alpha varying per row.
pub fn create_bordered_rgba_image() -> Image<Rgba<u8>> {
    Image::from_fn(8, 8, |x, y| {
        let alpha = 255 - (y as u8) * 10;
        if x == 0 || y == 0 || x == 7 || y == 7 {
            Rgba([250, 250, 250, alpha])
        } else {
            Rgba([20, 40, 60, alpha])
        }
    })
}

/// Color source that hands out a scripted sequence, then repeats the last entry.
pub struct ScriptedColors {
    colors: Vec<Rgb<u8>>,
    draws: usize,
}

impl ScriptedColors {
    pub fn new(colors: &[Rgb<u8>]) -> Self {
        assert!(!colors.is_empty(), "scripted color list must not be empty");
        Self {
            colors: colors.to_vec(),
            draws: 0,
        }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl ColorSource for ScriptedColors {
    fn next_color(&mut self) -> Rgb<u8> {
        let index = self.draws.min(self.colors.len() - 1);
        self.draws += 1;
        self.colors[index]
    }
}
