//! Gaussian blur approximated by repeated box blurs.
//!
//! Three successive box filters with carefully chosen odd widths give a
//! response very close to a true Gaussian of the requested standard deviation
//! (Kovesi, "Fast Almost-Gaussian Filtering", DICTA 2010). Cost is independent
//! of sigma, which matters for the wide blurs used on wallpaper backgrounds.

use image::{ImageBuffer, Rgb};
use imageproc::definitions::Image;
use libblur::{
    BlurImage, BlurImageMut, BoxBlurParameters, FastBlurChannels, ThreadingPolicy, box_blur_f32,
};

use crate::error::ResampleError;
use crate::utils::validate_non_empty_image;

/// Number of box passes used to approximate the Gaussian.
const BOX_PASSES: usize = 3;

/// Odd box widths whose successive application approximates a Gaussian with
/// standard deviation `sigma`.
///
/// The first `m` passes use width `wl`, the rest `wl + 2`, where `wl` is the
/// largest odd integer not above the ideal width and `m` is chosen so the
/// combined variance matches `sigma^2` as closely as possible.
///
/// Returns `None` when the widths do not fit in a `u32`.
fn box_sizes_for_gaussian(sigma: f32, passes: usize) -> Option<Vec<u32>> {
    let sigma = f64::from(sigma);
    let n = passes as f64;

    let ideal_width = (12.0 * sigma * sigma / n + 1.0).sqrt();
    if !ideal_width.is_finite() || ideal_width >= f64::from(u32::MAX) {
        return None;
    }

    let mut lower = ideal_width.floor() as u32;
    if lower % 2 == 0 {
        lower = lower.saturating_sub(1);
    }
    let lower = lower.max(1);
    let upper = lower.checked_add(2)?;

    let wl = f64::from(lower);
    let ideal_lower_passes =
        (12.0 * sigma * sigma - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0);
    let lower_passes = (ideal_lower_passes.round().max(0.0) as usize).min(passes);

    Some(
        (0..passes)
            .map(|i| if i < lower_passes { lower } else { upper })
            .collect(),
    )
}

/// Blurs an RGB image with an approximate Gaussian of standard deviation `sigma`.
///
/// # Errors
///
/// * `ResampleError::InvalidSigma` - When `sigma` is not finite and positive, or
///   so large the box widths overflow
/// * `ResampleError::EmptyImage` - When the image has zero width or height
/// * `ResampleError::BlurFailed` - When the box blur backend rejects a pass
pub fn gaussian_blur_rgb(image: &Image<Rgb<u8>>, sigma: f32) -> Result<Image<Rgb<u8>>, ResampleError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ResampleError::InvalidSigma { sigma });
    }

    let (width, height) = image.dimensions();
    validate_non_empty_image(width, height, |width, height| ResampleError::EmptyImage {
        width,
        height,
    })?;

    let kernels =
        box_sizes_for_gaussian(sigma, BOX_PASSES).ok_or(ResampleError::InvalidSigma { sigma })?;

    // Box radius stays inside the shorter side
    let max_kernel = width.min(height).saturating_mul(2) - 1;

    let mut current: Vec<f32> = image.as_raw().iter().map(|&v| f32::from(v)).collect();
    let mut scratch: Vec<f32> = vec![0.0; current.len()];

    for kernel in kernels {
        let kernel = kernel.min(max_kernel);
        // A width-1 box is the identity
        if kernel < 3 {
            continue;
        }

        {
            let source = BlurImage::borrow(&current, width, height, FastBlurChannels::Channels3);
            let mut target =
                BlurImageMut::borrow(&mut scratch, width, height, FastBlurChannels::Channels3);

            // Sequential policy: callers own any parallelism across requests
            box_blur_f32(
                &source,
                &mut target,
                BoxBlurParameters::new(kernel),
                ThreadingPolicy::Single,
            )
            .map_err(|e| ResampleError::BlurFailed(e.to_string()))?;
        }

        std::mem::swap(&mut current, &mut scratch);
    }

    let pixels = current
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();

    ImageBuffer::from_raw(width, height, pixels)
        .ok_or_else(|| ResampleError::BlurFailed("Failed to create blurred image".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_sizes_for_gaussian_with_wallpaper_radius_matches_known_widths() {
        // sigma=50: ideal width ~100.005 -> wl=99, wu=101, m=round(1.5)=2
        assert_eq!(box_sizes_for_gaussian(50.0, 3), Some(vec![99, 99, 101]));
    }

    #[test]
    fn box_sizes_for_gaussian_are_odd_and_track_sigma_variance() {
        for sigma in [0.8f32, 1.0, 2.5, 7.0, 20.0, 50.0] {
            let sizes = box_sizes_for_gaussian(sigma, 3).unwrap();
            assert_eq!(sizes.len(), 3);
            assert!(sizes.iter().all(|w| w % 2 == 1), "even width for sigma {sigma}: {sizes:?}");

            // Variance of a width-w box is (w^2 - 1) / 12
            let variance: f64 = sizes.iter().map(|&w| (f64::from(w * w) - 1.0) / 12.0).sum();
            let target = f64::from(sigma) * f64::from(sigma);
            assert!(
                (variance - target).abs() <= target * 0.35 + 0.5,
                "sigma {sigma}: variance {variance} vs {target}"
            );
        }
    }

    #[test]
    fn box_sizes_for_gaussian_with_tiny_sigma_degenerates_to_identity() {
        assert_eq!(box_sizes_for_gaussian(0.3, 3), Some(vec![1, 1, 1]));
    }

    #[test]
    fn gaussian_blur_rgb_with_uniform_image_is_unchanged() {
        let image = Image::from_pixel(40, 30, Rgb([90u8, 180, 45]));

        let blurred = gaussian_blur_rgb(&image, 4.0).unwrap();

        assert_eq!(blurred.dimensions(), (40, 30));
        assert!(blurred.pixels().all(|p| *p == Rgb([90, 180, 45])));
    }

    #[test]
    fn gaussian_blur_rgb_smooths_a_hard_edge() {
        let image = Image::from_fn(64, 16, |x, _| {
            if x < 32 { Rgb([0u8, 0, 0]) } else { Rgb([255u8, 255, 255]) }
        });

        let blurred = gaussian_blur_rgb(&image, 3.0).unwrap();

        let left = blurred.get_pixel(31, 8)[0];
        let right = blurred.get_pixel(32, 8)[0];
        assert!(left > 0 && left < 255, "left of edge: {left}");
        assert!(right > 0 && right < 255, "right of edge: {right}");
        assert!(left < right);

        // Far from the edge the original values survive
        assert_eq!(blurred.get_pixel(2, 8)[0], 0);
        assert_eq!(blurred.get_pixel(61, 8)[0], 255);
    }

    #[test]
    fn gaussian_blur_rgb_with_invalid_sigma_returns_error() {
        let image = Image::from_pixel(4, 4, Rgb([0u8, 0, 0]));

        for sigma in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                gaussian_blur_rgb(&image, sigma),
                Err(ResampleError::InvalidSigma { .. })
            ));
        }
    }

    #[test]
    fn box_sizes_for_gaussian_with_huge_sigma_returns_none() {
        assert_eq!(box_sizes_for_gaussian(f32::MAX, 3), None);
        assert_eq!(box_sizes_for_gaussian(1e30, 3), None);
    }

    #[test]
    fn gaussian_blur_rgb_with_overflowing_sigma_returns_error() {
        let image = Image::from_pixel(4, 4, Rgb([1u8, 2, 3]));

        for sigma in [f32::MAX, 1e30] {
            assert!(matches!(
                gaussian_blur_rgb(&image, sigma),
                Err(ResampleError::InvalidSigma { .. })
            ));
        }
    }

    #[test]
    fn gaussian_blur_rgb_with_sigma_wider_than_image_stays_uniform() {
        let image = Image::from_pixel(4, 4, Rgb([1u8, 2, 3]));

        let blurred = gaussian_blur_rgb(&image, 1e6).unwrap();

        assert_eq!(blurred.dimensions(), (4, 4));
        assert!(blurred.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }

    #[test]
    fn gaussian_blur_rgb_with_empty_image_returns_error() {
        let image: Image<Rgb<u8>> = Image::new(5, 0);
        assert_eq!(
            gaussian_blur_rgb(&image, 2.0),
            Err(ResampleError::EmptyImage {
                width: 5,
                height: 0
            })
        );
    }
}
