//! Internal utility functions for backdrop-kit.
//!
//! This module contains common functionality used across different image operations.

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
/// * `on_empty` - Builds the caller's error from the offending dimensions
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise the error built by `on_empty`
pub fn validate_non_empty_image<E>(
    width: u32,
    height: u32,
    on_empty: impl FnOnce(u32, u32) -> E,
) -> Result<(), E> {
    if width == 0 || height == 0 {
        Err(on_empty(width, height))
    } else {
        Ok(())
    }
}

/// Squared Euclidean distance between two RGB triples.
///
/// Channels are widened to `i32` before subtracting so dark-minus-bright
/// differences cannot wrap.
#[inline]
pub fn rgb_distance_squared(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = i32::from(a[0]) - i32::from(b[0]);
    let dg = i32::from(a[1]) - i32::from(b[1]);
    let db = i32::from(a[2]) - i32::from(b[2]);
    (dr * dr + dg * dg + db * db) as u32
}
