use image::Pixel;
use imageproc::definitions::Image;

use crate::error::PlacementError;

/// Calculate the top-left corner that centers `size` inside `bounds`.
///
/// Odd leftovers go to the right and bottom: the offset is
/// `((bounds.0 - size.0) / 2, (bounds.1 - size.1) / 2)` with integer division.
///
/// # Arguments
///
/// * `size` - Foreground size (width, height)
/// * `bounds` - Canvas size (width, height)
///
/// # Errors
///
/// * Returns error when the foreground is larger than the canvas on either axis
pub fn centered_offset(size: (u32, u32), bounds: (u32, u32)) -> Result<(u32, u32), PlacementError> {
    let (width, height) = size;
    let (canvas_width, canvas_height) = bounds;

    if canvas_width < width {
        return Err(PlacementError::ForegroundTooWide {
            width,
            canvas_width,
        });
    }

    if canvas_height < height {
        return Err(PlacementError::ForegroundTooTall {
            height,
            canvas_height,
        });
    }

    Ok(((canvas_width - width) / 2, (canvas_height - height) / 2))
}

/// Paste `foreground` onto the center of `canvas`, replacing the pixels underneath.
///
/// There is no blending: every covered canvas pixel takes the foreground value,
/// alpha channel included.
///
/// # Returns
///
/// The (x, y) offset where the foreground was placed
///
/// # Examples
/// ```
/// use image::{Rgb, RgbImage};
/// use backdrop_kit::paste_centered;
///
/// let mut canvas = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
/// let foreground = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
/// let offset = paste_centered(&mut canvas, &foreground).unwrap();
/// assert_eq!(offset, (5, 5));
/// ```
pub fn paste_centered<P>(
    canvas: &mut Image<P>,
    foreground: &Image<P>,
) -> Result<(u32, u32), PlacementError>
where
    P: Pixel,
{
    let (x, y) = centered_offset(foreground.dimensions(), canvas.dimensions())?;
    copy_rows_impl(foreground, canvas, x, y);
    Ok((x, y))
}

/// Copies `src` row by row into `dst` at the given offset.
///
/// Offsets must already be validated so that `src` fits inside `dst`.
fn copy_rows_impl<P>(src: &Image<P>, dst: &mut Image<P>, offset_x: u32, offset_y: u32)
where
    P: Pixel,
{
    let channels = usize::from(P::CHANNEL_COUNT);
    let src_stride = src.width() as usize * channels;
    let dst_stride = dst.width() as usize * channels;
    let row_start = offset_x as usize * channels;

    if src_stride == 0 {
        return;
    }

    let dst_rows = dst
        .chunks_exact_mut(dst_stride)
        .skip(offset_y as usize)
        .take(src.height() as usize);

    for (src_row, dst_row) in src.chunks_exact(src_stride).zip(dst_rows) {
        dst_row[row_start..row_start + src_stride].copy_from_slice(src_row);
    }
}

/// Trait that provides centered overlay onto a canvas.
pub trait OverlayCenteredExt<P: Pixel> {
    /// Paste `foreground` centered onto this canvas.
    ///
    /// This consumes the canvas.
    ///
    /// # Returns
    ///
    /// Tuple of (composited canvas, position (x, y) where the foreground was placed)
    fn overlay_centered(self, foreground: &Self) -> Result<(Self, (u32, u32)), PlacementError>
    where
        Self: Sized;

    /// Paste `foreground` centered onto this canvas in place.
    fn overlay_centered_mut(&mut self, foreground: &Self) -> Result<(u32, u32), PlacementError>;
}

impl<P: Pixel> OverlayCenteredExt<P> for Image<P> {
    fn overlay_centered(mut self, foreground: &Self) -> Result<(Self, (u32, u32)), PlacementError> {
        let offset = self.overlay_centered_mut(foreground)?;
        Ok((self, offset))
    }

    fn overlay_centered_mut(&mut self, foreground: &Self) -> Result<(u32, u32), PlacementError> {
        paste_centered(self, foreground)
    }
}
