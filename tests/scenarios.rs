//! End-to-end scenarios through the public API.

use backdrop_kit::{
    BackgroundRecolorExt, CANVAS_HEIGHT, CANVAS_WIDTH, ColorSource, FixedColorSource, Image,
    ImageFileFormat, RecolorTool, RngColorSource, StandardBackend, Threshold, ToolError,
    WallpaperMethod, WallpaperTool, compose_wallpaper, encode_image, recolor_background,
    sniff_format,
};
use image::{DynamicImage, GenericImageView, Pixel, Rgb, RgbImage, Rgba, RgbaImage};

/// Width and height must be at least 2.
fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / (width - 1)) as u8,
            (y * 255 / (height - 1)) as u8,
            ((x + y) % 256) as u8,
            ((x * 7 + y * 13) % 256) as u8,
        ])
    })
}

#[test]
fn recolor_preserves_dimensions_alpha_and_unmatched_pixels_across_thresholds() {
    let original = gradient_rgba(24, 16);
    let reference = original.get_pixel(0, 0).to_rgb();

    for threshold in [5.0, 30.0, 65.0, 100.0] {
        let mut colors = RngColorSource::seeded(threshold as u64);
        let drawn = RngColorSource::seeded(threshold as u64).next_color();

        let result = recolor_background(
            &DynamicImage::ImageRgba8(original.clone()),
            threshold,
            &mut colors,
        )
        .unwrap();

        assert_eq!(result.dimensions(), original.dimensions());
        assert_eq!(result.get_pixel(0, 0).to_rgb(), drawn);

        for (x, y, after) in result.enumerate_pixels() {
            let before = original.get_pixel(x, y);
            assert_eq!(after[3], before[3], "alpha changed at ({x}, {y})");

            let [r, g, b] = before.to_rgb().0;
            let distance = ((f64::from(r) - f64::from(reference[0])).powi(2)
                + (f64::from(g) - f64::from(reference[1])).powi(2)
                + (f64::from(b) - f64::from(reference[2])).powi(2))
            .sqrt();

            if distance >= f64::from(threshold) {
                assert_eq!(after, before, "unmatched pixel changed at ({x}, {y})");
            } else {
                assert_eq!(after.to_rgb(), drawn, "matched pixel not recolored at ({x}, {y})");
            }
        }
    }
}

#[test]
fn recolor_solid_red_becomes_one_random_color() {
    let image = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));

    let result = image
        .recolor_background(30.0, &mut RngColorSource::seeded(2024))
        .unwrap();

    let first = *result.get_pixel(0, 0);
    assert_eq!(first[3], 255);
    assert!(result.pixels().all(|p| *p == first));
}

#[test]
fn recolor_tool_output_round_trips_through_download_bytes() {
    let upload = encode_image(&DynamicImage::ImageRgba8(gradient_rgba(9, 9)), "png").unwrap();

    let output = RecolorTool::new(StandardBackend)
        .run(
            &upload,
            Threshold::new(50).unwrap(),
            &mut FixedColorSource(Rgb([3, 6, 9])),
        )
        .unwrap();

    let downloaded = image::load_from_memory(&output.artifact.bytes).unwrap();
    assert_eq!(downloaded.to_rgba8(), output.result.to_rgba8());
    assert_eq!(output.original.to_rgba8(), gradient_rgba(9, 9));
}

#[test]
fn recolor_tool_rejects_thresholds_outside_the_form() {
    assert!(matches!(
        Threshold::new(1),
        Err(ToolError::ThresholdOutOfRange { .. })
    ));
    assert!(matches!(
        Threshold::new(42),
        Err(ToolError::ThresholdStep { .. })
    ));
}

#[test]
fn compose_solid_single_pixel_places_it_at_canvas_center() {
    let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([10, 20, 30])));

    let wallpaper = compose_wallpaper(&source, WallpaperMethod::SolidAverageColor).unwrap();

    assert_eq!(wallpaper.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    assert_eq!(*wallpaper.get_pixel(599, 1299), Rgb([10, 20, 30]));
    assert!(wallpaper.pixels().all(|p| *p == Rgb([10, 20, 30])));
}

#[test]
fn compose_solid_keeps_small_foreground_pixels_exact() {
    let source: Image<Rgb<u8>> = Image::from_fn(5, 3, |x, y| Rgb([x as u8 * 50, y as u8 * 100, 77]));

    let wallpaper =
        compose_wallpaper(&DynamicImage::ImageRgb8(source.clone()), WallpaperMethod::SolidAverageColor)
            .unwrap();

    // (1200-5)/2 = 597, (2600-3)/2 = 1298
    for (x, y, pixel) in source.enumerate_pixels() {
        assert_eq!(wallpaper.get_pixel(597 + x, 1298 + y), pixel);
    }
}

#[test]
fn wallpaper_tool_blurred_produces_opaque_canvas_png() {
    let source = DynamicImage::ImageRgb8(RgbImage::from_fn(30, 20, |x, _| {
        if x < 15 { Rgb([240, 240, 240]) } else { Rgb([20, 20, 20]) }
    }));
    let upload = encode_image(&source, "jpeg").unwrap();

    let output = WallpaperTool::new(StandardBackend, StandardBackend)
        .run(&upload, WallpaperMethod::BlurredBackground)
        .unwrap();

    assert_eq!(output.artifact.file_name, "wallpaper_1200x2600.png");
    assert_eq!(sniff_format(&output.artifact.bytes), Ok(ImageFileFormat::Png));

    let wallpaper = output.result.to_rgb8();
    assert_eq!(wallpaper.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));

    // The stretched background is bright on the left and dark on the right,
    // with the blur leaving a gradient across the middle.
    let left = wallpaper.get_pixel(300, 1000)[0];
    let right = wallpaper.get_pixel(900, 1000)[0];
    let middle = wallpaper.get_pixel(600, 1000)[0];
    assert!(left > 200, "left {left}");
    assert!(right < 60, "right {right}");
    assert!(middle > right && middle < left, "middle {middle}");
}
