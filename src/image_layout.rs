//! Image loading, resampling and placement
//!
//! Images are flattened onto white, resampled to the pixel grid their rendered
//! width calls for, and re-encoded as JPEG for embedding.

use crate::constants::DEFAULT_IMAGE_DPI;
use crate::error::{BuilderError, Result};
use crate::options::ImageOptions;
use crate::units::UnitConverter;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, trace};

/// JPEG data ready to embed
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub data: Vec<u8>,
}

/// Where an image lands on the page, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImagePlacement {
    /// Hang an image of the given size from its top-left corner at (x, top)
    pub fn from_top_left(x: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y: top - height,
            width,
            height,
        }
    }
}

/// Rendered height that keeps the pixel aspect ratio at `width_mm`
pub fn rendered_height(width_mm: f32, width_px: u32, height_px: u32) -> f32 {
    width_mm * height_px as f32 / width_px.max(1) as f32
}

/// Resolution the image is resampled at: the source resolution, capped by
/// `requested` when it is positive
pub fn effective_dpi(source_dpi: f32, requested: f32) -> f32 {
    if requested > 0.0 {
        requested.min(source_dpi)
    } else {
        source_dpi
    }
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| BuilderError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Composite any transparency onto a white background
pub fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let blend = |channel: u8| (channel as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Resample `image` for a rendered width of `width_mm` and encode it as JPEG
pub fn prepare_image(
    image: &DynamicImage,
    width_mm: f32,
    options: &ImageOptions,
    units: &UnitConverter,
) -> Result<EncodedImage> {
    if !(width_mm.is_finite() && width_mm > 0.0) {
        return Err(BuilderError::DimensionError(format!(
            "image width must be positive, got {width_mm}"
        )));
    }

    let (source_width, source_height) = image.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(BuilderError::DimensionError(
            "image has no pixels".to_string(),
        ));
    }

    let dpi = effective_dpi(DEFAULT_IMAGE_DPI, options.resolution);
    let (width_px, height_px) =
        units.image_pixel_size(width_mm, dpi, source_width, source_height);
    trace!(
        "Resampling {}x{} image to {}x{} at {} dpi",
        source_width, source_height, width_px, height_px, dpi
    );

    let flattened = DynamicImage::ImageRgb8(flatten_on_white(image));
    let resampled = flattened
        .resize_exact(width_px, height_px, FilterType::CatmullRom)
        .to_rgb8();

    let mut data = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut data, options.quality);
        encoder
            .encode_image(&resampled)
            .map_err(|e| BuilderError::ImageEncode(e.to_string()))?;
    }

    debug!(
        "Encoded {}x{} image at quality {} ({} bytes)",
        width_px,
        height_px,
        options.quality,
        data.len()
    );
    Ok(EncodedImage {
        width_px,
        height_px,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }))
    }

    #[test]
    fn test_rendered_height_keeps_aspect() {
        assert_eq!(rendered_height(100.0, 400, 200), 50.0);
        assert_eq!(rendered_height(30.0, 100, 300), 90.0);
    }

    #[test]
    fn test_placement_hangs_from_top() {
        let placement = ImagePlacement::from_top_left(10.0, 287.0, 50.0, 25.0);
        assert_eq!(placement.y, 262.0);
        assert_eq!(placement.x, 10.0);
    }

    #[test]
    fn test_effective_dpi() {
        assert_eq!(effective_dpi(96.0, 0.0), 96.0);
        assert_eq!(effective_dpi(96.0, 72.0), 72.0);
        assert_eq!(effective_dpi(96.0, 300.0), 96.0);
    }

    #[test]
    fn test_flatten_transparent_to_white() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let flat = flatten_on_white(&image);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));

        let opaque = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255])));
        assert_eq!(flatten_on_white(&opaque).get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_prepare_resamples_to_width() {
        let units = UnitConverter::new();
        let image = checkerboard(400, 200);
        // two inches at 96 dpi
        let encoded = prepare_image(&image, 50.8, &ImageOptions::default(), &units).unwrap();
        assert_eq!((encoded.width_px, encoded.height_px), (192, 96));
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);

        let lower = ImageOptions::new().with_resolution(48.0);
        let encoded = prepare_image(&image, 50.8, &lower, &units).unwrap();
        assert_eq!((encoded.width_px, encoded.height_px), (96, 48));
    }

    #[test]
    fn test_prepare_rejects_bad_width() {
        let units = UnitConverter::new();
        let err = prepare_image(&checkerboard(4, 4), 0.0, &ImageOptions::default(), &units)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, BuilderError::ImageLoad { .. }));
        assert!(err.is_resource_error());
    }

    #[test]
    fn test_load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        checkerboard(8, 4).save(&path).unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.dimensions(), (8, 4));
    }
}
