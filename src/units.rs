//! Conversion between document millimetres and native PDF points

use crate::constants::{MM_PER_INCH, SCALE_FACTOR};

/// Converts document units (millimetres) to the writer's native unit (points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    scale_factor: f32,
}

impl UnitConverter {
    /// Converter for millimetre documents (72 points per inch)
    pub fn new() -> Self {
        Self {
            scale_factor: SCALE_FACTOR,
        }
    }

    /// Millimetres to points
    pub fn to_native(&self, mm: f32) -> f32 {
        mm * self.scale_factor
    }

    /// Points to millimetres
    pub fn to_mm(&self, points: f32) -> f32 {
        points / self.scale_factor
    }

    /// Pixel grid for an image rendered `width_mm` wide at `dpi`, keeping the
    /// source aspect ratio.
    ///
    /// Both dimensions are at least one pixel.
    pub fn image_pixel_size(
        &self,
        width_mm: f32,
        dpi: f32,
        source_width_px: u32,
        source_height_px: u32,
    ) -> (u32, u32) {
        let aspect = source_height_px as f32 / source_width_px.max(1) as f32;
        let width_px = ((width_mm / MM_PER_INCH) * dpi).round().max(1.0);
        let height_px = (width_px * aspect).round().max(1.0);
        (width_px as u32, height_px as u32)
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_points() {
        let units = UnitConverter::new();
        assert!((units.to_native(25.4) - 72.0).abs() < 1e-4);
        assert!((units.to_native(210.0) - 595.2756).abs() < 1e-3);
        assert!((units.to_mm(72.0) - 25.4).abs() < 1e-4);
    }

    #[test]
    fn test_image_pixel_size() {
        let units = UnitConverter::new();
        // 50.8mm at 96dpi is exactly two inches
        assert_eq!(units.image_pixel_size(50.8, 96.0, 400, 200), (192, 96));
        // portrait source
        assert_eq!(units.image_pixel_size(25.4, 100.0, 300, 600), (100, 200));
    }

    #[test]
    fn test_image_pixel_size_never_zero() {
        let units = UnitConverter::new();
        assert_eq!(units.image_pixel_size(0.01, 96.0, 1000, 1), (1, 1));
    }
}
