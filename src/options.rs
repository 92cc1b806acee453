//! Document, image and line options

use crate::constants::*;
use crate::style::{Color, FontFamily, FontOptions, FontStyle, FontVariant, FontWeight};
use std::sync::Arc;

/// Named page sizes (portrait dimensions in millimetres)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    #[default]
    A4,
    A5,
    A6,
    A7,
    A8,
    Letter,
    Legal,
}

impl PageSize {
    pub const ALL: [PageSize; 11] = [
        PageSize::A0,
        PageSize::A1,
        PageSize::A2,
        PageSize::A3,
        PageSize::A4,
        PageSize::A5,
        PageSize::A6,
        PageSize::A7,
        PageSize::A8,
        PageSize::Letter,
        PageSize::Legal,
    ];

    /// Portrait (width, height) in millimetres.
    ///
    /// A sizes are the ISO 216 millimetre values (A0 is 841 x 1189, A1 is
    /// 594 x 841); Letter and Legal are the US inch sizes converted exactly.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A0 => (841.0, 1189.0),
            PageSize::A1 => (594.0, 841.0),
            PageSize::A2 => (420.0, 594.0),
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::A6 => (105.0, 148.0),
            PageSize::A7 => (74.0, 105.0),
            PageSize::A8 => (52.0, 74.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    /// Same margin on every side
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

/// TrueType font data registered under a family name and variant
#[derive(Clone)]
pub struct FontSource {
    pub family: FontFamily,
    pub variant: FontVariant,
    pub data: Arc<Vec<u8>>,
}

impl FontSource {
    pub fn new<F: Into<FontFamily>>(
        family: F,
        style: FontStyle,
        weight: FontWeight,
        data: Vec<u8>,
    ) -> Self {
        Self {
            family: family.into(),
            variant: FontVariant::new(style, weight),
            data: Arc::new(data),
        }
    }
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSource")
            .field("family", &self.family)
            .field("variant", &self.variant)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct FontSlot {
    options: FontOptions,
    /// Set once the caller replaced this font; the default family no longer propagates
    overridden: bool,
}

impl FontSlot {
    fn new(family: &FontFamily, size: f32) -> Self {
        Self {
            options: FontOptions::new().with_family(family.clone()).with_size(size),
            overridden: false,
        }
    }

    fn set(&mut self, options: FontOptions) {
        self.options = options;
        self.overridden = true;
    }

    fn propagate_family(&mut self, family: &FontFamily) {
        if !self.overridden {
            self.options.family = family.clone();
        }
    }
}

/// Options for a whole document, fixed once the document is opened
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub page_size: PageSize,
    pub orientation: PageOrientation,
    pub margins: Margins,
    title_font: FontSlot,
    heading_font: FontSlot,
    text_font: FontSlot,
    paragraph_font: FontSlot,
    font_sources: Vec<FontSource>,
}

impl DocumentOptions {
    pub fn new() -> Self {
        let family = FontFamily::TIMES_NEW_ROMAN;
        Self {
            page_size: PageSize::A4,
            orientation: PageOrientation::Portrait,
            margins: Margins::default(),
            title_font: FontSlot::new(&family, DEFAULT_TITLE_FONT_SIZE),
            heading_font: FontSlot::new(&family, DEFAULT_HEADING_FONT_SIZE),
            text_font: FontSlot::new(&family, DEFAULT_FONT_SIZE),
            paragraph_font: FontSlot::new(&family, DEFAULT_FONT_SIZE),
            font_sources: Vec::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_orientation(mut self, orientation: PageOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the default family; every font set not replaced explicitly follows it
    pub fn with_default_font_family<F: Into<FontFamily>>(mut self, family: F) -> Self {
        self.set_default_font_family(family);
        self
    }

    pub fn set_default_font_family<F: Into<FontFamily>>(&mut self, family: F) {
        let family = family.into();
        for slot in [
            &mut self.title_font,
            &mut self.heading_font,
            &mut self.text_font,
            &mut self.paragraph_font,
        ] {
            slot.propagate_family(&family);
        }
    }

    pub fn with_title_font(mut self, font: FontOptions) -> Self {
        self.title_font.set(font);
        self
    }

    pub fn with_heading_font(mut self, font: FontOptions) -> Self {
        self.heading_font.set(font);
        self
    }

    pub fn with_text_font(mut self, font: FontOptions) -> Self {
        self.text_font.set(font);
        self
    }

    pub fn with_paragraph_font(mut self, font: FontOptions) -> Self {
        self.paragraph_font.set(font);
        self
    }

    /// Make a TrueType font available under its family name
    pub fn with_font_source(mut self, source: FontSource) -> Self {
        self.font_sources.push(source);
        self
    }

    pub fn title_font(&self) -> &FontOptions {
        &self.title_font.options
    }

    pub fn heading_font(&self) -> &FontOptions {
        &self.heading_font.options
    }

    /// Body text font, also the basis of the default line height
    pub fn text_font(&self) -> &FontOptions {
        &self.text_font.options
    }

    pub fn paragraph_font(&self) -> &FontOptions {
        &self.paragraph_font.options
    }

    pub fn font_sources(&self) -> &[FontSource] {
        &self.font_sources
    }

    /// Page (width, height) in millimetres after applying the orientation
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (width, height) = self.page_size.dimensions();
        match self.orientation {
            PageOrientation::Portrait => (width, height),
            PageOrientation::Landscape => (height, width),
        }
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for `add_image`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    /// Maximum embedded resolution in dots per inch, 0 for the source resolution
    pub resolution: f32,
    /// JPEG quality, 1-100
    pub quality: u8,
    /// Top-left corner in millimetres; the cursor when unset
    pub position: Option<(f32, f32)>,
}

impl ImageOptions {
    pub fn new() -> Self {
        Self {
            resolution: 0.0,
            quality: DEFAULT_IMAGE_QUALITY,
            position: None,
        }
    }

    pub fn with_resolution(mut self, dpi: f32) -> Self {
        self.resolution = dpi;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for `add_line`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOptions {
    /// Stroke width in points
    pub width: f32,
    pub color: Color,
}

impl LineOptions {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            color: Color::black(),
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for LineOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.page_size, PageSize::A4);
        assert_eq!(options.orientation, PageOrientation::Portrait);
        assert_eq!(options.margins, Margins::uniform(10.0));
        assert_eq!(options.title_font().size, 28.0);
        assert_eq!(options.heading_font().size, 16.0);
        assert_eq!(options.text_font().size, 12.0);
        assert_eq!(options.paragraph_font().size, 12.0);
        assert_eq!(options.text_font().family, FontFamily::TIMES_NEW_ROMAN);
        assert_eq!(options.text_font().color, Color::black());
    }

    #[test]
    fn test_page_dimensions_and_orientation() {
        for size in PageSize::ALL {
            let (w, h) = size.dimensions();
            let portrait = DocumentOptions::new().with_page_size(size);
            assert_eq!(portrait.page_dimensions(), (w, h));

            let landscape = portrait.with_orientation(PageOrientation::Landscape);
            assert_eq!(landscape.page_dimensions(), (h, w));
        }

        let a4 = DocumentOptions::new().with_orientation(PageOrientation::Landscape);
        assert_eq!(a4.page_dimensions(), (297.0, 210.0));
    }

    #[test]
    fn test_iso_and_us_page_sizes() {
        assert_eq!(PageSize::A0.dimensions(), (841.0, 1189.0));
        assert_eq!(PageSize::A1.dimensions(), (594.0, 841.0));
        assert_eq!(PageSize::A8.dimensions(), (52.0, 74.0));
        assert_eq!(PageSize::Letter.dimensions(), (215.9, 279.4));
        assert_eq!(PageSize::Legal.dimensions(), (215.9, 355.6));
    }

    #[test]
    fn test_default_family_propagates_to_untouched_fonts() {
        let options = DocumentOptions::new()
            .with_heading_font(FontOptions::new().with_family("Courier New").with_size(18.0))
            .with_default_font_family(FontFamily::ARIAL);

        assert_eq!(options.title_font().family, FontFamily::ARIAL);
        assert_eq!(options.text_font().family, FontFamily::ARIAL);
        assert_eq!(options.paragraph_font().family, FontFamily::ARIAL);
        // explicitly replaced after construction
        assert_eq!(options.heading_font().family, FontFamily::COURIER_NEW);
        assert_eq!(options.heading_font().size, 18.0);
        // sizes survive propagation
        assert_eq!(options.title_font().size, 28.0);
    }

    #[test]
    fn test_image_options_defaults() {
        let options = ImageOptions::default();
        assert_eq!(options.resolution, 0.0);
        assert_eq!(options.quality, 100);
        assert!(options.position.is_none());
        assert_eq!(ImageOptions::new().with_quality(0).quality, 1);
    }

    #[test]
    fn test_line_options_defaults() {
        let options = LineOptions::default();
        assert_eq!(options.width, 1.0);
        assert_eq!(options.color, Color::black());
    }
}
