//! Colors, alignment vocabularies and font options

use crate::constants::DEFAULT_FONT_SIZE;
use std::borrow::Cow;
use std::fmt;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    /// Web green (0, 128, 0)
    pub fn green() -> Self {
        Self::from_rgb8(0, 128, 0)
    }

    pub fn blue() -> Self {
        Self::rgb(0.0, 0.0, 1.0)
    }

    /// Gray color
    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }

    /// Light gray (211, 211, 211)
    pub fn light_gray() -> Self {
        Self::from_rgb8(211, 211, 211)
    }

    /// Dark gray (169, 169, 169)
    pub fn dark_gray() -> Self {
        Self::from_rgb8(169, 169, 169)
    }

    /// Light green (144, 238, 144)
    pub fn light_green() -> Self {
        Self::from_rgb8(144, 238, 144)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Horizontal text alignment requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Placement of single-line content inside a table cell.
///
/// Content always sits on the cell's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentAlignment {
    #[default]
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl From<TextAlignment> for ContentAlignment {
    fn from(alignment: TextAlignment) -> Self {
        match alignment {
            TextAlignment::Center => Self::BottomCenter,
            TextAlignment::Right => Self::BottomRight,
            TextAlignment::Left | TextAlignment::Justify => Self::BottomLeft,
        }
    }
}

/// Line justification inside a wrapped text box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxJustify {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch every line except the last of each paragraph to the box width
    FitToWidth,
}

impl From<TextAlignment> for BoxJustify {
    fn from(alignment: TextAlignment) -> Self {
        match alignment {
            TextAlignment::Left => Self::Left,
            TextAlignment::Center => Self::Center,
            TextAlignment::Right => Self::Right,
            TextAlignment::Justify => Self::FitToWidth,
        }
    }
}

/// Font family name.
///
/// The associated constants are the families the writer knows without any
/// font data; any other name must be backed by a registered
/// [`FontSource`](crate::options::FontSource).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontFamily(Cow<'static, str>);

impl FontFamily {
    pub const TIMES_NEW_ROMAN: FontFamily = FontFamily(Cow::Borrowed("Times New Roman"));
    pub const ARIAL: FontFamily = FontFamily(Cow::Borrowed("Arial"));
    pub const HELVETICA: FontFamily = FontFamily(Cow::Borrowed("Helvetica"));
    pub const COURIER_NEW: FontFamily = FontFamily(Cow::Borrowed("Courier New"));

    /// Any family name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Family name with spaces stripped and uppercased, used for font keys
    pub fn normalized(&self) -> String {
        self.0.replace(' ', "").to_uppercase()
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::TIMES_NEW_ROMAN
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FontFamily {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Style bits passed to the writer when registering a font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontVariant {
    pub bold: bool,
    pub italic: bool,
}

impl FontVariant {
    pub fn new(style: FontStyle, weight: FontWeight) -> Self {
        Self {
            bold: weight == FontWeight::Bold,
            italic: style == FontStyle::Italic,
        }
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.bold, self.italic) {
            (false, false) => "regular",
            (true, false) => "bold",
            (false, true) => "italic",
            (true, true) => "bold italic",
        };
        f.write_str(name)
    }
}

/// Fully specified font: family, style, weight, size in points and color
#[derive(Debug, Clone, PartialEq)]
pub struct FontOptions {
    pub family: FontFamily,
    pub style: FontStyle,
    pub weight: FontWeight,
    pub size: f32,
    pub color: Color,
}

impl FontOptions {
    /// 12pt normal black Times New Roman
    pub fn new() -> Self {
        Self {
            family: FontFamily::TIMES_NEW_ROMAN,
            style: FontStyle::Normal,
            weight: FontWeight::Normal,
            size: DEFAULT_FONT_SIZE,
            color: Color::black(),
        }
    }

    pub fn with_family<F: Into<FontFamily>>(mut self, family: F) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn variant(&self) -> FontVariant {
        FontVariant::new(self.style, self.weight)
    }
}

impl Default for FontOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call font override for single-line text.
///
/// Unset fields inherit from the document font of the element being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub font_family: Option<FontFamily>,
    pub font_style: Option<FontStyle>,
    pub font_weight: Option<FontWeight>,
    pub font_size: Option<f32>,
    pub font_color: Option<Color>,
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override every font field
    pub fn from_font(font: &FontOptions) -> Self {
        Self {
            font_family: Some(font.family.clone()),
            font_style: Some(font.style),
            font_weight: Some(font.weight),
            font_size: Some(font.size),
            font_color: Some(font.color),
        }
    }

    pub fn with_font_family<F: Into<FontFamily>>(mut self, family: F) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_font_style(mut self, style: FontStyle) -> Self {
        self.font_style = Some(style);
        self
    }

    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    /// Make text bold
    pub fn bold(self) -> Self {
        self.with_font_weight(FontWeight::Bold)
    }

    /// Make text italic
    pub fn italic(self) -> Self {
        self.with_font_style(FontStyle::Italic)
    }

    /// Apply the overrides on top of `base`
    pub fn resolve(&self, base: &FontOptions) -> FontOptions {
        FontOptions {
            family: self
                .font_family
                .clone()
                .unwrap_or_else(|| base.family.clone()),
            style: self.font_style.unwrap_or(base.style),
            weight: self.font_weight.unwrap_or(base.weight),
            size: self.font_size.unwrap_or(base.size),
            color: self.font_color.unwrap_or(base.color),
        }
    }

    /// Field-wise merge: fields set on `self` win over `fallback`
    pub fn or(&self, fallback: &TextOptions) -> TextOptions {
        TextOptions {
            font_family: self
                .font_family
                .clone()
                .or_else(|| fallback.font_family.clone()),
            font_style: self.font_style.or(fallback.font_style),
            font_weight: self.font_weight.or(fallback.font_weight),
            font_size: self.font_size.or(fallback.font_size),
            font_color: self.font_color.or(fallback.font_color),
        }
    }
}

/// Per-call override for wrapped paragraphs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphOptions {
    pub font: TextOptions,
    pub alignment: TextAlignment,
}

impl ParagraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_font(mut self, font: TextOptions) -> Self {
        self.font = font;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_options_default() {
        let font = FontOptions::default();
        assert_eq!(font.family, FontFamily::TIMES_NEW_ROMAN);
        assert_eq!(font.style, FontStyle::Normal);
        assert_eq!(font.weight, FontWeight::Normal);
        assert_eq!(font.size, 12.0);
        assert_eq!(font.color, Color::black());
    }

    #[test]
    fn test_family_normalization() {
        assert_eq!(FontFamily::TIMES_NEW_ROMAN.normalized(), "TIMESNEWROMAN");
        assert_eq!(FontFamily::new("Open Sans").normalized(), "OPENSANS");
    }

    #[test]
    fn test_alignment_mappings() {
        assert_eq!(BoxJustify::from(TextAlignment::Justify), BoxJustify::FitToWidth);
        assert_eq!(BoxJustify::from(TextAlignment::Center), BoxJustify::Center);
        assert_eq!(
            ContentAlignment::from(TextAlignment::Right),
            ContentAlignment::BottomRight
        );
        assert_eq!(
            ContentAlignment::from(TextAlignment::Justify),
            ContentAlignment::BottomLeft
        );
    }

    #[test]
    fn test_text_options_resolve() {
        let base = FontOptions::new().with_size(16.0).with_color(Color::blue());
        let resolved = TextOptions::new()
            .bold()
            .with_font_family(FontFamily::ARIAL)
            .resolve(&base);

        assert_eq!(resolved.family, FontFamily::ARIAL);
        assert_eq!(resolved.weight, FontWeight::Bold);
        assert_eq!(resolved.style, FontStyle::Normal);
        assert_eq!(resolved.size, 16.0);
        assert_eq!(resolved.color, Color::blue());
    }

    #[test]
    fn test_text_options_merge() {
        let cell = TextOptions::new().with_font_size(9.0);
        let row = TextOptions::new()
            .with_font_size(14.0)
            .with_font_color(Color::red());
        let merged = cell.or(&row);
        assert_eq!(merged.font_size, Some(9.0));
        assert_eq!(merged.font_color, Some(Color::red()));
        assert_eq!(merged.font_weight, None);
    }

    #[test]
    fn test_variant_display() {
        let variant = FontVariant::new(FontStyle::Italic, FontWeight::Bold);
        assert_eq!(variant.to_string(), "bold italic");
    }
}
