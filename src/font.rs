//! Font metrics for accurate text measurement and encoding

use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;
use crate::standard_fonts::{StandardFace, win_ansi_code};

/// Trait for measuring text dimensions and encoding text for PDF rendering.
///
/// All lengths are in points at the given font size.
pub trait FontMetrics: Send + Sync {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Height above the baseline
    fn ascent(&self, font_size: f32) -> f32;

    /// Depth below the baseline, as a positive number
    fn descent(&self, font_size: f32) -> f32;

    /// Distance between consecutive baselines
    fn line_spacing(&self, font_size: f32) -> f32 {
        self.ascent(font_size) + self.descent(font_size)
    }

    /// Encode text for the PDF Tj operator
    fn encode_text(&self, text: &str) -> Vec<u8>;

    /// True when `encode_text` produces 2-byte glyph IDs (Type0 fonts)
    fn is_composite(&self) -> bool {
        false
    }
}

/// Metrics of a built-in Type1 face, encoded as WinAnsi
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    face: StandardFace,
}

impl StandardFontMetrics {
    pub fn new(face: StandardFace) -> Self {
        Self { face }
    }

    pub fn base_font(&self) -> &'static str {
        self.face.base_font
    }
}

impl FontMetrics for StandardFontMetrics {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        // measured as drawn: unmapped characters are written as '?'
        let code = win_ansi_code(ch).unwrap_or(b'?');
        self.face
            .width(code)
            .map(|width| width as f32 / 1000.0 * font_size)
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }

    fn ascent(&self, font_size: f32) -> f32 {
        self.face.ascent as f32 / 1000.0 * font_size
    }

    fn descent(&self, font_size: f32) -> f32 {
        self.face.descent as f32 / 1000.0 * font_size
    }

    fn encode_text(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| win_ansi_code(ch).unwrap_or(b'?'))
            .collect()
    }
}

/// Metrics of a caller-supplied TrueType face, encoded as 2-byte glyph IDs.
///
/// The face is re-parsed from the shared bytes on each query; the writer
/// embeds the same bytes as the font program.
#[cfg(feature = "ttf-parser")]
pub struct TtfFontMetrics {
    font_data: std::sync::Arc<Vec<u8>>,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
}

#[cfg(feature = "ttf-parser")]
impl TtfFontMetrics {
    /// Parse the first face in `font_data`, failing with `FontParse` when it is not a font
    pub fn new(font_data: std::sync::Arc<Vec<u8>>) -> crate::Result<Self> {
        let (units_per_em, ascender, descender) = {
            let face = ttf_parser::Face::parse(&font_data, 0)
                .map_err(|e| crate::error::BuilderError::FontParse(e.to_string()))?;
            (
                f32::from(face.units_per_em()),
                f32::from(face.ascender()),
                f32::from(face.descender()),
            )
        };
        Ok(Self {
            font_data,
            units_per_em,
            ascender,
            descender,
        })
    }

    pub fn font_data(&self) -> &[u8] {
        &self.font_data
    }

    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    pub(crate) fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.font_data, 0).ok()
    }

    /// Font units to points at `font_size`
    fn scale(&self, units: f32, font_size: f32) -> f32 {
        units / self.units_per_em * font_size
    }

    fn advance(&self, face: Option<&ttf_parser::Face<'_>>, ch: char, font_size: f32) -> f32 {
        face.and_then(|face| face.glyph_hor_advance(face.glyph_index(ch)?))
            .map(|advance| self.scale(f32::from(advance), font_size))
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }

    /// Advance widths of every glyph in 1/1000 em, indexed by glyph ID
    pub fn glyph_widths(&self) -> Vec<i64> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        (0..face.number_of_glyphs())
            .map(|gid| {
                let advance = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0);
                self.scale(f32::from(advance), 1000.0).round() as i64
            })
            .collect()
    }
}

#[cfg(feature = "ttf-parser")]
impl FontMetrics for TtfFontMetrics {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        self.advance(self.face().as_ref(), ch, font_size)
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let face = self.face();
        text.chars()
            .map(|ch| self.advance(face.as_ref(), ch, font_size))
            .sum()
    }

    fn ascent(&self, font_size: f32) -> f32 {
        self.scale(self.ascender, font_size)
    }

    fn descent(&self, font_size: f32) -> f32 {
        self.scale(self.descender.abs(), font_size)
    }

    /// Big-endian glyph IDs; unmapped characters become glyph 0 (.notdef)
    fn encode_text(&self, text: &str) -> Vec<u8> {
        let face = self.face();
        text.chars()
            .flat_map(|ch| {
                face.as_ref()
                    .and_then(|face| face.glyph_index(ch))
                    .map_or(0, |gid| gid.0)
                    .to_be_bytes()
            })
            .collect()
    }

    fn is_composite(&self) -> bool {
        true
    }
}

#[cfg(feature = "ttf-parser")]
impl std::fmt::Debug for TtfFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFontMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.font_data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_fonts::StandardFamily;

    fn times() -> StandardFontMetrics {
        StandardFontMetrics::new(StandardFamily::Times.face(false, false))
    }

    #[test]
    fn test_standard_text_width() {
        let metrics = times();
        // H = 722, i = 278
        let width = metrics.text_width("Hi", 12.0);
        assert!((width - 12.0).abs() < 1e-4, "got {width}");
        assert_eq!(metrics.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_standard_upper_half_widths() {
        let metrics = times();
        // emdash = 1000, eacute = 444
        let width = metrics.text_width("\u{2014}\u{e9}", 12.0);
        assert!((width - 17.328).abs() < 1e-4, "got {width}");
        // quotedblleft = 444, Euro = 500
        let width = metrics.text_width("\u{201c}\u{20ac}", 10.0);
        assert!((width - 9.44).abs() < 1e-4, "got {width}");
    }

    #[test]
    fn test_standard_unmapped_char_measures_as_question_mark() {
        let metrics = times();
        let question = metrics.char_width('?', 10.0);
        assert!((question - 4.44).abs() < 1e-4, "got {question}");
        assert_eq!(metrics.char_width('你', 10.0), question);
        assert_eq!(metrics.text_width("你好", 10.0), 2.0 * question);
    }

    #[test]
    fn test_standard_encoding() {
        let metrics = times();
        assert_eq!(metrics.encode_text("Aé"), vec![0x41, 0xE9]);
        assert_eq!(metrics.encode_text("你"), vec![b'?']);
        assert!(!metrics.is_composite());
    }

    #[test]
    fn test_standard_vertical_metrics() {
        let metrics = times();
        assert!((metrics.ascent(10.0) - 8.91).abs() < 1e-4);
        assert!((metrics.descent(10.0) - 2.16).abs() < 1e-4);
        assert!((metrics.line_spacing(10.0) - 11.07).abs() < 1e-4);
    }
}
