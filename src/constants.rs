//! Constants for units, document defaults and layout factors

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Millimetres per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Points per millimetre, the fixed scale factor between document and native units
pub const SCALE_FACTOR: f32 = POINTS_PER_INCH / MM_PER_INCH;

/// Default page margin in millimetres
pub const DEFAULT_MARGIN: f32 = 10.0;

/// Default title font size in points
pub const DEFAULT_TITLE_FONT_SIZE: f32 = 28.0;

/// Default heading font size in points
pub const DEFAULT_HEADING_FONT_SIZE: f32 = 16.0;

/// Default font size in points for body text, paragraphs and table cells
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Line height multiplier applied to the body font size by `new_line()`
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.5;

/// Default character width ratio for text estimation
/// (average character width as a fraction of font size)
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Fraction of the box width a line must fill before a word that does not fit
/// may be moved to the next line instead of being split
pub const PARAGRAPH_LINE_BREAK_FACTOR: f32 = 0.5;

/// Extra space between paragraph lines in millimetres
pub const PARAGRAPH_LINE_EXTRA_SPACE: f32 = 0.15;

/// Content height of a table data row in points
pub const TABLE_ROW_CONTENT_HEIGHT: f32 = 10.0;

/// Default table border width in points
pub const DEFAULT_BORDER_WIDTH: f32 = 0.8;

/// Default table cell padding in millimetres
pub const DEFAULT_CELL_PADDING: f32 = 1.0;

/// Default stand-alone line width in points
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

/// Resolution assumed for source images that carry no density information
pub const DEFAULT_IMAGE_DPI: f32 = 96.0;

/// Default JPEG quality used when re-encoding images
pub const DEFAULT_IMAGE_QUALITY: u8 = 100;

/// PDF version written by the document writer
pub const PDF_VERSION: &str = "1.5";
