//! Core table structures

use crate::Result;
use crate::constants::DEFAULT_BORDER_WIDTH;
use crate::error::BuilderError;
use crate::style::{Color, FontFamily, FontOptions, TextAlignment, TextOptions};
use tracing::trace;

/// Width (points) and color of one border class.
///
/// A width of zero or less suppresses the border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableBorderOptions {
    pub width: f32,
    pub color: Color,
}

impl TableBorderOptions {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }

    /// A border that is never drawn
    pub fn none() -> Self {
        Self::new(0.0, Color::black())
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

impl Default for TableBorderOptions {
    fn default() -> Self {
        Self::new(DEFAULT_BORDER_WIDTH, Color::black())
    }
}

/// Table-wide options: borders, column weights and default fonts
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Line under the header row
    pub border_header: TableBorderOptions,
    pub border_top: TableBorderOptions,
    pub border_bottom: TableBorderOptions,
    /// Lines between data rows
    pub border_horizontal: TableBorderOptions,
    /// Lines at every column boundary, outer edges included
    pub border_vertical: TableBorderOptions,
    /// Relative column weights; equal weights when unset
    pub column_widths: Option<Vec<f32>>,
    pub default_font_family: FontFamily,
    pub header_font: FontOptions,
    pub cell_font: FontOptions,
}

impl TableOptions {
    pub fn new() -> Self {
        Self {
            border_header: TableBorderOptions::default(),
            border_top: TableBorderOptions::default(),
            border_bottom: TableBorderOptions::default(),
            border_horizontal: TableBorderOptions::default(),
            border_vertical: TableBorderOptions::default(),
            column_widths: None,
            default_font_family: FontFamily::TIMES_NEW_ROMAN,
            header_font: FontOptions::new(),
            cell_font: FontOptions::new(),
        }
    }

    pub fn with_border_header(mut self, border: TableBorderOptions) -> Self {
        self.border_header = border;
        self
    }

    pub fn with_border_top(mut self, border: TableBorderOptions) -> Self {
        self.border_top = border;
        self
    }

    pub fn with_border_bottom(mut self, border: TableBorderOptions) -> Self {
        self.border_bottom = border;
        self
    }

    pub fn with_border_horizontal(mut self, border: TableBorderOptions) -> Self {
        self.border_horizontal = border;
        self
    }

    pub fn with_border_vertical(mut self, border: TableBorderOptions) -> Self {
        self.border_vertical = border;
        self
    }

    /// Same border for every class
    pub fn with_borders(self, border: TableBorderOptions) -> Self {
        self.with_border_header(border)
            .with_border_top(border)
            .with_border_bottom(border)
            .with_border_horizontal(border)
            .with_border_vertical(border)
    }

    pub fn with_column_widths(mut self, widths: Vec<f32>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    /// Set the family of both the header and the cell font
    pub fn with_default_font_family<F: Into<FontFamily>>(mut self, family: F) -> Self {
        let family = family.into();
        self.header_font.family = family.clone();
        self.cell_font.family = family.clone();
        self.default_font_family = family;
        self
    }

    pub fn with_header_font(mut self, font: FontOptions) -> Self {
        self.header_font = font;
        self
    }

    pub fn with_cell_font(mut self, font: FontOptions) -> Self {
        self.cell_font = font;
        self
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Style override for a cell; unset fields fall through to the row, then the table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCellOptions {
    pub font: TextOptions,
    pub alignment: Option<TextAlignment>,
    pub background: Option<Color>,
    /// Padding on every side in millimetres
    pub padding: Option<f32>,
}

impl TableCellOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: TextOptions) -> Self {
        self.font = font;
        self
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn bold(mut self) -> Self {
        self.font = self.font.bold();
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font = self.font.with_font_size(size);
        self
    }

    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font = self.font.with_font_color(color);
        self
    }

    /// Field-wise merge: fields set on `self` win over `fallback`
    pub fn or(&self, fallback: &TableCellOptions) -> TableCellOptions {
        TableCellOptions {
            font: self.font.or(&fallback.font),
            alignment: self.alignment.or(fallback.alignment),
            background: self.background.or(fallback.background),
            padding: self.padding.or(fallback.padding),
        }
    }
}

/// Row-level defaults applied to every cell of the row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRowOptions {
    pub cell_options: Option<TableCellOptions>,
}

impl TableRowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_options(mut self, options: TableCellOptions) -> Self {
        self.cell_options = Some(options);
        self
    }
}

/// Represents a cell in a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    pub options: Option<TableCellOptions>,
}

impl TableCell {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: TableCellOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Options of this cell layered over the row defaults
    pub fn effective_options(&self, row: &TableRowOptions) -> TableCellOptions {
        match (&self.options, &row.cell_options) {
            (Some(own), Some(row)) => own.or(row),
            (Some(own), None) => own.clone(),
            (None, Some(row)) => row.clone(),
            (None, None) => TableCellOptions::default(),
        }
    }
}

/// Represents a row in a table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub options: TableRowOptions,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row of plain text cells
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(TableCell::new).collect(),
            options: TableRowOptions::default(),
        }
    }

    pub fn add_cell<S: Into<String>>(mut self, text: S) -> Self {
        self.cells.push(TableCell::new(text));
        self
    }

    pub fn add_cell_with_options<S: Into<String>>(
        mut self,
        text: S,
        options: TableCellOptions,
    ) -> Self {
        self.cells.push(TableCell::new(text).with_options(options));
        self
    }

    pub fn push_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }

    pub fn with_options(mut self, options: TableRowOptions) -> Self {
        self.options = options;
        self
    }
}

/// A header row, data rows and the options to draw them with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header_row: TableRow,
    pub rows: Vec<TableRow>,
    pub options: TableOptions,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_header_row(mut self, row: TableRow) -> Self {
        trace!("Setting header row with {} cells", row.cells.len());
        self.header_row = row;
        self
    }

    /// Add a row to the table
    pub fn add_row(mut self, row: TableRow) -> Self {
        trace!("Adding row with {} cells", row.cells.len());
        self.rows.push(row);
        self
    }

    pub fn push_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of columns, given by the header row
    pub fn column_count(&self) -> usize {
        self.header_row.cells.len()
    }

    /// Column weights from `options`, equal weights when none are set
    pub fn column_weights(&self, options: &TableOptions) -> Vec<f32> {
        options
            .column_widths
            .clone()
            .unwrap_or_else(|| vec![1.0; self.column_count()])
    }

    /// Validate table structure against its own options
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&self.options)
    }

    /// Validate table structure against `options`
    pub fn validate_with(&self, options: &TableOptions) -> Result<()> {
        let expected_cols = self.column_count();
        if expected_cols == 0 {
            return Err(BuilderError::InvalidTable(
                "Header row has no cells".to_string(),
            ));
        }

        for (i, row) in self.rows.iter().enumerate() {
            if row.cells.len() != expected_cols {
                return Err(BuilderError::InvalidTable(format!(
                    "Row {} has {} cells, expected {}",
                    i,
                    row.cells.len(),
                    expected_cols
                )));
            }
        }

        if let Some(ref widths) = options.column_widths {
            if widths.len() != expected_cols {
                return Err(BuilderError::InvalidTable(format!(
                    "Column widths array has {} elements, but table has {} columns",
                    widths.len(),
                    expected_cols
                )));
            }
            if let Some(bad) = widths.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
                return Err(BuilderError::InvalidTable(format!(
                    "Column width {bad} must be a positive number"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontWeight;

    fn two_column_table() -> Table {
        Table::new()
            .with_header_row(TableRow::from_texts(["A", "B"]))
            .add_row(TableRow::from_texts(["1", "2"]))
    }

    #[test]
    fn test_table_validation() {
        assert!(Table::new().validate().is_err());
        assert!(two_column_table().validate().is_ok());

        let ragged = two_column_table().add_row(TableRow::new().add_cell("C"));
        let err = ragged.validate().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("Row 1 has 1 cells, expected 2"));
    }

    #[test]
    fn test_column_width_validation() {
        let table = two_column_table();
        let three = TableOptions::new().with_column_widths(vec![1.0, 1.0, 1.0]);
        assert!(table.validate_with(&three).is_err());

        let negative = TableOptions::new().with_column_widths(vec![1.0, -2.0]);
        assert!(table.validate_with(&negative).is_err());

        let good = TableOptions::new().with_column_widths(vec![1.0, 3.0]);
        assert!(table.validate_with(&good).is_ok());
    }

    #[test]
    fn test_default_column_weights() {
        let table = Table::new().with_header_row(TableRow::from_texts(["A", "B", "C"]));
        assert_eq!(table.column_weights(&table.options), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_border_defaults() {
        let options = TableOptions::default();
        assert_eq!(options.border_top.width, 0.8);
        assert_eq!(options.border_vertical.color, Color::black());
        assert!(options.border_header.is_visible());
        assert!(!TableBorderOptions::none().is_visible());
    }

    #[test]
    fn test_default_family_reaches_both_fonts() {
        let options = TableOptions::new()
            .with_header_font(FontOptions::new().with_weight(FontWeight::Bold))
            .with_default_font_family(FontFamily::ARIAL);
        assert_eq!(options.header_font.family, FontFamily::ARIAL);
        assert_eq!(options.header_font.weight, FontWeight::Bold);
        assert_eq!(options.cell_font.family, FontFamily::ARIAL);
    }

    #[test]
    fn test_cell_options_layer_over_row() {
        let row_options = TableRowOptions::new().with_cell_options(
            TableCellOptions::new()
                .with_background(Color::light_gray())
                .with_font_size(9.0),
        );
        let cell = TableCell::new("x").with_options(TableCellOptions::new().with_font_size(14.0));

        let effective = cell.effective_options(&row_options);
        assert_eq!(effective.font.font_size, Some(14.0));
        assert_eq!(effective.background, Some(Color::light_gray()));
        assert_eq!(effective.padding, None);

        let plain = TableCell::new("y").effective_options(&row_options);
        assert_eq!(plain.font.font_size, Some(9.0));
    }
}
