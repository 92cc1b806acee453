//! Layout calculation for tables
//!
//! Resolves every cell's style and font, then computes column boundaries and
//! row heights. All lengths are in millimetres.

use crate::Result;
use crate::constants::{DEFAULT_CELL_PADDING, TABLE_ROW_CONTENT_HEIGHT};
use crate::font_cache::FontHandle;
use crate::style::{Color, ContentAlignment, FontOptions, TextAlignment};
use crate::table::{Table, TableBorderOptions, TableOptions, TableRow};
use crate::units::UnitConverter;
use tracing::{debug, trace};

/// Rectangle a table may occupy on its first page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableArea {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

/// Fully resolved style of one cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    pub font: FontOptions,
    pub alignment: ContentAlignment,
    pub background: Option<Color>,
    pub padding: f32,
}

/// A cell ready to draw
#[derive(Debug, Clone)]
pub struct LaidOutCell {
    pub text: String,
    pub style: CellStyle,
    pub font: FontHandle,
}

#[derive(Debug, Clone)]
pub struct LaidOutRow {
    pub cells: Vec<LaidOutCell>,
    pub height: f32,
}

/// The five border classes of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableBorders {
    pub header: TableBorderOptions,
    pub top: TableBorderOptions,
    pub bottom: TableBorderOptions,
    pub horizontal: TableBorderOptions,
    pub vertical: TableBorderOptions,
}

impl From<&TableOptions> for TableBorders {
    fn from(options: &TableOptions) -> Self {
        Self {
            header: options.border_header,
            top: options.border_top,
            bottom: options.border_bottom,
            horizontal: options.border_horizontal,
            vertical: options.border_vertical,
        }
    }
}

/// Calculated layout information for a table
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// x of every column edge, left to right; one more than the column count
    pub column_boundaries: Vec<f32>,
    pub header: LaidOutRow,
    pub rows: Vec<LaidOutRow>,
    pub borders: TableBorders,
}

impl TableLayout {
    pub fn left(&self) -> f32 {
        self.column_boundaries.first().copied().unwrap_or_default()
    }

    pub fn right(&self) -> f32 {
        self.column_boundaries.last().copied().unwrap_or_default()
    }
}

/// Split `[left, right]` into columns proportional to `weights`
pub fn column_boundaries(left: f32, right: f32, weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    let width = right - left;

    let mut boundaries = Vec::with_capacity(weights.len() + 1);
    let mut x = left;
    boundaries.push(x);
    for weight in weights {
        x += width * weight / total;
        boundaries.push(x);
    }
    // pin the last edge against accumulated rounding
    if let Some(last) = boundaries.last_mut() {
        *last = right;
    }
    boundaries
}

/// Resolve a cell's style: cell options, then row options, then `base_font`
pub fn resolve_cell_style(row: &TableRow, column: usize, base_font: &FontOptions) -> CellStyle {
    let options = row
        .cells
        .get(column)
        .map(|cell| cell.effective_options(&row.options))
        .unwrap_or_default();

    CellStyle {
        font: options.font.resolve(base_font),
        alignment: options.alignment.unwrap_or(TextAlignment::Left).into(),
        background: options.background,
        padding: options.padding.unwrap_or(DEFAULT_CELL_PADDING),
    }
}

/// Height of the header row: the tallest line plus vertical padding
pub fn header_row_height(cells: &[LaidOutCell], units: &UnitConverter) -> f32 {
    cells
        .iter()
        .map(|cell| {
            let line = cell.font.metrics().line_spacing(cell.style.font.size);
            units.to_mm(line) + 2.0 * cell.style.padding
        })
        .fold(0.0, f32::max)
}

/// Height of a data row: fixed content height plus the largest vertical padding
pub fn data_row_height(cells: &[LaidOutCell], units: &UnitConverter) -> f32 {
    let content = units.to_mm(TABLE_ROW_CONTENT_HEIGHT);
    cells
        .iter()
        .map(|cell| content + 2.0 * cell.style.padding)
        .fold(content, f32::max)
}

fn lay_out_row<F>(
    row: &TableRow,
    base_font: &FontOptions,
    resolve_font: &mut F,
) -> Result<Vec<LaidOutCell>>
where
    F: FnMut(&FontOptions) -> Result<FontHandle>,
{
    row.cells
        .iter()
        .enumerate()
        .map(|(column, cell)| {
            let style = resolve_cell_style(row, column, base_font);
            let font = resolve_font(&style.font)?;
            Ok(LaidOutCell {
                text: cell.text.clone(),
                style,
                font,
            })
        })
        .collect()
}

/// Calculate the layout for a table drawn with `options` across `area`.
///
/// `resolve_font` turns each resolved font into a handle of the target
/// document.
pub fn calculate_layout<F>(
    table: &Table,
    options: &TableOptions,
    area: &TableArea,
    units: &UnitConverter,
    mut resolve_font: F,
) -> Result<TableLayout>
where
    F: FnMut(&FontOptions) -> Result<FontHandle>,
{
    table.validate_with(options)?;

    debug!(
        "Calculating layout for table with {} columns and {} rows",
        table.column_count(),
        table.rows.len()
    );

    let column_boundaries =
        column_boundaries(area.left, area.right, &table.column_weights(options));

    let header_cells = lay_out_row(&table.header_row, &options.header_font, &mut resolve_font)?;
    let header = LaidOutRow {
        height: header_row_height(&header_cells, units),
        cells: header_cells,
    };

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = lay_out_row(row, &options.cell_font, &mut resolve_font)?;
            Ok(LaidOutRow {
                height: data_row_height(&cells, units),
                cells,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    trace!(
        "Columns at {:?}, header height {}",
        column_boundaries, header.height
    );

    Ok(TableLayout {
        column_boundaries,
        header,
        rows,
        borders: TableBorders::from(options),
    })
}
