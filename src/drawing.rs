//! Table drawing: cell operations, borders and page breaks

use crate::Result;
use crate::drawing_utils::{
    clip_rectangle, draw_horizontal_line, draw_rectangle_fill, draw_text, draw_vertical_line,
    restore_state, save_state, set_stroke_style,
};
use crate::layout::{LaidOutCell, LaidOutRow, TableArea, TableBorders, TableLayout};
use crate::style::ContentAlignment;
use crate::table::TableBorderOptions;
use crate::units::UnitConverter;
use lopdf::content::Operation;
use tracing::{debug, trace};

/// Where table operations go, and how the table moves to a fresh page
pub trait TableSurface {
    fn emit(&mut self, operations: Vec<Operation>) -> Result<()>;

    /// Start a new page, returning the y (mm) the table continues from
    fn break_page(&mut self) -> Result<f32>;
}

/// Vertical extent of the part of a table drawn on one page
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    top: f32,
    header_bottom: f32,
    /// Bottom edge of each data row drawn on this page
    row_bottoms: Vec<f32>,
}

impl Fragment {
    fn bottom(&self) -> f32 {
        self.row_bottoms.last().copied().unwrap_or(self.header_bottom)
    }
}

/// Operations for one cell whose rectangle spans `x0..x1` and `bottom..bottom + height`
pub fn cell_operations(
    cell: &LaidOutCell,
    x0: f32,
    x1: f32,
    bottom: f32,
    height: f32,
    units: &UnitConverter,
) -> Vec<Operation> {
    let mut ops = vec![save_state()];
    let (left, base, width, tall) = (
        units.to_native(x0),
        units.to_native(bottom),
        units.to_native(x1 - x0),
        units.to_native(height),
    );

    if let Some(background) = cell.style.background {
        ops.extend(draw_rectangle_fill(left, base, width, tall, background));
    }

    if !cell.text.is_empty() {
        let size = cell.style.font.size;
        let metrics = cell.font.metrics();
        let padding = units.to_native(cell.style.padding);
        let text_width = metrics.text_width(&cell.text, size);
        let x = match cell.style.alignment {
            ContentAlignment::BottomLeft => left + padding,
            ContentAlignment::BottomCenter => left + (width - text_width) / 2.0,
            ContentAlignment::BottomRight => left + width - padding - text_width,
        };
        let baseline = base + padding + metrics.descent(size);

        ops.extend(clip_rectangle(left, base, width, tall));
        ops.extend(draw_text(
            &cell.font,
            size,
            cell.style.font.color,
            x,
            baseline,
            &cell.text,
        ));
    }

    ops.push(restore_state());
    ops
}

/// Operations for a row whose top edge is at `top`
pub fn row_operations(
    row: &LaidOutRow,
    column_boundaries: &[f32],
    top: f32,
    units: &UnitConverter,
) -> Vec<Operation> {
    let bottom = top - row.height;
    row.cells
        .iter()
        .zip(column_boundaries.windows(2))
        .flat_map(|(cell, edges)| {
            cell_operations(cell, edges[0], edges[1], bottom, row.height, units)
        })
        .collect()
}

fn stroke_horizontal(
    ops: &mut Vec<Operation>,
    border: &TableBorderOptions,
    left: f32,
    right: f32,
    y: f32,
) {
    if border.is_visible() {
        ops.extend(set_stroke_style(border.color, border.width));
        ops.extend(draw_horizontal_line(left, right, y));
    }
}

fn fragment_border_operations(
    fragment: &Fragment,
    borders: &TableBorders,
    column_boundaries: &[f32],
    units: &UnitConverter,
) -> Vec<Operation> {
    let (Some(&left), Some(&right)) = (column_boundaries.first(), column_boundaries.last()) else {
        return Vec::new();
    };
    let (left, right) = (units.to_native(left), units.to_native(right));
    let top = units.to_native(fragment.top);
    let bottom = units.to_native(fragment.bottom());

    let mut ops = vec![save_state()];
    stroke_horizontal(&mut ops, &borders.top, left, right, top);
    stroke_horizontal(
        &mut ops,
        &borders.header,
        left,
        right,
        units.to_native(fragment.header_bottom),
    );

    // separators between data rows; the last row gets the bottom border
    if let Some((_, between)) = fragment.row_bottoms.split_last() {
        for y in between {
            stroke_horizontal(&mut ops, &borders.horizontal, left, right, units.to_native(*y));
        }
    }
    stroke_horizontal(&mut ops, &borders.bottom, left, right, bottom);

    if borders.vertical.is_visible() {
        ops.extend(set_stroke_style(borders.vertical.color, borders.vertical.width));
        for x in column_boundaries {
            ops.extend(draw_vertical_line(units.to_native(*x), top, bottom));
        }
    }
    ops.push(restore_state());
    ops
}

fn finish_fragment<S: TableSurface + ?Sized>(
    surface: &mut S,
    fragment: &Fragment,
    layout: &TableLayout,
    units: &UnitConverter,
) -> Result<()> {
    debug!(
        "Closing table fragment with {} rows ({} to {})",
        fragment.row_bottoms.len(),
        fragment.top,
        fragment.bottom()
    );
    surface.emit(fragment_border_operations(
        fragment,
        &layout.borders,
        &layout.column_boundaries,
        units,
    ))
}

fn start_fragment<S: TableSurface + ?Sized>(
    surface: &mut S,
    layout: &TableLayout,
    top: f32,
    units: &UnitConverter,
) -> Result<Fragment> {
    surface.emit(row_operations(
        &layout.header,
        &layout.column_boundaries,
        top,
        units,
    ))?;
    Ok(Fragment {
        top,
        header_bottom: top - layout.header.height,
        row_bottoms: Vec::new(),
    })
}

/// Draw a laid out table from `area.top` downwards, returning the y of its
/// bottom edge on the last page.
///
/// A row that would cross `area.bottom` moves to a new page, where the
/// header row is drawn again.
pub fn draw_table_paginated<S: TableSurface + ?Sized>(
    surface: &mut S,
    layout: &TableLayout,
    area: &TableArea,
    units: &UnitConverter,
) -> Result<f32> {
    let header_height = layout.header.height;
    let first_row_height = layout.rows.first().map(|row| row.height).unwrap_or(0.0);

    let mut top = area.top;
    if top - header_height - first_row_height < area.bottom {
        trace!("No room for the header and first row at {}, breaking page", top);
        top = surface.break_page()?;
    }

    let mut fragment = start_fragment(surface, layout, top, units)?;
    let mut pages = 1;

    for row in &layout.rows {
        let y = fragment.bottom();
        let y = if y - row.height < area.bottom && !fragment.row_bottoms.is_empty() {
            finish_fragment(surface, &fragment, layout, units)?;
            let top = surface.break_page()?;
            pages += 1;
            fragment = start_fragment(surface, layout, top, units)?;
            fragment.bottom()
        } else {
            y
        };

        surface.emit(row_operations(row, &layout.column_boundaries, y, units))?;
        fragment.row_bottoms.push(y - row.height);
    }

    finish_fragment(surface, &fragment, layout, units)?;
    debug!(
        "Drew table of {} rows over {} page(s)",
        layout.rows.len(),
        pages
    );
    Ok(fragment.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFontMetrics;
    use crate::font_cache::FontHandle;
    use crate::layout::{CellStyle, calculate_layout};
    use crate::standard_fonts::StandardFamily;
    use crate::style::{Color, FontOptions};
    use crate::table::{Table, TableOptions, TableRow};
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingSurface {
        pages: Vec<Vec<Operation>>,
        page_top: f32,
    }

    impl RecordingSurface {
        fn new(page_top: f32) -> Self {
            Self {
                pages: vec![Vec::new()],
                page_top,
            }
        }

        fn operators(&self, page: usize) -> Vec<&str> {
            self.pages[page].iter().map(|op| op.operator.as_str()).collect()
        }

        fn count(&self, page: usize, operator: &str) -> usize {
            self.operators(page).iter().filter(|op| **op == operator).count()
        }
    }

    impl TableSurface for RecordingSurface {
        fn emit(&mut self, operations: Vec<Operation>) -> Result<()> {
            if let Some(page) = self.pages.last_mut() {
                page.extend(operations);
            }
            Ok(())
        }

        fn break_page(&mut self) -> Result<f32> {
            self.pages.push(Vec::new());
            Ok(self.page_top)
        }
    }

    fn times(_font: &FontOptions) -> Result<FontHandle> {
        Ok(FontHandle::new(
            "F1",
            Arc::new(StandardFontMetrics::new(StandardFamily::Times.face(false, false))),
        ))
    }

    fn table(rows: usize) -> Table {
        let mut table =
            Table::new().with_header_row(TableRow::from_texts(["Name", "Qty", "Price"]));
        for i in 0..rows {
            table.push_row(TableRow::from_texts([format!("Item {i}"), "1".into(), "9.99".into()]));
        }
        table
    }

    fn layout(table: &Table, options: &TableOptions, area: &TableArea) -> TableLayout {
        calculate_layout(table, options, area, &UnitConverter::new(), times).unwrap()
    }

    fn area(top: f32) -> TableArea {
        TableArea {
            left: 10.0,
            bottom: 10.0,
            right: 200.0,
            top,
        }
    }

    #[test]
    fn test_cell_alignment_and_clip() {
        let units = UnitConverter::new();
        let cell = LaidOutCell {
            text: "Hi".to_string(),
            style: CellStyle {
                font: FontOptions::new(),
                alignment: ContentAlignment::BottomRight,
                background: Some(Color::light_gray()),
                padding: 1.0,
            },
            font: times(&FontOptions::new()).unwrap(),
        };
        let ops = cell_operations(&cell, 10.0, 50.0, 100.0, 6.0, &units);
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(
            operators,
            vec![
                "q", "q", "rg", "re", "f", "Q", "re", "W", "n", "BT", "Tf", "rg", "Td", "Tj", "ET",
                "Q"
            ]
        );

        // "Hi" is 12pt wide in 12pt Times
        let td = &ops[12];
        let x = td.operands[0].as_float().unwrap();
        let expected = units.to_native(50.0) - units.to_native(1.0) - 12.0;
        assert!((x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_empty_cell_draws_only_background() {
        let units = UnitConverter::new();
        let cell = LaidOutCell {
            text: String::new(),
            style: CellStyle {
                font: FontOptions::new(),
                alignment: ContentAlignment::BottomLeft,
                background: None,
                padding: 1.0,
            },
            font: times(&FontOptions::new()).unwrap(),
        };
        let ops = cell_operations(&cell, 0.0, 10.0, 0.0, 5.0, &units);
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_single_page_borders() {
        let units = UnitConverter::new();
        let table = table(3);
        let area = area(200.0);
        let layout = layout(&table, &table.options, &area);
        let mut surface = RecordingSurface::new(287.0);

        let bottom = draw_table_paginated(&mut surface, &layout, &area, &units).unwrap();
        assert_eq!(surface.pages.len(), 1);

        let expected_bottom = 200.0 - layout.header.height - 3.0 * layout.rows[0].height;
        assert!((bottom - expected_bottom).abs() < 1e-3);

        // top + header + 2 between rows + bottom + 4 verticals
        assert_eq!(surface.count(0, "S"), 9);
        // 4 rows of 3 cells
        assert_eq!(surface.count(0, "Tj"), 12);
    }

    #[test]
    fn test_suppressed_borders_are_absent() {
        let units = UnitConverter::new();
        let table = table(2);
        let options = TableOptions::new()
            .with_borders(crate::table::TableBorderOptions::none())
            .with_border_top(crate::table::TableBorderOptions::new(1.5, Color::red()));
        let area = area(200.0);
        let layout = layout(&table, &options, &area);
        let mut surface = RecordingSurface::new(287.0);
        draw_table_paginated(&mut surface, &layout, &area, &units).unwrap();

        assert_eq!(surface.count(0, "S"), 1);
        let stroke = surface.pages[0]
            .iter()
            .find(|op| op.operator == "RG")
            .unwrap();
        assert_eq!(stroke.operands[0].as_float().unwrap(), 1.0);
        assert_eq!(stroke.operands[1].as_float().unwrap(), 0.0);
        let width = surface.pages[0]
            .iter()
            .find(|op| op.operator == "w")
            .unwrap();
        assert_eq!(width.operands[0].as_float().unwrap(), 1.5);
    }

    #[test]
    fn test_overflow_repeats_header_on_new_page() {
        let units = UnitConverter::new();
        let table = table(30);
        // about 5.5mm per row, so roughly 10 rows fit above the bottom margin
        let area = area(70.0);
        let layout = layout(&table, &table.options, &area);
        let mut surface = RecordingSurface::new(287.0);

        let bottom = draw_table_paginated(&mut surface, &layout, &area, &units).unwrap();
        assert_eq!(surface.pages.len(), 2);

        let first_page_rows = surface.count(0, "Tj") / 3 - 1;
        let second_page_rows = surface.count(1, "Tj") / 3 - 1;
        assert_eq!(first_page_rows + second_page_rows, 30);
        assert!(first_page_rows > 0);

        // second fragment starts at the page top and ends above the margin
        assert!(bottom >= 10.0);
        let expected =
            287.0 - layout.header.height - second_page_rows as f32 * layout.rows[0].height;
        assert!((bottom - expected).abs() < 1e-3);
    }

    #[test]
    fn test_no_room_for_first_row_breaks_before_header() {
        let units = UnitConverter::new();
        let table = table(1);
        let area = area(15.0);
        let layout = layout(&table, &table.options, &area);
        let mut surface = RecordingSurface::new(287.0);

        draw_table_paginated(&mut surface, &layout, &area, &units).unwrap();
        assert_eq!(surface.pages.len(), 2);
        assert!(surface.pages[0].is_empty());
        assert_eq!(surface.count(1, "Tj"), 6);
    }
}
