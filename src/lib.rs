//! A sequential PDF document builder built on lopdf
//!
//! A [`DocumentSession`] authors one document top to bottom: titles,
//! headings, single-line text, wrapped paragraphs, images, horizontal lines
//! and multi-page tables, all positioned by a cursor that moves down the page
//! as content is added. Lengths are in millimetres with the origin at the
//! bottom-left corner; font sizes and line widths are in points.
//!
//! ```no_run
//! use lopdf_builder::{DocumentOptions, DocumentSession, Table, TableRow};
//!
//! # fn main() -> lopdf_builder::Result<()> {
//! let mut session = DocumentSession::new(DocumentOptions::default());
//! session.open()?;
//! session.new_page()?;
//! session.add_heading("Orders")?;
//!
//! let table = Table::new()
//!     .with_header_row(TableRow::from_texts(["Item", "Qty"]))
//!     .add_row(TableRow::from_texts(["Widget", "3"]));
//! session.add_table(&table, None)?;
//!
//! std::fs::write("orders.pdf", session.get_bytes()?)?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod cursor;
mod drawing;
mod drawing_utils;
pub mod error;
pub mod font;
pub mod font_cache;
pub mod image_layout;
pub mod layout;
pub mod options;
pub mod session;
pub mod standard_fonts;
pub mod style;
pub mod table;
pub mod text;
pub mod units;
mod writer;

pub use error::{BuilderError, Result};
pub use font::{FontMetrics, StandardFontMetrics};
#[cfg(feature = "ttf-parser")]
pub use font::TtfFontMetrics;
pub use options::{
    DocumentOptions, FontSource, ImageOptions, LineOptions, Margins, PageOrientation, PageSize,
};
pub use session::{DocumentSession, PageCanvas, PageHook};
pub use style::{
    BoxJustify, Color, ContentAlignment, FontFamily, FontOptions, FontStyle, FontVariant,
    FontWeight, ParagraphOptions, TextAlignment, TextOptions,
};
pub use table::{
    Table, TableBorderOptions, TableCell, TableCellOptions, TableOptions, TableRow,
    TableRowOptions,
};
pub use units::UnitConverter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_document() {
        let mut session = DocumentSession::new(
            DocumentOptions::new().with_default_font_family(FontFamily::HELVETICA),
        );
        session.open().unwrap();
        session.new_page().unwrap();
        session.add_title("Invoice").unwrap();
        session
            .add_text("Billed to: ", Some(&TextOptions::new().bold()))
            .unwrap();
        session.add_text("ACME Ltd", None).unwrap();
        session.new_line(None).unwrap();

        let table = Table::new()
            .with_options(TableOptions::new().with_column_widths(vec![3.0, 1.0, 1.0]))
            .with_header_row(TableRow::from_texts(["Description", "Qty", "Amount"]))
            .add_row(TableRow::from_texts(["Consulting", "10", "1500.00"]))
            .add_row(
                TableRow::new()
                    .add_cell("Total")
                    .add_cell("")
                    .add_cell_with_options(
                        "1500.00",
                        TableCellOptions::new()
                            .bold()
                            .with_alignment(TextAlignment::Right),
                    ),
            );
        session.add_table(&table, None).unwrap();
        session.add_line(190.0, None).unwrap();

        let bytes = session.get_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn test_error_classes() {
        assert!(BuilderError::NotOpened.is_usage_error());
        assert!(
            BuilderError::FontUnavailable {
                family: "Missing".into(),
                variant: FontVariant::default().to_string(),
            }
            .is_resource_error()
        );
        assert!(BuilderError::InvalidTable("no header".into()).is_configuration_error());
    }
}
