//! Invoice table example
//!
//! A styled table long enough to continue over several pages, with the
//! header row repeated on each one.

use lopdf_builder::{
    Color, DocumentOptions, DocumentSession, FontFamily, FontOptions, FontWeight, PageOrientation,
    Table, TableBorderOptions, TableCellOptions, TableOptions, TableRow, TableRowOptions,
    TextAlignment,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with debug level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let options = DocumentOptions::new()
        .with_orientation(PageOrientation::Landscape)
        .with_default_font_family(FontFamily::HELVETICA);
    let mut session = DocumentSession::new(options);
    session.open()?;
    session.new_page()?;
    session.add_title("Invoice #2024-118")?;

    let table_options = TableOptions::new()
        .with_default_font_family(FontFamily::HELVETICA)
        .with_header_font(
            FontOptions::new()
                .with_family(FontFamily::HELVETICA)
                .with_weight(FontWeight::Bold)
                .with_size(11.0),
        )
        .with_border_header(TableBorderOptions::new(1.5, Color::black()))
        .with_border_vertical(TableBorderOptions::new(0.5, Color::gray(0.6)))
        .with_border_horizontal(TableBorderOptions::new(0.5, Color::gray(0.8)))
        .with_column_widths(vec![1.0, 5.0, 1.5, 2.0, 2.0]);

    let amount = TableCellOptions::new().with_alignment(TextAlignment::Right);
    let mut table = Table::new().with_options(table_options).with_header_row(
        TableRow::from_texts(["#", "Description", "Qty", "Unit price", "Amount"]).with_options(
            TableRowOptions::new()
                .with_cell_options(TableCellOptions::new().with_background(Color::light_gray())),
        ),
    );

    let mut total = 0.0;
    for i in 1..=60 {
        let quantity = i % 7 + 1;
        let price = 12.5 * (i % 4 + 1) as f64;
        let line_total = quantity as f64 * price;
        total += line_total;

        let mut row = TableRow::new()
            .add_cell(i.to_string())
            .add_cell(format!("Maintenance item {i}"))
            .add_cell_with_options(quantity.to_string(), amount.clone())
            .add_cell_with_options(format!("{price:.2}"), amount.clone())
            .add_cell_with_options(format!("{line_total:.2}"), amount.clone());
        if i % 2 == 0 {
            row = row.with_options(TableRowOptions::new().with_cell_options(
                TableCellOptions::new().with_background(Color::rgb(0.95, 0.95, 1.0)),
            ));
        }
        table.push_row(row);
    }

    table.push_row(
        TableRow::new()
            .add_cell("")
            .add_cell_with_options("Total", TableCellOptions::new().bold())
            .add_cell("")
            .add_cell("")
            .add_cell_with_options(
                format!("{total:.2}"),
                amount.clone().bold().with_font_color(Color::red()),
            ),
    );

    session.add_table(&table, None)?;
    session.new_line(None)?;
    session.add_text("Payment due within 30 days.", None)?;

    std::fs::write("invoice_table.pdf", session.get_bytes()?)?;
    println!(
        "PDF saved as 'invoice_table.pdf' ({} pages)",
        session.page_count()
    );

    Ok(())
}
