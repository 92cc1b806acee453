//! Report example
//!
//! Builds a short report with a title, paragraphs in every alignment, a
//! separator line, page headers and footers, and optionally an embedded
//! system TrueType font and an image given on the command line:
//!
//! ```text
//! cargo run --example report -- path/to/logo.png
//! ```

use lopdf_builder::{
    Color, DocumentOptions, DocumentSession, FontSource, FontStyle, FontWeight, LineOptions,
    ParagraphOptions, TextAlignment, TextOptions,
};
use tracing_subscriber::EnvFilter;

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
    tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
    exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor \
    in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur.";

/// Try to load a system TrueType font, returning (font_data, family_name).
fn load_system_font() -> Option<(Vec<u8>, &'static str)> {
    let candidates = [
        (
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "DejaVu Sans",
        ),
        ("/System/Library/Fonts/Supplemental/Arial.ttf", "Arial"),
        ("C:\\Windows\\Fonts\\arial.ttf", "Arial"),
    ];
    for (path, name) in &candidates {
        if let Ok(data) = std::fs::read(path) {
            return Some((data, *name));
        }
    }
    None
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut options = DocumentOptions::new();
    let unicode_family = match load_system_font() {
        Some((data, family)) => {
            println!("Embedding system font '{family}'");
            options = options.with_font_source(FontSource::new(
                family,
                FontStyle::Normal,
                FontWeight::Normal,
                data,
            ));
            Some(family)
        }
        None => {
            println!("No system TrueType font found, using standard fonts only");
            None
        }
    };

    let mut session = DocumentSession::new(options);
    session.on_page_header(|canvas| {
        let grey = TextOptions::new()
            .with_font_size(9.0)
            .with_font_color(Color::dark_gray());
        canvas.add_text("Quarterly operations report", Some(&grey))?;
        canvas.new_line(Some(3.0))?;
        let width = canvas.page_width() - 20.0;
        canvas.add_line(width, Some(&LineOptions::new().with_width(0.5)))?;
        canvas.new_line(Some(6.0))
    });
    session.on_page_footer(|canvas| {
        let saved_y = canvas.cursor_y()?;
        let saved_x = canvas.cursor_x()?;
        canvas.set_cursor_y(canvas.options().margins.bottom - 4.0)?;
        canvas.set_cursor_x(canvas.page_width() / 2.0 - 6.0)?;
        let page = format!("Page {}", canvas.page_count());
        canvas.add_text(&page, Some(&TextOptions::new().with_font_size(9.0)))?;
        canvas.set_cursor_x(saved_x)?;
        canvas.set_cursor_y(saved_y)
    });

    session.open()?;
    session.new_page()?;
    session.add_title("Operations Report")?;
    session.add_heading("Summary")?;
    session.add_paragraph(LOREM, None)?;

    for (label, alignment) in [
        ("Centered", TextAlignment::Center),
        ("Right aligned", TextAlignment::Right),
        ("Justified", TextAlignment::Justify),
    ] {
        session.add_heading(label)?;
        let paragraph = ParagraphOptions::new().with_alignment(alignment);
        session.add_paragraph(LOREM, Some(&paragraph))?;
    }

    session.new_line(None)?;
    session.add_text("Status: ", Some(&TextOptions::new().bold()))?;
    session.add_text(
        "on track",
        Some(&TextOptions::new().italic().with_font_color(Color::green())),
    )?;
    session.new_line(None)?;
    session.add_line(
        190.0,
        Some(&LineOptions::new().with_width(2.0).with_color(Color::blue())),
    )?;
    session.new_line(None)?;

    if let Some(family) = unicode_family {
        session.add_heading("International")?;
        let unicode = TextOptions::new().with_font_family(family);
        session.add_text("Café, naïve, Zürich, €42 ✓", Some(&unicode))?;
        session.new_line(None)?;
    }

    if let Some(path) = std::env::args().nth(1) {
        session.new_page()?;
        session.add_heading("Figure 1")?;
        session.add_image(&path, 120.0, None)?;
        session.new_line(None)?;
        session.add_paragraph("The figure above is scaled to 120mm wide.", None)?;
    }

    let bytes = session.get_bytes()?;
    session.close();
    std::fs::write("report.pdf", bytes)?;
    println!("PDF saved as 'report.pdf'");

    Ok(())
}
