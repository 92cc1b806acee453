//! Document session: page lifecycle, cursor and content dispatch

use crate::Result;
use crate::constants::{DEFAULT_LINE_HEIGHT_MULTIPLIER, PARAGRAPH_LINE_BREAK_FACTOR};
use crate::cursor::PageCursor;
use crate::drawing::{TableSurface, draw_table_paginated};
use crate::drawing_utils::{
    draw_image, draw_line, draw_text, restore_state, save_state, set_stroke_style,
};
use crate::error::BuilderError;
use crate::font_cache::{FontHandle, FontResourceCache};
use crate::image_layout::{ImagePlacement, load_image, prepare_image, rendered_height};
use crate::layout::{TableArea, calculate_layout};
use crate::options::{DocumentOptions, ImageOptions, LineOptions};
use crate::style::{FontOptions, ParagraphOptions, TextOptions};
use crate::table::{Table, TableOptions};
use crate::text::{TextBox, layout_paragraph};
use crate::units::UnitConverter;
use crate::writer::PdfWriter;
use lopdf::content::Operation;
use std::fmt;
use std::path::Path;
use tracing::{debug, instrument, trace};

/// Callback fired on every new page, after the cursor is reset
pub type PageHook = Box<dyn FnMut(&mut PageCanvas<'_>) -> Result<()> + Send>;

/// State that only exists between `open()` and `close()`
struct OpenDocument {
    writer: PdfWriter,
    fonts: FontResourceCache,
    cursor: Option<PageCursor>,
}

impl OpenDocument {
    fn cursor_mut(&mut self) -> Result<&mut PageCursor> {
        self.cursor.as_mut().ok_or(BuilderError::NoActivePage)
    }

    fn font(&mut self, options: &FontOptions) -> Result<FontHandle> {
        self.fonts.resolve(&mut self.writer, options)
    }
}

/// Builds one document through sequential authoring calls.
///
/// ```no_run
/// use lopdf_builder::{DocumentOptions, DocumentSession};
///
/// # fn main() -> lopdf_builder::Result<()> {
/// let mut session = DocumentSession::new(DocumentOptions::default());
/// session.open()?;
/// session.new_page()?;
/// session.add_title("Quarterly report")?;
/// session.add_paragraph("Revenue grew in every region.", None)?;
/// let bytes = session.get_bytes()?;
/// session.close();
/// # let _ = bytes;
/// # Ok(())
/// # }
/// ```
pub struct DocumentSession {
    options: DocumentOptions,
    units: UnitConverter,
    document: Option<OpenDocument>,
    page_header: Option<PageHook>,
    page_footer: Option<PageHook>,
}

impl DocumentSession {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            options,
            units: UnitConverter::new(),
            document: None,
            page_header: None,
            page_footer: None,
        }
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Register the hook fired first on every new page
    pub fn on_page_header<F>(&mut self, hook: F)
    where
        F: FnMut(&mut PageCanvas<'_>) -> Result<()> + Send + 'static,
    {
        self.page_header = Some(Box::new(hook));
    }

    /// Register the hook fired after the header hook on every new page
    pub fn on_page_footer<F>(&mut self, hook: F)
    where
        F: FnMut(&mut PageCanvas<'_>) -> Result<()> + Send + 'static,
    {
        self.page_footer = Some(Box::new(hook));
    }

    /// Start a new document, discarding any previous one and its fonts
    #[instrument(skip(self))]
    pub fn open(&mut self) -> Result<()> {
        let (width, height) = self.options.page_dimensions();
        debug!("Opening {}x{}mm document", width, height);
        // handles point into the old writer
        let mut fonts = self
            .document
            .take()
            .map(|document| document.fonts)
            .unwrap_or_else(FontResourceCache::new);
        fonts.clear();
        self.document = Some(OpenDocument {
            writer: PdfWriter::new(width, height, self.options.font_sources().to_vec()),
            fonts,
            cursor: None,
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Release the document; content calls fail until the next `open()`
    pub fn close(&mut self) {
        if self.document.take().is_some() {
            debug!("Closed document");
        }
    }

    /// Serialize the document as it stands
    #[instrument(skip(self))]
    pub fn get_bytes(&mut self) -> Result<Vec<u8>> {
        self.open_document()?.writer.finalize()
    }

    /// Add a page, reset the cursor to the top-left margin corner and fire
    /// the header and footer hooks
    #[instrument(skip(self))]
    pub fn new_page(&mut self) -> Result<()> {
        let (width, height) = self.options.page_dimensions();
        let margins = self.options.margins;
        let document = self.open_document()?;
        document.writer.add_page()?;
        document.cursor = Some(PageCursor::new(width, height, margins));
        debug!("Started page {}", document.writer.page_count());

        self.fire_page_hooks()
    }

    /// Move to the left margin and down by `height` mm, or by one body-text
    /// line when unset
    pub fn new_line(&mut self, height: Option<f32>) -> Result<()> {
        let height = height.unwrap_or_else(|| self.default_line_height());
        self.cursor_mut()?.advance_line(height);
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn add_title(&mut self, text: &str) -> Result<()> {
        let font = self.options.title_font().clone();
        self.add_line_of_text(text, &font)
    }

    #[instrument(skip(self))]
    pub fn add_heading(&mut self, text: &str) -> Result<()> {
        let font = self.options.heading_font().clone();
        self.add_line_of_text(text, &font)
    }

    /// Draw a single unwrapped line at the cursor and advance the cursor x by its width
    #[instrument(skip(self, options))]
    pub fn add_text(&mut self, text: &str, options: Option<&TextOptions>) -> Result<()> {
        let font = match options {
            Some(options) => options.resolve(self.options.text_font()),
            None => self.options.text_font().clone(),
        };
        self.draw_text_run(text, &font)
    }

    /// Wrap text between the side margins, starting at the cursor
    #[instrument(skip(self, text, options), fields(text_len = text.len()))]
    pub fn add_paragraph(&mut self, text: &str, options: Option<&ParagraphOptions>) -> Result<()> {
        let defaults = ParagraphOptions::default();
        let options = options.unwrap_or(&defaults);
        let font = options.font.resolve(self.options.paragraph_font());
        let margins = self.options.margins;
        let units = self.units;

        let document = self.open_document()?;
        let cursor = document.cursor_mut()?;
        cursor.carriage_return();
        let text_box = TextBox {
            left: margins.left,
            width: cursor.content_width(),
            top: cursor.y + units.to_mm(font.size),
            bottom: margins.bottom,
            justify: options.alignment.into(),
            line_break_factor: PARAGRAPH_LINE_BREAK_FACTOR,
        };

        let handle = document.font(&font)?;
        let layout = layout_paragraph(text, font.size, handle.metrics(), &text_box, &units);
        let operations: Vec<Operation> = layout
            .runs
            .iter()
            .flat_map(|run| {
                draw_text(
                    &handle,
                    font.size,
                    font.color,
                    units.to_native(run.x),
                    units.to_native(run.y),
                    &run.text,
                )
            })
            .collect();
        document.writer.push_operations(operations)?;
        document.cursor_mut()?.y = layout.final_y;

        self.new_line(None)
    }

    /// Draw an image `width` mm wide, keeping its aspect ratio.
    ///
    /// The image hangs from the cursor (or `options.position`); afterwards the
    /// cursor y is the image's bottom edge.
    #[instrument(skip(self, path, options), fields(path = %path.as_ref().display()))]
    pub fn add_image<P: AsRef<Path>>(
        &mut self,
        path: P,
        width: f32,
        options: Option<&ImageOptions>,
    ) -> Result<()> {
        let defaults = ImageOptions::default();
        let options = options.unwrap_or(&defaults);
        let units = self.units;

        let document = self.open_document()?;
        let (x, top) = {
            let cursor = document.cursor_mut()?;
            options.position.unwrap_or((cursor.x, cursor.y))
        };

        let image = load_image(path.as_ref())?;
        let encoded = prepare_image(&image, width, options, &units)?;
        let height = rendered_height(width, encoded.width_px, encoded.height_px);
        let placement = ImagePlacement::from_top_left(x, top, width, height);
        trace!("Placing image at {:?}", placement);

        let resource_name = document.writer.embed_image(encoded)?;
        document.writer.push_operations(draw_image(
            &resource_name,
            units.to_native(placement.x),
            units.to_native(placement.y),
            units.to_native(placement.width),
            units.to_native(placement.height),
        ))?;
        document.cursor_mut()?.y = placement.y;
        Ok(())
    }

    /// Draw a table from the cursor down to the bottom margin, continuing on
    /// new pages as needed. `options` defaults to the table's own options.
    #[instrument(
        skip(self, table, options),
        fields(columns = table.column_count(), rows = table.rows.len())
    )]
    pub fn add_table(&mut self, table: &Table, options: Option<&TableOptions>) -> Result<()> {
        let options = options.unwrap_or(&table.options);
        let margins = self.options.margins;
        let units = self.units;

        let document = self.open_document()?;
        let cursor = *document.cursor_mut()?;
        let area = TableArea {
            left: margins.left,
            bottom: margins.bottom,
            right: cursor.right_edge(),
            top: cursor.y,
        };
        let layout = calculate_layout(table, options, &area, &units, |font| {
            document.font(font)
        })?;

        let bottom = draw_table_paginated(&mut SessionSurface(self), &layout, &area, &units)?;
        let cursor = self.cursor_mut()?;
        cursor.carriage_return();
        cursor.y = bottom;
        Ok(())
    }

    /// Stroke a horizontal line `length` mm long from the cursor; the cursor does not move
    pub fn add_line(&mut self, length: f32, options: Option<&LineOptions>) -> Result<()> {
        let options = options.copied().unwrap_or_default();
        let units = self.units;
        let document = self.open_document()?;
        let cursor = *document.cursor_mut()?;

        let mut operations = vec![save_state()];
        operations.extend(set_stroke_style(options.color, options.width));
        operations.extend(draw_line(
            units.to_native(cursor.x),
            units.to_native(cursor.y),
            units.to_native(cursor.x + length),
            units.to_native(cursor.y),
        ));
        operations.push(restore_state());
        document.writer.push_operations(operations)
    }

    pub fn cursor_x(&self) -> Result<f32> {
        Ok(self.cursor()?.x)
    }

    pub fn cursor_y(&self) -> Result<f32> {
        Ok(self.cursor()?.y)
    }

    pub fn set_cursor_x(&mut self, x: f32) -> Result<()> {
        self.cursor_mut()?.x = x;
        Ok(())
    }

    pub fn set_cursor_y(&mut self, y: f32) -> Result<()> {
        self.cursor_mut()?.y = y;
        Ok(())
    }

    /// Page width in millimetres, orientation applied
    pub fn page_width(&self) -> f32 {
        self.options.page_dimensions().0
    }

    /// Page height in millimetres, orientation applied
    pub fn page_height(&self) -> f32 {
        self.options.page_dimensions().1
    }

    /// Pages in the open document; zero when closed
    pub fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map(|document| document.writer.page_count())
            .unwrap_or(0)
    }

    fn default_line_height(&self) -> f32 {
        self.units
            .to_mm(self.options.text_font().size * DEFAULT_LINE_HEIGHT_MULTIPLIER)
    }

    fn open_document(&mut self) -> Result<&mut OpenDocument> {
        self.document.as_mut().ok_or(BuilderError::NotOpened)
    }

    fn cursor(&self) -> Result<&PageCursor> {
        self.document
            .as_ref()
            .ok_or(BuilderError::NotOpened)?
            .cursor
            .as_ref()
            .ok_or(BuilderError::NoActivePage)
    }

    fn cursor_mut(&mut self) -> Result<&mut PageCursor> {
        self.open_document()?.cursor_mut()
    }

    fn add_line_of_text(&mut self, text: &str, font: &FontOptions) -> Result<()> {
        self.cursor_mut()?.carriage_return();
        self.draw_text_run(text, font)?;
        self.new_line(None)
    }

    fn draw_text_run(&mut self, text: &str, font: &FontOptions) -> Result<()> {
        let units = self.units;
        let document = self.open_document()?;
        let (x, y) = {
            let cursor = document.cursor_mut()?;
            (cursor.x, cursor.y)
        };

        let handle = document.font(font)?;
        if text.is_empty() {
            return Ok(());
        }

        let width = handle.metrics().text_width(text, font.size);
        document.writer.push_operations(draw_text(
            &handle,
            font.size,
            font.color,
            units.to_native(x),
            units.to_native(y),
            text,
        ))?;
        document.cursor_mut()?.x += units.to_mm(width);
        Ok(())
    }

    fn fire_page_hooks(&mut self) -> Result<()> {
        if let Some(mut hook) = self.page_header.take() {
            let result = hook(&mut PageCanvas { session: self });
            self.page_header = Some(hook);
            result?;
        }
        if let Some(mut hook) = self.page_footer.take() {
            let result = hook(&mut PageCanvas { session: self });
            self.page_footer = Some(hook);
            result?;
        }
        Ok(())
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new(DocumentOptions::default())
    }
}

impl fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSession")
            .field("options", &self.options)
            .field("open", &self.is_open())
            .field("page_count", &self.page_count())
            .field("page_header", &self.page_header.is_some())
            .field("page_footer", &self.page_footer.is_some())
            .finish()
    }
}

/// Tables continue on pages created through the session so hooks still fire
struct SessionSurface<'a>(&'a mut DocumentSession);

impl TableSurface for SessionSurface<'_> {
    fn emit(&mut self, operations: Vec<Operation>) -> Result<()> {
        self.0.open_document()?.writer.push_operations(operations)
    }

    fn break_page(&mut self) -> Result<f32> {
        self.0.new_page()?;
        self.0.cursor_y()
    }
}

/// The view of a session given to page header and footer hooks: cursor
/// access, page geometry, single-line text and lines.
pub struct PageCanvas<'a> {
    session: &'a mut DocumentSession,
}

impl PageCanvas<'_> {
    pub fn cursor_x(&self) -> Result<f32> {
        self.session.cursor_x()
    }

    pub fn cursor_y(&self) -> Result<f32> {
        self.session.cursor_y()
    }

    pub fn set_cursor_x(&mut self, x: f32) -> Result<()> {
        self.session.set_cursor_x(x)
    }

    pub fn set_cursor_y(&mut self, y: f32) -> Result<()> {
        self.session.set_cursor_y(y)
    }

    pub fn page_width(&self) -> f32 {
        self.session.page_width()
    }

    pub fn page_height(&self) -> f32 {
        self.session.page_height()
    }

    /// Number of the page being decorated, counting from one
    pub fn page_count(&self) -> usize {
        self.session.page_count()
    }

    pub fn options(&self) -> &DocumentOptions {
        self.session.options()
    }

    pub fn add_text(&mut self, text: &str, options: Option<&TextOptions>) -> Result<()> {
        self.session.add_text(text, options)
    }

    pub fn new_line(&mut self, height: Option<f32>) -> Result<()> {
        self.session.new_line(height)
    }

    pub fn add_line(&mut self, length: f32, options: Option<&LineOptions>) -> Result<()> {
        self.session.add_line(length, options)
    }
}
