//! Authoring position on the active page

use crate::options::Margins;

/// Current (x, y) position in millimetres, origin bottom-left, plus the
/// geometry of the page it lives on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub x: f32,
    pub y: f32,
    page_width: f32,
    margins: Margins,
}

impl PageCursor {
    /// Cursor at the top-left corner of the printable area
    pub fn new(page_width: f32, page_height: f32, margins: Margins) -> Self {
        Self {
            x: margins.left,
            y: page_height - margins.top,
            page_width,
            margins,
        }
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Right edge of the printable area
    pub fn right_edge(&self) -> f32 {
        self.page_width - self.margins.right
    }

    pub fn carriage_return(&mut self) {
        self.x = self.margins.left;
    }

    /// Back to the left margin, `height` further down
    pub fn advance_line(&mut self, height: f32) {
        self.carriage_return();
        self.y -= height;
    }
}
