//! Shared content-stream operation builders
//!
//! Every coordinate here is in points, origin bottom-left.

use crate::font_cache::FontHandle;
use crate::style::Color;
use lopdf::{Object, StringFormat, content::Operation};

/// Save the graphics state
pub fn save_state() -> Operation {
    Operation::new("q", vec![])
}

/// Restore the graphics state
pub fn restore_state() -> Operation {
    Operation::new("Q", vec![])
}

/// Set the non-stroking (fill and text) color
pub fn fill_color(color: Color) -> Operation {
    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()])
}

/// Set stroke color and width for drawing operations
pub fn set_stroke_style(color: Color, width: f32) -> Vec<Operation> {
    vec![
        Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()]),
        Operation::new("w", vec![width.into()]),
    ]
}

/// Draw a filled rectangle
pub fn draw_rectangle_fill(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: Color,
) -> Vec<Operation> {
    vec![
        save_state(),
        fill_color(color),
        Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
        Operation::new("f", vec![]),
        restore_state(),
    ]
}

/// Restrict painting to a rectangle until the enclosing state is restored
pub fn clip_rectangle(x: f32, y: f32, width: f32, height: f32) -> Vec<Operation> {
    vec![
        Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
    ]
}

/// Stroke a straight line
pub fn draw_line(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Operation> {
    vec![
        Operation::new("m", vec![x0.into(), y0.into()]),
        Operation::new("l", vec![x1.into(), y1.into()]),
        Operation::new("S", vec![]),
    ]
}

/// Draw a horizontal line
pub fn draw_horizontal_line(start_x: f32, end_x: f32, y: f32) -> Vec<Operation> {
    draw_line(start_x, y, end_x, y)
}

/// Draw a vertical line
pub fn draw_vertical_line(x: f32, start_y: f32, end_y: f32) -> Vec<Operation> {
    draw_line(x, start_y, x, end_y)
}

/// Encode text as a string operand suited to the font
pub fn text_operand(font: &FontHandle, text: &str) -> Object {
    let metrics = font.metrics();
    let format = if metrics.is_composite() {
        StringFormat::Hexadecimal
    } else {
        StringFormat::Literal
    };
    Object::String(metrics.encode_text(text), format)
}

/// Draw a single run of text with its baseline starting at (x, y)
pub fn draw_text(
    font: &FontHandle,
    font_size: f32,
    color: Color,
    x: f32,
    y: f32,
    text: &str,
) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(font.resource_name().as_bytes().to_vec()),
                font_size.into(),
            ],
        ),
        fill_color(color),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![text_operand(font, text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Paint an image XObject into the rectangle with bottom-left corner (x, y)
pub fn draw_image(resource_name: &str, x: f32, y: f32, width: f32, height: f32) -> Vec<Operation> {
    vec![
        save_state(),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(resource_name.as_bytes().to_vec())]),
        restore_state(),
    ]
}
