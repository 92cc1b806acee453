//! Text wrapping and paragraph line placement

use crate::constants::PARAGRAPH_LINE_EXTRA_SPACE;
use crate::font::FontMetrics;
use crate::style::BoxJustify;
use crate::units::UnitConverter;
use tracing::{trace, warn};

/// One line produced by wrapping
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Measured width in points
    pub width: f32,
    /// Last line before an explicit line break or the end of the text
    pub paragraph_end: bool,
}

/// A run of text positioned on the page, baseline origin in millimetres
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Outcome of placing a paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLayout {
    pub runs: Vec<TextRun>,
    /// Y after the last drawn line, in millimetres
    pub final_y: f32,
    /// Lines not drawn because they would cross the bottom limit
    pub dropped_lines: usize,
}

/// Geometry of the box a paragraph flows into, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub left: f32,
    pub width: f32,
    /// Baseline reference of the first line; each line first moves down by its ascent
    pub top: f32,
    pub bottom: f32,
    pub justify: BoxJustify,
    pub line_break_factor: f32,
}

/// Byte index splitting `word` after the last character that fits in `available` points
fn split_point(word: &str, available: f32, font_size: f32, metrics: &dyn FontMetrics) -> usize {
    let mut accumulated = 0.0;
    let mut split = 0;
    for (i, ch) in word.char_indices() {
        let char_width = metrics.char_width(ch, font_size);
        if accumulated + char_width > available {
            break;
        }
        accumulated += char_width;
        split = i + ch.len_utf8();
    }
    split
}

/// Break text into lines no wider than `max_width` points.
///
/// Explicit `\n` always starts a new line. A word that does not fit moves to
/// the next line only when the current line already fills `break_factor` of
/// the width; otherwise the word is split at the character that overflows.
pub fn wrap_text_with_metrics(
    text: &str,
    max_width: f32,
    font_size: f32,
    metrics: &dyn FontMetrics,
    break_factor: f32,
) -> Vec<WrappedLine> {
    let space_width = metrics.char_width(' ', font_size);
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let segment_start = lines.len();
        let mut line = String::new();
        let mut width: f32 = 0.0;

        for word in segment.split_whitespace() {
            let mut remaining = word;
            while !remaining.is_empty() {
                let separator = if line.is_empty() { 0.0 } else { space_width };
                let word_width = metrics.text_width(remaining, font_size);

                if width + separator + word_width <= max_width {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(remaining);
                    width += separator + word_width;
                    break;
                }

                if !line.is_empty() && width >= break_factor * max_width {
                    lines.push(WrappedLine {
                        text: std::mem::take(&mut line),
                        width,
                        paragraph_end: false,
                    });
                    width = 0.0;
                    continue;
                }

                let available = max_width - width - separator;
                let mut split = split_point(remaining, available, font_size, metrics);
                if split == 0 {
                    if !line.is_empty() {
                        lines.push(WrappedLine {
                            text: std::mem::take(&mut line),
                            width,
                            paragraph_end: false,
                        });
                        width = 0.0;
                        continue;
                    }
                    // a single character wider than the box still takes a line
                    split = remaining
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(remaining.len());
                }

                let (head, tail) = remaining.split_at(split);
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(head);
                width += separator + metrics.text_width(head, font_size);
                lines.push(WrappedLine {
                    text: std::mem::take(&mut line),
                    width,
                    paragraph_end: false,
                });
                width = 0.0;
                remaining = tail;
            }
        }

        if !line.is_empty() || lines.len() == segment_start {
            lines.push(WrappedLine {
                text: line,
                width,
                paragraph_end: true,
            });
        } else if let Some(last) = lines.last_mut() {
            last.paragraph_end = true;
        }
    }

    trace!("Wrapped text into {} lines", lines.len());
    lines
}

/// Wrap `text` into `text_box` and place every line.
///
/// Lines whose descent would cross `text_box.bottom` are not placed.
pub fn layout_paragraph(
    text: &str,
    font_size: f32,
    metrics: &dyn FontMetrics,
    text_box: &TextBox,
    units: &UnitConverter,
) -> ParagraphLayout {
    let box_width = units.to_native(text_box.width);
    let lines = wrap_text_with_metrics(
        text,
        box_width,
        font_size,
        metrics,
        text_box.line_break_factor,
    );
    let ascent = units.to_mm(metrics.ascent(font_size));
    let descent = units.to_mm(metrics.descent(font_size));

    let mut runs = Vec::new();
    let mut y = text_box.top;
    let mut placed = 0;

    for line in &lines {
        let baseline = y - ascent;
        if baseline - descent < text_box.bottom {
            break;
        }
        y = baseline;
        place_line(line, font_size, metrics, text_box, y, units, &mut runs);
        y -= descent + PARAGRAPH_LINE_EXTRA_SPACE;
        placed += 1;
    }

    let dropped_lines = lines.len() - placed;
    if dropped_lines > 0 {
        warn!(
            "{} of {} paragraph lines fall below the bottom margin and were not drawn",
            dropped_lines,
            lines.len()
        );
    }

    ParagraphLayout {
        runs,
        final_y: y,
        dropped_lines,
    }
}

fn place_line(
    line: &WrappedLine,
    font_size: f32,
    metrics: &dyn FontMetrics,
    text_box: &TextBox,
    y: f32,
    units: &UnitConverter,
    runs: &mut Vec<TextRun>,
) {
    if line.text.is_empty() {
        return;
    }

    let slack = (text_box.width - units.to_mm(line.width)).max(0.0);
    let x = match text_box.justify {
        BoxJustify::Left => text_box.left,
        BoxJustify::Center => text_box.left + slack / 2.0,
        BoxJustify::Right => text_box.left + slack,
        BoxJustify::FitToWidth => {
            let words: Vec<&str> = line.text.split(' ').collect();
            if !line.paragraph_end && words.len() > 1 {
                let gap = slack / (words.len() - 1) as f32;
                let space = units.to_mm(metrics.char_width(' ', font_size));
                let mut x = text_box.left;
                for word in words {
                    runs.push(TextRun {
                        text: word.to_string(),
                        x,
                        y,
                    });
                    x += units.to_mm(metrics.text_width(word, font_size)) + space + gap;
                }
                return;
            }
            text_box.left
        }
    };

    runs.push(TextRun {
        text: line.text.clone(),
        x,
        y,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PARAGRAPH_LINE_BREAK_FACTOR;

    /// Every character is half the font size wide
    struct FixedMetrics;

    impl FontMetrics for FixedMetrics {
        fn char_width(&self, _ch: char, font_size: f32) -> f32 {
            font_size * 0.5
        }

        fn ascent(&self, font_size: f32) -> f32 {
            font_size * 0.8
        }

        fn descent(&self, font_size: f32) -> f32 {
            font_size * 0.2
        }

        fn encode_text(&self, text: &str) -> Vec<u8> {
            text.as_bytes().to_vec()
        }
    }

    fn wrap(text: &str, max_width: f32) -> Vec<String> {
        wrap_text_with_metrics(text, max_width, 10.0, &FixedMetrics, PARAGRAPH_LINE_BREAK_FACTOR)
            .into_iter()
            .map(|line| line.text)
            .collect()
    }

    fn text_box(justify: BoxJustify) -> TextBox {
        let units = UnitConverter::new();
        TextBox {
            left: 10.0,
            // 100 points
            width: units.to_mm(100.0),
            top: 100.0,
            bottom: 10.0,
            justify,
            line_break_factor: PARAGRAPH_LINE_BREAK_FACTOR,
        }
    }

    #[test]
    fn test_wrap_at_word_boundaries() {
        // 5pt per char, 100pt holds 20 chars
        let lines = wrap("alpha beta gamma delta epsilon", 100.0);
        assert_eq!(lines, vec!["alpha beta gamma", "delta epsilon"]);
    }

    #[test]
    fn test_empty_text() {
        let lines = wrap_text_with_metrics("", 100.0, 10.0, &FixedMetrics, 0.5);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "");
        assert!(lines[0].paragraph_end);
    }

    #[test]
    fn test_text_with_multiple_newlines() {
        let lines = wrap("Line 1\n\nLine 3", 200.0);
        assert_eq!(lines, vec!["Line 1", "", "Line 3"]);
    }

    #[test]
    fn test_short_line_splits_long_word() {
        // "ab" fills 10pt of 100pt, below half, so the long word is split
        let lines = wrap("ab abcdefghijklmnopqrstuvwxyz", 100.0);
        assert_eq!(lines, vec!["ab abcdefghijklmnopq", "rstuvwxyz"]);
    }

    #[test]
    fn test_full_line_moves_word_down() {
        // 12 chars fill 60pt, above half, so the next word moves down whole
        let lines = wrap("abcdefghijkl mnopqrstu", 100.0);
        assert_eq!(lines, vec!["abcdefghijkl", "mnopqrstu"]);
    }

    #[test]
    fn test_multibyte_long_word_splitting() {
        let text = "caf\u{00e9}caf\u{00e9}caf\u{00e9}caf\u{00e9}caf\u{00e9}";
        let lines = wrap(text, 30.0);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.join(""), text);
    }

    #[test]
    fn test_paragraph_end_flags() {
        let lines = wrap_text_with_metrics(
            "alpha beta gamma delta epsilon\nzeta",
            100.0,
            10.0,
            &FixedMetrics,
            0.5,
        );
        let ends: Vec<bool> = lines.iter().map(|line| line.paragraph_end).collect();
        assert_eq!(ends, vec![false, true, true]);
    }

    #[test]
    fn test_layout_left_lines_step_down() {
        let units = UnitConverter::new();
        let layout = layout_paragraph(
            "alpha beta gamma delta epsilon",
            10.0,
            &FixedMetrics,
            &text_box(BoxJustify::Left),
            &units,
        );
        assert_eq!(layout.runs.len(), 2);
        assert_eq!(layout.dropped_lines, 0);

        let ascent = units.to_mm(8.0);
        let descent = units.to_mm(2.0);
        let first = &layout.runs[0];
        assert_eq!(first.x, 10.0);
        assert!((first.y - (100.0 - ascent)).abs() < 1e-4);

        let step = ascent + descent + PARAGRAPH_LINE_EXTRA_SPACE;
        assert!((layout.runs[1].y - (first.y - step)).abs() < 1e-4);
        assert!((layout.final_y - (100.0 - 2.0 * step)).abs() < 1e-4);
    }

    #[test]
    fn test_layout_right_and_center() {
        let units = UnitConverter::new();
        // "abcd" is 20pt wide in a 100pt box
        let right_box = text_box(BoxJustify::Right);
        let right = layout_paragraph("abcd", 10.0, &FixedMetrics, &right_box, &units);
        assert!((right.runs[0].x - (10.0 + units.to_mm(80.0))).abs() < 1e-4);

        let center_box = text_box(BoxJustify::Center);
        let center = layout_paragraph("abcd", 10.0, &FixedMetrics, &center_box, &units);
        assert!((center.runs[0].x - (10.0 + units.to_mm(40.0))).abs() < 1e-4);
    }

    #[test]
    fn test_justify_stretches_all_but_last_line() {
        let units = UnitConverter::new();
        let layout = layout_paragraph(
            "alpha beta gamma delta epsilon",
            10.0,
            &FixedMetrics,
            &text_box(BoxJustify::FitToWidth),
            &units,
        );
        // first line placed word by word, last line as a single run
        assert_eq!(layout.runs.len(), 4);
        assert_eq!(layout.runs[0].text, "alpha");
        assert_eq!(layout.runs[3].text, "delta epsilon");

        let gamma = &layout.runs[2];
        let gamma_end = gamma.x + units.to_mm(25.0);
        assert!((gamma_end - (10.0 + units.to_mm(100.0))).abs() < 1e-3);
        assert_eq!(layout.runs[3].x, 10.0);
    }

    #[test]
    fn test_lines_below_bottom_are_dropped() {
        let units = UnitConverter::new();
        let mut text_box = text_box(BoxJustify::Left);
        // room for exactly one line of about 3.5mm
        text_box.bottom = text_box.top - 5.0;
        let layout = layout_paragraph(
            "alpha beta gamma delta epsilon",
            10.0,
            &FixedMetrics,
            &text_box,
            &units,
        );
        assert_eq!(layout.runs.len(), 1);
        assert_eq!(layout.dropped_lines, 1);
    }
}
