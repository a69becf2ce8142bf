//! Node output - Paint a [`StyledNode`] to a terminal.
//!
//! Uses crossterm's queued commands, so any `Write` works as a target: a
//! locked stdout in an app, a `Vec<u8>` in tests. Nothing is flushed here;
//! callers flush once per frame.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Attributes, Color, ContentStyle, PrintStyledContent, StyledContent,
};

use crate::primitives::StyledNode;
use crate::types::{Attr, Dimension, Rgba};

/// Below this opacity text is drawn dim; at zero it is not drawn at all.
pub const DIM_OPACITY: f32 = 0.5;

/// Convert a color to crossterm's representation.
pub fn to_crossterm_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.ansi_index())
    } else {
        Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        }
    }
}

/// Convert attribute flags to crossterm attributes.
pub fn to_crossterm_attributes(attrs: Attr) -> Attributes {
    const MAPPING: [(Attr, Attribute); 8] = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::HIDDEN, Attribute::Hidden),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ];

    let mut attributes = Attributes::default();
    for (flag, attribute) in MAPPING {
        if attrs.contains(flag) {
            attributes.set(attribute);
        }
    }
    attributes
}

/// The crossterm style a node's content is drawn with.
pub fn content_style(node: &StyledNode) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = Some(to_crossterm_color(node.fg));
    style.background_color = Some(to_crossterm_color(node.bg));
    style.attributes = to_crossterm_attributes(node.attrs);
    if node.opacity < DIM_OPACITY {
        style.attributes.set(Attribute::Dim);
    }
    style
}

/// Queue a node's visible content at `(x, y)`.
///
/// Applies the node's scroll offsets, clips to a fixed width or height when
/// one is set, and draws nothing for hidden or fully transparent nodes.
/// Returns the number of lines queued.
pub fn write_node<W: Write>(out: &mut W, node: &StyledNode, x: u16, y: u16) -> io::Result<usize> {
    if !node.visible || node.opacity <= 0.0 {
        return Ok(0);
    }

    let style = content_style(node);
    let max_width = match node.width {
        Dimension::Cells(w) => Some(w as usize),
        _ => None,
    };
    let max_lines = match node.height {
        Dimension::Cells(h) => h as usize,
        _ => usize::MAX,
    };

    let mut written = 0;
    for (row, line) in node
        .content
        .lines()
        .skip(node.scroll_y as usize)
        .take(max_lines)
        .enumerate()
    {
        let visible: String = line
            .chars()
            .skip(node.scroll_x as usize)
            .take(max_width.unwrap_or(usize::MAX))
            .collect();

        queue!(
            out,
            MoveTo(x, y.saturating_add(row as u16)),
            PrintStyledContent(StyledContent::new(style, visible))
        )?;
        written += 1;
    }
    Ok(written)
}
