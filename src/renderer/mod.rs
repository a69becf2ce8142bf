//! Terminal renderer for styled nodes.

mod output;

pub use output::{
    content_style, to_crossterm_attributes, to_crossterm_color, write_node, DIM_OPACITY,
};
