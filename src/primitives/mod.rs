//! Primitives - The reference rendering backend.
//!
//! - [`StyledBox`] - declarative component that owns a [`StyledNode`]
//! - [`apply_styled_values`] - in-place flush strategy for that node
//!
//! # Direct vs declarative writes
//!
//! ```text
//! fg, bg, opacity, attrs, content, scroll   → written in place
//! width, height, visible (when changed)     → refused, re-render
//! unknown props                             → refused, re-render
//! ```

mod box_primitive;
mod styled;

pub use box_primitive::StyledBox;
pub use styled::{apply_styled_values, Dirty, NodeHandle, StyledNode};
