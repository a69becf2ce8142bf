//! Styled node - A retained terminal node that accepts direct writes.
//!
//! [`StyledNode`] is the node a [`StyledBox`](super::StyledBox) renders. It
//! can be updated two ways:
//!
//! - **declaratively**, by a render: every known prop is written, layout
//!   included, and anything not mentioned reverts to its default
//! - **in place**, by [`apply_styled_values`]: visual props (colors,
//!   opacity, attributes, content, scroll) are written directly; anything that
//!   would change layout is refused so the bridge falls back to a render
//!
//! Writes mark [`Dirty`] flags so a renderer knows what changed.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::types::{Attr, Dimension, Rgba, Snapshot, Value};

bitflags::bitflags! {
    /// What a write touched since the last [`StyledNode::take_dirty`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u8 {
        const NONE = 0;
        const VISUAL = 1 << 0;
        const TEXT = 1 << 1;
        const SCROLL = 1 << 2;
        const LAYOUT = 1 << 3;
    }
}

/// How a write reaches the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    /// Full render: layout props allowed, unknown props ignored.
    Declarative,
    /// Animation frame: layout changes and unknown props refused.
    Direct,
}

/// Shared handle to a rendered node.
pub type NodeHandle = Rc<RefCell<StyledNode>>;

/// A retained, mutable terminal node.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledNode {
    /// Stable node id assigned at creation.
    pub id: usize,
    pub content: String,
    pub fg: Rgba,
    pub bg: Rgba,
    /// 0.0 = invisible, 1.0 = opaque.
    pub opacity: f32,
    pub attrs: Attr,
    pub width: Dimension,
    pub height: Dimension,
    pub visible: bool,
    pub scroll_x: u16,
    pub scroll_y: u16,
    dirty: Dirty,
}

impl StyledNode {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            content: String::new(),
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            opacity: 1.0,
            attrs: Attr::NONE,
            width: Dimension::Auto,
            height: Dimension::Auto,
            visible: true,
            scroll_x: 0,
            scroll_y: 0,
            dirty: Dirty::NONE,
        }
    }

    /// Wrap in a shared handle.
    pub fn into_handle(self) -> NodeHandle {
        Rc::new(RefCell::new(self))
    }

    /// Write a full render's props. Unmentioned props revert to defaults.
    pub fn reconcile(&mut self, values: &Snapshot) {
        let before = self.clone();
        let pending = self.dirty;
        let defaults = StyledNode::new(self.id);
        self.content = defaults.content;
        self.fg = defaults.fg;
        self.bg = defaults.bg;
        self.opacity = defaults.opacity;
        self.attrs = defaults.attrs;
        self.width = defaults.width;
        self.height = defaults.height;
        self.visible = defaults.visible;

        self.write_all(values, WriteMode::Declarative);

        // Flags set while writing compare against defaults, not the old node.
        self.dirty = pending | before.diff(self);
    }

    /// Write an animation frame's values in place.
    ///
    /// Returns `false` if any value could not be applied directly; the values
    /// that could be applied still are.
    pub fn apply(&mut self, values: &Snapshot) -> bool {
        self.write_all(values, WriteMode::Direct)
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Return and clear the dirty flags.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    /// Foreground color after opacity.
    pub fn effective_fg(&self) -> Rgba {
        self.fg.with_opacity(self.opacity)
    }

    fn write_all(&mut self, values: &Snapshot, mode: WriteMode) -> bool {
        let mut applied = true;
        for (name, value) in values.iter() {
            if !self.write(name, value, mode) {
                trace!(node = self.id, prop = name, "prop refused direct write");
                applied = false;
            }
        }
        applied
    }

    fn write(&mut self, name: &str, value: &Value, mode: WriteMode) -> bool {
        match name {
            "content" | "text" => match value.as_text() {
                Some(text) => {
                    if self.content != text {
                        self.content = text.to_string();
                        self.dirty |= Dirty::TEXT;
                    }
                    true
                }
                None => false,
            },
            "fg" | "color" => self.write_color(value, |node| &mut node.fg),
            "bg" | "backgroundColor" => self.write_color(value, |node| &mut node.bg),
            "opacity" => match value.as_number() {
                Some(n) => {
                    let opacity = n.clamp(0.0, 1.0) as f32;
                    if self.opacity != opacity {
                        self.opacity = opacity;
                        self.dirty |= Dirty::VISUAL;
                    }
                    true
                }
                None => false,
            },
            "attrs" => match value {
                Value::Attr(attrs) => {
                    if self.attrs != *attrs {
                        self.attrs = *attrs;
                        self.dirty |= Dirty::VISUAL;
                    }
                    true
                }
                _ => false,
            },
            "bold" => self.write_attr(value, Attr::BOLD),
            "italic" => self.write_attr(value, Attr::ITALIC),
            "underline" => self.write_attr(value, Attr::UNDERLINE),
            "dim" => self.write_attr(value, Attr::DIM),
            "scrollLeft" => self.write_scroll(value, |node| &mut node.scroll_x),
            "scrollTop" => self.write_scroll(value, |node| &mut node.scroll_y),
            "width" => self.write_layout(value, mode, |node| &mut node.width),
            "height" => self.write_layout(value, mode, |node| &mut node.height),
            "visible" => match value.as_bool() {
                Some(visible) if visible == self.visible => true,
                Some(visible) if mode == WriteMode::Declarative => {
                    self.visible = visible;
                    self.dirty |= Dirty::LAYOUT;
                    true
                }
                _ => false,
            },
            "style" => match value.as_style() {
                Some(style) => self.write_all(style, mode),
                None => false,
            },
            _ => mode == WriteMode::Declarative,
        }
    }

    fn write_color(&mut self, value: &Value, field: impl Fn(&mut Self) -> &mut Rgba) -> bool {
        let Some(color) = value.as_color() else {
            return false;
        };
        let slot = field(self);
        if *slot != color {
            *slot = color;
            self.dirty |= Dirty::VISUAL;
        }
        true
    }

    fn write_attr(&mut self, value: &Value, flag: Attr) -> bool {
        let Some(on) = value.as_bool() else {
            return false;
        };
        if self.attrs.contains(flag) != on {
            self.attrs.set(flag, on);
            self.dirty |= Dirty::VISUAL;
        }
        true
    }

    fn write_scroll(&mut self, value: &Value, field: impl Fn(&mut Self) -> &mut u16) -> bool {
        let Some(n) = value.as_number() else {
            return false;
        };
        let offset = n.round().clamp(0.0, u16::MAX as f64) as u16;
        let slot = field(self);
        if *slot != offset {
            *slot = offset;
            self.dirty |= Dirty::SCROLL;
        }
        true
    }

    fn write_layout(
        &mut self,
        value: &Value,
        mode: WriteMode,
        field: impl Fn(&mut Self) -> &mut Dimension,
    ) -> bool {
        let Some(dimension) = value.as_dimension() else {
            return false;
        };
        let slot = field(self);
        if *slot == dimension {
            return true;
        }
        if mode == WriteMode::Direct {
            return false;
        }
        *slot = dimension;
        self.dirty |= Dirty::LAYOUT;
        true
    }

    fn diff(&self, other: &StyledNode) -> Dirty {
        let mut dirty = Dirty::NONE;
        if self.content != other.content {
            dirty |= Dirty::TEXT;
        }
        if self.fg != other.fg
            || self.bg != other.bg
            || self.opacity != other.opacity
            || self.attrs != other.attrs
        {
            dirty |= Dirty::VISUAL;
        }
        if self.width != other.width
            || self.height != other.height
            || self.visible != other.visible
        {
            dirty |= Dirty::LAYOUT;
        }
        if self.scroll_x != other.scroll_x || self.scroll_y != other.scroll_y {
            dirty |= Dirty::SCROLL;
        }
        dirty
    }
}

/// Flush strategy for [`StyledNode`]s.
///
/// Pass this to [`create_animated_component`](crate::bridge::create_animated_component).
pub fn apply_styled_values(node: &NodeHandle, values: &Snapshot) -> bool {
    node.borrow_mut().apply(values)
}

// =============================================================================
// TESTS
// =============================================================================
