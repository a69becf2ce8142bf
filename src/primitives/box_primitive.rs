//! Styled Box - The declarative component behind a [`StyledNode`].
//!
//! `StyledBox` is what an animated component wraps in practice: it creates
//! its node on the first render, reconciles it on every later render, and
//! reports it through the ref callback each time.
//!
//! # Example
//!
//! ```ignore
//! use spark_animated::prelude::*;
//!
//! let queue = RedrawQueue::new();
//! let fg = animated(Rgba::RED);
//!
//! let mut component = create_animated_component(
//!     StyledBox::new(),
//!     apply_styled_values,
//!     queue.requester(),
//! );
//! component.render(Props::new().with("fg", &fg).with("content", "Hello"));
//!
//! fg.set(Rgba::BLUE); // written straight onto the node
//! ```

use std::cell::Cell;

use crate::bridge::{Component, RefCallback};
use crate::types::Snapshot;
use super::styled::{NodeHandle, StyledNode};

thread_local! {
    /// Counter for node ids.
    static NEXT_NODE_ID: Cell<usize> = const { Cell::new(0) };
}

fn allocate_node_id() -> usize {
    NEXT_NODE_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

/// Declarative box component owning one [`StyledNode`].
#[derive(Debug, Default)]
pub struct StyledBox {
    node: Option<NodeHandle>,
    renders: usize,
}

impl StyledBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declarative renders this box has performed.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// The current node, if mounted.
    pub fn node(&self) -> Option<&NodeHandle> {
        self.node.as_ref()
    }
}

impl Component for StyledBox {
    type Node = NodeHandle;

    fn render(&mut self, props: &Snapshot, node_ref: &RefCallback<NodeHandle>) {
        let node = self
            .node
            .get_or_insert_with(|| StyledNode::new(allocate_node_id()).into_handle())
            .clone();

        node.borrow_mut().reconcile(props);
        self.renders += 1;

        node_ref(Some(node));
    }

    fn unmount(&mut self, node_ref: &RefCallback<NodeHandle>) {
        if self.node.take().is_some() {
            node_ref(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::bridge::NodeRef;
    use crate::types::Rgba;

    #[test]
    fn test_render_creates_then_reuses_node() {
        let slot: NodeRef<NodeHandle> = NodeRef::new();
        let sink = slot.clone();
        let node_ref: RefCallback<NodeHandle> = Rc::new(move |node| sink.set(node));

        let mut styled = StyledBox::new();
        styled.render(&Snapshot::new().with("fg", "red"), &node_ref);
        let first = slot.get().unwrap();
        assert_eq!(first.borrow().fg, Rgba::RED);

        styled.render(&Snapshot::new().with("fg", "blue"), &node_ref);
        let second = slot.get().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.borrow().fg, Rgba::BLUE);
        assert_eq!(styled.render_count(), 2);
    }

    #[test]
    fn test_unmount_clears_ref() {
        let slot: NodeRef<NodeHandle> = NodeRef::new();
        let sink = slot.clone();
        let node_ref: RefCallback<NodeHandle> = Rc::new(move |node| sink.set(node));

        let mut styled = StyledBox::new();
        styled.render(&Snapshot::new(), &node_ref);
        assert!(!slot.is_empty());

        styled.unmount(&node_ref);
        assert!(slot.is_empty());
        assert!(styled.node().is_none());
    }

    #[test]
    fn test_node_ids_are_unique() {
        let node_ref: RefCallback<NodeHandle> = Rc::new(|_| {});
        let mut a = StyledBox::new();
        let mut b = StyledBox::new();
        a.render(&Snapshot::new(), &node_ref);
        b.render(&Snapshot::new(), &node_ref);

        let a_id = a.node().unwrap().borrow().id;
        let b_id = b.node().unwrap().borrow().id;
        assert_ne!(a_id, b_id);
    }
}
