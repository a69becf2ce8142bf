//! Imperative handle - What a forwarded ref receives.
//!
//! A [`ComponentHandle`] gives callers controlled access to the rendered
//! node: read it, push values onto it directly, or ask for a re-render.
//! Every operation checks the mount flag first, so a handle that outlives its
//! component turns into a harmless no-op instead of touching a dead node.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::BridgeError;
use crate::types::Snapshot;
use super::flush::{FlushOutcome, FlushStrategy};
use super::refs::NodeRef;

/// Request a forced re-render of one component instance.
pub type RequestRedraw = Rc<dyn Fn()>;

/// Imperative handle to an animated component's node.
pub struct ComponentHandle<N> {
    node: NodeRef<N>,
    mounted: Rc<Cell<bool>>,
    redraw: RequestRedraw,
    flush: Rc<dyn FlushStrategy<N>>,
}

impl<N> Clone for ComponentHandle<N> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            mounted: self.mounted.clone(),
            redraw: self.redraw.clone(),
            flush: self.flush.clone(),
        }
    }
}

impl<N: Clone> ComponentHandle<N> {
    /// Build a handle over a component's node slot and mount flag.
    pub fn new(
        node: NodeRef<N>,
        mounted: Rc<Cell<bool>>,
        redraw: RequestRedraw,
        flush: Rc<dyn FlushStrategy<N>>,
    ) -> Self {
        Self {
            node,
            mounted,
            redraw,
            flush,
        }
    }

    /// The rendered node, or `None` before the first render and after unmount.
    pub fn node(&self) -> Option<N> {
        if !self.mounted.get() {
            return None;
        }
        self.node.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Request a re-render. Returns `false` (and does nothing) once unmounted.
    pub fn force_update(&self) -> bool {
        if !self.mounted.get() {
            return false;
        }
        (self.redraw)();
        true
    }

    /// Write `values` straight onto the node.
    ///
    /// If the node refuses them, a re-render is requested instead.
    pub fn set_native_props(&self, values: &Snapshot) -> Result<FlushOutcome, BridgeError> {
        if !self.mounted.get() {
            return Err(BridgeError::Unmounted);
        }
        let node = self.node.get().ok_or(BridgeError::NoNode)?;

        if self.flush.apply(&node, values) {
            Ok(FlushOutcome::Applied)
        } else {
            // The flush may have run a callback that unmounted us.
            if self.mounted.get() {
                (self.redraw)();
            }
            Ok(FlushOutcome::Rerender)
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for ComponentHandle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("node", &self.node)
            .field("mounted", &self.mounted.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle_with(
        accept: bool,
    ) -> (ComponentHandle<u32>, NodeRef<u32>, Rc<Cell<bool>>, Rc<Cell<usize>>) {
        let node = NodeRef::new();
        let mounted = Rc::new(Cell::new(true));
        let redraws = Rc::new(Cell::new(0));
        let redraws_clone = redraws.clone();

        let flush = move |_: &u32, _: &Snapshot| accept;
        let handle = ComponentHandle::new(
            node.clone(),
            mounted.clone(),
            Rc::new(move || redraws_clone.set(redraws_clone.get() + 1)),
            Rc::new(flush),
        );
        (handle, node, mounted, redraws)
    }

    #[test]
    fn test_node_hidden_after_unmount() {
        let (handle, node, mounted, _) = handle_with(true);
        assert_eq!(handle.node(), None);

        node.set(Some(1));
        assert_eq!(handle.node(), Some(1));

        mounted.set(false);
        assert_eq!(handle.node(), None);
    }

    #[test]
    fn test_force_update_respects_mount_flag() {
        let (handle, _node, mounted, redraws) = handle_with(true);

        assert!(handle.force_update());
        assert_eq!(redraws.get(), 1);

        mounted.set(false);
        assert!(!handle.force_update());
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn test_set_native_props_outcomes() {
        let values = Snapshot::new().with("opacity", 0.3);

        let (handle, node, mounted, redraws) = handle_with(true);
        assert_eq!(handle.set_native_props(&values), Err(BridgeError::NoNode));

        node.set(Some(1));
        assert_eq!(handle.set_native_props(&values), Ok(FlushOutcome::Applied));
        assert_eq!(redraws.get(), 0);

        mounted.set(false);
        assert_eq!(handle.set_native_props(&values), Err(BridgeError::Unmounted));

        let (handle, node, _, redraws) = handle_with(false);
        node.set(Some(1));
        assert_eq!(handle.set_native_props(&values), Ok(FlushOutcome::Rerender));
        assert_eq!(redraws.get(), 1);
    }
}
