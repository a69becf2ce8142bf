//! Refs - Mutable node slots and ref composition.
//!
//! A [`NodeRef`] is a shared, optional slot. A [`RefSink`] is anything that
//! wants to be told about a value on mount (`Some`) and unmount (`None`):
//! either a slot or a callback. [`compose_refs`] fans one value out to any
//! number of sinks, which is how the bridge keeps its own node slot while
//! also forwarding the node to a caller.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// NodeRef
// =============================================================================

/// Shared optional slot.
///
/// Cloning produces another handle to the same slot.
pub struct NodeRef<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for NodeRef<T> {
    fn default() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T: Clone> NodeRef<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone out the current value.
    pub fn get(&self) -> Option<T> {
        self.slot.borrow().clone()
    }

    pub fn set(&self, value: Option<T>) {
        *self.slot.borrow_mut() = value;
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.slot.borrow()).finish()
    }
}

// =============================================================================
// RefSink
// =============================================================================

/// Ref callback: receives `Some(value)` on mount/update and `None` on unmount.
pub type RefCallback<T> = Rc<dyn Fn(Option<T>)>;

/// A consumer of ref values.
pub enum RefSink<T> {
    Slot(NodeRef<T>),
    Callback(RefCallback<T>),
}

impl<T: Clone> RefSink<T> {
    pub fn callback(f: impl Fn(Option<T>) + 'static) -> Self {
        RefSink::Callback(Rc::new(f))
    }

    pub fn write(&self, value: Option<T>) {
        match self {
            RefSink::Slot(slot) => slot.set(value),
            RefSink::Callback(f) => f(value),
        }
    }
}

impl<T> Clone for RefSink<T> {
    fn clone(&self) -> Self {
        match self {
            RefSink::Slot(slot) => RefSink::Slot(slot.clone()),
            RefSink::Callback(f) => RefSink::Callback(f.clone()),
        }
    }
}

impl<T> From<NodeRef<T>> for RefSink<T> {
    fn from(slot: NodeRef<T>) -> Self {
        RefSink::Slot(slot)
    }
}

impl<T> From<&NodeRef<T>> for RefSink<T> {
    fn from(slot: &NodeRef<T>) -> Self {
        RefSink::Slot(slot.clone())
    }
}

/// Combine any number of sinks into one callback that writes the same value
/// into each of them, in order.
pub fn compose_refs<T: Clone + 'static>(sinks: Vec<RefSink<T>>) -> RefCallback<T> {
    Rc::new(move |value: Option<T>| {
        for sink in &sinks {
            sink.write(value.clone());
        }
    })
}
