//! Flush strategy - Writing resolved values straight onto a rendered node.
//!
//! The bridge decides *when* to flush and what to do if it fails. *How*
//! values land on a node belongs to the rendering backend, injected as a
//! [`FlushStrategy`]. A plain closure works:
//!
//! ```ignore
//! let flush = |node: &NodeHandle, values: &Snapshot| node.borrow_mut().apply(values);
//! ```
//!
//! Returning `false` is not an error. It means "this node cannot take these
//! values directly", and the bridge falls back to a declarative re-render.

use crate::types::Snapshot;

/// Apply resolved values to a node in place.
pub trait FlushStrategy<N> {
    /// Returns `true` if the node now fully reflects `values`.
    fn apply(&self, node: &N, values: &Snapshot) -> bool;
}

impl<N, F> FlushStrategy<N> for F
where
    F: Fn(&N, &Snapshot) -> bool,
{
    fn apply(&self, node: &N, values: &Snapshot) -> bool {
        self(node, values)
    }
}

/// Strategy for nodes that never accept direct mutation.
///
/// Every change goes through the declarative path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarativeOnly;

impl<N> FlushStrategy<N> for DeclarativeOnly {
    fn apply(&self, _node: &N, _values: &Snapshot) -> bool {
        false
    }
}

/// Result of a single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Values were written onto the node; no re-render needed.
    Applied,
    /// The node refused the values; a re-render was requested.
    Rerender,
    /// Nothing to flush to (no node, or unmounted).
    Skipped,
}
