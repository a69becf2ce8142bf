//! Redraw queue - The host side of "request a forced re-render".
//!
//! An animated component never re-renders itself; it asks. A [`RedrawQueue`]
//! collects those requests from any number of requesters and lets the host
//! decide when to act on them, typically once per frame:
//!
//! ```ignore
//! let queue = RedrawQueue::new();
//! let mut component =
//!     create_animated_component(StyledBox::new(), apply_styled_values, queue.requester());
//! component.render(props());
//!
//! loop {
//!     drive_animations();
//!     queue.drain(&mut component, props);
//! }
//! ```
//!
//! Requests made while draining are picked up by the same drain call, so a
//! render that immediately fails to flush still converges in one frame.
//! Requests left when the per-drain limit trips stay queued for the next one.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::bridge::{AnimatedComponent, Component, RequestRedraw};
use crate::props::Props;

/// Upper bound on re-renders per drain, to break a component that keeps
/// asking to be redrawn from every render.
pub const MAX_DRAIN_RENDERS: usize = 16;

/// Counts pending redraw requests.
#[derive(Debug, Clone, Default)]
pub struct RedrawQueue {
    pending: Rc<Cell<usize>>,
    total: Rc<Cell<usize>>,
}

impl RedrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A redraw capability to hand to a component.
    pub fn requester(&self) -> RequestRedraw {
        let pending = self.pending.clone();
        let total = self.total.clone();
        Rc::new(move || {
            pending.set(pending.get() + 1);
            total.set(total.get() + 1);
        })
    }

    /// Requests not yet consumed.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.get() == 0
    }

    /// Requests made over the queue's lifetime.
    pub fn total_requests(&self) -> usize {
        self.total.get()
    }

    /// Consume all pending requests, returning how many there were.
    pub fn take(&self) -> usize {
        self.pending.replace(0)
    }

    /// Re-render `component` while requests are pending.
    ///
    /// Several requests between drains collapse into one render. `props`
    /// supplies the current declarative props for each render. Stops after
    /// [`MAX_DRAIN_RENDERS`] renders, leaving later requests pending. Returns
    /// the number of renders performed.
    pub fn drain<C: Component>(
        &self,
        component: &mut AnimatedComponent<C>,
        mut props: impl FnMut() -> Props,
    ) -> usize {
        let mut renders = 0;
        while !self.is_empty() {
            if renders == MAX_DRAIN_RENDERS {
                debug!(renders, pending = self.pending(), "redraw drain limit reached");
                break;
            }
            self.take();
            component.render(props());
            renders += 1;
        }
        renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{DeclarativeOnly, RefCallback};
    use crate::types::Snapshot;

    /// Asks for another redraw from every render.
    struct Restless {
        request: RequestRedraw,
    }

    impl Component for Restless {
        type Node = ();

        fn render(&mut self, _: &Snapshot, node_ref: &RefCallback<()>) {
            node_ref(Some(()));
            (self.request)();
        }

        fn unmount(&mut self, node_ref: &RefCallback<()>) {
            node_ref(None);
        }
    }

    #[test]
    fn test_requests_accumulate_until_taken() {
        let queue = RedrawQueue::new();
        let request = queue.requester();

        request();
        request();
        assert_eq!(queue.pending(), 2);
        assert_eq!(queue.take(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.total_requests(), 2);
    }

    #[test]
    fn test_requesters_share_one_queue() {
        let queue = RedrawQueue::new();
        let a = queue.requester();
        let b = queue.clone().requester();

        a();
        b();
        assert_eq!(queue.pending(), 2);
    }

    #[test]
    fn test_drain_collapses_requests_into_one_render() {
        let queue = RedrawQueue::new();
        let mut component = AnimatedComponent::new(
            Restless {
                request: Rc::new(|| {}),
            },
            DeclarativeOnly,
            queue.requester(),
        );

        let request = queue.requester();
        request();
        request();
        request();

        assert_eq!(queue.drain(&mut component, Props::new), 1);
        assert!(queue.is_empty());
        assert_eq!(component.render_count(), 1);
    }

    #[test]
    fn test_drain_limit_keeps_outstanding_request() {
        let queue = RedrawQueue::new();
        let mut component = AnimatedComponent::new(
            Restless {
                request: queue.requester(),
            },
            DeclarativeOnly,
            queue.requester(),
        );

        queue.requester()();
        assert_eq!(queue.drain(&mut component, Props::new), MAX_DRAIN_RENDERS);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.total_requests(), MAX_DRAIN_RENDERS + 1);

        // The leftover request is served by the next drain.
        assert_eq!(queue.drain(&mut component, Props::new), MAX_DRAIN_RENDERS);
        assert_eq!(queue.pending(), 1);
        assert_eq!(component.render_count(), 2 * MAX_DRAIN_RENDERS);
    }
}
