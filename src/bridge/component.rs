//! Animated component - Bridges animated props into a retained node.
//!
//! [`AnimatedComponent`] wraps any [`Component`] so it can take animated
//! values as props. It looks like the wrapped component from the outside (same
//! props, a ref that resolves to a handle, the same mount/unmount behavior),
//! but animation frames skip the declarative render entirely.
//!
//! # Lifecycle
//!
//! ```text
//! Created ──render──▶ Mounted ──unmount──▶ Disposed
//!                       │    ▲
//!                       └────┘ render (new props / forced redraw)
//! ```
//!
//! On every render:
//! 1. build a new [`PropertyBag`] from the props (subscribes animated members)
//! 2. tear down the previous bag (never before step 1, so there is no gap)
//! 3. resolve the snapshot and strip the extracted props (`scrollLeft`/`scrollTop`)
//! 4. render the wrapped component with a ref that captures its node
//!
//! On every animation change:
//! - no node captured, or unmounted: drop the change
//! - during steps 1-2: drop the change, step 3 reads the latest values anyway
//! - otherwise flush the latest snapshot onto the node
//! - if the flush refuses, request one forced re-render
//!
//! # Example
//!
//! ```ignore
//! use spark_animated::prelude::*;
//!
//! let queue = RedrawQueue::new();
//! let opacity = animated(0.5);
//!
//! let mut component = create_animated_component(
//!     StyledBox::new(),
//!     apply_styled_values,
//!     queue.requester(),
//! );
//!
//! component.render(Props::new().with("opacity", &opacity).with("fg", "red"));
//!
//! // Every frame: written straight onto the node, no re-render.
//! opacity.set(0.8);
//! assert!(queue.is_empty());
//!
//! component.unmount();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::config::{BridgeConfig, FallbackPolicy};
use crate::engine::Listener;
use crate::props::{PropertyBag, Props};
use crate::types::Snapshot;
use super::flush::{FlushOutcome, FlushStrategy};
use super::handle::{ComponentHandle, RequestRedraw};
use super::refs::{compose_refs, NodeRef, RefCallback, RefSink};

// =============================================================================
// Wrapped component contract
// =============================================================================

/// A declaratively rendered component that owns one retained node.
pub trait Component {
    /// Handle to the rendered node. Cloned into refs, so keep it cheap.
    type Node: Clone + 'static;

    /// Render with resolved props.
    ///
    /// Implementations report their node through `node_ref(Some(node))`.
    fn render(&mut self, props: &Snapshot, node_ref: &RefCallback<Self::Node>);

    /// Release the node and report `node_ref(None)`.
    fn unmount(&mut self, node_ref: &RefCallback<Self::Node>);
}

/// Bridge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, never rendered.
    Created,
    /// Rendered at least once.
    Mounted,
    /// Unmounted. Terminal.
    Disposed,
}

// =============================================================================
// Shared state (reachable from change listeners)
// =============================================================================

struct Shared<N> {
    bag: RefCell<Option<PropertyBag>>,
    node: NodeRef<N>,
    mounted: Rc<Cell<bool>>,
    flush: Rc<dyn FlushStrategy<N>>,
    redraw: RequestRedraw,
    config: BridgeConfig,
    /// Set while a render replaces its bag. Changes in that window are
    /// picked up by the render's own snapshot.
    swapping: Cell<bool>,
    flushes: Cell<usize>,
    fallbacks: Cell<usize>,
}

impl<N: Clone + 'static> Shared<N> {
    /// Full snapshot of the current bag, extracted props included.
    fn full_snapshot(&self) -> Option<Snapshot> {
        self.bag.borrow().as_ref().map(PropertyBag::snapshot)
    }

    /// React to an out-of-band change.
    fn on_change(&self) -> FlushOutcome {
        if !self.mounted.get() || self.swapping.get() {
            return FlushOutcome::Skipped;
        }
        let Some(node) = self.node.get() else {
            return FlushOutcome::Skipped;
        };
        let Some(values) = self.full_snapshot() else {
            return FlushOutcome::Skipped;
        };

        if self.config.trace_flushes {
            trace!(values = %values, "flushing animated values");
        }

        if self.flush.apply(&node, &values) {
            self.flushes.set(self.flushes.get() + 1);
            return FlushOutcome::Applied;
        }

        match self.config.fallback {
            FallbackPolicy::Redraw if self.mounted.get() => {
                self.fallbacks.set(self.fallbacks.get() + 1);
                debug!("direct flush refused, requesting re-render");
                (self.redraw)();
                FlushOutcome::Rerender
            }
            _ => FlushOutcome::Skipped,
        }
    }
}

// =============================================================================
// AnimatedComponent
// =============================================================================

/// A component whose props may be animated values.
pub struct AnimatedComponent<C: Component> {
    component: C,
    shared: Rc<Shared<C::Node>>,
    node_sinks: Vec<RefSink<C::Node>>,
    node_ref: RefCallback<C::Node>,
    forwarded: Option<RefSink<ComponentHandle<C::Node>>>,
    lifecycle: Lifecycle,
    renders: usize,
}

/// Wrap `component` so it accepts animated props.
///
/// - `flush` writes resolved values onto the component's node in place
/// - `redraw` asks the host to call [`AnimatedComponent::render`] again
pub fn create_animated_component<C, F>(
    component: C,
    flush: F,
    redraw: RequestRedraw,
) -> AnimatedComponent<C>
where
    C: Component,
    F: FlushStrategy<C::Node> + 'static,
{
    AnimatedComponent::with_config(component, flush, redraw, BridgeConfig::default())
}

impl<C: Component> AnimatedComponent<C> {
    pub fn new<F>(component: C, flush: F, redraw: RequestRedraw) -> Self
    where
        F: FlushStrategy<C::Node> + 'static,
    {
        Self::with_config(component, flush, redraw, BridgeConfig::default())
    }

    pub fn with_config<F>(
        component: C,
        flush: F,
        redraw: RequestRedraw,
        config: BridgeConfig,
    ) -> Self
    where
        F: FlushStrategy<C::Node> + 'static,
    {
        let shared = Rc::new(Shared {
            bag: RefCell::new(None),
            node: NodeRef::new(),
            mounted: Rc::new(Cell::new(false)),
            swapping: Cell::new(false),
            flush: Rc::new(flush),
            redraw,
            config,
            flushes: Cell::new(0),
            fallbacks: Cell::new(0),
        });

        let node_sinks = vec![RefSink::from(&shared.node)];
        let node_ref = compose_refs(node_sinks.clone());

        Self {
            component,
            shared,
            node_sinks,
            node_ref,
            forwarded: None,
            lifecycle: Lifecycle::Created,
            renders: 0,
        }
    }

    // =========================================================================
    // Refs
    // =========================================================================

    /// Forward the imperative handle to `sink`.
    ///
    /// The sink receives the handle after every render and `None` on unmount.
    pub fn forward_ref(&mut self, sink: impl Into<RefSink<ComponentHandle<C::Node>>>) {
        let sink = sink.into();
        if self.lifecycle == Lifecycle::Mounted {
            sink.write(Some(self.handle()));
        }
        self.forwarded = Some(sink);
    }

    /// Also deliver the raw node to `sink`.
    pub fn node_ref(&mut self, sink: impl Into<RefSink<C::Node>>) {
        let sink = sink.into();
        if let Some(node) = self.shared.node.get() {
            sink.write(Some(node));
        }
        self.node_sinks.push(sink);
        self.node_ref = compose_refs(self.node_sinks.clone());
    }

    /// Build an imperative handle for this instance.
    pub fn handle(&self) -> ComponentHandle<C::Node> {
        ComponentHandle::new(
            self.shared.node.clone(),
            self.shared.mounted.clone(),
            self.shared.redraw.clone(),
            self.shared.flush.clone(),
        )
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Render with a new prop bag (initial mount, update, or forced redraw).
    pub fn render(&mut self, props: Props) {
        if self.lifecycle == Lifecycle::Disposed {
            debug!("render after unmount ignored");
            return;
        }

        // New bag first, then retire the old one: never a moment with no
        // subscription.
        self.shared.swapping.set(true);
        let bag = PropertyBag::resolve(props, self.change_listener());
        let previous = self.shared.bag.replace(Some(bag));
        if let Some(mut previous) = previous {
            previous.teardown();
        }
        self.shared.swapping.set(false);
        self.shared.mounted.set(true);

        let mut forwarded = self.shared.full_snapshot().unwrap_or_default();
        let extracted = forwarded.extract(&self.shared.config.extracted_props);

        debug!(
            render = self.renders,
            props = forwarded.len(),
            extracted = extracted.len(),
            "props attached"
        );

        self.component.render(&forwarded, &self.node_ref);
        self.lifecycle = Lifecycle::Mounted;
        self.renders += 1;

        if let Some(sink) = &self.forwarded {
            sink.write(Some(self.handle()));
        }
    }

    /// Unmount. Terminal: later renders and changes are ignored.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }

        self.shared.mounted.set(false);

        // Unsubscribe before the node is cleared.
        let bag = self.shared.bag.borrow_mut().take();
        if let Some(mut bag) = bag {
            bag.teardown();
        }

        self.component.unmount(&self.node_ref);
        self.shared.node.clear();

        if let Some(sink) = &self.forwarded {
            sink.write(None);
        }

        self.lifecycle = Lifecycle::Disposed;
        debug!(renders = self.renders, "animated component unmounted");
    }

    fn change_listener(&self) -> Listener {
        let shared: Weak<Shared<C::Node>> = Rc::downgrade(&self.shared);
        Rc::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.on_change();
            }
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.get()
    }

    /// The captured node, if any.
    pub fn node(&self) -> Option<C::Node> {
        self.shared.node.get()
    }

    /// The wrapped component.
    pub fn inner(&self) -> &C {
        &self.component
    }

    /// Current snapshot as forwarded to the wrapped component.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.shared.full_snapshot().unwrap_or_default();
        snapshot.extract(&self.shared.config.extracted_props);
        snapshot
    }

    /// Current values of the props held back from the wrapped component.
    pub fn extracted(&self) -> Snapshot {
        let mut snapshot = self.shared.full_snapshot().unwrap_or_default();
        snapshot.extract(&self.shared.config.extracted_props)
    }

    /// Current `(scrollLeft, scrollTop)`, zero when not set.
    pub fn scroll_offset(&self) -> (f64, f64) {
        let extracted = self.extracted();
        let read = |name: &str| extracted.get(name).and_then(|v| v.as_number()).unwrap_or(0.0);
        (read("scrollLeft"), read("scrollTop"))
    }

    /// Number of declarative renders performed.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Number of animation changes written directly onto the node.
    pub fn flush_count(&self) -> usize {
        self.shared.flushes.get()
    }

    /// Number of forced re-renders requested after a refused flush.
    pub fn fallback_count(&self) -> usize {
        self.shared.fallbacks.get()
    }

    /// Live subscriptions held by the current bag.
    pub fn subscription_count(&self) -> usize {
        self.shared
            .bag
            .borrow()
            .as_ref()
            .map(PropertyBag::subscription_count)
            .unwrap_or(0)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.shared.config
    }
}

impl<C: Component> Drop for AnimatedComponent<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================
