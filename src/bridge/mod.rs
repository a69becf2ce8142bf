//! Bridge - Animated props on a declarative component.
//!
//! - [`AnimatedComponent`] - per-instance orchestrator (see [`component`] docs)
//! - [`FlushStrategy`] - in-place writes onto a rendered node
//! - [`ComponentHandle`] - what a forwarded ref receives
//! - [`NodeRef`] / [`RefSink`] / [`compose_refs`] - ref plumbing

pub mod component;
mod flush;
mod handle;
mod refs;

pub use component::{create_animated_component, AnimatedComponent, Component, Lifecycle};
pub use flush::{DeclarativeOnly, FlushOutcome, FlushStrategy};
pub use handle::{ComponentHandle, RequestRedraw};
pub use refs::{compose_refs, NodeRef, RefCallback, RefSink};
