//! # spark-animated
//!
//! Animated components for reactive terminal UIs.
//!
//! Declarative components only change when they are re-rendered with new
//! props. Animations change every frame. This crate bridges the two: wrap a
//! component with [`create_animated_component`] and it accepts animated values
//! as props, writing each frame straight onto the rendered node and falling
//! back to a normal re-render only when the node cannot take the write.
//!
//! ## Architecture
//!
//! ```text
//! Props ─▶ PropertyBag ─▶ Snapshot ─▶ Component::render ─▶ node ─▶ NodeRef
//!             │                                                      │
//!   animation frame ─▶ on_change ─▶ FlushStrategy::apply(node) ◀─────┘
//!                                        │ refused
//!                                        ▼
//!                                  RequestRedraw ─▶ render again
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core value types (Value, Snapshot, Rgba, Dimension, Attr)
//! - [`engine`] - Animated value contract and the stock `AnimatedValue`
//! - [`props`] - Prop bags and the subscribing `PropertyBag`
//! - [`bridge`] - `AnimatedComponent`, flush strategies, refs, imperative handle
//! - [`primitives`] - `StyledBox` / `StyledNode`, the reference backend
//! - [`pipeline`] - `RedrawQueue`, the host's forced re-render scheduler
//! - [`renderer`] - crossterm output for styled nodes
//! - [`config`] - `BridgeConfig`

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod props;
pub mod renderer;
pub mod types;

pub use types::*;

pub use bridge::{
    compose_refs, create_animated_component, AnimatedComponent, Component, ComponentHandle,
    DeclarativeOnly, FlushOutcome, FlushStrategy, Lifecycle, NodeRef, RefCallback, RefSink,
    RequestRedraw,
};

pub use config::{BridgeConfig, FallbackPolicy, SCROLL_PROPS};

pub use engine::{animated, watch, Animated, AnimatedValue, Listener, Unsubscribe};

pub use error::{BridgeError, ConfigError};

pub use pipeline::RedrawQueue;

pub use primitives::{apply_styled_values, Dirty, NodeHandle, StyledBox, StyledNode};

pub use props::{PropValue, PropertyBag, Props};

/// Everything needed to build and drive an animated component.
pub mod prelude {
    pub use crate::bridge::{
        create_animated_component, AnimatedComponent, Component, ComponentHandle, FlushOutcome,
        FlushStrategy, NodeRef, RefSink,
    };
    pub use crate::config::BridgeConfig;
    pub use crate::engine::{animated, Animated, AnimatedValue};
    pub use crate::pipeline::RedrawQueue;
    pub use crate::primitives::{apply_styled_values, StyledBox, StyledNode};
    pub use crate::props::{PropValue, Props};
    pub use crate::types::{Attr, Dimension, Rgba, Snapshot, Value};
}
