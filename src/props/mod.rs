//! Props - Declarative input and the property bag that tracks it.
//!
//! - [`Props`] / [`PropValue`] - what callers pass on every render
//! - [`PropertyBag`] - resolves props to a [`Snapshot`](crate::types::Snapshot)
//!   and subscribes to the animated ones

mod bag;
mod types;

pub use bag::PropertyBag;
pub use types::{PropValue, Props};
