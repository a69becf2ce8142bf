//! Animation engine boundary.
//!
//! The bridge consumes animated values only through the [`Animated`] trait.
//! [`AnimatedValue`] is the stock implementation used by hosts and tests;
//! `spark_signals` signals and deriveds implement it as well.

mod animated;

pub use animated::*;
