//! Animated values - Values that change outside the render cycle.
//!
//! The bridge only ever talks to an animated value through the [`Animated`]
//! trait: read the current value, and subscribe to changes. Whatever drives
//! the value (a tween, a spring, a timer) lives on the other side of that trait.
//!
//! Reactive state comes from `spark-signals`. [`AnimatedValue`] wraps a
//! [`Signal`], and plain signals and deriveds implement [`Animated`] directly.
//! A subscription is an effect that tracks the source and calls the listener
//! on every later change; disposing the effect unsubscribes.
//!
//! # Example
//!
//! ```ignore
//! use spark_animated::engine::{animated, Animated};
//!
//! let opacity = animated(0.5);
//!
//! let unsubscribe = opacity.subscribe(Rc::new(|| println!("opacity changed")));
//! opacity.set(0.8); // prints once
//! opacity.set(0.8); // unchanged, no notification
//!
//! unsubscribe();
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use spark_signals::{effect, signal, untrack, Derived, Signal};

use crate::types::Value;

// =============================================================================
// Contract
// =============================================================================

/// Change listener. Carries no payload: it only signals "something changed".
pub type Listener = Rc<dyn Fn()>;

/// Unsubscribe function returned by [`Animated::subscribe`].
pub type Unsubscribe = Box<dyn FnOnce()>;

/// A value whose current reading changes outside the declarative update cycle.
pub trait Animated {
    /// Read the current resolved value.
    fn get_value(&self) -> Value;

    /// Register a listener invoked synchronously on every change.
    ///
    /// The returned function removes the listener. Calling it more than once
    /// is impossible (`FnOnce`); calling it after the value is gone is a no-op.
    fn subscribe(&self, listener: Listener) -> Unsubscribe;
}

/// Call `listener` whenever a reactive source read by `read` changes.
///
/// The effect's first run only records dependencies, so subscribing never
/// notifies. The listener runs untracked: whatever it reads does not become
/// a dependency of this subscription.
pub fn watch(read: impl Fn() + 'static, listener: Listener) -> Unsubscribe {
    let primed = Cell::new(false);
    let dispose = effect(move || {
        read();
        if primed.replace(true) {
            untrack(|| listener());
        }
    });
    Box::new(dispose)
}

// =============================================================================
// AnimatedValue
// =============================================================================

/// Signal-backed animated cell.
///
/// Cloning produces another handle to the same value (like a signal).
pub struct AnimatedValue<T> {
    signal: Signal<T>,
    subscribers: Rc<Cell<usize>>,
}

impl<T: Clone> Clone for AnimatedValue<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

/// Create a new animated value.
pub fn animated<T: Clone + PartialEq + 'static>(value: T) -> AnimatedValue<T> {
    AnimatedValue::new(value)
}

impl<T: Clone + PartialEq + 'static> AnimatedValue<T> {
    pub fn new(value: T) -> Self {
        Self::from_signal(signal(value))
    }

    /// Drive an existing signal as an animated value.
    pub fn from_signal(signal: Signal<T>) -> Self {
        Self {
            signal,
            subscribers: Rc::new(Cell::new(0)),
        }
    }

    /// The underlying signal.
    pub fn signal(&self) -> &Signal<T> {
        &self.signal
    }

    /// Get the current value. Tracked when read inside an effect.
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Set a new value, notifying listeners if it actually changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        self.signal.set(value)
    }

    /// Compute the next value from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = untrack(|| self.signal.with(f));
        self.set(next)
    }

    /// Number of listeners registered through [`on_change`](Self::on_change).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.get()
    }

    /// Register a listener. See [`Animated::subscribe`].
    pub fn on_change(&self, listener: Listener) -> Unsubscribe {
        let source = self.signal.clone();
        let unsubscribe = watch(move || source.with(|_| ()), listener);

        self.subscribers.set(self.subscribers.get() + 1);
        let subscribers = Rc::downgrade(&self.subscribers);
        Box::new(move || {
            unsubscribe();
            if let Some(count) = subscribers.upgrade() {
                count.set(count.get().saturating_sub(1));
            }
        })
    }
}

impl<T> Animated for AnimatedValue<T>
where
    T: Clone + PartialEq + Into<Value> + 'static,
{
    fn get_value(&self) -> Value {
        untrack(|| self.signal.get()).into()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        self.on_change(listener)
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for AnimatedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        untrack(|| {
            self.signal.with(|value| {
                f.debug_struct("AnimatedValue")
                    .field("value", value)
                    .field("subscribers", &self.subscribers.get())
                    .finish()
            })
        })
    }
}

// =============================================================================
// Signals as animated values
// =============================================================================

impl<T> Animated for Signal<T>
where
    T: Clone + PartialEq + Into<Value> + 'static,
{
    fn get_value(&self) -> Value {
        untrack(|| self.get()).into()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let source = self.clone();
        watch(move || source.with(|_| ()), listener)
    }
}

impl<T> Animated for Derived<T>
where
    T: Clone + PartialEq + Into<Value> + 'static,
{
    fn get_value(&self) -> Value {
        untrack(|| self.get()).into()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let source = self.clone();
        watch(
            move || {
                source.get();
            },
            listener,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::derived;
    use std::cell::RefCell;

    fn counter() -> (Rc<Cell<usize>>, Listener) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, Rc::new(move || count_clone.set(count_clone.get() + 1)))
    }

    #[test]
    fn test_set_notifies_listeners() {
        let value = animated(0.5);
        let (count, listener) = counter();

        let _unsub = value.on_change(listener);
        assert_eq!(count.get(), 0);

        assert!(value.set(0.8));
        assert_eq!(count.get(), 1);
        assert_eq!(value.get(), 0.8);
    }

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let value = animated(1.0);
        let (count, listener) = counter();

        let _unsub = value.on_change(listener);

        assert!(!value.set(1.0));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_listener() {
        let value = animated(0);
        let (a, listener_a) = counter();
        let (b, listener_b) = counter();

        let unsub_a = value.on_change(listener_a);
        let _unsub_b = value.on_change(listener_b);
        assert_eq!(value.subscriber_count(), 2);

        unsub_a();
        assert_eq!(value.subscriber_count(), 1);

        value.set(1);
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn test_listener_can_read_value() {
        let value = animated(String::from("a"));
        let seen = Rc::new(RefCell::new(String::new()));
        let (value_clone, seen_clone) = (value.clone(), seen.clone());

        let _unsub = value.on_change(Rc::new(move || {
            *seen_clone.borrow_mut() = value_clone.get();
        }));

        value.set("b".to_string());
        assert_eq!(*seen.borrow(), "b");
    }

    #[test]
    fn test_listener_reads_are_not_dependencies() {
        let watched = animated(0);
        let other = animated(0);
        let (count, listener) = counter();
        let other_clone = other.clone();

        let _unsub = watched.on_change(Rc::new(move || {
            other_clone.get();
            listener();
        }));

        watched.set(1);
        other.set(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unsubscribe_after_drop_is_noop() {
        let value = animated(true);
        let unsub = value.on_change(Rc::new(|| {}));
        drop(value);
        unsub();
    }

    #[test]
    fn test_update_from_current() {
        let value = animated(2);
        assert!(value.update(|n| n * 3));
        assert_eq!(value.get(), 6);
    }

    #[test]
    fn test_get_value_converts() {
        let value = animated(0.25f64);
        assert_eq!(Animated::get_value(&value), Value::Number(0.25));
    }

    #[test]
    fn test_plain_signal_is_animated() {
        let width = signal(4.0f64);
        let (count, listener) = counter();

        let unsub = Animated::subscribe(&width, listener);
        width.set(6.0);
        assert_eq!(count.get(), 1);
        assert_eq!(Animated::get_value(&width), Value::Number(6.0));

        unsub();
        width.set(8.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_derived_notifies_through_its_source() {
        let base = signal(1.0f64);
        let base_clone = base.clone();
        let half = derived(move || base_clone.get() / 2.0);
        let (count, listener) = counter();

        let _unsub = Animated::subscribe(&half, listener);
        base.set(3.0);

        assert_eq!(count.get(), 1);
        assert_eq!(Animated::get_value(&half), Value::Number(1.5));
    }
}
