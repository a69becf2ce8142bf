//! Property Bag - Tracks a set of possibly-animated props.
//!
//! A [`PropertyBag`] is built from a [`Props`] bag and a change listener. Every
//! animated member is subscribed at construction; static members are stored
//! verbatim. The bag then answers two questions:
//!
//! - what are the current values? ([`snapshot`](PropertyBag::snapshot))
//! - stop telling me about changes ([`teardown`](PropertyBag::teardown))
//!
//! Animated members are read lazily, so a snapshot always reflects the latest
//! value at the time of the read, not the time of the last notification.
//!
//! # Example
//!
//! ```ignore
//! let opacity = animated(0.5);
//! let props = Props::new().with("opacity", &opacity).with("color", "red");
//!
//! let mut bag = PropertyBag::resolve(props, Rc::new(|| println!("changed")));
//! assert_eq!(bag.snapshot().get("opacity"), Some(&Value::Number(0.5)));
//!
//! opacity.set(0.8); // prints "changed"
//! bag.teardown();
//! opacity.set(1.0); // silent
//! ```

use std::rc::Rc;

use tracing::trace;

use crate::engine::{Animated, Listener, Unsubscribe};
use crate::types::{Snapshot, Value};
use super::types::{PropValue, Props};

/// A classified member. Decided once, at construction.
enum Member {
    Static(Value),
    Animated(Rc<dyn Animated>),
    Nested(Vec<(String, Member)>),
}

impl Member {
    fn resolve(&self) -> Value {
        match self {
            Member::Static(v) => v.clone(),
            Member::Animated(a) => a.get_value(),
            Member::Nested(members) => Value::Style(resolve_all(members)),
        }
    }

    /// Resolved value restricted to animated members, if there are any.
    fn resolve_animated(&self) -> Option<Value> {
        match self {
            Member::Static(_) => None,
            Member::Animated(a) => Some(a.get_value()),
            Member::Nested(members) => {
                let nested = resolve_animated_only(members);
                (!nested.is_empty()).then_some(Value::Style(nested))
            }
        }
    }
}

fn resolve_all(members: &[(String, Member)]) -> Snapshot {
    let mut snapshot = Snapshot::with_capacity(members.len());
    for (name, member) in members {
        snapshot.insert(name.as_str(), member.resolve());
    }
    snapshot
}

fn resolve_animated_only(members: &[(String, Member)]) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for (name, member) in members {
        if let Some(value) = member.resolve_animated() {
            snapshot.insert(name.as_str(), value);
        }
    }
    snapshot
}

/// Classify every prop, subscribing animated ones to `on_change`.
fn classify(
    props: Props,
    on_change: &Listener,
    subscriptions: &mut Vec<Unsubscribe>,
) -> Vec<(String, Member)> {
    props
        .into_iter()
        .map(|(name, prop)| {
            let member = match prop {
                PropValue::Static(v) => Member::Static(v),
                PropValue::Animated(a) => {
                    subscriptions.push(a.subscribe(on_change.clone()));
                    Member::Animated(a)
                }
                PropValue::Nested(nested) => {
                    Member::Nested(classify(nested, on_change, subscriptions))
                }
            };
            (name, member)
        })
        .collect()
}

fn count_animated(members: &[(String, Member)]) -> usize {
    members
        .iter()
        .map(|(_, m)| match m {
            Member::Static(_) => 0,
            Member::Animated(_) => 1,
            Member::Nested(nested) => count_animated(nested),
        })
        .sum()
}

// =============================================================================
// PropertyBag
// =============================================================================

/// A resolved, subscribed bag of props.
pub struct PropertyBag {
    members: Vec<(String, Member)>,
    subscriptions: Vec<Unsubscribe>,
    torn_down: bool,
}

impl PropertyBag {
    /// Build a bag from declarative props.
    ///
    /// `on_change` fires (with no payload) whenever any animated member
    /// changes, until [`teardown`](Self::teardown) runs.
    pub fn resolve(props: Props, on_change: Listener) -> Self {
        let mut subscriptions = Vec::new();
        let members = classify(props, &on_change, &mut subscriptions);

        trace!(
            props = members.len(),
            subscriptions = subscriptions.len(),
            "property bag resolved"
        );

        Self {
            members,
            subscriptions,
            torn_down: false,
        }
    }

    /// Current values of every declared prop.
    pub fn snapshot(&self) -> Snapshot {
        resolve_all(&self.members)
    }

    /// Current values of the animated props only.
    ///
    /// Nested groups contribute their animated members; a nested group with
    /// none is left out entirely.
    pub fn animated_snapshot(&self) -> Snapshot {
        resolve_animated_only(&self.members)
    }

    /// Cancel every subscription. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let count = self.subscriptions.len();
        for unsubscribe in self.subscriptions.drain(..) {
            unsubscribe();
        }
        trace!(subscriptions = count, "property bag torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Number of top-level props.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of animated members, nested ones included.
    pub fn animated_count(&self) -> usize {
        count_animated(&self.members)
    }

    /// Number of live subscriptions (zero once torn down).
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Drop for PropertyBag {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyBag")
            .field("snapshot", &self.snapshot())
            .field("subscriptions", &self.subscriptions.len())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::engine::animated;
    use crate::types::Rgba;

    fn counter() -> (Rc<Cell<usize>>, Listener) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, Rc::new(move || count_clone.set(count_clone.get() + 1)))
    }

    #[test]
    fn test_static_bag_passes_through() {
        let (count, listener) = counter();
        let props = Props::new().with("color", "red").with("width", 10).with("bold", true);

        let mut bag = PropertyBag::resolve(props, listener);

        let expected = Snapshot::new().with("color", "red").with("width", 10).with("bold", true);
        assert_eq!(bag.snapshot(), expected);
        assert_eq!(bag.animated_count(), 0);
        assert!(bag.animated_snapshot().is_empty());

        bag.teardown();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_mixed_bag_resolves_current_values() {
        let (_count, listener) = counter();
        let opacity = animated(0.5);
        let props = Props::new().with("opacity", &opacity).with("color", "red");

        let bag = PropertyBag::resolve(props, listener);
        assert_eq!(bag.snapshot(), Snapshot::new().with("opacity", 0.5).with("color", "red"));

        opacity.set(0.8);
        assert_eq!(bag.snapshot(), Snapshot::new().with("opacity", 0.8).with("color", "red"));
        assert_eq!(bag.animated_snapshot(), Snapshot::new().with("opacity", 0.8));
    }

    #[test]
    fn test_change_fires_once_per_actual_change() {
        let (count, listener) = counter();
        let opacity = animated(0.5);
        let unrelated = animated(1.0);
        let props = Props::new().with("opacity", &opacity);

        let _bag = PropertyBag::resolve(props, listener);

        opacity.set(0.6);
        assert_eq!(count.get(), 1);

        opacity.set(0.6);
        assert_eq!(count.get(), 1);

        unrelated.set(2.0);
        assert_eq!(count.get(), 1);

        opacity.set(0.7);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let (count, listener) = counter();
        let opacity = animated(0.5);

        let mut bag = PropertyBag::resolve(Props::new().with("opacity", &opacity), listener);
        assert_eq!(opacity.subscriber_count(), 1);

        bag.teardown();
        bag.teardown();
        assert!(bag.is_torn_down());
        assert_eq!(opacity.subscriber_count(), 0);
        assert_eq!(bag.subscription_count(), 0);

        opacity.set(0.9);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_teardown_with_no_members() {
        let (_count, listener) = counter();
        let mut bag = PropertyBag::resolve(Props::new(), listener);
        assert!(bag.is_empty());
        bag.teardown();
        bag.teardown();
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (_count, listener) = counter();
        let opacity = animated(0.5);

        let bag = PropertyBag::resolve(Props::new().with("opacity", &opacity), listener);
        assert_eq!(opacity.subscriber_count(), 1);

        drop(bag);
        assert_eq!(opacity.subscriber_count(), 0);
    }

    #[test]
    fn test_nested_style_members_are_tracked() {
        let (count, listener) = counter();
        let bg = animated(Rgba::BLACK);
        let props = Props::new()
            .with("content", "hi")
            .with("style", Props::new().with("bg", &bg).with("bold", true));

        let bag = PropertyBag::resolve(props, listener);
        assert_eq!(bag.animated_count(), 1);

        bg.set(Rgba::WHITE);
        assert_eq!(count.get(), 1);

        let snapshot = bag.snapshot();
        let style = snapshot.get("style").and_then(Value::as_style).cloned();
        assert_eq!(style, Some(Snapshot::new().with("bg", Rgba::WHITE).with("bold", true)));

        let animated_only = bag.animated_snapshot();
        assert_eq!(
            animated_only,
            Snapshot::new().with("style", Snapshot::new().with("bg", Rgba::WHITE))
        );
    }
}
