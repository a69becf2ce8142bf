//! Prop types - The declarative input to an animated component.
//!
//! A [`Props`] bag is what callers hand to the bridge on every render. Each
//! entry is a [`PropValue`]: either a plain value or a live animated value.
//! The distinction is made once, when the prop is constructed, so nothing
//! downstream ever has to ask "is this animated?" again.
//!
//! `spark_signals::PropValue` is typed per prop (`PropValue<T>`), while a bag
//! mixes numbers, colors and nested styles under one map. [`PropValue`] is the
//! type-erased form; [`PropValue::reactive`] converts the typed one.

use std::fmt;
use std::rc::Rc;

use spark_signals::{reactive_prop, Signal};

use crate::engine::{Animated, AnimatedValue};
use crate::types::Value;

// =============================================================================
// Prop Value
// =============================================================================

/// A property value that is either static or animated.
#[derive(Clone)]
pub enum PropValue {
    /// Plain value, copied verbatim into the resolved snapshot.
    Static(Value),
    /// Live value driven by an animation engine.
    Animated(Rc<dyn Animated>),
    /// Nested group of props (e.g. `style`) whose members may be animated.
    Nested(Props),
}

impl PropValue {
    /// Wrap any [`Animated`] implementation.
    pub fn animated(value: impl Animated + 'static) -> Self {
        PropValue::Animated(Rc::new(value))
    }

    /// Animate from a signal: every write to it is a frame.
    pub fn signal<T>(signal: &Signal<T>) -> Self
    where
        T: Clone + PartialEq + Into<Value> + 'static,
    {
        PropValue::Animated(Rc::new(signal.clone()))
    }

    /// Convert a typed `spark_signals` prop.
    ///
    /// Static values stay static. Signals and getters become animated; a
    /// getter is wrapped in a derived so the signals it reads are tracked.
    pub fn reactive<T>(prop: spark_signals::PropValue<T>) -> Self
    where
        T: Clone + PartialEq + Into<Value> + 'static,
    {
        match prop {
            spark_signals::PropValue::Static(value) => PropValue::Static(value.into()),
            spark_signals::PropValue::Signal(signal) => PropValue::Animated(Rc::new(signal)),
            getter => PropValue::Animated(Rc::new(reactive_prop(getter))),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, PropValue::Animated(_))
    }

    /// Get the current value (for immediate reads).
    pub fn get(&self) -> Value {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Animated(a) => a.get_value(),
            PropValue::Nested(props) => Value::Style(
                props
                    .iter()
                    .map(|(name, prop)| (name.to_string(), prop.get()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Static(v) => f.debug_tuple("Static").field(v).finish(),
            PropValue::Animated(a) => f.debug_tuple("Animated").field(&a.get_value()).finish(),
            PropValue::Nested(props) => f.debug_tuple("Nested").field(props).finish(),
        }
    }
}

impl<T: Into<Value>> From<T> for PropValue {
    fn from(value: T) -> Self {
        PropValue::Static(value.into())
    }
}

impl<T> From<&AnimatedValue<T>> for PropValue
where
    T: Clone + PartialEq + Into<Value> + 'static,
{
    fn from(value: &AnimatedValue<T>) -> Self {
        PropValue::Animated(Rc::new(value.clone()))
    }
}

impl From<Props> for PropValue {
    fn from(props: Props) -> Self {
        PropValue::Nested(props)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Ordered bag of named props.
///
/// Setting a name twice replaces the earlier value in place, so every name
/// appears exactly once.
///
/// # Example
///
/// ```ignore
/// let opacity = animated(0.5);
///
/// let props = Props::new()
///     .with("opacity", &opacity)
///     .with("color", "red")
///     .with("style", Props::new().with("bg", Rgba::BLACK));
/// ```
#[derive(Clone, Default, Debug)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prop, replacing any earlier value with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animated;

    #[test]
    fn test_set_twice_keeps_one_entry() {
        let props = Props::new()
            .with("color", "red")
            .with("opacity", 1.0)
            .with("color", "blue");

        assert_eq!(props.len(), 2);
        assert_eq!(
            props.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            vec!["color", "opacity"]
        );
        assert_eq!(props.get("color").map(PropValue::get), Some(Value::from("blue")));
    }

    #[test]
    fn test_animated_prop_reads_live_value() {
        let opacity = animated(0.5);
        let prop = PropValue::from(&opacity);

        assert!(prop.is_animated());
        opacity.set(0.9);
        assert_eq!(prop.get(), Value::Number(0.9));
    }

    #[test]
    fn test_signal_prop_reads_live_value() {
        let width = spark_signals::signal(3.0f64);
        let prop = PropValue::signal(&width);

        assert!(prop.is_animated());
        width.set(5.0);
        assert_eq!(prop.get(), Value::Number(5.0));
    }

    #[test]
    fn test_reactive_prop_conversion() {
        let fixed = PropValue::reactive(spark_signals::PropValue::value(2.0f64));
        assert!(!fixed.is_animated());
        assert_eq!(fixed.get(), Value::Number(2.0));

        let base = spark_signals::signal(1.0f64);
        let base_clone = base.clone();
        let doubled =
            PropValue::reactive(spark_signals::PropValue::getter(move || base_clone.get() * 2.0));
        assert!(doubled.is_animated());

        base.set(4.0);
        assert_eq!(doubled.get(), Value::Number(8.0));
    }

    #[test]
    fn test_nested_prop_resolves_to_style() {
        let prop = PropValue::from(Props::new().with("bold", true));
        let style = prop.get();

        assert_eq!(style.as_style().and_then(|s| s.get("bold")), Some(&Value::Bool(true)));
    }
}
