//! Dynamic values passed through emitters.
//!
//! Dispatch arguments, handler return values, and bound contexts all travel
//! as [`Value`]: a cheaply cloneable, type-erased handle. Handlers recover
//! concrete types with [`Value::downcast_ref`].

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A type-erased, reference-counted value.
///
/// Cloning a `Value` clones the handle, not the payload. Emitters never
/// inspect the payload; only handlers and callers do, via downcasting.
///
/// # Examples
///
/// ```rust
/// use mixrs::Value;
///
/// let value = Value::new(42i64);
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// assert!(value.downcast_ref::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct Value(Rc<dyn Any>);

impl Value {
    /// Wraps any `'static` payload.
    pub fn new<T: 'static>(payload: T) -> Self {
        Self(Rc::new(payload))
    }

    /// The unit value, for handlers with nothing meaningful to return.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Returns `true` if the payload is the unit value.
    pub fn is_unit(&self) -> bool {
        self.is::<()>()
    }

    /// Returns `true` if the payload is of type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Borrows the payload as `T`, if that is what it holds.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Value(..)")
    }
}

impl From<&'static str> for Value {
    fn from(payload: &'static str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Value {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

impl From<i64> for Value {
    fn from(payload: i64) -> Self {
        Self::new(payload)
    }
}

impl From<f64> for Value {
    fn from(payload: f64) -> Self {
        Self::new(payload)
    }
}

impl From<bool> for Value {
    fn from(payload: bool) -> Self {
        Self::new(payload)
    }
}
