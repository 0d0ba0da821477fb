//! Host objects that emitters are composed onto.
//!
//! A host is whoever calls the emitter's operations: it supplies the default
//! handler context ("who registered") and, under slot-scoped storage, carries
//! the handler store in one of its named slots.
//!
//! Any struct with a [`Slots`] field can be a host via `#[derive(Host)]`;
//! [`Object`] is provided for the anonymous case.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A composition target for emitters.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use mixrs::{Host, HostRef, Slots};
///
/// #[derive(Host)]
/// struct Sensor {
///     id: u32,
///     slots: Slots,
/// }
///
/// let sensor: HostRef = Rc::new(Sensor { id: 7, slots: Slots::new() });
/// let concrete = sensor.as_any().downcast_ref::<Sensor>().unwrap();
/// assert_eq!(concrete.id, 7);
/// ```
pub trait Host: 'static {
    /// The host's slot storage.
    fn slots(&self) -> &Slots;

    /// Upcast used to recover the concrete host type from a context value.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a host, as passed to emitter operations.
pub type HostRef = Rc<dyn Host>;

/// String-keyed dynamic slots on a host.
///
/// Slot-scoped handler stores live here, under the emitter's configured
/// storage name, which also makes them reachable (and replaceable) by
/// anything holding the host. That openness is the point of the public
/// storage policy; use [`Storage::Private`](crate::Storage::Private) to
/// take it away.
#[derive(Debug, Default)]
pub struct Slots {
    entries: RefCell<HashMap<String, Value>>,
}

impl Slots {
    /// Creates empty slot storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value in `name`, if any.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.borrow().get(name).cloned()
    }

    /// Sets `name`, replacing any previous value.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.entries.borrow_mut().insert(name.into(), value);
    }

    /// Removes and returns the value in `name`.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.entries.borrow_mut().remove(name)
    }

    /// Returns `true` if `name` is occupied.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    /// Returns the occupied slot names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// An anonymous host: nothing but slot storage.
///
/// # Examples
///
/// ```rust
/// use mixrs::{HostRef, Object};
///
/// let host: HostRef = Object::new();
/// assert!(host.slots().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Object {
    slots: Slots,
}

impl Object {
    /// Creates a fresh host.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl Host for Object {
    fn slots(&self) -> &Slots {
        &self.slots
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
