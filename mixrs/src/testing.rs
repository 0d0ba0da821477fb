//! Testing utilities for MixRS consumers.
//!
//! [`Probe`] produces handlers that record every invocation, so tests can
//! assert on call counts, forwarded arguments, and bound contexts without
//! wiring up shared cells by hand.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HandlerError;
use crate::handler::Handler;
use crate::value::Value;

/// One recorded handler invocation.
#[derive(Clone, Debug)]
pub struct ProbeCall {
    /// The context the handler was bound to.
    pub context: Value,
    /// The dispatch arguments, as forwarded.
    pub args: Vec<Value>,
}

/// Records invocations of the handlers it produces.
///
/// All handlers minted from one probe share its call log.
///
/// # Examples
///
/// ```rust
/// use mixrs::testing::Probe;
/// use mixrs::{Emitter, HostRef, Object, SubscribeOptions, Value};
///
/// let emitter = Emitter::new();
/// let host: HostRef = Object::new();
/// let probe = Probe::new();
///
/// emitter.on(&host, "tick", probe.handler(), SubscribeOptions::default());
/// emitter.emit(&host, "tick", &[Value::new(1u32)]).unwrap();
/// emitter.emit(&host, "tick", &[Value::new(2u32)]).unwrap();
///
/// assert_eq!(probe.count(), 2);
/// let last = probe.last().unwrap();
/// assert_eq!(last.args[0].downcast_ref::<u32>(), Some(&2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Probe {
    calls: Rc<RefCell<Vec<ProbeCall>>>,
}

impl Probe {
    /// Creates a probe with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording handler that returns the unit value.
    pub fn handler(&self) -> Handler {
        self.handler_returning(Value::unit())
    }

    /// A recording handler that returns a clone of `result` on every call.
    pub fn handler_returning(&self, result: Value) -> Handler {
        let calls = Rc::clone(&self.calls);
        Handler::new(move |context, args| {
            calls.borrow_mut().push(ProbeCall {
                context: context.clone(),
                args: args.to_vec(),
            });
            result.clone()
        })
    }

    /// Number of recorded invocations.
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// All recorded invocations, oldest first.
    pub fn calls(&self) -> Vec<ProbeCall> {
        self.calls.borrow().clone()
    }

    /// The most recent invocation, if any.
    pub fn last(&self) -> Option<ProbeCall> {
        self.calls.borrow().last().cloned()
    }

    /// Clears the call log.
    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// A handler that always fails with `message`.
///
/// Useful for asserting dispatch's abort-on-failure behavior.
pub fn failing_handler(message: impl Into<String>) -> Handler {
    let message = message.into();
    Handler::fallible(move |_context, _args| Err(HandlerError::msg(message.clone())))
}
