//! Handler values for MixRS emitters.
//!
//! A [`Handler`] is the value a subscription carries. It wraps a [`Value`]:
//! registration never validates it, and a handler that does not actually
//! hold a function only fails when dispatch tries to invoke it.

use std::fmt;
use std::rc::Rc;

use crate::error::HandlerError;
use crate::value::Value;

/// Result of one handler invocation.
pub type HandlerResult = Result<Value, HandlerError>;

/// The canonical handler function shape.
///
/// Invoked with the record's bound context and the dispatch arguments,
/// forwarded positionally and unmodified.
pub type HandlerFn = Rc<dyn Fn(&Value, &[Value]) -> HandlerResult>;

/// A registrable handler value.
///
/// # Examples
///
/// ```rust
/// use mixrs::{Handler, Value};
///
/// // Infallible: the closure's return value lands in the dispatch results.
/// let greet = Handler::new(|_ctx, _args| Value::new("hello"));
/// assert!(greet.is_callable());
///
/// // Anything can be registered; it only fails at dispatch time.
/// let not_a_function = Handler::from_value(Value::new(42));
/// assert!(!not_a_function.is_callable());
/// ```
#[derive(Clone)]
pub struct Handler(Value);

impl Handler {
    /// Wraps an infallible closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + 'static,
    {
        Self::fallible(move |context, args| Ok(handler(context, args)))
    }

    /// Wraps a closure that can fail.
    ///
    /// A returned error aborts the dispatch call that invoked it; see
    /// [`EmitError::Handler`](crate::EmitError::Handler).
    pub fn fallible<F>(handler: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> HandlerResult + 'static,
    {
        let handler: HandlerFn = Rc::new(handler);
        Self(Value::new(handler))
    }

    /// Wraps an arbitrary value.
    ///
    /// Mirrors the registry's "no validation" contract: the value is accepted
    /// as-is and dispatch reports [`EmitError::NotCallable`] when it reaches
    /// a record holding a non-function.
    ///
    /// [`EmitError::NotCallable`]: crate::EmitError::NotCallable
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Returns `true` if this handler actually holds a function.
    pub fn is_callable(&self) -> bool {
        self.0.is::<HandlerFn>()
    }

    pub(crate) fn as_fn(&self) -> Option<HandlerFn> {
        self.0.downcast_ref::<HandlerFn>().cloned()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_callable() {
            f.write_str("Handler(fn)")
        } else {
            f.write_str("Handler(value)")
        }
    }
}
