//! Error types for MixRS.
//!
//! The registry itself never errors: unknown tags, missing stores, and
//! eventless dispatches are silent no-ops. Everything here surfaces at
//! dispatch time and belongs to the emitting caller.

use thiserror::Error;

/// Errors produced by the dispatch operation.
///
/// Dispatch performs no recovery: the first failing or non-callable handler
/// aborts the remaining invocations for that call, and the once-sweep for
/// already-invoked handlers does not run. Callers wanting per-handler
/// isolation must wrap their handlers themselves.
#[derive(Debug, Error)]
pub enum EmitError {
    /// A registered record holds a value that is not a handler function.
    ///
    /// Registration accepts any value; the mistake only surfaces here, when
    /// dispatch reaches the record and tries to invoke it.
    #[error("handler registered for `{event}` is not callable")]
    NotCallable {
        /// The event being dispatched.
        event: String,
    },

    /// A handler failed; dispatch stopped at this handler.
    #[error("handler for `{event}` failed")]
    Handler {
        /// The event being dispatched.
        event: String,
        /// The handler's reported failure.
        #[source]
        source: HandlerError,
    },

    /// No dispatch operation is exposed under the configured name.
    ///
    /// Happens when colliding operation names overwrote the dispatch entry,
    /// or when it was replaced with an operation of a different shape.
    #[error("no dispatch operation is exposed under `{name}`")]
    MissingOperation {
        /// The configured dispatch name.
        name: String,
    },
}

/// Failure reported by a handler during dispatch.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Plain failure message.
    #[error("{0}")]
    Message(String),

    /// Failure wrapping an underlying error.
    #[error("{0}")]
    Wrapped(#[source] Box<dyn std::error::Error>),
}

impl HandlerError {
    /// Builds a failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps an underlying error.
    pub fn wrap(source: impl std::error::Error + 'static) -> Self {
        Self::Wrapped(Box::new(source))
    }
}

/// Convenience alias for dispatch results.
pub type EmitResult<T> = Result<T, EmitError>;
