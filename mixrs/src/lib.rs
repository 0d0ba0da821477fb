//! # MixRS - Composable Event-Emission Mixins for Rust
//!
//! MixRS provides configurable event-emission behavior that can be composed
//! ("mixed in") onto arbitrary host values, so that one component can publish
//! named events and unrelated components can subscribe to them, unsubscribe
//! by tag, and hand return values back to the publisher.
//!
//! ## Features
//!
//! - **Configurable surface**: the four operations — register, register-once,
//!   deregister, dispatch — live in a dynamic table under names chosen at
//!   construction time, so a capability can be composed onto hosts without
//!   colliding with their existing vocabulary
//! - **Prioritized handlers**: per-event handler lists kept sorted by
//!   priority, descending; higher priorities run earlier
//! - **Tagged removal**: deregister exactly one handler by its tag
//! - **Context binding**: handlers run against an explicit context value, or
//!   against the host that registered them
//! - **Return-value aggregation**: dispatch collects every handler's return
//!   value, in invocation order
//! - **Storage policies**: handler stores live in a named slot on each host,
//!   or privately inside the emitter, shared by all of its hosts
//!
//! ## Quick Start
//!
//! ```rust
//! use mixrs::{Emitter, Handler, HostRef, Object, SubscribeOptions, Value};
//!
//! let emitter = Emitter::new();
//! let host: HostRef = Object::new();
//!
//! // Subscribe with a priority and a removal tag.
//! emitter.on(
//!     &host,
//!     "order.created",
//!     Handler::new(|_ctx, args| {
//!         let total = args[0].downcast_ref::<f64>().copied().unwrap_or(0.0);
//!         Value::new(total > 100.0)
//!     }),
//!     SubscribeOptions::new().with_tag("fraud-check").with_priority(90),
//! );
//!
//! // Publish and collect every handler's verdict.
//! let verdicts = emitter.emit(&host, "order.created", &[Value::new(149.99f64)])?;
//! assert_eq!(verdicts[0].downcast_ref::<bool>(), Some(&true));
//!
//! // Targeted removal by tag.
//! emitter.off(&host, "order.created", Some("fraud-check"));
//! assert!(emitter.emit(&host, "order.created", &[])?.is_empty());
//! # Ok::<(), mixrs::EmitError>(())
//! ```
//!
//! Emission is synchronous and immediate: no queuing, no wildcard matching,
//! no delivery guarantees. Handlers run one after another on the calling
//! thread, and a failing handler aborts the rest of its dispatch call.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export derive macros
pub use mixrs_derive::Host;

// Core modules
pub mod emitter;
pub mod error;
pub mod handler;
pub mod host;
pub mod store;
pub mod value;

pub mod testing;

// Re-exports for convenience
pub use emitter::{
    Emitter, EmitterBuilder, EmitterConfig, Operation, Storage, DEFAULT_DEREGISTER_NAME,
    DEFAULT_DISPATCH_NAME, DEFAULT_ONCE_NAME, DEFAULT_REGISTER_NAME, DEFAULT_STORAGE_SLOT,
};
pub use emitter::{DeregisterFn, DispatchFn, RegisterFn};
pub use error::{EmitError, EmitResult, HandlerError};
pub use handler::{Handler, HandlerFn, HandlerResult};
pub use host::{Host, HostRef, Object, Slots};
pub use store::{HandlerRecord, HandlerStore, SharedStore, SubscribeOptions, DEFAULT_PRIORITY};
pub use value::Value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{EmitError, EmitResult, HandlerError};
    pub use crate::{Emitter, EmitterBuilder, EmitterConfig, Operation, Storage};
    pub use crate::{Handler, HandlerRecord, HandlerStore, SubscribeOptions, Value};
    pub use crate::{Host, HostRef, Object, Slots};
}

/// Version information for the MixRS library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod test_delegation;

#[cfg(test)]
mod test_storage;

#[cfg(all(test, feature = "serde"))]
mod test_serde;
