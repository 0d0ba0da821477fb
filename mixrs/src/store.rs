//! Handler storage: per-event ordered lists of subscription records.
//!
//! A [`HandlerStore`] maps event names to lists of [`HandlerRecord`]s kept
//! sorted by priority, descending, at all times. Where a store lives is the
//! emitter's business (see [`Storage`](crate::Storage)); what is in it is
//! decided here.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::handler::Handler;
use crate::value::Value;

/// Priority assigned when a subscription supplies none.
///
/// Zero also resolves to this value: zero has historically meant "unset",
/// and that coercion is preserved. Use any non-zero priority to actually
/// order below the default.
pub const DEFAULT_PRIORITY: i64 = 10;

/// Per-call subscription options.
///
/// All fields are optional; see [`Emitter::on`](crate::Emitter::on) for how
/// each default is resolved.
///
/// # Examples
///
/// ```rust
/// use mixrs::SubscribeOptions;
///
/// let options = SubscribeOptions::new()
///     .with_tag("audit")
///     .with_priority(90);
/// assert_eq!(options.tag.as_deref(), Some("audit"));
/// assert_eq!(options.priority, Some(90));
/// assert!(!options.once);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SubscribeOptions {
    /// Label for targeted removal. Unset unless supplied.
    pub tag: Option<String>,

    /// Execution priority; higher runs earlier. `None` and `Some(0)` both
    /// resolve to [`DEFAULT_PRIORITY`].
    pub priority: Option<i64>,

    /// Value bound as the handler's receiver. Defaults, at registration
    /// time, to the host performing the registration.
    pub context: Option<Value>,

    /// Remove the record after the dispatch call that first invokes it.
    pub once: bool,
}

impl SubscribeOptions {
    /// Creates empty options; every field takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the removal tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the execution priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets an explicit handler context.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Marks the subscription one-shot.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// Resolves an optional priority, preserving the zero-means-unset coercion.
pub(crate) fn effective_priority(priority: Option<i64>) -> i64 {
    match priority {
        Some(0) | None => DEFAULT_PRIORITY,
        Some(priority) => priority,
    }
}

/// One registered subscription.
#[derive(Clone, Debug)]
pub struct HandlerRecord {
    callable: Handler,
    tag: Option<String>,
    priority: i64,
    context: Value,
    once: bool,
}

impl HandlerRecord {
    pub(crate) fn new(callable: Handler, context: Value, options: &SubscribeOptions) -> Self {
        Self {
            callable,
            tag: options.tag.clone(),
            priority: effective_priority(options.priority),
            context,
            once: options.once,
        }
    }

    /// The removal tag, if one was supplied.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The resolved execution priority.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Whether the record expires after its first invocation.
    pub fn is_once(&self) -> bool {
        self.once
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.callable
    }

    pub(crate) fn context(&self) -> &Value {
        &self.context
    }
}

/// Shared handle to a handler store.
///
/// This is what a slot-scoped store looks like inside its host slot, and
/// what a privately-scoped emitter closes over.
pub type SharedStore = Rc<RefCell<HandlerStore>>;

/// Mapping from event name to its ordered handler list.
#[derive(Debug, Default)]
pub struct HandlerStore {
    events: HashMap<String, Vec<HandlerRecord>>,
}

impl HandlerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and re-sorts the event's full list, priority
    /// descending. Order among equal priorities is not guaranteed.
    pub(crate) fn insert(&mut self, event: &str, record: HandlerRecord) {
        let list = self.events.entry(event.to_owned()).or_default();
        list.push(record);
        list.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Removes the first record in list order whose tag equals `tag`.
    ///
    /// At most one record is removed, even when several share the tag.
    pub(crate) fn remove_tagged(&mut self, event: &str, tag: &str) -> bool {
        let Some(list) = self.events.get_mut(event) else {
            return false;
        };
        match list.iter().position(|record| record.tag.as_deref() == Some(tag)) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// The event's records as of now, in dispatch order.
    pub(crate) fn snapshot(&self, event: &str) -> Option<Vec<HandlerRecord>> {
        self.events.get(event).cloned()
    }

    /// Drops every record currently flagged one-shot.
    ///
    /// Matches on the record's own flag: a same-tag handler re-registered
    /// during the dispatch survives unless it is itself one-shot.
    pub(crate) fn sweep_once(&mut self, event: &str) {
        if let Some(list) = self.events.get_mut(event) {
            list.retain(|record| !record.once);
        }
    }

    /// Number of records registered for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.events.get(event).map(Vec::len).unwrap_or(0)
    }

    /// Number of records across all events.
    pub fn total_handler_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    /// Returns `true` if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.total_handler_count() == 0
    }

    /// Removes every record for every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
