//! The emitter factory and its operation table.
//!
//! This module provides the [`Emitter`]: a capability object exposing four
//! operations — register, register-once, deregister, dispatch — under names
//! chosen at construction time, backed by a handler store whose location is
//! equally configurable.
//!
//! Operation names are table keys, not method identifiers: the table is
//! built dynamically at construction, entries can be inspected and replaced
//! at runtime, and colliding names silently overwrite earlier entries. The
//! named methods on [`Emitter`] are conveniences that resolve through the
//! same table.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{EmitError, EmitResult};
use crate::handler::Handler;
use crate::host::HostRef;
use crate::store::{HandlerRecord, HandlerStore, SharedStore, SubscribeOptions};
use crate::value::Value;

/// Default table key for the register operation.
pub const DEFAULT_REGISTER_NAME: &str = "on";

/// Default table key for the register-once operation.
pub const DEFAULT_ONCE_NAME: &str = "once";

/// Default table key for the deregister operation.
pub const DEFAULT_DEREGISTER_NAME: &str = "off";

/// Default table key for the dispatch operation.
pub const DEFAULT_DISPATCH_NAME: &str = "_emit";

/// Default slot name for slot-scoped handler storage.
pub const DEFAULT_STORAGE_SLOT: &str = "_handlers";

/// Where an emitter keeps its handler store.
///
/// # Examples
///
/// ```rust
/// use mixrs::{Emitter, Storage};
///
/// let private = Emitter::builder().with_private_storage().build();
/// assert_eq!(private.config().storage, Storage::Private);
///
/// let public = Emitter::new();
/// assert_eq!(public.config().storage, Storage::Slot("_handlers".to_owned()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Storage {
    /// Install the store lazily, on first registration, under this slot name
    /// on each registering host. Every host gets an independent store, and
    /// anything holding the host can reach it through the slot.
    Slot(String),

    /// Keep one store per emitter, closed over by its operations and shared
    /// by every host composed with it. No accessor exposes it; this is the
    /// mechanism for hiding storage from consumers entirely.
    Private,
}

impl Default for Storage {
    fn default() -> Self {
        Storage::Slot(DEFAULT_STORAGE_SLOT.to_owned())
    }
}

/// Configuration for [`Emitter`] construction.
///
/// All fields are optional in the sense that [`Default`] supplies the
/// canonical names. The four operation names must be distinct: no validation
/// is performed, and colliding names silently overwrite each other in the
/// operation table (insertion order: register, once, deregister, dispatch).
///
/// # Examples
///
/// ```rust
/// use mixrs::{Emitter, EmitterConfig};
///
/// let config = EmitterConfig {
///     register_name: "listen".to_owned(),
///     dispatch_name: "fire".to_owned(),
///     ..Default::default()
/// };
///
/// let emitter = Emitter::with_config(config);
/// assert_eq!(emitter.config().register_name, "listen");
/// assert_eq!(emitter.config().once_name, "once");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmitterConfig {
    /// Table key for the register operation.
    pub register_name: String,

    /// Table key for the register-once operation.
    pub once_name: String,

    /// Table key for the deregister operation.
    pub deregister_name: String,

    /// Table key for the dispatch operation.
    pub dispatch_name: String,

    /// Handler store location policy.
    pub storage: Storage,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            register_name: DEFAULT_REGISTER_NAME.to_owned(),
            once_name: DEFAULT_ONCE_NAME.to_owned(),
            deregister_name: DEFAULT_DEREGISTER_NAME.to_owned(),
            dispatch_name: DEFAULT_DISPATCH_NAME.to_owned(),
            storage: Storage::default(),
        }
    }
}

/// Register-shaped operation: event name, handler, options.
pub type RegisterFn = Rc<dyn Fn(&HostRef, &str, Handler, SubscribeOptions)>;

/// Deregister-shaped operation: event name, optional tag.
pub type DeregisterFn = Rc<dyn Fn(&HostRef, &str, Option<&str>)>;

/// Dispatch-shaped operation: event name, arguments; returns collected
/// handler results.
pub type DispatchFn = Rc<dyn Fn(&HostRef, &str, &[Value]) -> EmitResult<Vec<Value>>>;

/// One entry in an emitter's operation table.
///
/// Register-once has no shape of its own: it is an [`Operation::Register`]
/// entry that forces the one-shot flag and delegates to whatever currently
/// sits under the configured register name.
#[derive(Clone)]
pub enum Operation {
    /// Registers a handler record.
    Register(RegisterFn),
    /// Removes one tagged handler record.
    Deregister(DeregisterFn),
    /// Invokes handlers and collects their results.
    Dispatch(DispatchFn),
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Register(_) => f.write_str("Operation::Register"),
            Operation::Deregister(_) => f.write_str("Operation::Deregister"),
            Operation::Dispatch(_) => f.write_str("Operation::Dispatch"),
        }
    }
}

/// Resolves the active store for a host under one storage policy.
#[derive(Clone)]
enum StoreAccess {
    Slot(String),
    Private(SharedStore),
}

impl StoreAccess {
    fn for_policy(storage: &Storage) -> Self {
        match storage {
            Storage::Slot(name) => Self::Slot(name.clone()),
            Storage::Private => Self::Private(Rc::new(RefCell::new(HandlerStore::new()))),
        }
    }

    /// Active store for `host`, installing a slot-scoped store on demand.
    fn resolve(&self, host: &HostRef) -> SharedStore {
        match self {
            Self::Private(store) => store.clone(),
            Self::Slot(name) => {
                if let Some(existing) = host
                    .slots()
                    .get(name)
                    .and_then(|value| value.downcast_ref::<SharedStore>().cloned())
                {
                    return existing;
                }
                let store: SharedStore = Rc::new(RefCell::new(HandlerStore::new()));
                host.slots().set(name.clone(), Value::new(store.clone()));
                store
            }
        }
    }

    /// Active store for `host` if one already exists; never installs.
    fn peek(&self, host: &HostRef) -> Option<SharedStore> {
        match self {
            Self::Private(store) => Some(store.clone()),
            Self::Slot(name) => host
                .slots()
                .get(name)?
                .downcast_ref::<SharedStore>()
                .cloned(),
        }
    }
}

type OpTable = RefCell<HashMap<String, Operation>>;

/// A composable event-emission capability.
///
/// An `Emitter` owns nothing but its operation table (and, under
/// [`Storage::Private`], one handler store). It is composed onto hosts by
/// simply being used with them: registration installs slot-scoped storage on
/// the registering host on first use.
///
/// Cloning an `Emitter` clones the capability handle — both clones share the
/// same table and the same private store, exactly like handing the same
/// capability object to a second consumer.
///
/// # Examples
///
/// ## Basic usage
///
/// ```rust
/// use mixrs::{Emitter, Handler, HostRef, Object, SubscribeOptions, Value};
///
/// let emitter = Emitter::new();
/// let host: HostRef = Object::new();
///
/// emitter.on(
///     &host,
///     "user.login",
///     Handler::new(|_ctx, args| {
///         let name = args[0].downcast_ref::<&str>().copied().unwrap_or("unknown");
///         Value::new(format!("welcome, {name}"))
///     }),
///     SubscribeOptions::default(),
/// );
///
/// let results = emitter.emit(&host, "user.login", &[Value::new("alice")])?;
/// assert_eq!(
///     results[0].downcast_ref::<String>().map(String::as_str),
///     Some("welcome, alice"),
/// );
/// # Ok::<(), mixrs::EmitError>(())
/// ```
///
/// ## Custom operation names
///
/// ```rust
/// use mixrs::{Emitter, Operation};
///
/// let emitter = Emitter::builder()
///     .with_register_name("listen")
///     .with_dispatch_name("fire")
///     .build();
///
/// assert!(matches!(emitter.operation("listen"), Some(Operation::Register(_))));
/// assert!(matches!(emitter.operation("fire"), Some(Operation::Dispatch(_))));
/// assert!(emitter.operation("on").is_none());
/// ```
#[derive(Clone)]
pub struct Emitter {
    config: EmitterConfig,
    table: Rc<OpTable>,
}

impl Emitter {
    /// Creates an emitter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an emitter from an explicit configuration.
    ///
    /// The operation table is populated here, once: register, register-once,
    /// deregister, then dispatch. Configured names that collide overwrite in
    /// that order, silently; keeping them distinct is the caller's
    /// responsibility.
    pub fn with_config(config: EmitterConfig) -> Self {
        let table: Rc<OpTable> = Rc::new(RefCell::new(HashMap::new()));
        let store = StoreAccess::for_policy(&config.storage);

        let register: RegisterFn = {
            let store = store.clone();
            Rc::new(
                move |host: &HostRef, event: &str, handler: Handler, options: SubscribeOptions| {
                    let shared = store.resolve(host);
                    let context = options
                        .context
                        .clone()
                        .unwrap_or_else(|| Value::new::<HostRef>(host.clone()));
                    let record = HandlerRecord::new(handler, context, &options);
                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        event,
                        tag = options.tag.as_deref(),
                        priority = record.priority(),
                        once = record.is_once(),
                        "handler registered"
                    );
                    shared.borrow_mut().insert(event, record);
                },
            )
        };

        let once: RegisterFn = {
            let table = Rc::downgrade(&table);
            let register_name = config.register_name.clone();
            Rc::new(
                move |host: &HostRef, event: &str, handler: Handler, mut options: SubscribeOptions| {
                    options.once = true;
                    let Some(table) = table.upgrade() else { return };
                    let delegate = match table.borrow().get(&register_name) {
                        Some(Operation::Register(delegate)) => Some(delegate.clone()),
                        _ => None,
                    };
                    if let Some(delegate) = delegate {
                        delegate(host, event, handler, options);
                    }
                },
            )
        };

        let deregister: DeregisterFn = {
            let store = store.clone();
            Rc::new(move |host: &HostRef, event: &str, tag: Option<&str>| {
                let Some(tag) = tag.filter(|tag| !tag.is_empty()) else {
                    return;
                };
                let Some(shared) = store.peek(host) else { return };
                if shared.borrow_mut().remove_tagged(event, tag) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(event, tag, "handler deregistered");
                }
            })
        };

        let dispatch: DispatchFn = {
            Rc::new(move |host: &HostRef, event: &str, args: &[Value]| {
                let Some(shared) = store.peek(host) else {
                    return Ok(Vec::new());
                };
                let records = match shared.borrow().snapshot(event) {
                    Some(records) => records,
                    None => return Ok(Vec::new()),
                };

                #[cfg(feature = "tracing")]
                tracing::trace!(event, handlers = records.len(), "dispatching");

                let mut results = Vec::with_capacity(records.len());
                for record in &records {
                    let callable =
                        record.handler().as_fn().ok_or_else(|| EmitError::NotCallable {
                            event: event.to_owned(),
                        })?;
                    let value = callable(record.context(), args).map_err(|source| {
                        EmitError::Handler {
                            event: event.to_owned(),
                            source,
                        }
                    })?;
                    results.push(value);
                }

                shared.borrow_mut().sweep_once(event);
                Ok(results)
            })
        };

        {
            let mut entries = table.borrow_mut();
            entries.insert(config.register_name.clone(), Operation::Register(register));
            entries.insert(config.once_name.clone(), Operation::Register(once));
            entries.insert(
                config.deregister_name.clone(),
                Operation::Deregister(deregister),
            );
            entries.insert(config.dispatch_name.clone(), Operation::Dispatch(dispatch));
        }

        Self { config, table }
    }

    /// Starts building an emitter configuration.
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::default()
    }

    /// Returns this emitter's configuration.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Registers a handler for `event` on behalf of `host`.
    ///
    /// Builds a handler record from `options` — tag as supplied, priority
    /// resolved (default 10, zero coerced to 10), context defaulting to
    /// `host` itself — appends it to the event's list, and re-sorts the full
    /// list by priority, descending. Nothing is validated and nothing is
    /// returned; a non-callable handler surfaces only at dispatch.
    ///
    /// Resolves through the operation table under the configured register
    /// name; if a colliding configuration overwrote that entry, this is a
    /// no-op.
    pub fn on(&self, host: &HostRef, event: &str, handler: Handler, options: SubscribeOptions) {
        if let Some(Operation::Register(register)) = self.operation(&self.config.register_name) {
            register(host, event, handler, options);
        }
    }

    /// Registers a one-shot handler for `event` on behalf of `host`.
    ///
    /// Identical to [`Emitter::on`] except that the one-shot flag is forced
    /// before delegating — and the delegation goes through the operation
    /// table under the configured *register* name, so replacing that entry
    /// with [`Emitter::set_operation`] changes this operation's behavior too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mixrs::{Emitter, Handler, HostRef, Object, SubscribeOptions, Value};
    ///
    /// let emitter = Emitter::new();
    /// let host: HostRef = Object::new();
    ///
    /// emitter.once(
    ///     &host,
    ///     "ready",
    ///     Handler::new(|_, _| Value::new("x")),
    ///     SubscribeOptions::default(),
    /// );
    ///
    /// assert_eq!(emitter.emit(&host, "ready", &[])?.len(), 1);
    /// assert!(emitter.emit(&host, "ready", &[])?.is_empty());
    /// # Ok::<(), mixrs::EmitError>(())
    /// ```
    pub fn once(&self, host: &HostRef, event: &str, handler: Handler, options: SubscribeOptions) {
        if let Some(Operation::Register(register)) = self.operation(&self.config.once_name) {
            register(host, event, handler, options);
        }
    }

    /// Removes the first record registered for `event` whose tag is `tag`.
    ///
    /// A missing store, an event with no list, and an absent or empty tag
    /// are all silent no-ops. At most one record is removed even when
    /// several share the tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mixrs::{Emitter, Handler, HostRef, Object, SubscribeOptions, Value};
    ///
    /// let emitter = Emitter::new();
    /// let host: HostRef = Object::new();
    ///
    /// emitter.on(
    ///     &host,
    ///     "tick",
    ///     Handler::new(|_, _| Value::unit()),
    ///     SubscribeOptions::new().with_tag("clock"),
    /// );
    ///
    /// emitter.off(&host, "tick", Some("clock"));
    /// assert!(emitter.emit(&host, "tick", &[])?.is_empty());
    /// # Ok::<(), mixrs::EmitError>(())
    /// ```
    pub fn off(&self, host: &HostRef, event: &str, tag: Option<&str>) {
        if let Some(Operation::Deregister(deregister)) =
            self.operation(&self.config.deregister_name)
        {
            deregister(host, event, tag);
        }
    }

    /// Invokes every handler currently registered for `event`, in priority
    /// order, and returns their results in invocation order.
    ///
    /// Arguments are forwarded positionally, unmodified, to every handler;
    /// each handler runs with its record's bound context. The handler list
    /// is read once, at call start: registrations and removals performed by
    /// handlers affect subsequent dispatches, not this one. After all
    /// invocations, records flagged one-shot are swept.
    ///
    /// The first failing or non-callable handler aborts the call: later
    /// handlers are not invoked and the once-sweep does not run.
    ///
    /// A handler that starts asynchronous work returns whatever handle it
    /// likes as a [`Value`]; dispatch never awaits anything — combining such
    /// handles is the caller's concern.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mixrs::{Emitter, Handler, HostRef, Object, SubscribeOptions, Value};
    ///
    /// let emitter = Emitter::new();
    /// let host: HostRef = Object::new();
    ///
    /// emitter.on(
    ///     &host,
    ///     "vote",
    ///     Handler::new(|_, _| Value::new("a")),
    ///     SubscribeOptions::new().with_priority(2),
    /// );
    /// emitter.on(
    ///     &host,
    ///     "vote",
    ///     Handler::new(|_, _| Value::new("b")),
    ///     SubscribeOptions::new().with_priority(9),
    /// );
    ///
    /// let results = emitter.emit(&host, "vote", &[])?;
    /// let votes: Vec<&str> = results
    ///     .iter()
    ///     .filter_map(|value| value.downcast_ref::<&str>().copied())
    ///     .collect();
    /// assert_eq!(votes, ["b", "a"]);
    /// # Ok::<(), mixrs::EmitError>(())
    /// ```
    pub fn emit(&self, host: &HostRef, event: &str, args: &[Value]) -> EmitResult<Vec<Value>> {
        match self.operation(&self.config.dispatch_name) {
            Some(Operation::Dispatch(dispatch)) => dispatch(host, event, args),
            _ => Err(EmitError::MissingOperation {
                name: self.config.dispatch_name.clone(),
            }),
        }
    }

    /// Returns the operation currently installed under `name`.
    pub fn operation(&self, name: &str) -> Option<Operation> {
        self.table.borrow().get(name).cloned()
    }

    /// Installs `operation` under `name`, replacing any existing entry.
    ///
    /// Replacement is observable through every path that resolves the name,
    /// including register-once's delegation to the register entry.
    pub fn set_operation(&self, name: impl Into<String>, operation: Operation) {
        self.table.borrow_mut().insert(name.into(), operation);
    }

    /// Names currently present in the operation table, in no particular
    /// order. Four with a well-formed configuration; fewer when configured
    /// names collided.
    pub fn operation_names(&self) -> Vec<String> {
        self.table.borrow().keys().cloned().collect()
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Emitter`] construction.
///
/// # Examples
///
/// ```rust
/// use mixrs::{Emitter, Storage};
///
/// let emitter = Emitter::builder()
///     .with_register_name("listen")
///     .with_once_name("listen_once")
///     .with_deregister_name("ignore")
///     .with_dispatch_name("fire")
///     .with_private_storage()
///     .build();
///
/// let config = emitter.config();
/// assert_eq!(config.register_name, "listen");
/// assert_eq!(config.once_name, "listen_once");
/// assert_eq!(config.deregister_name, "ignore");
/// assert_eq!(config.dispatch_name, "fire");
/// assert_eq!(config.storage, Storage::Private);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EmitterBuilder {
    config: EmitterConfig,
}

impl EmitterBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the register operation's table key.
    pub fn with_register_name(mut self, name: impl Into<String>) -> Self {
        self.config.register_name = name.into();
        self
    }

    /// Sets the register-once operation's table key.
    pub fn with_once_name(mut self, name: impl Into<String>) -> Self {
        self.config.once_name = name.into();
        self
    }

    /// Sets the deregister operation's table key.
    pub fn with_deregister_name(mut self, name: impl Into<String>) -> Self {
        self.config.deregister_name = name.into();
        self
    }

    /// Sets the dispatch operation's table key.
    pub fn with_dispatch_name(mut self, name: impl Into<String>) -> Self {
        self.config.dispatch_name = name.into();
        self
    }

    /// Sets the storage policy directly.
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.config.storage = storage;
        self
    }

    /// Stores handlers under `name` on each registering host.
    pub fn with_storage_slot(self, name: impl Into<String>) -> Self {
        self.with_storage(Storage::Slot(name.into()))
    }

    /// Stores handlers privately, shared across all hosts of this emitter.
    pub fn with_private_storage(self) -> Self {
        self.with_storage(Storage::Private)
    }

    /// Builds the emitter.
    pub fn build(self) -> Emitter {
        Emitter::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Object;

    fn host() -> HostRef {
        Object::new()
    }

    #[test]
    fn default_config_values() {
        let config = EmitterConfig::default();
        assert_eq!(config.register_name, "on");
        assert_eq!(config.once_name, "once");
        assert_eq!(config.deregister_name, "off");
        assert_eq!(config.dispatch_name, "_emit");
        assert_eq!(config.storage, Storage::Slot("_handlers".to_owned()));
    }

    #[test]
    fn table_exposes_exactly_four_operations() {
        let emitter = Emitter::new();
        let mut names = emitter.operation_names();
        names.sort();
        assert_eq!(names, ["_emit", "off", "on", "once"]);
    }

    #[test]
    fn colliding_names_silently_overwrite() {
        // The deregister entry lands on top of the register entry.
        let emitter = Emitter::with_config(EmitterConfig {
            deregister_name: "on".to_owned(),
            ..Default::default()
        });

        assert_eq!(emitter.operation_names().len(), 3);
        assert!(matches!(
            emitter.operation("on"),
            Some(Operation::Deregister(_))
        ));

        // The register wrapper finds a deregister-shaped entry and no-ops.
        let host = host();
        emitter.on(
            &host,
            "tick",
            Handler::new(|_, _| Value::unit()),
            SubscribeOptions::default(),
        );
        assert!(emitter.emit(&host, "tick", &[]).unwrap().is_empty());
    }

    #[test]
    fn emit_without_dispatch_entry_is_an_error() {
        let emitter = Emitter::new();
        emitter.set_operation(
            "_emit",
            Operation::Register(Rc::new(
                |_: &HostRef, _: &str, _: Handler, _: SubscribeOptions| {},
            )),
        );

        let error = emitter.emit(&host(), "tick", &[]).unwrap_err();
        assert!(matches!(
            error,
            EmitError::MissingOperation { name } if name == "_emit"
        ));
    }

    #[test]
    fn zero_priority_is_coerced_to_default() {
        let emitter = Emitter::new();
        let host = host();

        // If zero were honored, the priority-5 handler would run first.
        emitter.on(
            &host,
            "order",
            Handler::new(|_, _| Value::new("zero")),
            SubscribeOptions::new().with_priority(0),
        );
        emitter.on(
            &host,
            "order",
            Handler::new(|_, _| Value::new("five")),
            SubscribeOptions::new().with_priority(5),
        );

        let results = emitter.emit(&host, "order", &[]).unwrap();
        let order: Vec<&str> = results
            .iter()
            .filter_map(|value| value.downcast_ref::<&str>().copied())
            .collect();
        assert_eq!(order, ["zero", "five"]);
    }

    #[test]
    fn dispatch_without_store_returns_empty() {
        let emitter = Emitter::new();
        let host = host();
        assert!(emitter.emit(&host, "anything", &[]).unwrap().is_empty());
        // Dispatch never installs storage.
        assert!(!host.slots().contains(DEFAULT_STORAGE_SLOT));
    }

    #[test]
    fn off_without_store_or_tag_is_a_noop() {
        let emitter = Emitter::new();
        let host = host();

        emitter.off(&host, "tick", Some("tag"));
        assert!(!host.slots().contains(DEFAULT_STORAGE_SLOT));

        emitter.on(
            &host,
            "tick",
            Handler::new(|_, _| Value::unit()),
            SubscribeOptions::new().with_tag("tag"),
        );
        emitter.off(&host, "tick", None);
        emitter.off(&host, "tick", Some(""));
        assert_eq!(emitter.emit(&host, "tick", &[]).unwrap().len(), 1);
    }

    #[test]
    fn emitter_clones_share_the_table() {
        let emitter = Emitter::new();
        let clone = emitter.clone();
        clone.set_operation(
            "extra",
            Operation::Register(Rc::new(
                |_: &HostRef, _: &str, _: Handler, _: SubscribeOptions| {},
            )),
        );
        assert!(emitter.operation("extra").is_some());
    }
}
