//! Tests for the two handler-storage policies.

#[cfg(test)]
mod tests {
    use crate::testing::Probe;
    use crate::{
        Emitter, Handler, HostRef, Object, SharedStore, SubscribeOptions, Value,
        DEFAULT_STORAGE_SLOT,
    };

    fn returning(value: &'static str) -> Handler {
        Handler::new(move |_, _| Value::new(value))
    }

    fn emitted(emitter: &Emitter, host: &HostRef, event: &str) -> Vec<&'static str> {
        emitter
            .emit(host, event, &[])
            .unwrap()
            .iter()
            .filter_map(|value| value.downcast_ref::<&'static str>().copied())
            .collect()
    }

    #[test]
    fn slot_scoped_hosts_are_isolated() {
        let emitter = Emitter::new();
        let alpha: HostRef = Object::new();
        let beta: HostRef = Object::new();

        emitter.on(&alpha, "tick", returning("alpha"), SubscribeOptions::default());
        emitter.on(&beta, "tick", returning("beta"), SubscribeOptions::default());

        assert_eq!(emitted(&emitter, &alpha, "tick"), ["alpha"]);
        assert_eq!(emitted(&emitter, &beta, "tick"), ["beta"]);
    }

    #[test]
    fn slot_store_is_created_lazily_and_only_by_registration() {
        let emitter = Emitter::new();
        let host: HostRef = Object::new();

        // Neither dispatch nor deregistration installs storage.
        assert!(emitter.emit(&host, "tick", &[]).unwrap().is_empty());
        emitter.off(&host, "tick", Some("tag"));
        assert!(!host.slots().contains(DEFAULT_STORAGE_SLOT));

        emitter.on(&host, "tick", returning("x"), SubscribeOptions::default());
        assert!(host.slots().contains(DEFAULT_STORAGE_SLOT));
    }

    #[test]
    fn slot_store_is_reachable_through_the_host() {
        let emitter = Emitter::new();
        let host: HostRef = Object::new();

        emitter.on(&host, "tick", returning("x"), SubscribeOptions::default());
        emitter.on(&host, "tock", returning("y"), SubscribeOptions::default());

        let store = host
            .slots()
            .get(DEFAULT_STORAGE_SLOT)
            .and_then(|value| value.downcast_ref::<SharedStore>().cloned())
            .expect("slot-scoped store is addressable");
        assert_eq!(store.borrow().handler_count("tick"), 1);
        assert_eq!(store.borrow().total_handler_count(), 2);
    }

    #[test]
    fn consumer_can_discard_a_slot_store() {
        // Public storage is deliberately open: dropping the slot drops the
        // subscriptions.
        let emitter = Emitter::new();
        let host: HostRef = Object::new();

        emitter.on(&host, "tick", returning("x"), SubscribeOptions::default());
        host.slots().remove(DEFAULT_STORAGE_SLOT);

        assert!(emitter.emit(&host, "tick", &[]).unwrap().is_empty());
    }

    #[test]
    fn custom_slot_name_is_honored() {
        let emitter = Emitter::builder().with_storage_slot("_events").build();
        let host: HostRef = Object::new();

        emitter.on(&host, "tick", returning("x"), SubscribeOptions::default());

        assert!(host.slots().contains("_events"));
        assert!(!host.slots().contains(DEFAULT_STORAGE_SLOT));
    }

    #[test]
    fn private_storage_is_shared_across_hosts() {
        let emitter = Emitter::builder().with_private_storage().build();
        let alpha: HostRef = Object::new();
        let beta: HostRef = Object::new();

        emitter.on(
            &alpha,
            "vote",
            returning("a"),
            SubscribeOptions::new().with_priority(2),
        );
        emitter.on(
            &beta,
            "vote",
            returning("b"),
            SubscribeOptions::new().with_priority(9),
        );

        // Either host observes the union, combined by priority.
        assert_eq!(emitted(&emitter, &alpha, "vote"), ["b", "a"]);
        assert_eq!(emitted(&emitter, &beta, "vote"), ["b", "a"]);
    }

    #[test]
    fn private_storage_installs_no_slot() {
        let emitter = Emitter::builder().with_private_storage().build();
        let host: HostRef = Object::new();

        emitter.on(&host, "tick", returning("x"), SubscribeOptions::default());
        assert!(host.slots().is_empty());
    }

    #[test]
    fn emitter_clones_share_a_private_store() {
        let emitter = Emitter::builder().with_private_storage().build();
        let clone = emitter.clone();
        let host: HostRef = Object::new();
        let other: HostRef = Object::new();

        let probe = Probe::new();
        emitter.on(&host, "tick", probe.handler(), SubscribeOptions::default());

        clone.emit(&other, "tick", &[]).unwrap();
        assert_eq!(probe.count(), 1);
    }
}
