//! Tests for the dynamic operation table and register-once delegation.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{
        Emitter, Handler, HostRef, Object, Operation, SubscribeOptions, Value,
    };

    #[test]
    fn once_delegates_through_the_register_entry() {
        let emitter = Emitter::new();
        let host: HostRef = Object::new();
        let log: Rc<RefCell<Vec<String>>> = Rc::default();

        // Wrap the register entry; once() must flow through the wrapper.
        let Some(Operation::Register(original)) = emitter.operation("on") else {
            panic!("register entry missing");
        };
        let seen = Rc::clone(&log);
        emitter.set_operation(
            "on",
            Operation::Register(Rc::new(
                move |host: &HostRef,
                      event: &str,
                      handler: Handler,
                      options: SubscribeOptions| {
                    seen.borrow_mut().push(format!("{event}:{}", options.once));
                    original(host, event, handler, options);
                },
            )),
        );

        emitter.once(
            &host,
            "ready",
            Handler::new(|_, _| Value::new("x")),
            SubscribeOptions::default(),
        );

        // The wrapper saw the registration, with the one-shot flag forced.
        assert_eq!(log.borrow().as_slice(), ["ready:true"]);

        // And the delegated registration still behaves as a once.
        assert_eq!(emitter.emit(&host, "ready", &[]).unwrap().len(), 1);
        assert!(emitter.emit(&host, "ready", &[]).unwrap().is_empty());
    }

    #[test]
    fn replaced_dispatch_entry_is_used_by_emit() {
        let emitter = Emitter::new();
        let host: HostRef = Object::new();

        emitter.set_operation(
            "_emit",
            Operation::Dispatch(Rc::new(|_: &HostRef, _: &str, _: &[Value]| {
                Ok(vec![Value::new("canned")])
            })),
        );

        let results = emitter.emit(&host, "anything", &[]).unwrap();
        assert_eq!(results[0].downcast_ref::<&str>(), Some(&"canned"));
    }

    #[test]
    fn set_operation_can_extend_the_table() {
        let emitter = Emitter::new();
        emitter.set_operation(
            "extra",
            Operation::Deregister(Rc::new(|_: &HostRef, _: &str, _: Option<&str>| {})),
        );

        assert_eq!(emitter.operation_names().len(), 5);
        assert!(matches!(
            emitter.operation("extra"),
            Some(Operation::Deregister(_))
        ));
    }

    #[test]
    fn unknown_operation_names_resolve_to_none() {
        let emitter = Emitter::new();
        assert!(emitter.operation("trigger").is_none());
    }
}
