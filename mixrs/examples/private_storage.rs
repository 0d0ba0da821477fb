//! One capability instance shared by several hosts, with hidden storage.
//!
//! Under the private policy the handler store is closed over by the emitter:
//! no slot is installed on any host, and every host composed with the same
//! emitter observes the union of all subscriptions.

use mixrs::prelude::*;

fn main() {
    let bus = Emitter::builder().with_private_storage().build();

    let core: HostRef = Object::new();
    let plugin: HostRef = Object::new();

    bus.on(
        &core,
        "shutdown",
        Handler::new(|_, _| Value::new("core: state flushed")),
        SubscribeOptions::new().with_priority(100),
    );
    bus.on(
        &plugin,
        "shutdown",
        Handler::new(|_, _| Value::new("plugin: detached")),
        SubscribeOptions::new().with_priority(10),
    );

    // Either host triggers the union of both subscriptions, by priority.
    for line in bus.emit(&plugin, "shutdown", &[]).expect("dispatch failed") {
        if let Some(text) = line.downcast_ref::<&str>() {
            println!("{text}");
        }
    }

    // Nothing was installed on either host.
    assert!(core.slots().is_empty());
    assert!(plugin.slots().is_empty());
}
