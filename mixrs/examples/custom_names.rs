//! Composing an emitter under custom operation names.
//!
//! A host that already uses `on`/`off` vocabulary of its own can take the
//! capability under any names chosen at construction time.

use mixrs::prelude::*;

fn main() {
    let emitter = Emitter::builder()
        .with_register_name("listen")
        .with_once_name("listen_once")
        .with_deregister_name("ignore")
        .with_dispatch_name("fire")
        .with_storage_slot("_listeners")
        .build();

    let host: HostRef = Object::new();

    emitter.on(
        &host,
        "door.open",
        Handler::new(|_, _| Value::new("creak")),
        SubscribeOptions::default(),
    );

    let mut names = emitter.operation_names();
    names.sort();
    println!("exposed operations: {names:?}");

    let sounds = emitter.emit(&host, "door.open", &[]).expect("dispatch failed");
    println!("{} handler(s) answered", sounds.len());
    println!("storage slot installed: {:?}", host.slots().names());
}
