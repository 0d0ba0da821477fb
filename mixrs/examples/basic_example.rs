//! Basic MixRS usage example demonstrating core functionality.

use mixrs::prelude::*;

fn main() {
    println!("🚀 MixRS Basic Example");

    let emitter = Emitter::new();
    let host: HostRef = Object::new();

    emitter.on(
        &host,
        "user.login",
        Handler::new(|_ctx, args| {
            let name = args[0].downcast_ref::<&str>().copied().unwrap_or("unknown");
            println!("👤 '{name}' logged in");
            Value::unit()
        }),
        SubscribeOptions::default(),
    );

    emitter.on(
        &host,
        "order.created",
        Handler::new(|_ctx, args| {
            let total = args[0].downcast_ref::<f64>().copied().unwrap_or(0.0);
            Value::new(total > 100.0)
        }),
        SubscribeOptions::new().with_tag("fraud-check").with_priority(90),
    );

    emitter.on(
        &host,
        "order.created",
        Handler::new(|_ctx, args| {
            let total = args[0].downcast_ref::<f64>().copied().unwrap_or(0.0);
            println!("🛒 order received, total ${total:.2}");
            Value::new(false)
        }),
        SubscribeOptions::default(),
    );

    println!("\n📡 Emitting events...\n");

    emitter
        .emit(&host, "user.login", &[Value::new("alice")])
        .expect("login dispatch failed");

    let verdicts = emitter
        .emit(&host, "order.created", &[Value::new(149.99f64)])
        .expect("order dispatch failed");

    let flagged = verdicts
        .iter()
        .any(|verdict| verdict.downcast_ref::<bool>() == Some(&true));

    println!("\n✅ dispatch complete, fraud flagged: {flagged}");
}
