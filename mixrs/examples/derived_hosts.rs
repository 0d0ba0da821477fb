//! Deriving `Host` for a concrete struct and recovering it from the context.

use std::rc::Rc;

use mixrs::prelude::*;

#[derive(Host)]
struct Sensor {
    label: &'static str,
    slots: Slots,
}

fn main() {
    let emitter = Emitter::new();
    let sensor: HostRef = Rc::new(Sensor {
        label: "thermo-1",
        slots: Slots::new(),
    });

    emitter.on(
        &sensor,
        "reading",
        Handler::new(|context, args| {
            let host = context
                .downcast_ref::<HostRef>()
                .expect("default context is the registering host");
            let sensor = host
                .as_any()
                .downcast_ref::<Sensor>()
                .expect("host is a Sensor");
            let celsius = args[0].downcast_ref::<f64>().copied().unwrap_or(f64::NAN);
            Value::new(format!("{}: {celsius:.1}°C", sensor.label))
        }),
        SubscribeOptions::default(),
    );

    let lines = emitter
        .emit(&sensor, "reading", &[Value::new(21.5f64)])
        .expect("dispatch failed");
    for line in &lines {
        if let Some(text) = line.downcast_ref::<String>() {
            println!("{text}");
        }
    }
}
