//! Serde round-trips for emitter configuration.

#[cfg(test)]
mod tests {
    use crate::{EmitterConfig, Storage};

    #[test]
    fn config_deserializes_with_defaults() {
        let config: EmitterConfig =
            serde_json::from_str(r#"{ "register_name": "listen" }"#).unwrap();

        assert_eq!(config.register_name, "listen");
        assert_eq!(config.once_name, "once");
        assert_eq!(config.deregister_name, "off");
        assert_eq!(config.dispatch_name, "_emit");
        assert_eq!(config.storage, Storage::Slot("_handlers".to_owned()));
    }

    #[test]
    fn storage_policy_round_trips() {
        let private = serde_json::to_string(&Storage::Private).unwrap();
        assert_eq!(private, "\"Private\"");
        assert_eq!(
            serde_json::from_str::<Storage>(&private).unwrap(),
            Storage::Private
        );

        let slot: Storage = serde_json::from_str(r#"{ "Slot": "_events" }"#).unwrap();
        assert_eq!(slot, Storage::Slot("_events".to_owned()));
    }

    #[test]
    fn config_round_trips() {
        let config = EmitterConfig {
            register_name: "listen".to_owned(),
            once_name: "listen_once".to_owned(),
            deregister_name: "ignore".to_owned(),
            dispatch_name: "fire".to_owned(),
            storage: Storage::Private,
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: EmitterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
