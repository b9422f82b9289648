use mdrt_model::{AttributeDef, EntitySchema, TypeFactory};
use mdrt_runtime::{
    ChangeDispatcher, ContentProvider, ContentProviderBinding, ContentProviderConfig, DataMapper,
};
use mdrt_storage::{StorageStrategy, StoreFactoryRegistry};
use mdrt_types::PlatformValue;
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn setup() -> (ChangeDispatcher, Vec<Rc<ContentProvider>>) {
    let mut types = TypeFactory::new();
    types
        .register_entity(
            EntitySchema::new("Counter")
                .with_attribute(AttributeDef::integer("count"))
                .with_attribute(AttributeDef::string("label")),
        )
        .unwrap();
    let stores = StoreFactoryRegistry::with_local();
    let dispatcher = ChangeDispatcher::new();
    let providers = ["a", "b", "c"]
        .into_iter()
        .map(|name| {
            Rc::new(
                ContentProviderConfig::new(name, "Counter", StorageStrategy::Local)
                    .create("props", &types, &stores, &dispatcher)
                    .unwrap(),
            )
        })
        .collect();
    (dispatcher, providers)
}

proptest! {
    #[test]
    fn mapped_attributes_agree_after_every_set(values in prop::collection::vec(-1000i64..1000, 1..20)) {
        let (dispatcher, providers) = setup();
        let mut mapper = DataMapper::new();
        for provider in &providers {
            mapper.map("count", Rc::clone(provider), "count").unwrap();
            mapper.map("count", Rc::clone(provider), "label").unwrap();
        }
        let binding = ContentProviderBinding::new(Some(mapper), &dispatcher);

        for v in values {
            binding.set("count", &PlatformValue::Integer(v)).unwrap();
            for provider in &providers {
                prop_assert_eq!(provider.get_value("count").unwrap().as_i64(), Some(v));
                prop_assert_eq!(provider.get_value("label").unwrap().as_str().map(str::to_string), Some(v.to_string()));
            }
            prop_assert_eq!(binding.get("count"), Some(PlatformValue::Integer(v)));
        }
    }

    #[test]
    fn watcher_fires_once_per_actual_change(values in prop::collection::vec(0i64..4, 1..30)) {
        let (dispatcher, providers) = setup();
        let mut mapper = DataMapper::new();
        mapper.map("count", Rc::clone(&providers[0]), "count").unwrap();
        mapper.map("count", Rc::clone(&providers[0]), "count").unwrap();
        let binding = ContentProviderBinding::new(Some(mapper), &dispatcher);
        let calls = Rc::new(Cell::new(0usize));
        let sink = Rc::clone(&calls);
        let _handle = binding.watch("count", move |old, new| {
            assert_ne!(old, new);
            sink.set(sink.get() + 1);
        });

        let mut previous: Option<i64> = None;
        let mut expected = 0usize;
        for v in values {
            if previous != Some(v) {
                expected += 1;
            }
            previous = Some(v);
            binding.set("count", &PlatformValue::Integer(v)).unwrap();
        }
        prop_assert_eq!(calls.get(), expected);
    }
}
