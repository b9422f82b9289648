use mdrt_model::{AttributeDef, EntitySchema, ModelError, TypeFactory};
use mdrt_runtime::{
    ChangeDispatcher, ContentProvider, ContentProviderBinding, ContentProviderConfig, DataMapper,
    Field, FieldState, RuntimeError,
};
use mdrt_storage::{StorageStrategy, StoreFactoryRegistry};
use mdrt_types::{Datatype, PlatformValue, TypeError, TypedValue};
use mdrt_validators::{NotNullValidator, RegExValidator};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

type Calls = Rc<RefCell<Vec<(Option<PlatformValue>, Option<PlatformValue>)>>>;

struct Fixture {
    dispatcher: ChangeDispatcher,
    person: Rc<ContentProvider>,
    backup: Rc<ContentProvider>,
}

impl Fixture {
    fn new() -> Self {
        let mut types = TypeFactory::new();
        types
            .register_entity(
                EntitySchema::new("Person")
                    .with_attribute(AttributeDef::string("name"))
                    .with_attribute(AttributeDef::integer("age").with_default("18"))
                    .with_attribute(AttributeDef::string("age_text")),
            )
            .unwrap();
        let stores = StoreFactoryRegistry::with_local();
        let dispatcher = ChangeDispatcher::new();
        let make = |name: &str| {
            Rc::new(
                ContentProviderConfig::new(name, "Person", StorageStrategy::Local)
                    .create("contacts", &types, &stores, &dispatcher)
                    .unwrap(),
            )
        };
        let person = make("person");
        let backup = make("backup");
        Self {
            dispatcher,
            person,
            backup,
        }
    }

    fn binding(&self, mapper: DataMapper) -> ContentProviderBinding {
        ContentProviderBinding::new(Some(mapper), &self.dispatcher)
    }
}

fn record_watch(binding: &ContentProviderBinding, field: &str) -> (Calls, mdrt_runtime::WatchHandle) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let handle = binding.watch(field, move |old, new| {
        sink.borrow_mut().push((old.cloned(), new.cloned()));
    });
    (calls, handle)
}

fn text(s: &str) -> PlatformValue {
    PlatformValue::String(s.into())
}

// ── get / set ────────────────────────────────────────────────────

#[test]
fn set_writes_every_mapping_and_duplicates_end_equal() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    mapper.map("name", Rc::clone(&fx.backup), "name").unwrap();
    let binding = fx.binding(mapper);

    binding.set("name", &text("Ada")).unwrap();

    assert_eq!(fx.person.get_value("name").unwrap().as_str(), Some("Ada"));
    assert_eq!(fx.backup.get_value("name").unwrap().as_str(), Some("Ada"));
    assert_eq!(binding.get("name"), Some(text("Ada")));
}

#[test]
fn set_casts_into_each_attribute_datatype() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("age", Rc::clone(&fx.person), "age").unwrap();
    mapper.map("age", Rc::clone(&fx.person), "age_text").unwrap();
    let binding = fx.binding(mapper);

    binding.set("age", &text("42")).unwrap();

    assert_eq!(fx.person.get_value("age").unwrap().as_i64(), Some(42));
    assert_eq!(fx.person.get_value("age_text").unwrap().as_str(), Some("42"));
    assert_eq!(binding.get("age"), Some(PlatformValue::Integer(42)));
}

#[test]
fn failed_cast_writes_nothing() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("age", Rc::clone(&fx.person), "age_text").unwrap();
    mapper.map("age", Rc::clone(&fx.person), "age").unwrap();
    let binding = fx.binding(mapper);

    let err = binding.set("age", &text("forty")).unwrap_err();

    assert!(matches!(err, RuntimeError::Type(TypeError::InvalidCast { .. })));
    assert!(!fx.person.get_value("age_text").unwrap().is_set());
    assert_eq!(fx.person.get_value("age").unwrap().as_i64(), Some(18));
}

#[test]
fn get_reads_first_mapping_only() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    mapper.map("name", Rc::clone(&fx.backup), "name").unwrap();
    let binding = fx.binding(mapper);

    fx.backup
        .set_value("name", TypedValue::from_string(Datatype::String, "Grace").unwrap())
        .unwrap();

    assert_eq!(binding.get("name"), None);
}

#[test]
fn unmapped_field_is_noop() {
    let fx = Fixture::new();
    let binding = fx.binding(DataMapper::new());
    assert_eq!(binding.get("ghost"), None);
    binding.set("ghost", &text("boo")).unwrap();
    assert!(binding.mapped_fields().is_empty());
}

#[test]
fn map_rejects_unknown_attribute() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    let err = mapper.map("email", Rc::clone(&fx.person), "email").unwrap_err();
    assert!(matches!(err, RuntimeError::Model(ModelError::UnknownAttribute { .. })));
}

// ── Change propagation ───────────────────────────────────────────

#[test]
fn watcher_fires_once_per_change_with_old_and_new() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);
    let (calls, _handle) = record_watch(&binding, "name");

    binding.set("name", &text("Ada")).unwrap();
    binding.set("name", &text("Grace")).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            (None, Some(text("Ada"))),
            (Some(text("Ada")), Some(text("Grace"))),
        ]
    );
}

#[test]
fn setting_equal_value_fires_nothing() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("age", Rc::clone(&fx.person), "age").unwrap();
    let binding = fx.binding(mapper);
    let (calls, _handle) = record_watch(&binding, "age");

    binding.set("age", &PlatformValue::Integer(18)).unwrap();

    assert!(calls.borrow().is_empty());
}

#[test]
fn external_write_reaches_watchers_and_fields() {
    let fx = Fixture::new();
    let field = Rc::new(FieldState::new("ageInput", Datatype::String));
    let mut mapper = DataMapper::new();
    mapper.register_field(field.clone());
    mapper.map("ageInput", Rc::clone(&fx.person), "age").unwrap();
    let binding = fx.binding(mapper);
    let (calls, _handle) = record_watch(&binding, "ageInput");

    fx.person
        .set_value("age", TypedValue::from_number(Datatype::Integer, 30.0).unwrap())
        .unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![(Some(PlatformValue::Integer(18)), Some(PlatformValue::Integer(30)))]
    );
    assert_eq!(field.value().as_str(), Some("30"));
    assert_eq!(field.update_count(), 1);
}

#[test]
fn field_is_not_written_when_it_already_shows_the_value() {
    let fx = Fixture::new();
    let field = Rc::new(FieldState::new("nameInput", Datatype::String));
    field.set_value(TypedValue::from_string(Datatype::String, "Ada").unwrap());
    let mut mapper = DataMapper::new();
    mapper.register_field(field.clone());
    mapper.map("nameInput", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);
    let (calls, _handle) = record_watch(&binding, "nameInput");

    binding.set("nameInput", &text("Ada")).unwrap();

    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(field.update_count(), 1);
}

#[test]
fn every_field_mapped_to_attribute_is_notified() {
    let fx = Fixture::new();
    let first = Rc::new(FieldState::new("first", Datatype::String));
    let second = Rc::new(FieldState::new("second", Datatype::String));
    let mut mapper = DataMapper::new();
    mapper.register_field(first.clone());
    mapper.register_field(second.clone());
    mapper.map("first", Rc::clone(&fx.person), "name").unwrap();
    mapper.map("second", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);

    binding.set("first", &text("Linus")).unwrap();

    assert_eq!(first.value().as_str(), Some("Linus"));
    assert_eq!(second.value().as_str(), Some("Linus"));
    assert_eq!(binding.mapped_fields(), vec!["first", "second"]);
}

#[test]
fn unconvertible_value_skips_field() {
    let fx = Fixture::new();
    let field = Rc::new(FieldState::new("nameAsNumber", Datatype::Integer));
    let mut mapper = DataMapper::new();
    mapper.register_field(field.clone());
    mapper.map("nameAsNumber", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);
    let (calls, _handle) = record_watch(&binding, "nameAsNumber");

    binding.set("nameAsNumber", &text("Ada")).unwrap();

    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(field.update_count(), 0);
}

#[test]
fn changes_of_other_providers_are_ignored() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);
    let (calls, _handle) = record_watch(&binding, "name");

    fx.backup
        .set_value("name", TypedValue::from_string(Datatype::String, "x").unwrap())
        .unwrap();

    assert!(calls.borrow().is_empty());
}

// ── Watch handles ────────────────────────────────────────────────

#[test]
fn unwatch_stops_callbacks() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);
    let (calls, handle) = record_watch(&binding, "name");
    assert_eq!(binding.watcher_count("name"), 1);

    handle.unwatch();
    binding.set("name", &text("Ada")).unwrap();

    assert!(calls.borrow().is_empty());
    assert_eq!(binding.watcher_count("name"), 0);
}

#[test]
fn watcher_dropped_mid_event_does_not_fire() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);

    let victim: Rc<RefCell<Option<mdrt_runtime::WatchHandle>>> = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&victim);
    let _first = binding.watch("name", move |_, _| {
        slot.borrow_mut().take();
    });
    let (calls, handle) = record_watch(&binding, "name");
    *victim.borrow_mut() = Some(handle);

    binding.set("name", &text("Ada")).unwrap();

    assert!(calls.borrow().is_empty());
    assert_eq!(binding.watcher_count("name"), 1);
}

#[test]
fn dropping_binding_unsubscribes_from_dispatcher() {
    let fx = Fixture::new();
    let before = fx.dispatcher.subscriber_count();
    let binding = fx.binding(DataMapper::new());
    assert_eq!(fx.dispatcher.subscriber_count(), before + 1);
    drop(binding);
    assert_eq!(fx.dispatcher.subscriber_count(), before);
}

// ── Missing mapper ───────────────────────────────────────────────

#[test]
fn binding_without_mapper_is_inert() {
    let fx = Fixture::new();
    let binding = ContentProviderBinding::new(None, &fx.dispatcher);
    assert!(!binding.is_configured());
    assert_eq!(fx.dispatcher.subscriber_count(), 0);

    let (calls, _handle) = record_watch(&binding, "name");
    assert_eq!(binding.get("name"), None);
    binding.set("name", &text("Ada")).unwrap();
    fx.person
        .set_value("name", TypedValue::from_string(Datatype::String, "Ada").unwrap())
        .unwrap();

    assert!(calls.borrow().is_empty());
    assert!(binding.mapped_fields().is_empty());
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn validators_run_against_first_mapping() {
    let fx = Fixture::new();
    let mut mapper = DataMapper::new();
    mapper.map("name", Rc::clone(&fx.person), "name").unwrap();
    let binding = fx.binding(mapper);
    binding.add_validator("name", NotNullValidator::new(None));
    binding.add_validator("name", RegExValidator::new("[A-Z][a-z]+", Some("Capitalize it")).unwrap());

    assert_eq!(binding.validate("name"), Err(vec!["This field is mandatory!".to_string()]));

    binding.set("name", &text("ada")).unwrap();
    assert_eq!(binding.validate("name"), Err(vec!["Capitalize it".to_string()]));

    binding.set("name", &text("Ada")).unwrap();
    assert_eq!(binding.validate("name"), Ok(()));
}

#[test]
fn field_without_validators_is_valid() {
    let fx = Fixture::new();
    let binding = fx.binding(DataMapper::new());
    assert_eq!(binding.validate("anything"), Ok(()));
}
