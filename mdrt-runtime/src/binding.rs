//! Two-way binding between UI fields and content provider attributes.
//!
//! Writes go from a field to every attribute it is mapped to. Change events
//! flow back from providers to every field mapped to the changed attribute,
//! first to the field's watchers and then into the field itself.
//!
//! # Invariants
//!
//! 1. After `set(field, v)` every attribute mapped to `field` holds `v` cast
//!    to that attribute's datatype. Either every mapping is written or, if a
//!    cast fails, none is.
//! 2. Watchers of a field fire once per change event of a mapped attribute,
//!    even if the field maps to that attribute several times.
//! 3. A field is written only when the converted new value differs from the
//!    value it currently displays.
//! 4. Dropping a [`WatchHandle`] stops its callback before the next watcher
//!    invocation, even while an event is being fanned out.
//!
//! A binding without a data mapper logs an error once and then behaves as
//! if no field were mapped.

use crate::dispatch::{ChangeDispatcher, ChangeEvent, Subscription};
use crate::field::Field;
use crate::mapper::DataMapper;
use crate::{RuntimeError, RuntimeResult};
use mdrt_types::{Datatype, PlatformValue, TypedValue};
use mdrt_validators::{Validator, validate_all};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, error, warn};

type WatchCallback = Rc<dyn Fn(Option<&PlatformValue>, Option<&PlatformValue>)>;

struct Watcher {
    id: u64,
    field: String,
    callback: WatchCallback,
}

struct BindingInner {
    mapper: Option<DataMapper>,
    watchers: RefCell<Vec<Watcher>>,
    next_watch_id: Cell<u64>,
    validators: RefCell<HashMap<String, Vec<Box<dyn Validator>>>>,
}

impl BindingInner {
    fn is_watching(&self, id: u64) -> bool {
        self.watchers.borrow().iter().any(|w| w.id == id)
    }

    fn on_change(&self, event: &ChangeEvent) {
        let Some(mapper) = &self.mapper else {
            return;
        };
        let targets: Vec<(String, Option<Rc<dyn Field>>)> = mapper
            .get_fields(&event.provider_id, &event.attribute)
            .into_iter()
            .map(|id| {
                let field = mapper.field(&id);
                (id, field)
            })
            .collect();
        if targets.is_empty() {
            return;
        }
        debug!(
            provider = %event.provider_id,
            attribute = %event.attribute,
            fields = targets.len(),
            "Fanning out change event"
        );

        for (field_id, field) in targets {
            let callbacks: Vec<(u64, WatchCallback)> = self
                .watchers
                .borrow()
                .iter()
                .filter(|w| w.field == field_id)
                .map(|w| (w.id, Rc::clone(&w.callback)))
                .collect();
            for (id, callback) in callbacks {
                if self.is_watching(id) {
                    callback(event.old_value.platform_value(), event.new_value.platform_value());
                }
            }

            let Some(field) = field else {
                continue;
            };
            let converted = match event.new_value.convert(field.datatype()) {
                Ok(v) => v,
                Err(err) => {
                    warn!(
                        field = %field_id,
                        provider = %event.provider_id,
                        attribute = %event.attribute,
                        error = %err,
                        "Cannot convert changed value for field, skipping"
                    );
                    continue;
                }
            };
            let current = field.value();
            if !converted.equals(&current).unwrap_or(false) {
                field.set_value(converted);
            }
        }
    }
}

/// Binds UI fields to content provider attributes through a [`DataMapper`].
pub struct ContentProviderBinding {
    inner: Rc<BindingInner>,
    _subscription: Option<Subscription>,
}

impl ContentProviderBinding {
    /// Creates a binding and subscribes it to `dispatcher`.
    ///
    /// Without a mapper the binding is inert: it logs a
    /// [`RuntimeError::MissingConfiguration`] and does not subscribe.
    pub fn new(mapper: Option<DataMapper>, dispatcher: &ChangeDispatcher) -> Self {
        let configured = mapper.is_some();
        let inner = Rc::new(BindingInner {
            mapper,
            watchers: RefCell::new(Vec::new()),
            next_watch_id: Cell::new(0),
            validators: RefCell::new(HashMap::new()),
        });
        if !configured {
            let err = RuntimeError::MissingConfiguration("data mapper".into());
            error!(error = %err, "Content provider binding has no data mapper");
            return Self {
                inner,
                _subscription: None,
            };
        }
        let weak: Weak<BindingInner> = Rc::downgrade(&inner);
        let subscription = dispatcher.subscribe(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_change(event);
            }
        });
        Self {
            inner,
            _subscription: Some(subscription),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.mapper.is_some()
    }

    /// The data mapper, if any.
    pub fn mapper(&self) -> Option<&DataMapper> {
        self.inner.mapper.as_ref()
    }

    /// Ids of every mapped field in declaration order.
    pub fn mapped_fields(&self) -> Vec<String> {
        self.mapper()
            .map(|m| m.mapped_fields())
            .unwrap_or_default()
    }

    /// Reads the native value of `field` from its first mapping.
    ///
    /// Returns `None` if the field is unmapped or the value is unset.
    pub fn get(&self, field: &str) -> Option<PlatformValue> {
        self.get_typed(field)?.into_platform_value()
    }

    /// Reads the typed value of `field` from its first mapping.
    pub fn get_typed(&self, field: &str) -> Option<TypedValue> {
        let mapping = self.mapper()?.get_content_providers(field).into_iter().next()?;
        match mapping.provider.get_value(&mapping.attribute) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(field, error = %err, "Cannot read mapped attribute");
                None
            }
        }
    }

    /// Writes `value` to every attribute mapped to `field`.
    ///
    /// The value is cast into each attribute's datatype before anything is
    /// written, so a failing cast leaves every attribute untouched. An
    /// unmapped field is a no-op.
    pub fn set(&self, field: &str, value: &PlatformValue) -> RuntimeResult<()> {
        let Some(mapper) = self.mapper() else {
            return Ok(());
        };
        let mappings = mapper.get_content_providers(field);

        let mut writes = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            let datatype = mapping.provider.datatype_of(&mapping.attribute)?;
            let typed = TypedValue::cast(datatype, value)?;
            writes.push((mapping, typed));
        }
        for (mapping, typed) in writes {
            mapping.provider.set_value(&mapping.attribute, typed)?;
        }
        Ok(())
    }

    /// Registers `callback` for changes of any attribute mapped to `field`.
    ///
    /// The callback receives the old and new native values. It stays
    /// registered while the returned handle is alive.
    #[must_use = "dropping the handle unwatches immediately"]
    pub fn watch(
        &self,
        field: &str,
        callback: impl Fn(Option<&PlatformValue>, Option<&PlatformValue>) + 'static,
    ) -> WatchHandle {
        let id = self.inner.next_watch_id.get();
        self.inner.next_watch_id.set(id + 1);
        self.inner.watchers.borrow_mut().push(Watcher {
            id,
            field: field.to_string(),
            callback: Rc::new(callback),
        });
        WatchHandle {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live watchers of `field`.
    pub fn watcher_count(&self, field: &str) -> usize {
        self.inner
            .watchers
            .borrow()
            .iter()
            .filter(|w| w.field == field)
            .count()
    }

    /// Attaches a validator to `field`.
    pub fn add_validator(&self, field: &str, validator: impl Validator + 'static) {
        self.inner
            .validators
            .borrow_mut()
            .entry(field.to_string())
            .or_default()
            .push(Box::new(validator));
    }

    /// Runs the validators of `field` against its current value.
    ///
    /// Returns the messages of every failing validator. Unmapped fields
    /// validate as unset.
    pub fn validate(&self, field: &str) -> Result<(), Vec<String>> {
        let validators = self.inner.validators.borrow();
        let Some(validators) = validators.get(field) else {
            return Ok(());
        };
        let value = self
            .get_typed(field)
            .unwrap_or_else(|| TypedValue::unset(Datatype::String));
        validate_all(validators, &value)
    }
}

impl fmt::Debug for ContentProviderBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentProviderBinding")
            .field("configured", &self.is_configured())
            .field("watchers", &self.inner.watchers.borrow().len())
            .finish()
    }
}

/// RAII guard for a field watcher. Dropping it unwatches.
pub struct WatchHandle {
    id: u64,
    inner: Weak<BindingInner>,
}

impl WatchHandle {
    pub fn unwatch(self) {
        drop(self);
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.watchers.borrow_mut().retain(|w| w.id != self.id);
        }
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle").field("id", &self.id).finish()
    }
}
