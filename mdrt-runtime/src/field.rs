use mdrt_types::{Datatype, TypedValue};
use std::cell::{Cell, RefCell};

/// A UI field as seen by a binding.
///
/// Implemented by the host's widgets. `set_value` takes `&self` because
/// fields are shared (`Rc<dyn Field>`) between the mapper and the host.
pub trait Field {
    /// Stable field identifier, unique within one data mapper.
    fn id(&self) -> &str;

    /// The datatype the field displays.
    fn datatype(&self) -> Datatype;

    /// The currently displayed value.
    fn value(&self) -> TypedValue;

    /// Replaces the displayed value.
    fn set_value(&self, value: TypedValue);
}

/// In-memory [`Field`] that records how often it was written.
#[derive(Debug)]
pub struct FieldState {
    id: String,
    value: RefCell<TypedValue>,
    updates: Cell<usize>,
}

impl FieldState {
    /// A field of `datatype` displaying an unset value.
    pub fn new(id: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            id: id.into(),
            value: RefCell::new(TypedValue::unset(datatype)),
            updates: Cell::new(0),
        }
    }

    /// Number of `set_value` calls so far.
    pub fn update_count(&self) -> usize {
        self.updates.get()
    }
}

impl Field for FieldState {
    fn id(&self) -> &str {
        &self.id
    }

    fn datatype(&self) -> Datatype {
        self.value.borrow().datatype()
    }

    fn value(&self) -> TypedValue {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: TypedValue) {
        *self.value.borrow_mut() = value;
        self.updates.set(self.updates.get() + 1);
    }
}
