//! Runtime for model-driven applications.
//!
//! Content providers hold typed entity data, bindings connect UI fields to
//! provider attributes, and actions operate on providers by name.
//!
//! # Architecture
//!
//! - [`ContentProvider`] wraps one [`Store`](mdrt_storage::Store) and
//!   publishes a [`ChangeEvent`] through the application's
//!   [`ChangeDispatcher`] whenever a value actually changes
//! - [`ContentProviderBinding`] resolves fields to attributes through a
//!   [`DataMapper`], writes field input to every mapped attribute and pushes
//!   change events back into fields and watchers
//! - [`Action`]s run against an [`ActionContext`] and are looked up by
//!   signature in an [`ActionRegistry`]
//! - [`Application`] wires all of the above from an [`AppManifest`]
//!
//! Everything here is single-threaded (`Rc`/`RefCell`).

mod action;
mod app;
mod binding;
mod dispatch;
mod error;
mod field;
pub mod logging;
mod manifest;
mod mapper;
mod provider;

pub use action::{
    Action, ActionContext, ActionRegistry, CONDITIONAL_EVENT_MAPPINGS_ENTITY,
    CONDITIONAL_EVENT_MAPPINGS_PROVIDER, RegisterOnConditionEvent, SetContentValueAction,
    conditional_event_mappings_provider, conditional_event_mappings_schema,
};
pub use app::Application;
pub use binding::{ContentProviderBinding, WatchHandle};
pub use dispatch::{ChangeDispatcher, ChangeEvent, ON_CHANGE_TOPIC, Subscription};
pub use error::{RuntimeError, RuntimeResult};
pub use field::{Field, FieldState};
pub use manifest::{AppManifest, MappingConfig};
pub use mapper::{DataMapper, Mapping};
pub use provider::{ContentProvider, ContentProviderConfig, ContentProviderRegistry};
