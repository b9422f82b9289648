//! Actions: named units of behavior run against an application's providers.

use crate::provider::{ContentProviderConfig, ContentProviderRegistry};
use crate::{RuntimeError, RuntimeResult};
use mdrt_model::{AttributeDef, EntitySchema, TypeFactory};
use mdrt_storage::StorageStrategy;
use mdrt_types::{PlatformValue, TypedValue};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Provider holding one boolean flag per conditional event.
pub const CONDITIONAL_EVENT_MAPPINGS_PROVIDER: &str = "__conditionalEventMappingsProvider";

/// Entity type of [`CONDITIONAL_EVENT_MAPPINGS_PROVIDER`].
pub const CONDITIONAL_EVENT_MAPPINGS_ENTITY: &str = "__ConditionalEventMappings";

/// What an action can reach while it runs.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub providers: &'a ContentProviderRegistry,
    pub types: &'a TypeFactory,
}

impl<'a> ActionContext<'a> {
    pub fn new(providers: &'a ContentProviderRegistry, types: &'a TypeFactory) -> Self {
        Self { providers, types }
    }

    /// Creates a typed value from a datatype tag and a native value.
    pub fn create(&self, tag: &str, raw: impl Into<PlatformValue>) -> RuntimeResult<TypedValue> {
        Ok(self.types.create(tag, raw)?)
    }
}

pub trait Action {
    /// Name the action is registered and executed under.
    fn signature(&self) -> &str;

    fn execute(&self, ctx: &ActionContext<'_>) -> RuntimeResult<()>;
}

/// Writes a fixed value into one provider attribute.
#[derive(Debug, Clone)]
pub struct SetContentValueAction {
    signature: String,
    provider: String,
    attribute: String,
    datatype: String,
    value: PlatformValue,
}

impl SetContentValueAction {
    /// `datatype` is a tag resolved through the type factory at execution.
    pub fn new(
        signature: &str,
        provider: &str,
        attribute: &str,
        datatype: &str,
        value: impl Into<PlatformValue>,
    ) -> Self {
        Self {
            signature: signature.into(),
            provider: provider.into(),
            attribute: attribute.into(),
            datatype: datatype.into(),
            value: value.into(),
        }
    }
}

impl Action for SetContentValueAction {
    fn signature(&self) -> &str {
        &self.signature
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> RuntimeResult<()> {
        let provider = ctx.providers.get_content_provider(&self.provider)?;
        let value = ctx.create(&self.datatype, self.value.clone())?;
        provider.set_value(&self.attribute, value)?;
        Ok(())
    }
}

/// Raises a conditional event by setting its flag to `true`.
#[derive(Debug, Clone)]
pub struct RegisterOnConditionEvent {
    event: String,
}

impl RegisterOnConditionEvent {
    pub const SIGNATURE: &'static str = "registerOnConditionEvent";

    /// `event` is the flag attribute in the conditional-event mappings entity.
    pub fn new(event: &str) -> Self {
        Self {
            event: event.into(),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Action for RegisterOnConditionEvent {
    fn signature(&self) -> &str {
        Self::SIGNATURE
    }

    fn execute(&self, ctx: &ActionContext<'_>) -> RuntimeResult<()> {
        let provider = ctx
            .providers
            .get_content_provider(CONDITIONAL_EVENT_MAPPINGS_PROVIDER)?;
        let flag = ctx.create("boolean", true)?;
        provider.set_value(&self.event, flag)?;
        Ok(())
    }
}

/// Schema of the conditional-event mappings entity: one boolean flag per
/// event, all initially `false`.
pub fn conditional_event_mappings_schema<'e>(
    events: impl IntoIterator<Item = &'e str>,
) -> EntitySchema {
    events
        .into_iter()
        .fold(EntitySchema::new(CONDITIONAL_EVENT_MAPPINGS_ENTITY), |schema, event| {
            schema.with_attribute(AttributeDef::boolean(event).with_default("false"))
        })
}

/// Provider declaration for the conditional-event mappings, kept in local
/// storage.
pub fn conditional_event_mappings_provider() -> ContentProviderConfig {
    ContentProviderConfig::new(
        CONDITIONAL_EVENT_MAPPINGS_PROVIDER,
        CONDITIONAL_EVENT_MAPPINGS_ENTITY,
        StorageStrategy::Local,
    )
}

/// Actions by signature.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action under its signature, replacing any previous one.
    pub fn register(&mut self, action: impl Action + 'static) {
        debug!(signature = action.signature(), "Registered action");
        self.actions
            .insert(action.signature().to_string(), Box::new(action));
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.actions.contains_key(signature)
    }

    /// Runs the action registered under `signature`.
    pub fn execute(&self, signature: &str, ctx: &ActionContext<'_>) -> RuntimeResult<()> {
        let action = self
            .actions
            .get(signature)
            .ok_or_else(|| RuntimeError::UnknownAction(signature.to_string()))?;
        debug!(signature, "Executing action");
        action.execute(ctx)
    }

    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("signatures", &self.signatures().collect::<Vec<_>>())
            .finish()
    }
}
