use crate::action::{
    Action, ActionContext, ActionRegistry, conditional_event_mappings_provider,
    conditional_event_mappings_schema,
};
use crate::binding::ContentProviderBinding;
use crate::dispatch::ChangeDispatcher;
use crate::field::Field;
use crate::manifest::{AppManifest, MappingConfig};
use crate::mapper::DataMapper;
use crate::provider::{ContentProvider, ContentProviderRegistry};
use crate::RuntimeResult;
use mdrt_model::TypeFactory;
use mdrt_storage::StoreFactoryRegistry;
use std::rc::Rc;
use tracing::info;

/// A wired application: types, providers, actions and one change dispatcher.
#[derive(Debug)]
pub struct Application {
    app_id: String,
    types: TypeFactory,
    providers: ContentProviderRegistry,
    actions: ActionRegistry,
    dispatcher: ChangeDispatcher,
    mappings: Vec<MappingConfig>,
}

impl Application {
    /// Builds every declared entity and content provider.
    ///
    /// Providers are created in declaration order, followed by the
    /// conditional-event mappings provider if the manifest lists any
    /// conditional events.
    pub fn from_manifest(manifest: AppManifest, stores: &StoreFactoryRegistry) -> RuntimeResult<Self> {
        manifest.validate()?;
        let AppManifest {
            app_id,
            type_aliases,
            entities,
            mut content_providers,
            mappings,
            conditional_events,
        } = manifest;

        let mut types = TypeFactory::new();
        for (alias, datatype) in type_aliases {
            types.register_alias(&alias, datatype);
        }
        for schema in entities {
            types.register_entity(schema)?;
        }
        if !conditional_events.is_empty() {
            types.register_entity(conditional_event_mappings_schema(
                conditional_events.iter().map(String::as_str),
            ))?;
            content_providers.push(conditional_event_mappings_provider());
        }

        let dispatcher = ChangeDispatcher::new();
        let mut providers = ContentProviderRegistry::new();
        for config in &content_providers {
            providers.register(config.create(&app_id, &types, stores, &dispatcher)?)?;
        }

        info!(
            app_id = %app_id,
            entities = types.entity_types().len(),
            providers = providers.len(),
            mappings = mappings.len(),
            "Application ready"
        );
        Ok(Self {
            app_id,
            types,
            providers,
            actions: ActionRegistry::new(),
            dispatcher,
            mappings,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn types(&self) -> &TypeFactory {
        &self.types
    }

    pub fn providers(&self) -> &ContentProviderRegistry {
        &self.providers
    }

    pub fn dispatcher(&self) -> &ChangeDispatcher {
        &self.dispatcher
    }

    pub fn content_provider(&self, name: &str) -> RuntimeResult<Rc<ContentProvider>> {
        self.providers.get_content_provider(name)
    }

    pub fn register_action(&mut self, action: impl Action + 'static) {
        self.actions.register(action);
    }

    /// Runs the action registered under `signature`.
    pub fn execute(&self, signature: &str) -> RuntimeResult<()> {
        let ctx = ActionContext::new(&self.providers, &self.types);
        self.actions.execute(signature, &ctx)
    }

    /// Builds a data mapper from the manifest mappings, registering `fields`.
    pub fn data_mapper(
        &self,
        fields: impl IntoIterator<Item = Rc<dyn Field>>,
    ) -> RuntimeResult<DataMapper> {
        let mut mapper = DataMapper::new();
        for field in fields {
            mapper.register_field(field);
        }
        for mapping in &self.mappings {
            let provider = self.providers.get_content_provider(&mapping.provider)?;
            mapper.map(&mapping.field, provider, &mapping.attribute)?;
        }
        Ok(mapper)
    }

    /// Builds a binding over [`data_mapper`](Self::data_mapper) subscribed to
    /// this application's dispatcher.
    pub fn binding(
        &self,
        fields: impl IntoIterator<Item = Rc<dyn Field>>,
    ) -> RuntimeResult<ContentProviderBinding> {
        let mapper = self.data_mapper(fields)?;
        Ok(ContentProviderBinding::new(Some(mapper), &self.dispatcher))
    }
}
