//! Application context lifecycle: collect definitions, pick winners, build the registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{BlockchainService, ContextError};
use crate::infra::observability::{CONTEXT_INITIALIZED_TOTAL, CONTEXT_OVERRIDES_TOTAL};

use super::capability::{BlockchainCapability, Capability};
use super::definitions::{Configuration, Definition, DefinitionKind, Definitions};
use super::registry::{Registration, ServiceRegistry};

/// Assembles an [`AppContext`] from configuration units.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use green_bond_issuance::app::AppService;
/// use green_bond_issuance::config::AppConfig;
/// use green_bond_issuance::context::ContextBuilder;
/// use green_bond_issuance::domain::{AppError, BlockchainService};
/// use green_bond_issuance::infra::BlockchainConfiguration;
/// use green_bond_issuance::test_utils::MockBlockchainService;
///
/// let context = ContextBuilder::new(AppConfig::default())
///     .with_configuration(BlockchainConfiguration::new(|_config| {
///         Ok(Arc::new(MockBlockchainService::new()) as Arc<dyn BlockchainService>)
///     }))
///     .build()?;
///
/// let _service = AppService::from_context(&context)?;
/// # Ok::<(), AppError>(())
/// ```
pub struct ContextBuilder {
    config: AppConfig,
    configurations: Vec<Box<dyn Configuration>>,
}

impl ContextBuilder {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            configurations: Vec::new(),
        }
    }

    /// Adds a configuration unit. Order does not affect which provider wins.
    #[must_use]
    pub fn with_configuration(mut self, configuration: impl Configuration + 'static) -> Self {
        self.configurations.push(Box::new(configuration));
        self
    }

    /// Builds the context, running exactly one factory per capability.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::DuplicateRegistration`] when a capability has
    /// more than one primary or more than one override definition, and
    /// [`ContextError::ProviderFailed`] when the winning factory fails. Both
    /// abort the build; nothing is retried.
    pub fn build(self) -> Result<AppContext, ContextError> {
        let id = Uuid::new_v4();
        let mut collected = Vec::new();

        for configuration in &self.configurations {
            let mut definitions = Definitions::new(configuration.name());
            configuration.define(&mut definitions);
            debug!(
                context_id = %id,
                configuration = configuration.name(),
                definitions = definitions.len(),
                "Collected provider definitions"
            );
            collected.extend(definitions.into_entries());
        }

        let mut registry = ServiceRegistry::new();
        for selected in select_definitions(collected)? {
            let Definition {
                capability,
                source,
                factory,
                ..
            } = selected.definition;

            let instance = factory(&self.config).map_err(|e| ContextError::ProviderFailed {
                capability: capability.to_string(),
                source_name: source.clone(),
                message: e.to_string(),
            })?;

            if selected.replaced_primary {
                counter!(CONTEXT_OVERRIDES_TOTAL, "capability" => capability).increment(1);
                info!(
                    context_id = %id,
                    capability = capability,
                    source = %source,
                    "Primary provider overridden"
                );
            }

            registry.insert(
                capability,
                Registration {
                    instance,
                    source,
                    replaced_primary: selected.replaced_primary,
                },
            )?;
        }

        counter!(CONTEXT_INITIALIZED_TOTAL).increment(1);
        info!(
            context_id = %id,
            capabilities = ?registry.capabilities(),
            "Application context initialized"
        );

        Ok(AppContext {
            id,
            created_at: Utc::now(),
            config: self.config,
            registry,
        })
    }
}

struct Selected {
    definition: Definition,
    replaced_primary: bool,
}

/// Picks one definition per capability: an override beats the primary.
fn select_definitions(definitions: Vec<Definition>) -> Result<Vec<Selected>, ContextError> {
    let mut grouped: BTreeMap<&'static str, (Vec<Definition>, Vec<Definition>)> = BTreeMap::new();
    for definition in definitions {
        let (primaries, overrides) = grouped.entry(definition.capability).or_default();
        match definition.kind {
            DefinitionKind::Primary => primaries.push(definition),
            DefinitionKind::Override => overrides.push(definition),
        }
    }

    let mut selected = Vec::with_capacity(grouped.len());
    for (capability, (mut primaries, mut overrides)) in grouped {
        for candidates in [&primaries, &overrides] {
            if candidates.len() > 1 {
                return Err(ContextError::DuplicateRegistration {
                    capability: capability.to_string(),
                    sources: candidates
                        .iter()
                        .map(|d| d.source.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }

        // A losing primary is dropped here, so its factory never runs.
        if let Some(definition) = overrides.pop() {
            selected.push(Selected {
                definition,
                replaced_primary: !primaries.is_empty(),
            });
        } else if let Some(definition) = primaries.pop() {
            selected.push(Selected {
                definition,
                replaced_primary: false,
            });
        }
    }

    Ok(selected)
}

/// A built dependency context.
///
/// Owns one instance per registered capability. Dropping the context tears it
/// down and releases every instance it owns; consumers holding an `Arc` keep
/// theirs alive until they drop it.
pub struct AppContext {
    id: Uuid,
    created_at: DateTime<Utc>,
    config: AppConfig,
    registry: ServiceRegistry,
}

impl AppContext {
    #[must_use]
    pub fn builder(config: AppConfig) -> ContextBuilder {
        ContextBuilder::new(config)
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn resolve<C: Capability>(&self) -> Result<Arc<C::Service>, ContextError> {
        self.registry.resolve::<C>()
    }

    pub fn blockchain_service(&self) -> Result<Arc<dyn BlockchainService>, ContextError> {
        self.resolve::<BlockchainCapability>()
    }

    /// Explicit teardown.
    pub fn close(self) {
        info!(context_id = %self.id, "Closing application context");
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        debug!(
            context_id = %self.id,
            capabilities = self.registry.len(),
            "Application context torn down"
        );
    }
}
