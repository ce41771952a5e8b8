//! Configuration units and the provider definitions they contribute.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::AppError;

use super::capability::Capability;
use super::registry::ErasedInstance;

type ErasedFactory = Box<dyn FnOnce(&AppConfig) -> Result<ErasedInstance, AppError> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// Regular provider. At most one per capability.
    Primary,
    /// Replaces the primary provider, which is then never invoked.
    Override,
}

pub(crate) struct Definition {
    pub(crate) capability: &'static str,
    pub(crate) source: String,
    pub(crate) kind: DefinitionKind,
    pub(crate) factory: ErasedFactory,
}

/// A group of provider definitions applied to an application context.
///
/// Implementations only describe how to build their services; factories run
/// once, during [`ContextBuilder::build`](super::ContextBuilder::build), and
/// only for the definition that wins for its capability.
pub trait Configuration: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn define(&self, definitions: &mut Definitions);
}

/// Collects the definitions contributed by one [`Configuration`].
pub struct Definitions {
    source: String,
    entries: Vec<Definition>,
}

impl Definitions {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: Vec::new(),
        }
    }

    /// Adds the primary provider for capability `C`.
    pub fn provide<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: Capability,
        F: FnOnce(&AppConfig) -> Result<Arc<C::Service>, AppError> + Send + 'static,
    {
        self.push::<C, F>(DefinitionKind::Primary, factory)
    }

    /// Adds a provider for capability `C` that replaces its primary provider.
    pub fn override_with<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: Capability,
        F: FnOnce(&AppConfig) -> Result<Arc<C::Service>, AppError> + Send + 'static,
    {
        self.push::<C, F>(DefinitionKind::Override, factory)
    }

    fn push<C, F>(&mut self, kind: DefinitionKind, factory: F) -> &mut Self
    where
        C: Capability,
        F: FnOnce(&AppConfig) -> Result<Arc<C::Service>, AppError> + Send + 'static,
    {
        self.entries.push(Definition {
            capability: C::NAME,
            source: self.source.clone(),
            kind,
            factory: Box::new(move |config: &AppConfig| {
                factory(config).map(|instance| Box::new(instance) as ErasedInstance)
            }),
        });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds of the definitions collected so far, with their capability names.
    #[must_use]
    pub fn kinds(&self) -> Vec<(&'static str, DefinitionKind)> {
        self.entries.iter().map(|d| (d.capability, d.kind)).collect()
    }

    pub(crate) fn into_entries(self) -> Vec<Definition> {
        self.entries
    }
}
