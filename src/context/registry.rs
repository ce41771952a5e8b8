//! Capability registry owned by an application context.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::ContextError;

use super::capability::Capability;

/// Type-erased `Arc<C::Service>`.
pub(crate) type ErasedInstance = Box<dyn Any + Send + Sync>;

pub(crate) struct Registration {
    pub(crate) instance: ErasedInstance,
    pub(crate) source: String,
    pub(crate) replaced_primary: bool,
}

/// Holds exactly one instance per capability name.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: BTreeMap<&'static str, Registration>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `instance` for capability `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::DuplicateRegistration`] if `C` is already registered.
    pub fn register<C: Capability>(
        &mut self,
        source: impl Into<String>,
        instance: Arc<C::Service>,
    ) -> Result<(), ContextError> {
        self.insert(
            C::NAME,
            Registration {
                instance: Box::new(instance),
                source: source.into(),
                replaced_primary: false,
            },
        )
    }

    pub(crate) fn insert(
        &mut self,
        capability: &'static str,
        registration: Registration,
    ) -> Result<(), ContextError> {
        if let Some(existing) = self.entries.get(capability) {
            return Err(ContextError::DuplicateRegistration {
                capability: capability.to_string(),
                sources: format!("{}, {}", existing.source, registration.source),
            });
        }
        self.entries.insert(capability, registration);
        Ok(())
    }

    /// Resolves the instance registered for capability `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingCapability`] when nothing is registered, or
    /// [`ContextError::TypeMismatch`] when the name is bound to another type.
    pub fn resolve<C: Capability>(&self) -> Result<Arc<C::Service>, ContextError> {
        let entry = self
            .entries
            .get(C::NAME)
            .ok_or_else(|| ContextError::MissingCapability(C::NAME.to_string()))?;

        entry
            .instance
            .downcast_ref::<Arc<C::Service>>()
            .cloned()
            .ok_or_else(|| ContextError::TypeMismatch {
                capability: C::NAME.to_string(),
                expected: std::any::type_name::<C::Service>(),
            })
    }

    #[must_use]
    pub fn contains(&self, capability: &str) -> bool {
        self.entries.contains_key(capability)
    }

    /// Registered capability names in sorted order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Name of the configuration that provided `capability`.
    #[must_use]
    pub fn source_of(&self, capability: &str) -> Option<&str> {
        self.entries.get(capability).map(|r| r.source.as_str())
    }

    /// Whether the registered instance came from an override that replaced a primary provider.
    #[must_use]
    pub fn is_overridden(&self, capability: &str) -> bool {
        self.entries
            .get(capability)
            .is_some_and(|r| r.replaced_primary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
