//! Test configuration that swaps the blockchain integration for a mock.

use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use crate::config::AppConfig;
use crate::context::{
    AppContext, BlockchainCapability, Capability, Configuration, ContextBuilder, Definitions,
};
use crate::domain::{BlockchainService, ContextError};

use super::mocks::{MockBlockchainService, MockConfig};

/// Overrides the [`BlockchainService`] capability with a fresh
/// [`MockBlockchainService`] every time a context is built.
///
/// The context owns the substitute. The configuration only keeps a weak
/// handle so tests can stub and verify it while the context is alive.
#[derive(Clone, Default)]
pub struct BlockchainTestConfiguration {
    mock_config: MockConfig,
    substitute: Arc<Mutex<Weak<MockBlockchainService>>>,
}

impl BlockchainTestConfiguration {
    pub const NAME: &'static str = "blockchain-test";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds substitutes with the given mock behavior instead of defaults.
    #[must_use]
    pub fn with_mock_config(mock_config: MockConfig) -> Self {
        Self {
            mock_config,
            ..Self::default()
        }
    }

    /// The substitute registered by the most recent build, while its context is alive.
    pub fn substitute(&self) -> Option<Arc<MockBlockchainService>> {
        self.substitute.lock().unwrap().upgrade()
    }

    /// Like [`substitute`](Self::substitute), but reports a missing
    /// `BlockchainService` capability when no live context holds one.
    pub fn require_substitute(&self) -> Result<Arc<MockBlockchainService>, ContextError> {
        self.substitute()
            .ok_or_else(|| ContextError::MissingCapability(BlockchainCapability::NAME.to_string()))
    }
}

impl Configuration for BlockchainTestConfiguration {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn define(&self, definitions: &mut Definitions) {
        let mock_config = self.mock_config.clone();
        let slot = Arc::clone(&self.substitute);

        definitions.override_with::<BlockchainCapability, _>(move |_| {
            let substitute = Arc::new(MockBlockchainService::with_config(mock_config));
            *slot.lock().unwrap() = Arc::downgrade(&substitute);
            debug!("Registered substitute blockchain service");

            let service: Arc<dyn BlockchainService> = substitute;
            Ok(service)
        });
    }
}

/// An [`AppContext`] built with [`BlockchainTestConfiguration`], plus a handle
/// to the substitute it registered.
pub struct TestContext {
    blockchain: Arc<MockBlockchainService>,
    context: AppContext,
}

impl TestContext {
    /// Context with default settings and only the substitute registered.
    pub fn new() -> Result<Self, ContextError> {
        Self::from_builder(ContextBuilder::new(AppConfig::default()))
    }

    /// Adds the substitute to an existing builder, overriding any primary
    /// blockchain provider it already carries.
    pub fn from_builder(builder: ContextBuilder) -> Result<Self, ContextError> {
        Self::from_builder_with(builder, BlockchainTestConfiguration::new())
    }

    pub fn from_builder_with(
        builder: ContextBuilder,
        configuration: BlockchainTestConfiguration,
    ) -> Result<Self, ContextError> {
        let context = builder.with_configuration(configuration.clone()).build()?;
        let blockchain = configuration.require_substitute()?;

        Ok(Self {
            blockchain,
            context,
        })
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    #[must_use]
    pub fn blockchain(&self) -> &Arc<MockBlockchainService> {
        &self.blockchain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DefinitionKind;

    #[test]
    fn test_override_definition_is_contributed() {
        let configuration = BlockchainTestConfiguration::new();
        let mut definitions = Definitions::new(configuration.name());
        configuration.define(&mut definitions);

        assert_eq!(
            definitions.kinds(),
            vec![("BlockchainService", DefinitionKind::Override)]
        );
        // Nothing is constructed until a context is built.
        assert!(configuration.substitute().is_none());
    }

    #[test]
    fn test_substitute_is_the_registered_instance() {
        let test_context = TestContext::new().unwrap();
        let resolved = test_context.context().blockchain_service().unwrap();

        assert_eq!(
            Arc::as_ptr(&resolved) as *const (),
            Arc::as_ptr(test_context.blockchain()) as *const ()
        );
        assert_eq!(
            test_context.context().registry().source_of("BlockchainService"),
            Some(BlockchainTestConfiguration::NAME)
        );
    }

    #[test]
    fn test_substitute_released_with_context() {
        let configuration = BlockchainTestConfiguration::new();
        let context = ContextBuilder::new(AppConfig::default())
            .with_configuration(configuration.clone())
            .build()
            .unwrap();

        assert!(configuration.substitute().is_some());

        drop(context);
        assert!(configuration.substitute().is_none());
    }

    #[test]
    fn test_require_substitute_names_the_capability() {
        let configuration = BlockchainTestConfiguration::new();

        assert_eq!(
            configuration.require_substitute().err().unwrap(),
            ContextError::MissingCapability("BlockchainService".to_string())
        );

        let context = ContextBuilder::new(AppConfig::default())
            .with_configuration(configuration.clone())
            .build()
            .unwrap();
        assert!(configuration.require_substitute().is_ok());
        drop(context);
        assert!(configuration.require_substitute().is_err());
    }

    #[tokio::test]
    async fn test_mock_config_is_applied_to_substitute() {
        let configuration = BlockchainTestConfiguration::with_mock_config(MockConfig::failure(
            "ledger offline",
        ));
        let test_context =
            TestContext::from_builder_with(ContextBuilder::new(AppConfig::default()), configuration)
                .unwrap();

        let service = test_context.context().blockchain_service().unwrap();
        assert!(service.submit_transaction("hash").await.is_err());
    }
}
