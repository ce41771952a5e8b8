//! Production-side wiring for the blockchain capability.
//!
//! The RPC client itself lives in the host application; this configuration
//! only contributes its factory as the primary provider.

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::context::{BlockchainCapability, Configuration, Definitions};
use crate::domain::{AppError, BlockchainService};

type BlockchainFactory =
    dyn Fn(&AppConfig) -> Result<Arc<dyn BlockchainService>, AppError> + Send + Sync;

/// Primary provider of [`BlockchainService`], built from a host-supplied factory.
///
/// The factory runs only if no override replaces it, so a test context that
/// also loads a substitute never constructs the real client.
pub struct BlockchainConfiguration {
    factory: Arc<BlockchainFactory>,
}

impl BlockchainConfiguration {
    pub const NAME: &'static str = "blockchain";

    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&AppConfig) -> Result<Arc<dyn BlockchainService>, AppError> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }
}

impl Configuration for BlockchainConfiguration {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn define(&self, definitions: &mut Definitions) {
        let factory = Arc::clone(&self.factory);
        definitions.provide::<BlockchainCapability, _>(move |config| {
            info!(rpc_url = %config.blockchain_rpc_url, "Creating blockchain service");
            let service = factory(config)?;
            info!(
                implementation = service.implementation(),
                "Blockchain service created"
            );
            Ok(service)
        });
    }
}
