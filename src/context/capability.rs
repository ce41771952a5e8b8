//! Capability markers binding a registry name to the service type consumers receive.

use crate::domain::BlockchainService;

/// A named dependency that providers satisfy and consumers resolve.
///
/// Implementors are zero-sized markers; the registry stores instances as
/// `Arc<Self::Service>` under [`Capability::NAME`].
pub trait Capability: 'static {
    /// Registry key. Must be unique across capabilities.
    const NAME: &'static str;

    /// Type handed to consumers, usually a trait object.
    type Service: ?Sized + Send + Sync + 'static;
}

/// The blockchain integration used for ledger writes.
pub struct BlockchainCapability;

impl Capability for BlockchainCapability {
    const NAME: &'static str = "BlockchainService";
    type Service = dyn BlockchainService;
}
