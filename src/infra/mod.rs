//! Infrastructure layer: production wiring and observability.

pub mod blockchain;
pub mod observability;

pub use blockchain::BlockchainConfiguration;
pub use observability::init_tracing;
