//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, BlockchainError, ConfigError, ContextError, ValidationError};
pub use traits::BlockchainService;
pub use types::{
    AnchorReceipt, AnchorRequest, HashString, HealthResponse, HealthStatus, TransactionSignature,
};
