//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("RPC call failed: {0}")]
    RpcError(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Timeout waiting for confirmation: {0}")]
    Timeout(String),
}

/// Failures raised while wiring or resolving capabilities in an application context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("No provider registered for capability '{0}'")]
    MissingCapability(String),
    #[error("Capability '{capability}' is provided more than once (by {sources})")]
    DuplicateRegistration { capability: String, sources: String },
    #[error("Capability '{capability}' is registered with a type other than {expected}")]
    TypeMismatch {
        capability: String,
        expected: &'static str,
    },
    #[error("Provider for '{capability}' in '{source_name}' failed: {message}")]
    ProviderFailed {
        capability: String,
        source_name: String,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Validation failed: {0}")]
    Multiple(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::Multiple(err.to_string()))
    }
}
