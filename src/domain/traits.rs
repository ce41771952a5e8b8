//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;

/// Blockchain integration capability.
///
/// The issuance service only talks to the ledger through this trait; the
/// production client is supplied by the host, tests receive a substitute.
#[async_trait]
pub trait BlockchainService: Send + Sync {
    /// Check blockchain RPC connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Submit a transaction with the given hash/memo, returning its signature
    async fn submit_transaction(&self, hash: &str) -> Result<String, AppError>;

    /// Get transaction confirmation status
    async fn get_transaction_status(&self, signature: &str) -> Result<bool, AppError> {
        let _ = signature;
        Err(AppError::NotSupported(
            "get_transaction_status not implemented".to_string(),
        ))
    }

    /// Get current block height
    async fn get_block_height(&self) -> Result<u64, AppError> {
        Err(AppError::NotSupported(
            "get_block_height not implemented".to_string(),
        ))
    }

    /// Get latest blockhash for transaction construction
    async fn get_latest_blockhash(&self) -> Result<String, AppError> {
        Err(AppError::NotSupported(
            "get_latest_blockhash not implemented".to_string(),
        ))
    }

    /// Wait for transaction confirmation with timeout
    async fn wait_for_confirmation(
        &self,
        signature: &str,
        timeout_secs: u64,
    ) -> Result<bool, AppError> {
        let _ = (signature, timeout_secs);
        Err(AppError::NotSupported(
            "wait_for_confirmation not implemented".to_string(),
        ))
    }

    /// Fully qualified type name of the implementation behind the trait object.
    fn implementation(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
