//! Application service layer.
//!
//! This module contains the logic that talks to the ledger through the
//! [`BlockchainService`] capability, never through a concrete client.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::config::{
    DEFAULT_CONFIRMATION_TIMEOUT_SECS, MAX_CONFIRMATION_TIMEOUT_SECS,
    MIN_CONFIRMATION_TIMEOUT_SECS,
};
use crate::context::AppContext;
use crate::domain::{
    AnchorReceipt, AnchorRequest, AppError, BlockchainError, BlockchainService, HealthResponse,
    HealthStatus, ValidationError,
};

/// Application service holding the blockchain capability.
///
/// # Example
///
/// ```ignore
/// let service = AppService::from_context(&context)?;
///
/// let receipt = service.anchor_document(&AnchorRequest::new(prospectus)).await?;
/// service.confirm(&receipt.signature).await?;
/// ```
pub struct AppService {
    blockchain: Arc<dyn BlockchainService>,
    confirmation_timeout_secs: u64,
}

impl AppService {
    /// Creates a new `AppService` instance.
    #[must_use]
    pub fn new(blockchain: Arc<dyn BlockchainService>) -> Self {
        Self {
            blockchain,
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
        }
    }

    /// Resolves the blockchain capability from a built context.
    pub fn from_context(context: &AppContext) -> Result<Self, AppError> {
        let blockchain = context.blockchain_service()?;
        info!(
            context_id = %context.id(),
            implementation = blockchain.implementation(),
            "Resolved blockchain service"
        );
        Ok(Self {
            blockchain,
            confirmation_timeout_secs: context.config().confirmation_timeout_secs,
        })
    }

    /// Overrides the confirmation timeout, clamped to the same 1..=600 second
    /// range that `AppConfig` accepts.
    #[must_use]
    pub fn with_confirmation_timeout(mut self, secs: u64) -> Self {
        self.confirmation_timeout_secs =
            secs.clamp(MIN_CONFIRMATION_TIMEOUT_SECS, MAX_CONFIRMATION_TIMEOUT_SECS);
        self
    }

    /// Hashes the document and submits the digest to the blockchain.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if:
    /// - Validation fails
    /// - The blockchain submission fails
    /// - The blockchain answers with an empty signature
    #[instrument(skip(self, request), fields(label = ?request.label))]
    pub async fn anchor_document(&self, request: &AnchorRequest) -> Result<AnchorReceipt, AppError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for anchor request");
            AppError::Validation(ValidationError::Multiple(e.to_string()))
        })?;

        let hash = hash_content(&request.content);
        let signature = self.blockchain.submit_transaction(&hash).await?;

        if signature.is_empty() {
            warn!(hash = %hash, "Blockchain returned an empty signature");
            return Err(AppError::Blockchain(BlockchainError::TransactionFailed(
                "empty signature".to_string(),
            )));
        }

        info!(hash = %hash, signature = %signature, "Document hash submitted to blockchain");

        Ok(AnchorReceipt {
            hash,
            signature,
            label: request.label.clone(),
            submitted_at: Utc::now(),
        })
    }

    /// Waits for the transaction to be confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`BlockchainError::Timeout`] if the capability does not answer
    /// within the confirmation timeout, whatever it does with the timeout it
    /// is handed.
    #[instrument(skip(self))]
    pub async fn confirm(&self, signature: &str) -> Result<bool, AppError> {
        let secs = self.confirmation_timeout_secs;
        let wait = self.blockchain.wait_for_confirmation(signature, secs);
        let confirmed = tokio::time::timeout(Duration::from_secs(secs), wait)
            .await
            .map_err(|_| {
                warn!(signature = %signature, timeout_secs = secs, "Confirmation timed out");
                BlockchainError::Timeout(format!("{secs}s"))
            })??;
        if !confirmed {
            warn!(signature = %signature, "Transaction not confirmed");
        }
        Ok(confirmed)
    }

    /// Performs a health check on the blockchain capability.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let blockchain_health = match self.blockchain.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Blockchain health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(blockchain_health)
    }
}

/// SHA-256 of the content as lower-case hex.
fn hash_content(content: &str) -> String {
    use sha2::{Digest, Sha256};

    let result = Sha256::digest(content.as_bytes());
    hex::encode(result)
}

mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut hex = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
            hex.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        hex
    }
}
