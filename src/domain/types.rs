use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Represents a hash string used for blockchain records.
pub type HashString = String;

/// Represents a transaction signature returned by the blockchain.
pub type TransactionSignature = String;

/// Request to anchor a document's digest on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnchorRequest {
    #[validate(length(min = 1, max = 65536))]
    pub content: String,
    #[validate(length(max = 128))]
    pub label: Option<String>,
}

impl AnchorRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Proof that a document digest was handed to the blockchain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnchorReceipt {
    pub hash: HashString,
    pub signature: TransactionSignature,
    pub label: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Health check status for services.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub blockchain: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(blockchain: HealthStatus) -> Self {
        Self {
            status: blockchain,
            blockchain,
            timestamp: Utc::now(),
        }
    }
}
