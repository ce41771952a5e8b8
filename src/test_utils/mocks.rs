//! Mock implementations for testing.
//!
//! Unconfigured calls answer with the return type's default value (`()`,
//! empty string, `false`, `0`) and never touch the network. Tests can stub
//! individual operations, force every call to fail, and inspect the calls
//! that were made.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{AppError, BlockchainError, BlockchainService};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that answers with defaults.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// One recorded call on [`MockBlockchainService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    HealthCheck,
    SubmitTransaction { hash: String },
    GetTransactionStatus { signature: String },
    GetBlockHeight,
    GetLatestBlockhash,
    WaitForConfirmation { signature: String, timeout_secs: u64 },
}

type Stub<T> = Option<Result<T, BlockchainError>>;

#[derive(Default)]
struct Stubs {
    health_check: Stub<()>,
    submit_transaction: Stub<String>,
    transaction_status: Stub<bool>,
    block_height: Stub<u64>,
    latest_blockhash: Stub<String>,
    confirmation: Stub<bool>,
}

/// Stand-in for the blockchain capability.
///
/// # Example
///
/// ```
/// use green_bond_issuance::test_utils::{MockBlockchainService, MockConfig};
///
/// // Answers every call with a default value
/// let mock = MockBlockchainService::new();
/// mock.stub_submit_transaction(Ok("sig_1".to_string()));
/// assert!(!mock.has_interactions());
///
/// // Fails every call
/// let failing_mock = MockBlockchainService::with_config(MockConfig::failure("RPC error"));
/// assert_eq!(failing_mock.call_count(), 0);
/// ```
pub struct MockBlockchainService {
    config: MockConfig,
    stubs: Mutex<Stubs>,
    invocations: Mutex<Vec<Invocation>>,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockBlockchainService {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            stubs: Mutex::new(Stubs::default()),
            invocations: Mutex::new(Vec::new()),
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Gets all recorded calls in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn has_interactions(&self) -> bool {
        self.call_count() > 0
    }

    /// Gets the hashes passed to `submit_transaction`.
    pub fn submitted_hashes(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Invocation::SubmitTransaction { hash } => Some(hash.clone()),
                _ => None,
            })
            .collect()
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Clears stubs and recorded calls.
    pub fn reset(&self) {
        *self.stubs.lock().unwrap() = Stubs::default();
        self.invocations.lock().unwrap().clear();
        self.call_count.store(0, Ordering::Relaxed);
        self.is_healthy.store(true, Ordering::Relaxed);
    }

    pub fn stub_health_check(&self, answer: Result<(), BlockchainError>) {
        self.stubs.lock().unwrap().health_check = Some(answer);
    }

    pub fn stub_submit_transaction(&self, answer: Result<String, BlockchainError>) {
        self.stubs.lock().unwrap().submit_transaction = Some(answer);
    }

    pub fn stub_transaction_status(&self, answer: Result<bool, BlockchainError>) {
        self.stubs.lock().unwrap().transaction_status = Some(answer);
    }

    pub fn stub_block_height(&self, answer: Result<u64, BlockchainError>) {
        self.stubs.lock().unwrap().block_height = Some(answer);
    }

    pub fn stub_latest_blockhash(&self, answer: Result<String, BlockchainError>) {
        self.stubs.lock().unwrap().latest_blockhash = Some(answer);
    }

    pub fn stub_confirmation(&self, answer: Result<bool, BlockchainError>) {
        self.stubs.lock().unwrap().confirmation = Some(answer);
    }

    async fn record(&self, invocation: Invocation) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.invocations.lock().unwrap().push(invocation);

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock blockchain error".to_string());
            return Err(AppError::Blockchain(BlockchainError::TransactionFailed(msg)));
        }
        Ok(())
    }

    fn answer<T, F>(&self, select: F) -> Result<T, AppError>
    where
        T: Default + Clone,
        F: FnOnce(&Stubs) -> &Stub<T>,
    {
        self.check_should_fail()?;
        let stubs = self.stubs.lock().unwrap();
        match select(&stubs) {
            Some(answer) => answer.clone().map_err(AppError::Blockchain),
            None => Ok(T::default()),
        }
    }
}

impl Default for MockBlockchainService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockchainService for MockBlockchainService {
    async fn health_check(&self) -> Result<(), AppError> {
        self.record(Invocation::HealthCheck).await;

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Blockchain(BlockchainError::Connection(
                "Mock blockchain unhealthy".to_string(),
            )));
        }

        self.answer(|s| &s.health_check)
    }

    async fn submit_transaction(&self, hash: &str) -> Result<String, AppError> {
        self.record(Invocation::SubmitTransaction {
            hash: hash.to_string(),
        })
        .await;
        self.answer(|s| &s.submit_transaction)
    }

    async fn get_transaction_status(&self, signature: &str) -> Result<bool, AppError> {
        self.record(Invocation::GetTransactionStatus {
            signature: signature.to_string(),
        })
        .await;
        self.answer(|s| &s.transaction_status)
    }

    async fn get_block_height(&self) -> Result<u64, AppError> {
        self.record(Invocation::GetBlockHeight).await;
        self.answer(|s| &s.block_height)
    }

    async fn get_latest_blockhash(&self) -> Result<String, AppError> {
        self.record(Invocation::GetLatestBlockhash).await;
        self.answer(|s| &s.latest_blockhash)
    }

    async fn wait_for_confirmation(
        &self,
        signature: &str,
        timeout_secs: u64,
    ) -> Result<bool, AppError> {
        self.record(Invocation::WaitForConfirmation {
            signature: signature.to_string(),
            timeout_secs,
        })
        .await;
        self.answer(|s| &s.confirmation)
    }
}
