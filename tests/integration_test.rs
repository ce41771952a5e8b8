//! Integration tests for the blockchain substitution in application contexts.

use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;

use green_bond_issuance::app::AppService;
use green_bond_issuance::config::AppConfig;
use green_bond_issuance::context::{AppContext, BlockchainCapability, ContextBuilder};
use green_bond_issuance::domain::{AnchorRequest, AppError, BlockchainService, HealthStatus};
use green_bond_issuance::infra::BlockchainConfiguration;
use green_bond_issuance::test_utils::{
    BlockchainTestConfiguration, Invocation, MockBlockchainService, TestContext,
};

/// Production-shaped client that opens a connection as soon as it is built.
struct ConnectingRpcClient {
    _stream: TcpStream,
}

#[async_trait]
impl BlockchainService for ConnectingRpcClient {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn submit_transaction(&self, hash: &str) -> Result<String, AppError> {
        Ok(format!("live_{hash}"))
    }
}

/// Production configuration whose factory dials `addr` and counts its runs.
fn production_configuration(
    addr: SocketAddr,
    invocations: Arc<AtomicUsize>,
) -> BlockchainConfiguration {
    BlockchainConfiguration::new(move |_config| {
        invocations.fetch_add(1, Ordering::SeqCst);
        let stream = TcpStream::connect(addr).map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Arc::new(ConnectingRpcClient { _stream: stream }) as Arc<dyn BlockchainService>)
    })
}

fn production_builder(addr: SocketAddr, invocations: Arc<AtomicUsize>) -> ContextBuilder {
    let config = AppConfig {
        blockchain_rpc_url: format!("http://{addr}"),
        ..AppConfig::default()
    };
    ContextBuilder::new(config).with_configuration(production_configuration(addr, invocations))
}

fn same_instance(a: &Arc<dyn BlockchainService>, b: &Arc<dyn BlockchainService>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[tokio::test]
async fn test_substitute_replaces_production_client_end_to_end() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let factory_runs = Arc::new(AtomicUsize::new(0));

    let test_context =
        TestContext::from_builder(production_builder(addr, Arc::clone(&factory_runs)))?;
    let service = test_context.context().blockchain_service()?;

    assert!(
        service
            .implementation()
            .ends_with("MockBlockchainService")
    );
    assert!(test_context.context().registry().is_overridden("BlockchainService"));
    assert_eq!(factory_runs.load(Ordering::SeqCst), 0);

    // No connection reached the would-be RPC endpoint.
    let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err());

    assert!(!test_context.blockchain().has_interactions());
    Ok(())
}

#[tokio::test]
async fn test_production_factory_runs_without_substitute() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let factory_runs = Arc::new(AtomicUsize::new(0));

    let context = production_builder(addr, Arc::clone(&factory_runs)).build()?;
    let service = context.blockchain_service()?;

    assert_eq!(factory_runs.load(Ordering::SeqCst), 1);
    assert!(service.implementation().ends_with("ConnectingRpcClient"));

    let accepted = tokio::time::timeout(Duration::from_secs(2), listener.accept()).await;
    assert!(accepted.is_ok());
    Ok(())
}

#[test]
fn test_exactly_one_substitute_per_context() -> anyhow::Result<()> {
    let test_context = TestContext::new()?;
    let registry = test_context.context().registry();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.capabilities(), vec!["BlockchainService"]);

    let first = test_context.context().resolve::<BlockchainCapability>()?;
    let second = test_context.context().blockchain_service()?;
    assert!(same_instance(&first, &second));
    Ok(())
}

#[test]
fn test_substitutes_differ_across_contexts() -> anyhow::Result<()> {
    let configuration = BlockchainTestConfiguration::new();

    let first = ContextBuilder::new(AppConfig::default())
        .with_configuration(configuration.clone())
        .build()?;
    let first_mock = configuration.substitute();

    let second = ContextBuilder::new(AppConfig::default())
        .with_configuration(configuration.clone())
        .build()?;
    let second_mock = configuration.substitute();

    assert!(!same_instance(
        &first.blockchain_service()?,
        &second.blockchain_service()?
    ));

    let (first_mock, second_mock) = (first_mock.unwrap(), second_mock.unwrap());
    assert!(!Arc::ptr_eq(&first_mock, &second_mock));
    Ok(())
}

#[tokio::test]
async fn test_stubbing_does_not_leak_between_contexts() -> anyhow::Result<()> {
    let first = TestContext::new()?;
    first
        .blockchain()
        .stub_submit_transaction(Ok("sig_first".to_string()));
    let _ = first.context().blockchain_service()?.submit_transaction("a").await?;

    let second = TestContext::new()?;
    let answer = second
        .context()
        .blockchain_service()?
        .submit_transaction("b")
        .await?;

    assert_eq!(answer, "");
    assert_eq!(first.blockchain().call_count(), 1);
    assert_eq!(
        second.blockchain().invocations(),
        vec![Invocation::SubmitTransaction {
            hash: "b".to_string()
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_unconfigured_substitute_never_fails() -> anyhow::Result<()> {
    let test_context = TestContext::new()?;
    let service = test_context.context().blockchain_service()?;

    service.health_check().await?;
    assert_eq!(service.submit_transaction("hash").await?, "");
    assert!(!service.get_transaction_status("sig").await?);
    assert_eq!(service.get_block_height().await?, 0);
    assert_eq!(service.get_latest_blockhash().await?, "");
    assert!(!service.wait_for_confirmation("sig", 1).await?);

    assert_eq!(test_context.blockchain().call_count(), 6);
    Ok(())
}

#[test]
fn test_teardown_releases_substitute() -> anyhow::Result<()> {
    let test_context = TestContext::new()?;
    let weak = Arc::downgrade(test_context.blockchain());
    assert!(weak.upgrade().is_some());

    drop(test_context);
    assert!(weak.upgrade().is_none());
    Ok(())
}

#[tokio::test]
async fn test_app_service_uses_substitute_from_context() -> anyhow::Result<()> {
    let test_context = TestContext::new()?;
    test_context
        .blockchain()
        .stub_submit_transaction(Ok("sig_green_1".to_string()));
    test_context.blockchain().stub_confirmation(Ok(true));

    let service = AppService::from_context(test_context.context())?;
    let receipt = service
        .anchor_document(&AnchorRequest::new("Green bond framework 2026").with_label("framework"))
        .await?;

    assert_eq!(receipt.signature, "sig_green_1");
    assert!(service.confirm(&receipt.signature).await?);
    assert_eq!(service.health_check().await.status, HealthStatus::Healthy);
    assert_eq!(test_context.blockchain().submitted_hashes(), vec![receipt.hash]);
    Ok(())
}

#[test]
fn test_context_without_blockchain_provider() {
    let context = AppContext::builder(AppConfig::default()).build().unwrap();
    let result = AppService::from_context(&context);
    assert!(matches!(result, Err(AppError::Context(_))));
}

#[test]
fn test_substitute_handle_is_usable_directly() {
    let mock = Arc::new(MockBlockchainService::new());
    let service: Arc<dyn BlockchainService> = mock.clone();
    assert!(service.implementation().ends_with("MockBlockchainService"));
    assert_eq!(Arc::strong_count(&mock), 2);
}
