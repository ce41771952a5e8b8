//! Green Bond Issuance: blockchain capability wiring
//!
//! The issuance service reaches the ledger only through the
//! [`BlockchainService`](domain::BlockchainService) capability. Components
//! receive that capability from an [`AppContext`](context::AppContext), which
//! is assembled from configuration units: the host contributes the production
//! client as a primary provider, and tests contribute a substitute that
//! overrides it.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Application Layer               │
//! │      AppService, consumers of capabilities   │
//! ├─────────────────────────────────────────────┤
//! │               Context Layer                  │
//! │  Capabilities, definitions, registry, build  │
//! ├─────────────────────────────────────────────┤
//! │                Domain Layer                  │
//! │           Traits, types, errors              │
//! ├─────────────────────────────────────────────┤
//! │            Infrastructure Layer              │
//! │     Production wiring, tracing setup         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use green_bond_issuance::app::AppService;
//! use green_bond_issuance::test_utils::TestContext;
//!
//! #[tokio::test]
//! async fn anchors_without_a_live_chain() -> anyhow::Result<()> {
//!     let test_context = TestContext::new()?;
//!     test_context.blockchain().stub_submit_transaction(Ok("sig_1".into()));
//!
//!     let service = AppService::from_context(test_context.context())?;
//!     let receipt = service.anchor_document(&AnchorRequest::new("prospectus")).await?;
//!     assert_eq!(receipt.signature, "sig_1");
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
