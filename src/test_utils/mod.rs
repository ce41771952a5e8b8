//! Test utilities and mock implementations.
//!
//! This module provides the blockchain substitute and the configuration that
//! registers it, for use in unit and integration tests.

pub mod configuration;
pub mod mocks;

pub use configuration::{BlockchainTestConfiguration, TestContext};
pub use mocks::{Invocation, MockBlockchainService, MockConfig};
