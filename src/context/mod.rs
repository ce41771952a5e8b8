//! Dependency context: capabilities, provider definitions, and the registry
//! that hands one instance per capability to consumers.

pub mod app_context;
pub mod capability;
pub mod definitions;
pub mod registry;

pub use app_context::{AppContext, ContextBuilder};
pub use capability::{BlockchainCapability, Capability};
pub use definitions::{Configuration, DefinitionKind, Definitions};
pub use registry::ServiceRegistry;
